//! Configuration using Figment
//!
//! Strongly-typed configuration for both tools. Values are layered, later sources
//! overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file (`geom_daq.toml` unless another path is given; a missing file is
//!    not an error)
//! 3. environment variables prefixed with `GEOM_DAQ_`, nested keys separated by `__`
//!
//! # Example
//! ```no_run
//! use geom_daq_tools::config::ToolsConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToolsConfig::load()?;
//! config.validate()?;
//! println!("Vertex label: {}", config.gtt.l1_vertex_collection_name);
//! # Ok(())
//! # }
//! ```
//!
//! Override the board file format from the shell:
//! `GEOM_DAQ_GTT__FORMAT=EMPv2`

use crate::board::gtt::GttReaderConfig;
use crate::error::{ToolError, ToolResult};
use crate::logging::OutputFormat;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "geom_daq.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "GEOM_DAQ_";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// GTT board file reader settings
    #[serde(default)]
    pub gtt: GttReaderConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (pretty, compact, json)
    #[serde(default)]
    pub format: OutputFormat,
    /// Whether to colour pretty output
    #[serde(default = "default_with_ansi")]
    pub with_ansi: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_with_ansi() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: OutputFormat::default(),
            with_ansi: default_with_ansi(),
        }
    }
}

impl ToolsConfig {
    /// Load configuration from `geom_daq.toml` and environment variables
    pub fn load() -> ToolResult<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> ToolResult<Self> {
        let config = Figment::from(Serialized::defaults(ToolsConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> ToolResult<()> {
        if !VALID_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ToolError::Configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }
        self.gtt.validate()
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> ToolResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ToolError::Configuration(format!("Cannot render configuration: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::FileFormat;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn defaults_validate() {
        let config = ToolsConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, OutputFormat::Pretty);
        config.validate().unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config = ToolsConfig::load_from("does-not-exist.toml").map_err(|e| e.to_string())?;
            assert_eq!(config, ToolsConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [logging]
                level = "debug"
                format = "json"

                [gtt]
                files = ["out_0.txt", "out_1.txt"]
                format = "EMPv1"
                "#,
            )?;

            let config = ToolsConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, OutputFormat::Json);
            assert_eq!(
                config.gtt.files,
                vec![PathBuf::from("out_0.txt"), PathBuf::from("out_1.txt")]
            );
            assert_eq!(config.gtt.format, FileFormat::EmpV1);
            assert_eq!(config.gtt.l1_vertex_collection_name, "L1VerticesFirmware");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "[gtt]\nformat = \"EMPv1\"\n")?;
            jail.set_env("GEOM_DAQ_GTT__FORMAT", "X2O");
            jail.set_env("GEOM_DAQ_GTT__L1_VERTEX_COLLECTION_NAME", "Replayed");

            let config = ToolsConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.gtt.format, FileFormat::X2o);
            assert_eq!(config.gtt.l1_vertex_collection_name, "Replayed");
            Ok(())
        });
    }

    #[test]
    fn unknown_format_is_a_load_error() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "[gtt]\nformat = \"CSV\"\n")?;
            assert!(matches!(ToolsConfig::load(), Err(ToolError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let mut config = ToolsConfig::default();
        config.logging.level = "verbose".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid log level 'verbose'"));
    }

    #[test]
    fn empty_track_files_fail_validation() {
        let mut config = ToolsConfig::default();
        config.gtt.files_input_tracks.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn renders_as_toml() {
        let rendered = ToolsConfig::default().to_toml_string().unwrap();
        assert!(rendered.contains("[gtt]"));
        assert!(rendered.contains("format = \"APx\""));
    }
}
