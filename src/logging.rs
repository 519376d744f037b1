//! Tracing Infrastructure
//!
//! Structured logging for the command-line tools, built on `tracing` and
//! `tracing-subscriber`:
//! - Multiple output formats (pretty, compact, JSON)
//! - Environment-based filtering (`RUST_LOG` wins over the configured level)
//! - Output on stderr, leaving stdout to the reports
//!
//! # Example
//! ```no_run
//! use geom_daq_tools::{config::ToolsConfig, logging};
//! use tracing::info;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToolsConfig::load()?;
//! logging::init_from_config(&config)?;
//! info!("tool started");
//! # Ok(())
//! # }
//! ```

use crate::config::{LoggingConfig, ToolsConfig};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Output format for tracing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed format with colors (for development)
    #[default]
    Pretty,
    /// Compact single-line format without colors
    Compact,
    /// JSON format for structured logging (for log aggregation)
    Json,
}

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Level,
    /// Output format
    pub format: OutputFormat,
    /// Whether to include span events (NEW, CLOSE)
    pub with_span_events: bool,
    /// Whether to include file and line numbers
    pub with_file_and_line: bool,
    /// Whether to enable ANSI colors (only for Pretty format)
    pub with_ansi: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: OutputFormat::Pretty,
            with_span_events: false,
            with_file_and_line: false,
            with_ansi: true,
        }
    }
}

impl TracingConfig {
    /// Create tracing config from the `[logging]` table
    pub fn from_logging_config(config: &LoggingConfig) -> Result<Self, String> {
        Ok(Self {
            level: parse_log_level(&config.level)?,
            format: config.format,
            with_ansi: config.with_ansi,
            ..Default::default()
        })
    }

    /// Create tracing config with custom settings
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable span events
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// Enable or disable ANSI colors
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.with_ansi = enabled;
        self
    }
}

/// Initialize tracing from the tool configuration
pub fn init_from_config(config: &ToolsConfig) -> Result<(), String> {
    init(TracingConfig::from_logging_config(&config.logging)?)
}

/// Initialize tracing with custom configuration
///
/// Idempotent: if a global subscriber is already installed this returns `Ok(())`,
/// which keeps it safe to call from tests.
pub fn init(config: TracingConfig) -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_string(config.level)));

    let span_events = if config.with_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        OutputFormat::Pretty => install(
            fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_span_events(span_events)
                .with_file(config.with_file_and_line)
                .with_line_number(config.with_file_and_line)
                .with_ansi(config.with_ansi)
                .with_filter(env_filter),
        ),
        OutputFormat::Compact => install(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_span_events(span_events)
                .with_file(config.with_file_and_line)
                .with_line_number(config.with_file_and_line)
                .with_ansi(false)
                .with_filter(env_filter),
        ),
        OutputFormat::Json => install(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(span_events)
                .with_file(config.with_file_and_line)
                .with_line_number(config.with_file_and_line)
                .with_filter(env_filter),
        ),
    }
}

fn install<L>(layer: L) -> Result<(), String>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .or_else(|e| {
            // Already initialized happens in tests and when both binaries share setup
            if e.to_string()
                .contains("a global default trace dispatcher has already been set")
            {
                Ok(())
            } else {
                Err(format!("Failed to initialize tracing: {}", e))
            }
        })
}

/// Parse log level string into tracing Level
pub fn parse_log_level(level: &str) -> Result<Level, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(format!(
            "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
            level
        )),
    }
}

/// Convert Level to env filter string
fn level_to_filter_string(level: Level) -> String {
    match level {
        Level::TRACE => "trace".to_string(),
        Level::DEBUG => "debug".to_string(),
        Level::INFO => "info".to_string(),
        Level::WARN => "warn".to_string(),
        Level::ERROR => "error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("trace"), Ok(Level::TRACE)));
        assert!(matches!(parse_log_level("debug"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("warn"), Ok(Level::WARN)));
        assert!(matches!(parse_log_level("error"), Ok(Level::ERROR)));

        // Case insensitive
        assert!(matches!(parse_log_level("INFO"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("Debug"), Ok(Level::DEBUG)));

        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_tracing_config_from_logging_table() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: OutputFormat::Compact,
            with_ansi: false,
        };
        let tracing_config = TracingConfig::from_logging_config(&logging).unwrap();
        assert!(matches!(tracing_config.level, Level::DEBUG));
        assert_eq!(tracing_config.format, OutputFormat::Compact);
        assert!(!tracing_config.with_ansi);
    }

    #[test]
    fn test_tracing_config_builder() {
        let config = TracingConfig::new(Level::WARN)
            .with_format(OutputFormat::Json)
            .with_span_events(true)
            .with_ansi(false);

        assert!(matches!(config.level, Level::WARN));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.with_span_events);
        assert!(!config.with_ansi);
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = TracingConfig::new(Level::ERROR).with_format(OutputFormat::Compact);
        assert!(init(config.clone()).is_ok());
        assert!(init(config).is_ok());
    }
}
