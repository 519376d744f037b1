//! Custom error types for the tools.
//!
//! This module defines the primary error type, `ToolError`, shared by the geometry
//! comparison and the board file reader. Using the `thiserror` crate, it provides a
//! centralized way to report failures, from unreadable input files and configuration
//! issues to events that lack an expected link.
//!
//! ## Error Hierarchy
//!
//! - **`Open`** / **`Read`**: An input file could not be opened, or failed partway through
//!   reading. The comparison driver treats both as non-fatal and continues with an empty
//!   name table.
//! - **`Config`**: Wraps errors from `figment`, typically parse or type errors in the
//!   TOML file or environment overrides.
//! - **`Configuration`**: Semantic errors in a configuration that parsed fine but holds
//!   invalid values (unknown log level, empty file list, clashing channel indices).
//! - **`UnknownFormat`**: A board file format name that is not recognised.
//! - **`MissingLink`** / **`Exhausted`**: Event-level failures from a board reader.
//! - **`Io`** / **`Json`**: Wrapped I/O and serialization failures.
//!
//! By using `#[from]`, `ToolError` is created from underlying error types with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Errors raised by the geometry comparison and the board reader.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Input file could not be opened.
    #[error("Cannot open file {}: {source}", .path.display())]
    Open {
        /// File that was asked for
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Input file opened but reading it failed, e.g. a directory.
    #[error("Cannot read file {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed or extracted.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration parsed but holds invalid values.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Board file format name not recognised.
    #[error("Unknown board file format '{0}'. Must be one of: APx, EMPv1, EMPv2, X2O")]
    UnknownFormat(String),

    /// Event lacks a link the channel map names.
    #[error("Event has no data for link {0}")]
    MissingLink(String),

    /// Board reader ran out of events.
    #[error("Board reader has no more events")]
    Exhausted,

    /// Any other I/O failure, typically writing the report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for ToolError {
    fn from(value: figment::Error) -> Self {
        ToolError::Config(Box::new(value))
    }
}

impl ToolError {
    /// Whether processing can continue after this error.
    ///
    /// Unreadable input files are reported and skipped; everything else aborts the
    /// current operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ToolError::Open { .. } | ToolError::Read { .. })
    }
}
