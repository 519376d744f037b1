//! # Geometry and Board Data Tools
//!
//! Library behind two small detector-software tools:
//!
//! - `sim-file-compare` compares the node names printed for one geometry built from
//!   DDD and from DD4hep inputs, after reducing DD4hep names to their DDD form.
//! - the GTT board file reader turns I/O buffer files from hardware tests into
//!   vertex collections, with the frame decoding delegated to an external reader.
//!
//! ## Crate Structure
//!
//! - **`geometry`**: name reduction, name-frequency tables and the comparison report.
//! - **`board`**: board file formats, channel maps, the board reader seam and the
//!   GTT producer.
//! - **`config`**: figment-based configuration (`ToolsConfig`) from TOML and
//!   `GEOM_DAQ_` environment variables.
//! - **`logging`**: `tracing-subscriber` setup shared by the binaries.
//! - **`error`**: the `ToolError` enum used across the crate.

pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;

pub use error::{ToolError, ToolResult};
