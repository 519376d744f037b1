//! Geometry dump comparison.
//!
//! Compares the node-name listings printed for the same detector geometry built from
//! DDD and from DD4hep inputs.
//!
//! - [`name`]: reduction of DD4hep names to their DDD form
//! - [`tally`]: name-frequency tables
//! - [`compare`]: the comparison driver and its report

pub mod compare;
pub mod name;
pub mod tally;

pub use compare::{debug_level, ComparisonReport, FileComparison, NameCount};
pub use name::{reduced_name, ReducedName, REFLECTED_SUFFIX};
pub use tally::NameTally;
