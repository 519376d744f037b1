//! Board data file formats.

use crate::error::{ToolError, ToolResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text layout of an I/O buffer file written by a board test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileFormat {
    /// APx board buffer dump
    #[default]
    #[serde(rename = "APx")]
    Apx,
    /// EMP framework, first revision
    #[serde(rename = "EMPv1")]
    EmpV1,
    /// EMP framework, second revision
    #[serde(rename = "EMPv2")]
    EmpV2,
    /// X2O board dump
    #[serde(rename = "X2O")]
    X2o,
}

impl FileFormat {
    /// Every supported format.
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Apx,
        FileFormat::EmpV1,
        FileFormat::EmpV2,
        FileFormat::X2o,
    ];

    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Apx => "APx",
            FileFormat::EmpV1 => "EMPv1",
            FileFormat::EmpV2 => "EMPv2",
            FileFormat::X2o => "X2O",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> ToolResult<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ToolError::UnknownFormat(s.to_string()))
    }
}
