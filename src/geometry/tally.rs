//! Name-frequency tables built from whitespace-separated dumps.

use crate::error::{ToolError, ToolResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Occurrence count per canonical name.
///
/// Names are kept sorted so reports list them in a stable order. Every stored count
/// is at least one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameTally {
    counts: BTreeMap<String, usize>,
}

impl NameTally {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `name` and return the new count.
    pub fn record(&mut self, name: impl Into<String>) -> usize {
        let count = self.counts.entry(name.into()).or_insert(0);
        *count += 1;
        *count
    }

    /// Occurrences of `name`, zero when never seen.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// True when `name` was seen.
    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of tokens recorded, duplicates included.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Names and counts in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Names seen more than once.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.iter().filter(|(_, count)| *count > 1)
    }

    /// Names in this table that `other` never saw.
    pub fn missing_from<'a>(
        &'a self,
        other: &'a NameTally,
    ) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        self.iter().filter(move |(name, _)| !other.contains(name))
    }

    /// Tally every whitespace-separated token of `reader`.
    ///
    /// Each token goes through `canonical` before it is counted. Invalid UTF-8 is
    /// replaced rather than rejected, matching how the dumps are produced.
    pub fn read_tokens<R, F>(reader: R, canonical: F) -> ToolResult<Self>
    where
        R: BufRead,
        F: FnMut(&str) -> ToolResult<String>,
    {
        Self::tally_tokens(reader, canonical, ToolError::Io)
    }

    /// Open `path` and tally its tokens.
    ///
    /// A file that cannot be opened gives [`ToolError::Open`]; one that opens but then
    /// fails to read (a directory, say) gives [`ToolError::Read`]. Errors raised by
    /// `canonical` pass through unchanged.
    pub fn from_path<P, F>(path: P, canonical: F) -> ToolResult<Self>
    where
        P: AsRef<Path>,
        F: FnMut(&str) -> ToolResult<String>,
    {
        let path = path.as_ref();
        let open_error = |source: std::io::Error| ToolError::Open {
            path: path.to_path_buf(),
            source,
        };
        let read_error = |source: std::io::Error| ToolError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_error)?;
        Self::tally_tokens(BufReader::new(file), canonical, read_error)
    }

    fn tally_tokens<R, F, E>(mut reader: R, mut canonical: F, read_error: E) -> ToolResult<Self>
    where
        R: BufRead,
        F: FnMut(&str) -> ToolResult<String>,
        E: Fn(std::io::Error) -> ToolError,
    {
        let mut tally = Self::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).map_err(&read_error)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&line);
            for token in text.split_whitespace() {
                tally.record(canonical(token)?);
            }
        }
        Ok(tally)
    }
}

impl<S: Into<String>> FromIterator<S> for NameTally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = Self::new();
        for name in iter {
            tally.record(name);
        }
        tally
    }
}
