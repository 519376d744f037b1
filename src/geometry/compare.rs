//! Comparison of DDD and DD4hep geometry dumps.
//!
//! Both inputs are whitespace-separated lists of node names. The DDD dump is taken
//! verbatim; every DD4hep token is first passed through [`reduced_name`]. The report
//! lists duplicate names on each side and the names only one side knows about.
//!
//! A file that cannot be opened or read is reported on the output stream and treated
//! as an empty dump, so the remaining sections are still produced.

use crate::error::{ToolError, ToolResult};
use crate::geometry::name::reduced_name;
use crate::geometry::tally::NameTally;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// A name and how often it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCount {
    /// Canonical name
    pub name: String,
    /// Occurrences
    pub count: usize,
}

impl NameCount {
    fn collect<'a>(entries: impl Iterator<Item = (&'a str, usize)>) -> Vec<Self> {
        entries
            .map(|(name, count)| NameCount {
                name: name.to_string(),
                count,
            })
            .collect()
    }
}

/// Outcome of comparing two dumps, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    /// DDD dump path as given
    pub ddd_file: String,
    /// DD4hep dump path as given
    pub dd4hep_file: String,
    /// Distinct names read from the DDD dump.
    pub ddd_names: usize,
    /// Distinct reduced names read from the DD4hep dump.
    pub dd4hep_names: usize,
    /// Names seen more than once in the DDD dump.
    pub ddd_duplicates: Vec<NameCount>,
    /// Reduced names seen more than once in the DD4hep dump.
    pub dd4hep_duplicates: Vec<NameCount>,
    /// DDD names with no reduced DD4hep match.
    pub only_in_ddd: Vec<NameCount>,
    /// Reduced DD4hep names absent from the DDD dump.
    pub only_in_dd4hep: Vec<NameCount>,
    /// Inputs that could not be opened or read and were treated as empty.
    pub unreadable: Vec<String>,
}

impl ComparisonReport {
    /// Build the report sections from the two tallies.
    pub fn new(
        ddd_file: impl Into<String>,
        dd4hep_file: impl Into<String>,
        ddd: &NameTally,
        dd4hep: &NameTally,
    ) -> Self {
        Self {
            ddd_file: ddd_file.into(),
            dd4hep_file: dd4hep_file.into(),
            ddd_names: ddd.len(),
            dd4hep_names: dd4hep.len(),
            ddd_duplicates: NameCount::collect(ddd.duplicates()),
            dd4hep_duplicates: NameCount::collect(dd4hep.duplicates()),
            only_in_ddd: NameCount::collect(ddd.missing_from(dd4hep)),
            only_in_dd4hep: NameCount::collect(dd4hep.missing_from(ddd)),
            unreadable: Vec::new(),
        }
    }

    /// True when all four listing sections are empty.
    pub fn is_clean(&self) -> bool {
        self.ddd_duplicates.is_empty()
            && self.dd4hep_duplicates.is_empty()
            && self.only_in_ddd.is_empty()
            && self.only_in_dd4hep.is_empty()
    }

    /// Write the plain-text report.
    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "Reads {} names from {} and {} names from {}",
            self.ddd_names, self.ddd_file, self.dd4hep_names, self.dd4hep_file
        )?;

        writeln!(out, "\nMore than one entry for a given name in {}", self.ddd_file)?;
        for entry in &self.ddd_duplicates {
            writeln!(out, "{} : {}", entry.name, entry.count)?;
        }
        writeln!(out, "\nMore than one entry for a given name in {}", self.dd4hep_file)?;
        for entry in &self.dd4hep_duplicates {
            writeln!(out, "{} : {}", entry.name, entry.count)?;
        }

        writeln!(out, "\nEntry in {} not in {}", self.ddd_file, self.dd4hep_file)?;
        for entry in &self.only_in_ddd {
            writeln!(out, "{} appearing {} times", entry.name, entry.count)?;
        }
        writeln!(out, "\nEntry in {} not in {}", self.dd4hep_file, self.ddd_file)?;
        for entry in &self.only_in_dd4hep {
            writeln!(out, "{} appearing {} times", entry.name, entry.count)?;
        }
        Ok(())
    }
}

/// Debug level from a command-line word.
///
/// Leading whitespace and an optional sign are accepted, then as many digits as are
/// present; anything unparsable counts as 0. Out-of-range values saturate.
pub fn debug_level(arg: &str) -> i32 {
    let arg = arg.trim_start();
    let (negative, digits) = match arg.as_bytes().first() {
        Some(b'-') => (true, &arg[1..]),
        Some(b'+') => (false, &arg[1..]),
        _ => (false, arg),
    };
    let level = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            (acc * 10 + i64::from(digit - b'0')).min(i64::from(i32::MAX) + 1)
        });
    let level = if negative { -level } else { level };
    level.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Compares a DDD dump against a DD4hep dump.
#[derive(Debug, Clone)]
pub struct FileComparison {
    ddd_path: PathBuf,
    dd4hep_path: PathBuf,
    debug: i32,
}

impl FileComparison {
    /// Comparison of the two dumps with debugging off.
    pub fn new(ddd_path: impl Into<PathBuf>, dd4hep_path: impl Into<PathBuf>) -> Self {
        Self {
            ddd_path: ddd_path.into(),
            dd4hep_path: dd4hep_path.into(),
            debug: 0,
        }
    }

    /// Debug level; above zero every reduced DD4hep name is echoed to the output.
    pub fn with_debug(mut self, debug: i32) -> Self {
        self.debug = debug;
        self
    }

    /// Path of the DDD dump.
    pub fn ddd_path(&self) -> &Path {
        &self.ddd_path
    }

    /// Path of the DD4hep dump.
    pub fn dd4hep_path(&self) -> &Path {
        &self.dd4hep_path
    }

    /// Read both dumps and build the report.
    ///
    /// `out` receives the "Cannot open file" and "Cannot read file" notices and,
    /// when debugging, the per-token reduction lines. Only write failures on `out`
    /// are errors.
    pub fn collect<W: Write>(&self, out: &mut W) -> ToolResult<ComparisonReport> {
        let mut unreadable = Vec::new();

        let ddd = self.read_side(&self.ddd_path, out, &mut unreadable, |token, _| {
            Ok(token.to_string())
        })?;

        let debug = self.debug;
        let dd4hep = self.read_side(&self.dd4hep_path, out, &mut unreadable, |token, out| {
            let reduced = reduced_name(token);
            trace!(token, name = %reduced.name, "reduced DD4hep name");
            if debug > 0 {
                writeln!(out, "{}", reduced.diagnostic(token))?;
            }
            Ok(reduced.name)
        })?;

        let mut report = ComparisonReport::new(
            self.ddd_path.display().to_string(),
            self.dd4hep_path.display().to_string(),
            &ddd,
            &dd4hep,
        );
        report.unreadable = unreadable;

        info!(
            ddd_names = report.ddd_names,
            dd4hep_names = report.dd4hep_names,
            only_in_ddd = report.only_in_ddd.len(),
            only_in_dd4hep = report.only_in_dd4hep.len(),
            "compared geometry dumps"
        );
        Ok(report)
    }

    /// Read both dumps and write the text report to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> ToolResult<ComparisonReport> {
        let report = self.collect(out)?;
        report.write_text(out)?;
        Ok(report)
    }

    fn read_side<W, F>(
        &self,
        path: &Path,
        out: &mut W,
        unreadable: &mut Vec<String>,
        mut canonical: F,
    ) -> ToolResult<NameTally>
    where
        W: Write,
        F: FnMut(&str, &mut W) -> ToolResult<String>,
    {
        match NameTally::from_path(path, |token| canonical(token, out)) {
            Ok(tally) => {
                debug!(
                    path = %path.display(),
                    distinct = tally.len(),
                    total = tally.total(),
                    "read geometry dump"
                );
                Ok(tally)
            }
            Err(err) if err.is_recoverable() => {
                warn!(path = %path.display(), error = %err, "cannot read geometry dump");
                let verb = match err {
                    ToolError::Read { .. } => "read",
                    _ => "open",
                };
                writeln!(out, "Cannot {verb} file {}", path.display())?;
                unreadable.push(path.display().to_string());
                Ok(NameTally::new())
            }
            Err(err) => Err(err),
        }
    }
}
