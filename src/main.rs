//! CLI entry point for sim-file-compare
//!
//! Compares the node-name dumps printed for one geometry built from DDD and from
//! DD4hep inputs.
//!
//! # Usage
//!
//! ```bash
//! sim-file-compare ddd_names.txt dd4hep_names.txt
//! sim-file-compare ddd_names.txt dd4hep_names.txt 1      # echo every name reduction
//! sim-file-compare ddd_names.txt dd4hep_names.txt --json
//! ```
//!
//! Missing input files are reported and treated as empty; the report is still
//! printed and the exit code stays 0.

use anyhow::Result;
use clap::Parser;
use geom_daq_tools::geometry::{debug_level, FileComparison};
use geom_daq_tools::logging::{self, OutputFormat, TracingConfig};
use std::io::{self, Write};
use std::path::PathBuf;

const USAGE: &str = "Please give 3 arguments
input file name from the DDD run
input file name from the DD4Hep run
debug flag (0 for minimum printout)
";

#[derive(Parser)]
#[command(name = "sim-file-compare")]
#[command(about = "Compare geometry node dumps from DDD and DD4hep runs", long_about = None)]
struct Cli {
    /// Name dump from the DDD run
    file_ddd: Option<PathBuf>,

    /// Name dump from the DD4hep run
    file_dd4hep: Option<PathBuf>,

    /// Debug level (0 for minimum printout); a leading integer is read, anything
    /// else counts as 0
    #[arg(allow_negative_numbers = true)]
    debug: Option<String>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
    log_format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = logging::parse_log_level(&cli.log_level).map_err(anyhow::Error::msg)?;
    logging::init(TracingConfig::new(level).with_format(cli.log_format))
        .map_err(anyhow::Error::msg)?;

    let (Some(file_ddd), Some(file_dd4hep)) = (cli.file_ddd, cli.file_dd4hep) else {
        println!("{USAGE}");
        return Ok(());
    };

    let comparison = FileComparison::new(file_ddd, file_dd4hep)
        .with_debug(cli.debug.as_deref().map_or(0, debug_level));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.json {
        let report = comparison.collect(&mut io::stderr())?;
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        comparison.run(&mut out)?;
    }
    out.flush()?;
    Ok(())
}
