// Print the board reader settings the GTT file reader would be opened with.
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use geom_daq_tools::board::BoardReaderSettings;
use geom_daq_tools::config::{ToolsConfig, DEFAULT_CONFIG_FILE};
use geom_daq_tools::logging;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
enum Show {
    /// Output (vertex) reader settings
    Vertices,
    /// Input (track) reader settings
    Tracks,
    /// Both readers
    All,
    /// Effective configuration as TOML
    Config,
}

#[derive(Parser)]
#[command(name = "gtt-channels")]
#[command(about = "Show GTT board reader settings and channel maps", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// What to print
    #[arg(value_enum, default_value_t = Show::All)]
    show: Show,
}

#[derive(Serialize)]
struct Readers {
    vertices: BoardReaderSettings,
    tracks: BoardReaderSettings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ToolsConfig::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    logging::init_from_config(&config).map_err(anyhow::Error::msg)?;
    config.validate()?;

    let vertices = config.gtt.vertex_settings();
    let tracks = config.gtt.track_settings();
    vertices.validate()?;
    tracks.validate()?;
    info!(
        format = %config.gtt.format,
        vertex_links = vertices.channels.len(),
        track_links = tracks.channels.len(),
        "resolved GTT reader settings"
    );

    let rendered = match cli.show {
        Show::Vertices => serde_json::to_string_pretty(&vertices)?,
        Show::Tracks => serde_json::to_string_pretty(&tracks)?,
        Show::All => serde_json::to_string_pretty(&Readers { vertices, tracks })?,
        Show::Config => config.to_toml_string()?,
    };
    println!("{rendered}");
    Ok(())
}
