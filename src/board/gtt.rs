//! GTT board buffer file reader.
//!
//! Reads the I/O buffer files written during GTT (global track trigger) hardware and
//! firmware tests. Two readers are kept: one for the board output (vertices) and one
//! for the board input (tracks). Each call to [`GttFileReader::produce`] pulls the
//! next output event, decodes the vertex link and publishes the vertex words under
//! the configured collection name.

use crate::board::channel_map::{
    gtt_track_channels, gtt_vertex_channels, LinkId, EMPTY_FRAMES, FRAMES_PER_TMUX_PERIOD,
    GTT_BOARD_TMUX, VERTEX_TMUX,
};
use crate::board::event::Frame;
use crate::board::format::FileFormat;
use crate::board::reader::{BoardReader, BoardReaderFactory, BoardReaderSettings};
use crate::error::{ToolError, ToolResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reader configuration, as found in the `[gtt]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GttReaderConfig {
    /// Board output buffer files (vertices)
    #[serde(default = "default_files")]
    pub files: Vec<PathBuf>,
    /// Label the decoded vertices are published under
    #[serde(default = "default_collection_name")]
    pub l1_vertex_collection_name: String,
    /// Board input buffer files (tracks)
    #[serde(default = "default_files_input_tracks")]
    pub files_input_tracks: Vec<PathBuf>,
    #[serde(default)]
    pub format: FileFormat,
}

fn default_files() -> Vec<PathBuf> {
    vec![PathBuf::from("L1GTTOutputToCorrelator_0.txt")]
}

fn default_collection_name() -> String {
    "L1VerticesFirmware".to_string()
}

fn default_files_input_tracks() -> Vec<PathBuf> {
    vec![PathBuf::from("L1GTTInputFile_0.txt")]
}

impl Default for GttReaderConfig {
    fn default() -> Self {
        Self {
            files: default_files(),
            l1_vertex_collection_name: default_collection_name(),
            files_input_tracks: default_files_input_tracks(),
            format: FileFormat::default(),
        }
    }
}

impl GttReaderConfig {
    /// Reject empty file lists and a blank collection label.
    pub fn validate(&self) -> ToolResult<()> {
        if self.files.is_empty() {
            return Err(ToolError::Configuration("gtt.files must not be empty".into()));
        }
        if self.files_input_tracks.is_empty() {
            return Err(ToolError::Configuration(
                "gtt.files_input_tracks must not be empty".into(),
            ));
        }
        if self.l1_vertex_collection_name.trim().is_empty() {
            return Err(ToolError::Configuration(
                "gtt.l1_vertex_collection_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Settings for the output (vertex) files.
    pub fn vertex_settings(&self) -> BoardReaderSettings {
        BoardReaderSettings {
            format: self.format,
            files: self.files.clone(),
            frames_per_tmux_period: FRAMES_PER_TMUX_PERIOD,
            board_tmux: VERTEX_TMUX,
            empty_frames: EMPTY_FRAMES,
            channels: gtt_vertex_channels(),
        }
    }

    /// Settings for the input (track) files.
    pub fn track_settings(&self) -> BoardReaderSettings {
        BoardReaderSettings {
            format: self.format,
            files: self.files_input_tracks.clone(),
            frames_per_tmux_period: FRAMES_PER_TMUX_PERIOD,
            board_tmux: GTT_BOARD_TMUX,
            empty_frames: EMPTY_FRAMES,
            channels: gtt_track_channels(),
        }
    }
}

/// Raw 64-bit vertex word as sent by the GTT firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VertexWord(pub u64);

impl VertexWord {
    /// Bit 0 flags a populated word.
    pub const VALID_BIT: u64 = 1;

    /// True when the valid bit is set.
    pub fn is_valid(&self) -> bool {
        self.0 & Self::VALID_BIT != 0
    }
}

/// Turns the frames of the vertex link into vertex words.
pub trait VertexDecoder {
    /// Decode the frames of one event.
    fn decode(&self, frames: &[Frame]) -> Vec<VertexWord>;
}

/// Takes frames up to the first one without the valid bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidBitDecoder;

impl VertexDecoder for ValidBitDecoder {
    fn decode(&self, frames: &[Frame]) -> Vec<VertexWord> {
        frames
            .iter()
            .map(|&frame| VertexWord(frame))
            .take_while(VertexWord::is_valid)
            .collect()
    }
}

/// Destination for decoded collections.
pub trait EventSink {
    /// Publish `vertices` under `label`, replacing any earlier collection.
    fn put(&mut self, label: &str, vertices: Vec<VertexWord>);
}

impl EventSink for BTreeMap<String, Vec<VertexWord>> {
    fn put(&mut self, label: &str, vertices: Vec<VertexWord>) {
        self.insert(label.to_string(), vertices);
    }
}

/// Producer reading GTT board buffer files.
pub struct GttFileReader<D = ValidBitDecoder> {
    vertex_reader: Box<dyn BoardReader>,
    track_reader: Box<dyn BoardReader>,
    collection_name: String,
    decoder: D,
}

impl GttFileReader<ValidBitDecoder> {
    /// Validate `config` and open both readers through `factory`.
    pub fn open(config: &GttReaderConfig, factory: &impl BoardReaderFactory) -> ToolResult<Self> {
        config.validate()?;

        let vertex_settings = config.vertex_settings();
        vertex_settings.validate()?;
        let track_settings = config.track_settings();
        track_settings.validate()?;

        debug!(
            format = %config.format,
            vertex_files = vertex_settings.files.len(),
            track_files = track_settings.files.len(),
            "opening GTT board readers"
        );

        Ok(Self {
            vertex_reader: factory.open(vertex_settings)?,
            track_reader: factory.open(track_settings)?,
            collection_name: config.l1_vertex_collection_name.clone(),
            decoder: ValidBitDecoder,
        })
    }
}

impl<D: VertexDecoder> GttFileReader<D> {
    /// Swap the vertex decoder.
    pub fn with_decoder<E: VertexDecoder>(self, decoder: E) -> GttFileReader<E> {
        GttFileReader {
            vertex_reader: self.vertex_reader,
            track_reader: self.track_reader,
            collection_name: self.collection_name,
            decoder,
        }
    }

    /// Label the vertices are published under.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Reader over the board output files.
    pub fn vertex_reader(&self) -> &dyn BoardReader {
        self.vertex_reader.as_ref()
    }

    /// Reader over the board input files. Tracks are not decoded here.
    pub fn track_reader(&mut self) -> &mut dyn BoardReader {
        self.track_reader.as_mut()
    }

    /// Decode the next event and publish its vertices. Returns the vertex count.
    pub fn produce(&mut self, sink: &mut impl EventSink) -> ToolResult<usize> {
        let event = self.vertex_reader.next_event()?;
        let frames = event.link(&LinkId::new("vertices", 0))?;
        let vertices = self.decoder.decode(frames);
        let count = vertices.len();

        info!(collection = %self.collection_name, "{} vertices found", count);

        sink.put(&self.collection_name, vertices);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::event::EventData;
    use crate::board::reader::BufferedBoardReader;
    use tracing_test::traced_test;

    struct Replay(Vec<EventData>);

    impl BoardReaderFactory for Replay {
        fn open(&self, settings: BoardReaderSettings) -> ToolResult<Box<dyn BoardReader>> {
            let mut reader = BufferedBoardReader::new(settings);
            for event in &self.0 {
                if event.links().all(|link| reader.settings().channels.contains(link)) {
                    reader.push_event(event.clone())?;
                }
            }
            Ok(Box::new(reader))
        }
    }

    #[test]
    fn defaults_match_the_board_test_files() {
        let config = GttReaderConfig::default();
        assert_eq!(config.files, vec![PathBuf::from("L1GTTOutputToCorrelator_0.txt")]);
        assert_eq!(config.files_input_tracks, vec![PathBuf::from("L1GTTInputFile_0.txt")]);
        assert_eq!(config.l1_vertex_collection_name, "L1VerticesFirmware");
        assert_eq!(config.format, FileFormat::Apx);
        config.validate().unwrap();
    }

    #[test]
    fn settings_carry_board_timing() {
        let config = GttReaderConfig::default();

        let vertices = config.vertex_settings();
        assert_eq!(vertices.frames_per_tmux_period, 9);
        assert_eq!(vertices.board_tmux, 6);
        assert_eq!(vertices.empty_frames, 0);
        assert_eq!(vertices.channels.len(), 1);

        let tracks = config.track_settings();
        assert_eq!(tracks.board_tmux, 6);
        assert_eq!(tracks.channels.len(), 18);
        assert_eq!(tracks.files, config.files_input_tracks);
    }

    #[test]
    fn blank_collection_name_is_rejected() {
        let config = GttReaderConfig {
            l1_vertex_collection_name: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn decoder_stops_at_first_invalid_frame() {
        let words = ValidBitDecoder.decode(&[0x11, 0x23, 0x40, 0x51]);
        assert_eq!(words, vec![VertexWord(0x11), VertexWord(0x23)]);
        assert!(ValidBitDecoder.decode(&[]).is_empty());
    }

    #[traced_test]
    #[test]
    fn produce_logs_vertex_count() {
        let event = EventData::new().with_link(LinkId::new("vertices", 0), [0x3, 0x5, 0x0, 0x7]);
        let mut reader =
            GttFileReader::open(&GttReaderConfig::default(), &Replay(vec![event])).unwrap();

        let mut sink: BTreeMap<String, Vec<VertexWord>> = BTreeMap::new();
        assert_eq!(reader.produce(&mut sink).unwrap(), 2);
        assert_eq!(sink["L1VerticesFirmware"], vec![VertexWord(0x3), VertexWord(0x5)]);
        assert!(logs_contain("2 vertices found"));
    }
}
