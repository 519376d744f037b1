//! Board reader seam.
//!
//! Parsing the buffer files and de-multiplexing frames into logical links is done by
//! an external decoder. This module defines what the tools need from it: the
//! settings it is opened with and an event-at-a-time interface.

use crate::board::channel_map::ChannelMap;
use crate::board::event::EventData;
use crate::board::format::FileFormat;
use crate::error::{ToolError, ToolResult};
use serde::Serialize;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::debug;

/// Everything needed to open a set of board buffer files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardReaderSettings {
    /// Text layout of the files
    pub format: FileFormat,
    /// Buffer files, read in order
    pub files: Vec<PathBuf>,
    /// Frames in one TMUX period
    pub frames_per_tmux_period: usize,
    /// TMUX period of the board that wrote the files
    pub board_tmux: usize,
    /// Empty frames between consecutive events
    pub empty_frames: usize,
    /// Logical links to decode
    pub channels: ChannelMap,
}

impl BoardReaderSettings {
    /// Check files, timing and the channel map.
    pub fn validate(&self) -> ToolResult<()> {
        if self.files.is_empty() {
            return Err(ToolError::Configuration(
                "Board reader needs at least one input file".into(),
            ));
        }
        if self.frames_per_tmux_period == 0 || self.board_tmux == 0 {
            return Err(ToolError::Configuration(format!(
                "Invalid timing: {} frames per TMUX period, board TMUX {}",
                self.frames_per_tmux_period, self.board_tmux
            )));
        }
        if self.channels.is_empty() {
            return Err(ToolError::Configuration("Channel map is empty".into()));
        }
        self.channels.validate()
    }
}

/// Source of decoded events.
pub trait BoardReader {
    /// Settings the reader was opened with.
    fn settings(&self) -> &BoardReaderSettings;

    /// Decode the next event. Returns [`ToolError::Exhausted`] once all files are
    /// consumed.
    fn next_event(&mut self) -> ToolResult<EventData>;
}

/// Opens board readers.
pub trait BoardReaderFactory {
    /// Open a reader for `settings`.
    fn open(&self, settings: BoardReaderSettings) -> ToolResult<Box<dyn BoardReader>>;
}

impl<F> BoardReaderFactory for F
where
    F: Fn(BoardReaderSettings) -> ToolResult<Box<dyn BoardReader>>,
{
    fn open(&self, settings: BoardReaderSettings) -> ToolResult<Box<dyn BoardReader>> {
        self(settings)
    }
}

/// Replays events that were decoded ahead of time.
#[derive(Debug, Clone)]
pub struct BufferedBoardReader {
    settings: BoardReaderSettings,
    events: VecDeque<EventData>,
}

impl BufferedBoardReader {
    /// Empty reader for `settings`.
    pub fn new(settings: BoardReaderSettings) -> Self {
        Self {
            settings,
            events: VecDeque::new(),
        }
    }

    /// Queue an event. Every link in it must be part of the channel map.
    pub fn push_event(&mut self, event: EventData) -> ToolResult<()> {
        if let Some(unknown) = event
            .links()
            .find(|link| !self.settings.channels.contains(link))
        {
            return Err(ToolError::Configuration(format!(
                "Link {unknown} is not in the channel map"
            )));
        }
        self.events.push_back(event);
        Ok(())
    }

    /// Events not yet returned.
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl BoardReader for BufferedBoardReader {
    fn settings(&self) -> &BoardReaderSettings {
        &self.settings
    }

    fn next_event(&mut self) -> ToolResult<EventData> {
        let event = self.events.pop_front().ok_or(ToolError::Exhausted)?;
        debug!(links = event.len(), pending = self.events.len(), "replayed event");
        Ok(event)
    }
}
