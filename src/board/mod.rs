//! Board data file reading.
//!
//! Configuration and event plumbing around an external board buffer decoder:
//! file formats, channel maps, the reader seam, and the GTT producer built on it.

pub mod channel_map;
pub mod event;
pub mod format;
pub mod gtt;
pub mod reader;

pub use channel_map::{gtt_track_channels, gtt_vertex_channels, ChannelMap, ChannelSpec, LinkId};
pub use event::{EventData, Frame};
pub use format::FileFormat;
pub use gtt::{EventSink, GttFileReader, GttReaderConfig, ValidBitDecoder, VertexDecoder, VertexWord};
pub use reader::{BoardReader, BoardReaderFactory, BoardReaderSettings, BufferedBoardReader};
