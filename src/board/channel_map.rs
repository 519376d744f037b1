//! Logical-to-physical channel maps for board buffer files.
//!
//! A buffer file holds one column per physical link. The reader needs to know which
//! physical channels carry each logical link of an interface in each time slice, and
//! the link timing (TMUX period and inter-packet gap). Maps are built once and not
//! changed afterwards.

use crate::error::{ToolError, ToolResult};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Frames in one TMUX period.
pub const FRAMES_PER_TMUX_PERIOD: usize = 9;
/// Inter-packet gap on the GTT output links.
pub const GAP_LENGTH_OUTPUT: usize = 44;
/// Inter-packet gap on the GTT input links.
pub const GAP_LENGTH_INPUT: usize = 6;
/// TMUX period of the vertex output link.
pub const VERTEX_TMUX: usize = 6;
/// TMUX period of the GTT board.
pub const GTT_BOARD_TMUX: usize = 6;
/// TMUX period of the track input links.
pub const TRACK_TMUX: usize = 18;
/// Physical channel carrying the vertices.
pub const VERTEX_CHANNEL_INDEX: usize = 0;
/// Empty frames between events. The current file writers emit none.
pub const EMPTY_FRAMES: usize = 0;
/// Logical track links per time slice.
pub const TRACK_LINKS: usize = 18;
/// Physical channels feeding one logical track link.
pub const TRACK_CHANNELS_PER_LINK: usize = 3;

/// Logical link: interface name plus index within the time slice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LinkId {
    /// Interface name, e.g. `tracks`
    pub interface: String,
    /// Index within the time slice
    pub index: usize,
}

impl LinkId {
    /// Link `index` of `interface`.
    pub fn new(interface: impl Into<String>, index: usize) -> Self {
        Self {
            interface: interface.into(),
            index,
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.interface, self.index)
    }
}

/// Link timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelSpec {
    /// Time-multiplexing period of the link
    pub tmux: usize,
    /// Idle frames between packets
    pub inter_packet_gap: usize,
}

impl ChannelSpec {
    /// Timing with the given TMUX period and gap.
    pub const fn new(tmux: usize, inter_packet_gap: usize) -> Self {
        Self {
            tmux,
            inter_packet_gap,
        }
    }
}

/// Timing and physical channels of one logical link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkChannels {
    /// Link timing
    pub spec: ChannelSpec,
    /// Physical channel indices, in time-slice order.
    pub channels: Vec<usize>,
}

/// Mapping from logical link to timing and physical channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelMap {
    links: BTreeMap<LinkId, LinkChannels>,
}

impl ChannelMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link, replacing any previous entry for the same id.
    pub fn with_link(
        mut self,
        link: LinkId,
        spec: ChannelSpec,
        channels: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.links.insert(
            link,
            LinkChannels {
                spec,
                channels: channels.into_iter().collect(),
            },
        );
        self
    }

    /// Timing and channels of `link`.
    pub fn get(&self, link: &LinkId) -> Option<&LinkChannels> {
        self.links.get(link)
    }

    /// True when `link` is mapped.
    pub fn contains(&self, link: &LinkId) -> bool {
        self.links.contains_key(link)
    }

    /// Number of logical links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no link is mapped.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links in (interface, index) order.
    pub fn iter(&self) -> impl Iterator<Item = (&LinkId, &LinkChannels)> {
        self.links.iter()
    }

    /// All physical channels referenced by the map.
    pub fn physical_channels(&self) -> BTreeSet<usize> {
        self.links
            .values()
            .flat_map(|link| link.channels.iter().copied())
            .collect()
    }

    /// Check that every link has a non-zero TMUX, at least one channel, and that no
    /// physical channel is claimed twice.
    pub fn validate(&self) -> ToolResult<()> {
        let mut seen = BTreeMap::new();
        for (id, link) in &self.links {
            if link.spec.tmux == 0 {
                return Err(ToolError::Configuration(format!(
                    "Link {id} has a TMUX of 0"
                )));
            }
            if link.channels.is_empty() {
                return Err(ToolError::Configuration(format!(
                    "Link {id} has no physical channels"
                )));
            }
            for &channel in &link.channels {
                if let Some(owner) = seen.insert(channel, id) {
                    return Err(ToolError::Configuration(format!(
                        "Physical channel {channel} is used by both {owner} and {id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ChannelMapEntry<'a> {
    interface: &'a str,
    index: usize,
    tmux: usize,
    inter_packet_gap: usize,
    channels: &'a [usize],
}

impl Serialize for ChannelMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.links.iter().map(|(id, link)| ChannelMapEntry {
            interface: &id.interface,
            index: id.index,
            tmux: link.spec.tmux,
            inter_packet_gap: link.spec.inter_packet_gap,
            channels: &link.channels,
        }))
    }
}

/// Output side of the GTT board: one vertex link.
pub fn gtt_vertex_channels() -> ChannelMap {
    ChannelMap::new().with_link(
        LinkId::new("vertices", 0),
        ChannelSpec::new(VERTEX_TMUX, GAP_LENGTH_OUTPUT),
        [VERTEX_CHANNEL_INDEX],
    )
}

/// Input side of the GTT board: 18 track links, each spread over three physical
/// channels one link-stride apart.
pub fn gtt_track_channels() -> ChannelMap {
    let spec = ChannelSpec::new(TRACK_TMUX, GAP_LENGTH_INPUT);
    (0..TRACK_LINKS).fold(ChannelMap::new(), |map, index| {
        map.with_link(
            LinkId::new("tracks", index),
            spec,
            (0..TRACK_CHANNELS_PER_LINK).map(|k| index + k * TRACK_LINKS),
        )
    })
}
