//! Decoded per-event link data.

use crate::board::channel_map::LinkId;
use crate::error::{ToolError, ToolResult};
use std::collections::BTreeMap;

/// One 64-bit data word from a link.
pub type Frame = u64;

/// Frames of every logical link for a single event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
    links: BTreeMap<LinkId, Vec<Frame>>,
}

impl EventData {
    /// Event without links.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`EventData::insert`].
    pub fn with_link(mut self, link: LinkId, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.insert(link, frames);
        self
    }

    /// Set the frames of `link`, replacing earlier ones.
    pub fn insert(&mut self, link: LinkId, frames: impl IntoIterator<Item = Frame>) {
        self.links.insert(link, frames.into_iter().collect());
    }

    /// Frames of `link`, or [`ToolError::MissingLink`].
    pub fn link(&self, link: &LinkId) -> ToolResult<&[Frame]> {
        self.links
            .get(link)
            .map(Vec::as_slice)
            .ok_or_else(|| ToolError::MissingLink(link.to_string()))
    }

    /// Links present in the event.
    pub fn links(&self) -> impl Iterator<Item = &LinkId> {
        self.links.keys()
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when the event carries no link.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_lookup() {
        let event = EventData::new().with_link(LinkId::new("vertices", 0), [1, 3, 0]);
        assert_eq!(event.link(&LinkId::new("vertices", 0)).unwrap(), &[1, 3, 0]);
        assert!(matches!(
            event.link(&LinkId::new("vertices", 1)),
            Err(ToolError::MissingLink(name)) if name == "(vertices, 1)"
        ));
    }
}
