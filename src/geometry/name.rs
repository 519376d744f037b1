//! Canonical node names for DD4hep geometry dumps.
//!
//! DD4hep prints volume names with a namespace prefix (`ns:`) and decorates them
//! with generated shape segments (`_shape0x7f...`). DDD dumps carry the bare name.
//! [`reduced_name`] strips both decorations so the two dumps can be compared,
//! keeping the `_refl` marker of reflected volumes.

/// Suffix marking a reflected volume.
pub const REFLECTED_SUFFIX: &str = "_refl";

/// Segment prefix that starts the generated part of a DD4hep name.
const SHAPE_MARKER: &str = "shape";

/// Result of reducing a raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedName {
    /// Canonical name.
    pub name: String,
    /// Byte column where the name starts (after the namespace colon).
    pub first: usize,
    /// Byte column of the shape segment the name was cut at, if any.
    pub cut: Option<usize>,
}

impl ReducedName {
    /// True when a shape segment was removed.
    pub fn is_truncated(&self) -> bool {
        self.cut.is_some()
    }

    /// Column one past the kept range, `raw.len() + 1` when nothing was cut.
    pub fn last(&self, raw: &str) -> usize {
        self.cut.unwrap_or(raw.len() + 1)
    }

    /// Debug line in the `<raw> col <first>:<last> <name>` layout.
    pub fn diagnostic(&self, raw: &str) -> String {
        format!("{} col {}:{} {}", raw, self.first, self.last(raw), self.name)
    }
}

/// Reduce a raw DD4hep token to its canonical name.
///
/// The prefix up to and including the first `:` is dropped. The remainder is cut
/// before the first underscore-delimited segment (other than the leading one) that
/// starts with `shape`. A cut name gets `_refl` appended again when the raw token
/// ended with it. Tokens without a colon or a shape segment fall back to the whole
/// remainder.
pub fn reduced_name(raw: &str) -> ReducedName {
    let first = raw.find(':').map_or(0, |pos| pos + 1);
    let rest = &raw[first..];

    let mut offset = first;
    let mut cut = None;
    for (i, segment) in rest.split('_').enumerate() {
        if i > 0 && segment.starts_with(SHAPE_MARKER) {
            cut = Some(offset);
            break;
        }
        offset += segment.len() + 1;
    }

    let name = match cut {
        Some(pos) => {
            // `pos - 1` is the underscore in front of the shape segment.
            let mut name = raw[first..pos - 1].to_string();
            if raw.ends_with(REFLECTED_SUFFIX) {
                name.push_str(REFLECTED_SUFFIX);
            }
            name
        }
        None => rest.to_string(),
    };

    ReducedName { name, first, cut }
}
