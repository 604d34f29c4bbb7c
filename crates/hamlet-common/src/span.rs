//! Source location tracking.
//!
//! Every IR node carries a `Span` pointing back into the original source
//! text. Spans are what make the textual fallback stages possible: even when
//! semantic emission fails for a node, the original bytes can be recovered
//! and preserved verbatim.

use serde::{Deserialize, Serialize};

/// A byte range in the original source, plus the 1-based line it starts on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start position (byte offset, inclusive)
    pub start: u32,
    /// End position (byte offset, exclusive)
    pub end: u32,
    /// 1-based line number of `start`
    pub line: u32,
}

impl Span {
    pub fn new(start: u32, end: u32, line: u32) -> Self {
        Span { start, end, line }
    }

    /// A span that points nowhere. Used for synthesized nodes that have no
    /// counterpart in the original source.
    pub fn empty() -> Self {
        Span::default()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Get the original text for this span, returning empty string if the
    /// span is out of bounds or not on a char boundary. This prevents panics
    /// from invalid string indices.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = self.end as usize;
        if end <= source.len()
            && start < end
            && source.is_char_boundary(start)
            && source.is_char_boundary(end)
        {
            &source[start..end]
        } else {
            ""
        }
    }
}
