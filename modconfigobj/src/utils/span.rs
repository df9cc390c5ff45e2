//! Byte-range source locations
//!
//! The tokenizer reads from a stream and only ever knows absolute byte
//! offsets, so a span is a half-open `[start, end)` byte range.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u64,
    /// End offset (exclusive)
    pub end: u64,
}

impl Span {
    /// Create a new span
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Create a span from a start offset and a byte length
    pub fn at(start: u64, len: u64) -> Self {
        Self::new(start, start + len)
    }

    /// Byte length covered by this span
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Check if this span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
