//! Character source with one-rune pushback
//!
//! Decodes UTF-8 incrementally from any `BufRead`, so arbitrarily large inputs
//! stream through without being loaded into memory.

pub mod rune_cursor;

pub use rune_cursor::{CursorError, RuneCursor};
