//! Shared primitive types used by the cursor, tokens and logging.

pub mod span;

pub use span::Span;
