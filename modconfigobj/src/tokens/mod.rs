//! Token system for configuration lexical analysis
//!
//! A configuration file is reduced to a flat stream of [`Token`]s. Each token
//! records its [`TokenKind`], the byte offset where its lexeme starts, and the
//! exact source text of that lexeme.
//!
//! ## Token Kinds
//!
//! - **Section** - header text including brackets, e.g. `[[child]]`; the bracket
//!   count gives the nesting depth
//! - **Key** - key text up to (not including) the `=`, raw and untrimmed
//! - **Value** - value text after the `=`; quoted values keep their quotes
//! - **Comment** - a `#` line, without the trailing newline
//! - **Error** - text consumed while recognizing a malformed construct
//! - **EndOfStream** - emitted exactly once, with empty text
//!
//! The [`TokenBuffer`] accumulates the lexeme currently being scanned.

pub mod token;
pub mod token_buffer;

pub use token::{Token, TokenKind};
pub use token_buffer::TokenBuffer;
