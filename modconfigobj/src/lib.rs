// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod cursor;
pub mod file_processor;
pub mod lexical;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use cursor::{CursorError, RuneCursor};
pub use lexical::{tokenize_str, ErrorClass, Lexer, LexerError, LexicalMetrics};
pub use tokens::{Token, TokenKind};
