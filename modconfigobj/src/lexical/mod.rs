//! Lexical analysis for nested-section configuration files
//!
//! The [`Lexer`] is a resumable state machine over a [`RuneCursor`]. It turns
//! any buffered byte source into [`Token`]s one pull at a time, without
//! reading ahead more than a single rune.
//!
//! Malformed constructs become `Error` tokens and scanning continues at the
//! next line. Only source faults, protocol misuse and the lexeme size guard
//! end a scan early, as a [`LexerError`].
//!
//! [`RuneCursor`]: crate::cursor::RuneCursor

pub mod analyzer;
pub mod state;

use crate::config::runtime::LexicalPreferences;
use crate::file_processor::SourceFile;
use crate::log_debug;
use crate::tokens::Token;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub use analyzer::{ErrorClass, Lexer, LexerError, LexicalMetrics};
pub use state::State;

/// Create a lexer with preferences taken from the environment
pub fn create_lexer<R: BufRead>(reader: R) -> Lexer<R> {
    Lexer::new(reader)
}

/// Create a lexer with explicit preferences
pub fn create_lexer_with_preferences<R: BufRead>(
    reader: R,
    preferences: LexicalPreferences,
) -> Lexer<R> {
    Lexer::with_preferences(reader, preferences)
}

/// Lexer over an opened configuration file
pub fn lex_source_file(source: SourceFile) -> Lexer<BufReader<File>> {
    log_debug!("Starting lexical analysis",
        "file" => source.metadata.path.display(),
        "size_bytes" => source.metadata.size
    );
    create_lexer(source.reader)
}

/// Tokenize an in-memory string, EndOfStream included
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, LexerError> {
    Lexer::from_text(source).collect()
}
