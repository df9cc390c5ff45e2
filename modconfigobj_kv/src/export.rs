//! Section-stack reconstruction over a token stream

use modconfigobj::config::compile_time::kv::MAX_SECTION_DEPTH;
use modconfigobj::file_processor::FileProcessorError;
use modconfigobj::logging::{codes, Code};
use modconfigobj::{Lexer, LexerError, Token, TokenKind};
use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error(transparent)]
    File(#[from] FileProcessorError),

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("bad token at {position}")]
    BadToken { position: u64 },

    #[error("unexpected token at {position}: {token}")]
    UnexpectedToken { position: u64, token: Token },

    #[error("section at {position} has depth {depth} but only {open} enclosing sections are open")]
    OrphanSection {
        position: u64,
        depth: usize,
        open: usize,
    },

    #[error("section at {position} is nested {depth} deep (max {max})")]
    SectionTooDeep {
        position: u64,
        depth: usize,
        max: usize,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl KvError {
    pub fn error_code(&self) -> Code {
        match self {
            KvError::File(e) => e.error_code(),
            KvError::Lexer(e) => e.error_code(),
            KvError::BadToken { .. } => codes::kv::BAD_TOKEN,
            KvError::UnexpectedToken { .. } => codes::kv::UNEXPECTED_TOKEN,
            KvError::OrphanSection { .. } => codes::kv::ORPHAN_SECTION,
            KvError::SectionTooDeep { .. } => codes::kv::SECTION_TOO_DEEP,
            KvError::Output(_) => codes::file_processing::IO_ERROR,
        }
    }

    /// File and lexer failures are logged by the library where they occur
    pub fn logged_at_source(&self) -> bool {
        matches!(self, KvError::File(_) | KvError::Lexer(_))
    }

    /// Process exit status: 1 for environment failures, 2 for bad input
    pub fn exit_code(&self) -> i32 {
        match self {
            KvError::File(_) | KvError::Lexer(_) | KvError::Output(_) => 1,
            KvError::BadToken { .. }
            | KvError::UnexpectedToken { .. }
            | KvError::OrphanSection { .. }
            | KvError::SectionTooDeep { .. } => 2,
        }
    }
}

/// Names of the sections enclosing the current position, outermost first
#[derive(Debug, Default)]
pub struct SectionStack {
    names: Vec<String>,
}

impl SectionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything at and below the section's depth with its name
    pub fn enter(&mut self, section: &Token) -> Result<(), KvError> {
        let depth = section.section_depth().unwrap_or(0);
        let name = section.section_name().unwrap_or_default();

        if depth >= MAX_SECTION_DEPTH {
            return Err(KvError::SectionTooDeep {
                position: section.position,
                depth,
                max: MAX_SECTION_DEPTH,
            });
        }
        if depth > self.names.len() {
            return Err(KvError::OrphanSection {
                position: section.position,
                depth,
                open: self.names.len(),
            });
        }

        self.names.truncate(depth);
        self.names.push(name.to_string());
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Dotted path of the open sections; empty outside any section
    pub fn path(&self) -> String {
        self.names.join(".")
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pairs: usize,
    pub sections: usize,
    /// Error tokens seen while dumping
    pub errors: usize,
}

/// Write one `section.key=value` line per key until EndOfStream
pub fn export_pairs<R: BufRead, W: Write>(
    lexer: &mut Lexer<R>,
    out: &mut W,
) -> Result<ExportSummary, KvError> {
    let mut stack = SectionStack::new();
    let mut summary = ExportSummary::default();

    loop {
        let token = lexer.next_token()?;
        match token.kind {
            TokenKind::EndOfStream => break,
            TokenKind::Comment => {}
            TokenKind::Error => {
                return Err(KvError::BadToken {
                    position: token.position,
                })
            }
            TokenKind::Section => {
                stack.enter(&token)?;
                summary.sections += 1;
            }
            TokenKind::Key => {
                let value = lexer.next_token()?;
                if value.kind != TokenKind::Value {
                    return Err(KvError::UnexpectedToken {
                        position: value.position,
                        token: value,
                    });
                }
                writeln!(
                    out,
                    "{}.{}={}",
                    stack.path(),
                    token.text.trim(),
                    value.text.trim()
                )?;
                summary.pairs += 1;
            }
            TokenKind::Value => {
                return Err(KvError::UnexpectedToken {
                    position: token.position,
                    token,
                })
            }
        }
    }

    Ok(summary)
}

/// Write every token, one per line, in its display form or as JSON
pub fn dump_tokens<R: BufRead, W: Write>(
    lexer: &mut Lexer<R>,
    out: &mut W,
    json: bool,
) -> Result<ExportSummary, KvError> {
    let mut summary = ExportSummary::default();

    loop {
        let token = lexer.next_token()?;
        if json {
            let line = serde_json::to_string(&token)
                .map_err(|e| KvError::Output(io::Error::new(io::ErrorKind::Other, e)))?;
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}", token)?;
        }

        match token.kind {
            TokenKind::EndOfStream => break,
            TokenKind::Error => summary.errors += 1,
            TokenKind::Section => summary.sections += 1,
            TokenKind::Key => summary.pairs += 1,
            _ => {}
        }
    }

    Ok(summary)
}
