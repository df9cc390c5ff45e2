//! Pull-based lexer over a rune cursor
//!
//! Each `next_token()` call resumes the state machine until at least one token
//! is ready. Tokens emitted by a single transition wait in a small bounded
//! queue so they are delivered in source order.

use super::state::State;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::cursor::{CursorError, RuneCursor};
use crate::logging::codes;
use crate::tokens::{Token, TokenBuffer, TokenKind};
use crate::{log_error, log_success, log_warning};
use std::collections::VecDeque;
use std::io::BufRead;
use std::iter::FusedIterator;

/// Fatal lexer failures; malformed input is reported as Error tokens instead
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    #[error("Source read failed: {0}")]
    Source(#[source] CursorError),

    #[error("Rune pushback requested without a preceding read")]
    PushbackWithoutRead,

    #[error("Token requested after the stream ended")]
    StreamExhausted,

    #[error("Lexeme starting at byte {position} exceeds {limit} bytes")]
    LexemeTooLarge { position: u64, limit: usize },
}

/// Broad classification of fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    SourceReadFault,
    ProtocolMisuse,
    ResourceLimit,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::SourceReadFault => "SourceReadFault",
            ErrorClass::ProtocolMisuse => "ProtocolMisuse",
            ErrorClass::ResourceLimit => "ResourceLimit",
        }
    }
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Source(e) => e.error_code(),
            LexerError::PushbackWithoutRead => codes::source::PUSHBACK_WITHOUT_READ,
            LexerError::StreamExhausted => codes::lexical::STREAM_EXHAUSTED,
            LexerError::LexemeTooLarge { .. } => codes::lexical::LEXEME_TOO_LARGE,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            LexerError::Source(_) => ErrorClass::SourceReadFault,
            LexerError::PushbackWithoutRead | LexerError::StreamExhausted => {
                ErrorClass::ProtocolMisuse
            }
            LexerError::LexemeTooLarge { .. } => ErrorClass::ResourceLimit,
        }
    }
}

impl From<CursorError> for LexerError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::NothingToUnread => LexerError::PushbackWithoutRead,
            other => LexerError::Source(other),
        }
    }
}

/// Token statistics gathered during a scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub error_tokens: usize,
    pub comment_tokens: usize,
    pub key_tokens: usize,
    pub value_tokens: usize,
    pub section_tokens: usize,

    // Detailed metrics, gated by preferences
    pub deepest_section: usize,
    pub longest_lexeme: usize,
    pub triple_quoted_values: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        match token.kind {
            TokenKind::Error => self.error_tokens += 1,
            TokenKind::Comment => self.comment_tokens += 1,
            TokenKind::Key => self.key_tokens += 1,
            TokenKind::Value => self.value_tokens += 1,
            TokenKind::Section => self.section_tokens += 1,
            TokenKind::EndOfStream => {}
        }

        if !preferences.collect_detailed_metrics {
            return;
        }

        self.longest_lexeme = self.longest_lexeme.max(token.len());
        if let Some(depth) = token.section_depth() {
            self.deepest_section = self.deepest_section.max(depth);
        }
        if token.kind == TokenKind::Value
            && (token.text.starts_with("'''") || token.text.starts_with("\"\"\""))
        {
            self.triple_quoted_values += 1;
        }
    }
}

/// Streaming configuration lexer
pub struct Lexer<R> {
    cursor: RuneCursor<R>,
    buffer: TokenBuffer,
    state: State,
    /// Byte offset where the lexeme in `buffer` begins
    start: u64,
    pending: VecDeque<Token>,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    max_lexeme_bytes: usize,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_preferences(reader, LexicalPreferences::default())
    }

    pub fn with_preferences(reader: R, preferences: LexicalPreferences) -> Self {
        Self {
            cursor: RuneCursor::new(reader),
            buffer: TokenBuffer::new(),
            state: State::Generic,
            start: 0,
            pending: VecDeque::with_capacity(PENDING_TOKEN_CAPACITY),
            metrics: LexicalMetrics::default(),
            preferences,
            max_lexeme_bytes: MAX_LEXEME_BYTES,
        }
    }

    /// Override the per-lexeme byte limit
    pub fn with_max_lexeme_bytes(mut self, limit: usize) -> Self {
        self.max_lexeme_bytes = limit;
        self
    }

    /// Pull the next token.
    ///
    /// Returns `StreamExhausted` once EndOfStream has been delivered or a fatal
    /// error has been returned.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                if token.is_end() {
                    self.log_completion(&token);
                }
                return Ok(token);
            }

            if self.state.is_terminal() {
                return Err(LexerError::StreamExhausted);
            }

            match self.step(self.state) {
                Ok(next) => self.state = next,
                Err(err) => {
                    self.state = State::Done;
                    self.pending.clear();
                    log_error!(err.error_code(), &err.to_string(),
                        "class" => err.class().as_str(),
                        "offset" => self.cursor.offset()
                    );
                    return Err(err);
                }
            }
        }
    }

    /// True once EndOfStream or a fatal error has been delivered
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal() && self.pending.is_empty()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Byte offset of the next unread rune
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    // ------------------------------------------------------------------
    // Primitives used by the state transitions
    // ------------------------------------------------------------------

    /// Read one rune into the lexeme buffer
    pub(super) fn next_rune(&mut self) -> Result<Option<char>, LexerError> {
        let rune = self.cursor.read()?;
        if let Some((c, _)) = rune {
            self.buffer.push(c);
            if self.buffer.len() > self.max_lexeme_bytes {
                return Err(LexerError::LexemeTooLarge {
                    position: self.start,
                    limit: self.max_lexeme_bytes,
                });
            }
        }
        Ok(rune.map(|(c, _)| c))
    }

    /// Give back the rune returned by the latest `next_rune`
    pub(super) fn backup(&mut self) -> Result<(), LexerError> {
        self.cursor.unread()?;
        self.buffer.truncate_last();
        Ok(())
    }

    /// Drop the buffered lexeme and start the next one at the cursor
    pub(super) fn ignore(&mut self) {
        self.buffer.clear();
        self.start = self.cursor.offset();
    }

    pub(super) fn emit(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.start, self.buffer.take());
        self.start = self.cursor.offset();
        self.metrics.record_token(&token, &self.preferences);

        if token.is_error() && self.preferences.log_lexical_errors {
            log_warning!(code = codes::lexical::MALFORMED_TOKEN, "Malformed token",
                span = token.span(),
                "text" => token.text.escape_debug()
            );
        }

        debug_assert!(self.pending.len() < PENDING_TOKEN_CAPACITY);
        self.pending.push_back(token);
    }

    /// Emit EndOfStream at the current offset
    pub(super) fn emit_end(&mut self) {
        self.ignore();
        self.emit(TokenKind::EndOfStream);
    }

    /// Consume up to `max` consecutive `target` runes.
    ///
    /// Returns the run length, or `None` if input ended first. A rune that
    /// breaks the run is pushed back.
    pub(super) fn take_run(&mut self, target: char, max: usize) -> Result<Option<usize>, LexerError> {
        let mut count = 0;
        while count < max {
            match self.next_rune()? {
                Some(c) if c == target => count += 1,
                Some(_) => {
                    self.backup()?;
                    return Ok(Some(count));
                }
                None => return Ok(None),
            }
        }
        Ok(Some(count))
    }

    fn log_completion(&self, end: &Token) {
        if !self.preferences.log_completion_summary {
            return;
        }
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
            "tokens" => self.metrics.total_tokens,
            "errors" => self.metrics.error_tokens,
            "sections" => self.metrics.section_tokens,
            "bytes" => end.position
        );
    }
}

impl<'a> Lexer<&'a [u8]> {
    /// Lexer over an in-memory string
    pub fn from_text(source: &'a str) -> Self {
        Self::new(source.as_bytes())
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        Some(self.next_token())
    }
}

impl<R: BufRead> FusedIterator for Lexer<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::{self, BufReader, Read};

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::from_text(source)
            .map(|t| t.unwrap().kind)
            .collect()
    }

    #[test]
    fn test_end_of_stream_then_exhausted() {
        let mut lexer = Lexer::from_text("");
        let end = lexer.next_token().unwrap();
        assert!(end.is_end());
        assert_eq!(end.position, 0);
        assert!(lexer.is_finished());
        assert_matches!(lexer.next_token(), Err(LexerError::StreamExhausted));
        assert_matches!(lexer.next_token(), Err(LexerError::StreamExhausted));
    }

    #[test]
    fn test_iterator_is_fused_after_end() {
        let mut lexer = Lexer::from_text("a=b");
        assert_eq!(lexer.by_ref().count(), 3);
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_metrics_are_recorded() {
        let mut lexer = Lexer::from_text("[a]\n[[b]]\n# note\nk='''x\ny'''\n=bad\n");
        let tokens: Vec<Token> = lexer.by_ref().map(|t| t.unwrap()).collect();
        assert_eq!(tokens.len(), 7);

        let metrics = lexer.metrics();
        assert_eq!(metrics.total_tokens, 7);
        assert_eq!(metrics.section_tokens, 2);
        assert_eq!(metrics.comment_tokens, 1);
        assert_eq!(metrics.key_tokens, 1);
        assert_eq!(metrics.value_tokens, 1);
        assert_eq!(metrics.error_tokens, 1);
        assert_eq!(metrics.deepest_section, 1);
        assert_eq!(metrics.triple_quoted_values, 1);
        assert_eq!(metrics.longest_lexeme, "'''x\ny'''".len());
    }

    #[test]
    fn test_detailed_metrics_can_be_disabled() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            log_lexical_errors: false,
            log_completion_summary: false,
        };
        let mut lexer = Lexer::with_preferences("[[a]]\n".as_bytes(), preferences);
        while !lexer.is_finished() {
            lexer.next_token().unwrap();
        }
        assert_eq!(lexer.metrics().section_tokens, 1);
        assert_eq!(lexer.metrics().deepest_section, 0);
        assert_eq!(lexer.metrics().longest_lexeme, 0);
    }

    #[test]
    fn test_oversized_lexeme_is_fatal() {
        let source = format!("k=v\n# {}", "x".repeat(32));
        let mut lexer = Lexer::from_text(&source).with_max_lexeme_bytes(16);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Key);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Value);
        let err = lexer.next_token().unwrap_err();
        assert_matches!(err, LexerError::LexemeTooLarge { position: 4, limit: 16 });
        assert_eq!(err.class(), ErrorClass::ResourceLimit);
        assert_matches!(lexer.next_token(), Err(LexerError::StreamExhausted));
    }

    #[test]
    fn test_file_sized_lexeme_is_accepted() {
        let limit = crate::config::compile_time::file_processing::MAX_FILE_SIZE as usize;
        let body = "x".repeat(limit - 16);
        let source = format!("k = '''{}'''\n", body);
        let tokens: Vec<Token> = Lexer::from_text(&source).map(|t| t.unwrap()).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Value);
        assert_eq!(tokens[1].len(), body.len() + 6);
    }

    #[test]
    fn test_invalid_utf8_is_a_source_fault() {
        let bytes: &[u8] = &[b'k', b'=', 0xFF, b'\n'];
        let mut lexer = Lexer::new(bytes);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Key);
        let err = lexer.next_token().unwrap_err();
        assert_matches!(err, LexerError::Source(CursorError::InvalidUtf8 { offset: 2 }));
        assert_eq!(err.class(), ErrorClass::SourceReadFault);
        assert_eq!(err.error_code(), codes::source::INVALID_UTF8);

        // A fatal error is yielded once by the iterator
        assert!(lexer.next().is_none());
    }

    struct FlakyReader {
        served: bool,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.served = true;
            let data = b"[a]\nkey=";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_read_failure_aborts_after_delivered_tokens() {
        let reader = BufReader::with_capacity(64, FlakyReader { served: false });
        let mut lexer = Lexer::new(reader);

        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Section);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Key);
        let err = lexer.next_token().unwrap_err();
        assert_matches!(err, LexerError::Source(CursorError::Io(_)));
        assert!(lexer.is_finished());
    }

    #[test]
    fn test_cursor_misuse_maps_to_protocol_error() {
        let err = LexerError::from(CursorError::NothingToUnread);
        assert_matches!(err, LexerError::PushbackWithoutRead);
        assert_eq!(err.class(), ErrorClass::ProtocolMisuse);
        assert_eq!(LexerError::StreamExhausted.class(), ErrorClass::ProtocolMisuse);
    }

    #[test]
    fn test_kinds_for_simple_file() {
        assert_eq!(
            kinds("[s]\nk=v\n"),
            vec![
                TokenKind::Section,
                TokenKind::Key,
                TokenKind::Value,
                TokenKind::EndOfStream
            ]
        );
    }
}
