use crate::logging::codes;
use std::io::{self, BufRead};

/// Failures surfaced by the underlying character source
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("Read failed: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: u64 },

    #[error("Nothing to unread: no rune was read since the last pushback")]
    NothingToUnread,
}

impl CursorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            CursorError::Io(_) => codes::source::READ_FAILURE,
            CursorError::InvalidUtf8 { .. } => codes::source::INVALID_UTF8,
            CursorError::NothingToUnread => codes::source::PUSHBACK_WITHOUT_READ,
        }
    }
}

/// Reads one rune at a time and supports a single level of pushback.
///
/// `offset()` is the byte offset of the next rune `read()` will return.
pub struct RuneCursor<R> {
    reader: R,
    offset: u64,
    /// Rune returned by the latest `read()`, eligible for `unread()`
    last: Option<(char, usize)>,
    pushed_back: Option<(char, usize)>,
}

impl<R: BufRead> RuneCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            last: None,
            pushed_back: None,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Next rune and its encoded width in bytes; `None` at end of input.
    pub fn read(&mut self) -> Result<Option<(char, usize)>, CursorError> {
        let rune = match self.pushed_back.take() {
            Some(rune) => Some(rune),
            None => self.decode()?,
        };

        if let Some((_, width)) = rune {
            self.offset += width as u64;
        }
        self.last = rune;
        Ok(rune)
    }

    /// Push the most recently read rune back so the next `read()` returns it again.
    pub fn unread(&mut self) -> Result<(), CursorError> {
        let rune = self.last.take().ok_or(CursorError::NothingToUnread)?;
        self.offset -= rune.1 as u64;
        self.pushed_back = Some(rune);
        Ok(())
    }

    fn decode(&mut self) -> Result<Option<(char, usize)>, CursorError> {
        let lead = match self.next_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };

        let width = match lead {
            0x00..=0x7F => return Ok(Some((lead as char, 1))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(self.invalid()),
        };

        let mut encoded = [lead, 0, 0, 0];
        for slot in encoded.iter_mut().take(width).skip(1) {
            *slot = match self.next_byte()? {
                Some(byte) => byte,
                None => return Err(self.invalid()),
            };
        }

        // from_utf8 rejects overlong forms, surrogates and bad continuations
        std::str::from_utf8(&encoded[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(|c| Some((c, width)))
            .ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> CursorError {
        CursorError::InvalidUtf8 {
            offset: self.offset,
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>, CursorError> {
        loop {
            let byte = match self.reader.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CursorError::Io(e)),
            };
            if byte.is_some() {
                self.reader.consume(1);
            }
            return Ok(byte);
        }
    }
}
