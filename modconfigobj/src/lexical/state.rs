//! Lexer states and the transition function
//!
//! Every state consumes runes, may emit tokens, and names the state that runs
//! next. `Done` is terminal.

use super::analyzer::{Lexer, LexerError};
use crate::log_debug;
use crate::tokens::TokenKind;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Between statements: skips whitespace and dispatches on the next rune
    Generic,
    Key,
    Value,
    /// Quoted value delimited by the given quote rune
    QuotedValue(char),
    Section,
    Comment,
    /// Discards the rest of a malformed line
    Recover,
    Done,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Generic => "Generic",
            State::Key => "Key",
            State::Value => "Value",
            State::QuotedValue(_) => "QuotedValue",
            State::Section => "Section",
            State::Comment => "Comment",
            State::Recover => "Recover",
            State::Done => "Done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == State::Done
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

impl<R: BufRead> Lexer<R> {
    /// Run one state to completion and return its successor
    pub(super) fn step(&mut self, state: State) -> Result<State, LexerError> {
        match state {
            State::Generic => self.lex_generic(),
            State::Key => self.lex_key(),
            State::Value => self.lex_value(),
            State::QuotedValue(quote) => self.lex_quoted_value(quote),
            State::Section => self.lex_section(),
            State::Comment => self.lex_comment(),
            State::Recover => self.lex_recover(),
            State::Done => Ok(State::Done),
        }
    }

    fn lex_generic(&mut self) -> Result<State, LexerError> {
        loop {
            match self.next_rune()? {
                Some(c) if c.is_whitespace() => self.ignore(),
                None => {
                    self.emit_end();
                    return Ok(State::Done);
                }
                Some('[') => {
                    self.backup()?;
                    return Ok(State::Section);
                }
                Some('#') => {
                    self.backup()?;
                    return Ok(State::Comment);
                }
                Some('=') => {
                    // Nothing precedes the '=': empty key
                    self.emit(TokenKind::Error);
                    return Ok(self.recover());
                }
                Some(_) => {
                    self.backup()?;
                    return Ok(State::Key);
                }
            }
        }
    }

    fn lex_key(&mut self) -> Result<State, LexerError> {
        loop {
            match self.next_rune()? {
                None => {
                    self.emit(TokenKind::Error);
                    self.emit_end();
                    return Ok(State::Done);
                }
                Some('\n') => {
                    self.emit(TokenKind::Error);
                    return Ok(State::Generic);
                }
                Some('=') => {
                    self.backup()?;
                    self.emit(TokenKind::Key);
                    self.next_rune()?;
                    self.ignore();
                    return Ok(State::Value);
                }
                Some(_) => {}
            }
        }
    }

    fn lex_value(&mut self) -> Result<State, LexerError> {
        // Leading whitespace, newlines included, is not part of the value
        loop {
            match self.next_rune()? {
                Some(c) if c.is_whitespace() => self.ignore(),
                Some(c) if is_quote(c) => {
                    self.backup()?;
                    return Ok(State::QuotedValue(c));
                }
                Some(_) => {
                    self.backup()?;
                    break;
                }
                None => break,
            }
        }

        loop {
            match self.next_rune()? {
                None => {
                    self.emit(TokenKind::Value);
                    self.emit_end();
                    return Ok(State::Done);
                }
                Some('\n') => {
                    self.backup()?;
                    self.emit(TokenKind::Value);
                    self.next_rune()?;
                    self.ignore();
                    return Ok(State::Generic);
                }
                Some(_) => {}
            }
        }
    }

    fn lex_quoted_value(&mut self, quote: char) -> Result<State, LexerError> {
        let count = match self.take_run(quote, 3)? {
            Some(count @ (1 | 3)) => count,
            Some(_) => {
                // Two quotes open nothing: neither an empty value nor a triple
                self.emit(TokenKind::Error);
                return Ok(self.recover());
            }
            None => return Ok(self.fail_at_end()),
        };

        loop {
            match self.take_run(quote, count)? {
                None => return Ok(self.fail_at_end()),
                Some(run) if run == count => {
                    self.emit(TokenKind::Value);
                    return Ok(State::Generic);
                }
                Some(_) => {}
            }

            match self.next_rune()? {
                None => return Ok(self.fail_at_end()),
                Some('\n') if count == 1 => {
                    self.emit(TokenKind::Error);
                    return Ok(State::Generic);
                }
                Some(_) => {}
            }
        }
    }

    fn lex_section(&mut self) -> Result<State, LexerError> {
        let depth = match self.take_run('[', usize::MAX)? {
            Some(depth) => depth,
            None => return Ok(self.fail_at_end()),
        };

        loop {
            match self.take_run(']', depth)? {
                None => return Ok(self.fail_at_end()),
                Some(run) if run == depth => {
                    self.emit(TokenKind::Section);
                    return Ok(State::Generic);
                }
                Some(_) => {}
            }

            match self.next_rune()? {
                None => return Ok(self.fail_at_end()),
                Some('\n') => {
                    self.emit(TokenKind::Error);
                    return Ok(State::Generic);
                }
                Some(_) => {}
            }
        }
    }

    fn lex_comment(&mut self) -> Result<State, LexerError> {
        loop {
            match self.next_rune()? {
                None => {
                    self.emit(TokenKind::Comment);
                    self.emit_end();
                    return Ok(State::Done);
                }
                Some('\n') => {
                    self.backup()?;
                    self.emit(TokenKind::Comment);
                    self.next_rune()?;
                    self.ignore();
                    return Ok(State::Generic);
                }
                Some(_) => {}
            }
        }
    }

    fn lex_recover(&mut self) -> Result<State, LexerError> {
        loop {
            match self.next_rune()? {
                None => {
                    self.emit_end();
                    return Ok(State::Done);
                }
                Some('\n') => {
                    self.ignore();
                    return Ok(State::Generic);
                }
                Some(_) => self.ignore(),
            }
        }
    }

    fn recover(&mut self) -> State {
        log_debug!("Skipping to next line after malformed token",
            "offset" => self.offset()
        );
        State::Recover
    }

    /// Input ended inside a construct: report it, then end the stream
    fn fail_at_end(&mut self) -> State {
        self.emit(TokenKind::Error);
        self.emit_end();
        State::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::from_text(source)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn summary(source: &str) -> Vec<(TokenKind, u64, String)> {
        lex(source)
            .into_iter()
            .map(|t| (t.kind, t.position, t.text))
            .collect()
    }

    fn tok(kind: TokenKind, position: u64, text: &str) -> (TokenKind, u64, String) {
        (kind, position, text.to_string())
    }

    #[test]
    fn test_section_key_value() {
        assert_eq!(
            summary("[section]\nkey = value\n"),
            vec![
                tok(TokenKind::Section, 0, "[section]"),
                tok(TokenKind::Key, 10, "key "),
                tok(TokenKind::Value, 16, "value"),
                tok(TokenKind::EndOfStream, 22, ""),
            ]
        );
    }

    #[test]
    fn test_key_value_without_section() {
        assert_eq!(
            summary("key=value\n"),
            vec![
                tok(TokenKind::Key, 0, "key"),
                tok(TokenKind::Value, 4, "value"),
                tok(TokenKind::EndOfStream, 10, ""),
            ]
        );
    }

    #[test]
    fn test_stray_equals_skips_line() {
        assert_eq!(
            summary("=oops\n"),
            vec![
                tok(TokenKind::Error, 0, "="),
                tok(TokenKind::EndOfStream, 6, ""),
            ]
        );
    }

    #[test]
    fn test_nested_section() {
        let tokens = lex("[[sub]]\n");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Section);
        assert_eq!(tokens[0].text, "[[sub]]");
        assert_eq!(tokens[0].section_depth(), Some(1));
    }

    #[test]
    fn test_triple_quoted_value_spans_lines() {
        assert_eq!(
            summary("key = '''multi\nline'''\n"),
            vec![
                tok(TokenKind::Key, 0, "key "),
                tok(TokenKind::Value, 6, "'''multi\nline'''"),
                tok(TokenKind::EndOfStream, 23, ""),
            ]
        );
    }

    #[test]
    fn test_unterminated_single_quote() {
        assert_eq!(
            summary("key = 'abc\n"),
            vec![
                tok(TokenKind::Key, 0, "key "),
                tok(TokenKind::Error, 6, "'abc\n"),
                tok(TokenKind::EndOfStream, 11, ""),
            ]
        );
    }

    #[test]
    fn test_quoted_values_keep_quotes() {
        let tokens = lex("a='x y'\nb=\"z\"\n");
        assert_eq!(tokens[1].text, "'x y'");
        assert_eq!(tokens[3].text, "\"z\"");
        assert_eq!(tokens[3].kind, TokenKind::Value);
    }

    #[test]
    fn test_other_quote_inside_value() {
        let tokens = lex("a=\"it's\"\n");
        assert_eq!(tokens[1].kind, TokenKind::Value);
        assert_eq!(tokens[1].text, "\"it's\"");
    }

    #[test]
    fn test_triple_quote_tolerates_shorter_runs() {
        let tokens = lex("a=\"\"\"one \"\" two\"\"\"\n");
        assert_eq!(tokens[1].kind, TokenKind::Value);
        assert_eq!(tokens[1].text, "\"\"\"one \"\" two\"\"\"");
    }

    #[test]
    fn test_double_quote_run_is_error() {
        assert_eq!(
            summary("a=''\nb=c\n"),
            vec![
                tok(TokenKind::Key, 0, "a"),
                tok(TokenKind::Error, 2, "''"),
                tok(TokenKind::Key, 5, "b"),
                tok(TokenKind::Value, 7, "c"),
                tok(TokenKind::EndOfStream, 9, ""),
            ]
        );
    }

    #[test]
    fn test_unterminated_triple_quote_at_end() {
        assert_eq!(
            summary("a='''open\n"),
            vec![
                tok(TokenKind::Key, 0, "a"),
                tok(TokenKind::Error, 2, "'''open\n"),
                tok(TokenKind::EndOfStream, 10, ""),
            ]
        );
    }

    #[test]
    fn test_key_without_equals() {
        assert_eq!(
            summary("lonely\nk=v"),
            vec![
                tok(TokenKind::Error, 0, "lonely\n"),
                tok(TokenKind::Key, 7, "k"),
                tok(TokenKind::Value, 9, "v"),
                tok(TokenKind::EndOfStream, 10, ""),
            ]
        );
    }

    #[test]
    fn test_key_at_end_of_input() {
        assert_eq!(
            summary("dangling"),
            vec![
                tok(TokenKind::Error, 0, "dangling"),
                tok(TokenKind::EndOfStream, 8, ""),
            ]
        );
    }

    #[test]
    fn test_value_continues_on_next_line() {
        assert_eq!(
            summary("k=\nv\n"),
            vec![
                tok(TokenKind::Key, 0, "k"),
                tok(TokenKind::Value, 3, "v"),
                tok(TokenKind::EndOfStream, 5, ""),
            ]
        );
        assert_eq!(
            summary("k = \n\n  'q'\n"),
            vec![
                tok(TokenKind::Key, 0, "k "),
                tok(TokenKind::Value, 8, "'q'"),
                tok(TokenKind::EndOfStream, 12, ""),
            ]
        );
    }

    #[test]
    fn test_empty_value_at_end_of_input() {
        assert_eq!(
            summary("b= \n"),
            vec![
                tok(TokenKind::Key, 0, "b"),
                tok(TokenKind::Value, 4, ""),
                tok(TokenKind::EndOfStream, 4, ""),
            ]
        );
    }

    #[test]
    fn test_value_at_end_of_input() {
        assert_eq!(
            summary("a = b"),
            vec![
                tok(TokenKind::Key, 0, "a "),
                tok(TokenKind::Value, 4, "b"),
                tok(TokenKind::EndOfStream, 5, ""),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            summary("# first\n  #second"),
            vec![
                tok(TokenKind::Comment, 0, "# first"),
                tok(TokenKind::Comment, 10, "#second"),
                tok(TokenKind::EndOfStream, 17, ""),
            ]
        );
    }

    #[test]
    fn test_bare_hash_is_a_comment() {
        assert_eq!(
            summary("#\nk=v"),
            vec![
                tok(TokenKind::Comment, 0, "#"),
                tok(TokenKind::Key, 2, "k"),
                tok(TokenKind::Value, 4, "v"),
                tok(TokenKind::EndOfStream, 5, ""),
            ]
        );
        assert_eq!(
            summary("#"),
            vec![
                tok(TokenKind::Comment, 0, "#"),
                tok(TokenKind::EndOfStream, 1, ""),
            ]
        );
    }

    #[test]
    fn test_section_broken_by_newline() {
        assert_eq!(
            summary("[[a]\nk=v\n"),
            vec![
                tok(TokenKind::Error, 0, "[[a]\n"),
                tok(TokenKind::Key, 5, "k"),
                tok(TokenKind::Value, 7, "v"),
                tok(TokenKind::EndOfStream, 9, ""),
            ]
        );
    }

    #[test]
    fn test_unterminated_section_at_end() {
        assert_eq!(
            summary("[open"),
            vec![
                tok(TokenKind::Error, 0, "[open"),
                tok(TokenKind::EndOfStream, 5, ""),
            ]
        );
    }

    #[test]
    fn test_multibyte_runes_keep_byte_offsets() {
        assert_eq!(
            summary("[dé]\nclé=vål€\n"),
            vec![
                tok(TokenKind::Section, 0, "[dé]"),
                tok(TokenKind::Key, 6, "clé"),
                tok(TokenKind::Value, 11, "vål€"),
                tok(TokenKind::EndOfStream, 19, ""),
            ]
        );
    }

    #[test]
    fn test_state_names() {
        assert_eq!(State::QuotedValue('"').as_str(), "QuotedValue");
        assert!(State::Done.is_terminal());
        assert!(!State::Generic.is_terminal());
    }
}
