use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Error,
    Comment,
    Key,
    Value,
    Section,
    EndOfStream,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Error => "Error",
            TokenKind::Comment => "Comment",
            TokenKind::Key => "Key",
            TokenKind::Value => "Value",
            TokenKind::Section => "Section",
            TokenKind::EndOfStream => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified lexeme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first byte of `text`
    pub position: u64,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, position: u64, text: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            text: text.into(),
        }
    }

    /// Length of the lexeme in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn span(&self) -> Span {
        Span::at(self.position, self.len() as u64)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    /// Zero-based nesting depth of a section header: `[a]` is 0, `[[a]]` is 1
    pub fn section_depth(&self) -> Option<usize> {
        if self.kind != TokenKind::Section {
            return None;
        }
        let brackets = self.text.chars().take_while(|&c| c == '[').count();
        brackets.checked_sub(1)
    }

    /// Section name with brackets and surrounding whitespace removed
    pub fn section_name(&self) -> Option<&str> {
        if self.kind != TokenKind::Section {
            return None;
        }
        Some(
            self.text
                .trim_start_matches('[')
                .trim_end_matches(']')
                .trim(),
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {} at {}: \"{}\"", self.kind, self.position, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let token = Token::new(TokenKind::Key, 6, "key ");
        assert_eq!(token.to_string(), "token Key at 6: \"key \"");
        assert_eq!(Token::new(TokenKind::EndOfStream, 14, "").to_string(), "token EOF at 14: \"\"");
    }

    #[test]
    fn test_section_depth_and_name() {
        let top = Token::new(TokenKind::Section, 0, "[a]");
        let nested = Token::new(TokenKind::Section, 4, "[[ b ]]");
        assert_eq!(top.section_depth(), Some(0));
        assert_eq!(nested.section_depth(), Some(1));
        assert_eq!(nested.section_name(), Some("b"));

        let value = Token::new(TokenKind::Value, 0, "[x]");
        assert_eq!(value.section_depth(), None);
        assert_eq!(value.section_name(), None);
    }

    #[test]
    fn test_span_uses_byte_length() {
        let token = Token::new(TokenKind::Value, 10, "é");
        assert_eq!(token.len(), 2);
        assert_eq!(token.span(), Span::new(10, 12));
    }

    #[test]
    fn test_serializes_kind_and_text() {
        let token = Token::new(TokenKind::Section, 0, "[a]");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["kind"], "Section");
        assert_eq!(json["position"], 0);
        assert_eq!(json["text"], "[a]");
    }
}
