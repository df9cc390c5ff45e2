/// Accumulates the text of the lexeme currently being scanned
#[derive(Debug, Default, Clone)]
pub struct TokenBuffer {
    text: String,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    /// Drop the most recently pushed rune, if any
    pub fn truncate_last(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Hand out the accumulated text and leave the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
