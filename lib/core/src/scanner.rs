// Character scanner shared by the grammar and JSON value rules.
// Single forward cursor, no backtracking.
use crate::{Error, Result};

/// Characters allowed in a bare (unquoted) name
#[inline]
pub fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Forward-only cursor over a source document
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Current byte offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Unconsumed remainder of the source
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Source text between `start` and the cursor
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    pub fn starts_with(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume `ch` if it is next
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `literal` if the remainder starts with it
    pub fn eat_str(&mut self, literal: &str) -> bool {
        if self.starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", ch)))
        }
    }

    pub fn expect_str(&mut self, literal: &str) -> Result<()> {
        if self.eat_str(literal) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", literal)))
        }
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume the longest run of characters matching `pred`
    pub fn scan_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.slice_from(start)
    }

    /// Consume up to and including `terminator`.
    ///
    /// Returns the text before the terminator and whether it was found. A
    /// missing terminator consumes the rest of the source.
    pub fn scan_until(&mut self, terminator: &str) -> (&'a str, bool) {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(offset) => {
                self.pos += offset + terminator.len();
                (&rest[..offset], true)
            }
            None => {
                self.pos = self.source.len();
                (rest, false)
            }
        }
    }

    /// Syntax error at the cursor
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.pos)
    }

    /// Syntax error describing what was expected and what was found
    pub fn unexpected(&self, expected: &str) -> Error {
        match self.peek() {
            Some(ch) => self.error(format!("expected {}, found '{}'", expected, ch)),
            None => self.error(format!("expected {}, found end of input", expected)),
        }
    }
}
