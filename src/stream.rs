//! Line cursor shared by every tokenizer
//!
//! A [StringStream] wraps the text of a single line. Tokenizers advance it while
//! recognising one token, and the caller reads back the consumed span through
//! [StringStream::current]. The composite tokenizer relies on two extra powers of
//! the cursor: looking ahead without consuming (`match_*` with `consume = false`)
//! and rolling back part of what a sub-tokenizer consumed ([StringStream::back_up]).
//!
//! Positions are byte offsets into the line. Every method that moves the cursor
//! keeps it on a char boundary.

use regex::{Captures, Regex};

/// Default width of a tab stop when computing columns.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Cursor over the text of one line.
#[derive(Debug, Clone)]
pub struct StringStream<'a> {
    string: &'a str,
    pos: usize,
    start: usize,
    tab_size: usize,
}

impl<'a> StringStream<'a> {
    pub fn new(string: &'a str) -> Self {
        Self::with_tab_size(string, DEFAULT_TAB_SIZE)
    }

    pub fn with_tab_size(string: &'a str, tab_size: usize) -> Self {
        StringStream {
            string,
            pos: 0,
            start: 0,
            tab_size,
        }
    }

    /// The whole line, regardless of the cursor position.
    pub fn string(&self) -> &'a str {
        self.string
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Mark the current position as the start of the next token.
    pub fn start_token(&mut self) {
        self.start = self.pos;
    }

    /// True at the end of the line.
    pub fn eol(&self) -> bool {
        self.pos >= self.string.len()
    }

    /// True at the start of the line.
    pub fn sol(&self) -> bool {
        self.pos == 0
    }

    /// Text from the cursor to the end of the line.
    pub fn rest(&self) -> &'a str {
        &self.string[self.pos..]
    }

    /// Text consumed since the token started.
    pub fn current(&self) -> &'a str {
        &self.string[self.start..self.pos]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume the next character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> Option<char> {
        self.eat_if(|ch| ch == expected)
    }

    /// Consume the next character if it satisfies `pred`.
    pub fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += ch.len_utf8();
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consume characters while `pred` holds. Returns true if anything was consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let start = self.pos;
        while self.eat_if(&pred).is_some() {}
        self.pos > start
    }

    /// Consume whitespace. Returns true if anything was consumed.
    pub fn eat_space(&mut self) -> bool {
        self.eat_while(char::is_whitespace)
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.string.len();
    }

    /// Move to the next occurrence of `ch` without consuming it.
    pub fn skip_to(&mut self, ch: char) -> bool {
        match self.rest().find(ch) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    /// Step back `n` bytes. The result must stay on a char boundary inside the current token.
    pub fn back_up(&mut self, n: usize) {
        debug_assert!(n <= self.pos - self.start, "backing up past token start");
        self.pos -= n;
        debug_assert!(self.string.is_char_boundary(self.pos));
    }

    /// Step forward `n` bytes. Used by tokenizers that recognise a lexeme on [Self::rest].
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.string.len());
        debug_assert!(self.string.is_char_boundary(self.pos));
    }

    /// Match a literal at the cursor, optionally ignoring ASCII case.
    pub fn match_str(&mut self, pattern: &str, consume: bool, case_insensitive: bool) -> bool {
        let rest = self.rest().as_bytes();
        if rest.len() < pattern.len() {
            return false;
        }
        let candidate = &rest[..pattern.len()];
        let matched = if case_insensitive {
            candidate.eq_ignore_ascii_case(pattern.as_bytes())
        } else {
            candidate == pattern.as_bytes()
        };
        if matched && consume {
            self.pos += pattern.len();
        }
        matched
    }

    /// Match a regex at the cursor. A match that does not start at the cursor does not count.
    pub fn match_regex(&mut self, re: &Regex, consume: bool) -> Option<Captures<'a>> {
        let rest = self.rest();
        let captures = re.captures(rest)?;
        let whole = captures.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        if consume {
            self.pos += whole.end();
        }
        Some(captures)
    }

    /// Visual column of the token start, expanding tabs.
    pub fn column(&self) -> usize {
        count_column(&self.string[..self.start], self.tab_size)
    }

    /// Visual width of the line's leading whitespace.
    pub fn indentation(&self) -> usize {
        let leading = self.string.len() - self.string.trim_start().len();
        count_column(&self.string[..leading], self.tab_size)
    }
}

/// Width of `text` with tabs expanded to `tab_size` stops.
pub fn count_column(text: &str, tab_size: usize) -> usize {
    text.chars().fold(0, |column, ch| {
        if ch == '\t' && tab_size > 0 {
            column + tab_size - column % tab_size
        } else {
            column + 1
        }
    })
}
