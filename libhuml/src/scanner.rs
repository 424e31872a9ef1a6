//! Scanner: the cursor shared by every parsing function.
//!
//! The scanner tracks a byte offset and a 1-based line number over the
//! document. It provides:
//! - Bounds-checked lookahead (`peek`, `peek_at`, `prev`, `peek_str`)
//! - Snapshot and restore for backtracking probes (`mark`, `reset`, `lookahead`)
//! - Whitespace validation while finishing lines (`consume_line`,
//!   `skip_blank_lines`, `assert_space`, `expect_comma`)
//!
//! The line counter only moves when a newline is consumed by
//! `consume_line` or `consume_line_content`; `advance` never touches it.

use crate::error::{Error, Result};

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
    line: usize,
}

/// Cursor over a complete HUML document.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner at the start of `src`.
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
        }
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
    }

    /// Run `probe` and restore the cursor afterwards, whatever it returned.
    pub fn lookahead<T>(&mut self, probe: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mark = self.mark();
        let result = probe(self);
        self.reset(mark);
        result
    }

    pub fn done(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// The unconsumed input.
    pub fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    /// The unconsumed part of the current line, without its newline.
    pub fn rest_of_line(&self) -> &'a str {
        let rest = self.rest();
        match rest.find('\n') {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    /// Input after the end of the current line.
    pub fn after_line(&self) -> &'a str {
        let rest = self.rest();
        match rest.find('\n') {
            Some(end) => &rest[end + 1..],
            None => "",
        }
    }

    /// Source text between two offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.src.get(start..end).unwrap_or("")
    }

    /// Byte under the cursor, `None` at end of input.
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Byte `offset` bytes ahead of the cursor.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    /// Byte just before the cursor, `None` at the start of input.
    pub fn prev(&self) -> Option<u8> {
        let before = self.pos.checked_sub(1)?;
        self.src.as_bytes().get(before).copied()
    }

    /// Character under the cursor.
    pub fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Whether the remaining input starts with `s`.
    pub fn peek_str(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Whether the input `offset` bytes ahead starts with `s`.
    pub fn peek_str_at(&self, offset: usize, s: &str) -> bool {
        self.src
            .as_bytes()
            .get(self.pos + offset..)
            .is_some_and(|tail| tail.starts_with(s.as_bytes()))
    }

    /// Move forward `n` bytes, stopping at end of input.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    pub fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    /// Offset of the first byte of the current line.
    pub fn line_start(&self) -> usize {
        let before = self.src.as_bytes().get(..self.pos).unwrap_or_default();
        before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |nl| nl + 1)
    }

    /// Number of leading spaces on the current line, wherever the cursor sits
    /// within it.
    pub fn current_indent(&self) -> usize {
        let start = self.line_start();
        self.src.as_bytes()[start..]
            .iter()
            .take_while(|&&b| b == b' ')
            .count()
    }

    /// Zero-based column of the cursor.
    pub fn column(&self) -> usize {
        self.pos - self.line_start()
    }

    /// Build a syntax error at the current line.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.line, message)
    }

    /// Finish the current line: only spaces and an optional comment may
    /// remain, and nothing may end in a space.
    pub fn consume_line(&mut self) -> Result<()> {
        let content_start = self.pos;
        self.skip_spaces();

        match self.peek() {
            None | Some(b'\n') => {
                if self.pos > content_start {
                    return Err(self.error("trailing spaces are not allowed"));
                }
            }
            Some(b'#') => {
                if self.pos == content_start && self.current_indent() != self.column() {
                    return Err(
                        self.error("a value must be separated from an inline comment by a space")
                    );
                }
                self.advance(1);
                if !matches!(self.peek(), None | Some(b' ') | Some(b'\n')) {
                    return Err(self.error("comment hash '#' must be followed by a space"));
                }
            }
            Some(_) => return Err(self.error("unexpected content at end of line")),
        }

        let remainder = self.rest_of_line();
        if remainder.ends_with(' ') {
            return Err(self.error("trailing spaces are not allowed"));
        }
        self.advance(remainder.len());
        self.eat_newline();
        Ok(())
    }

    /// Take the rest of the current line verbatim and move to the next one.
    pub fn consume_line_content(&mut self) -> &'a str {
        let content = self.rest_of_line();
        self.advance(content.len());
        self.eat_newline();
        content
    }

    fn eat_newline(&mut self) {
        if self.peek() == Some(b'\n') {
            self.pos += 1;
            self.line += 1;
        }
    }

    /// Skip blank and comment-only lines. Leaves the cursor after the
    /// indentation of the next content line, or at end of input.
    pub fn skip_blank_lines(&mut self) -> Result<()> {
        while !self.done() {
            let line_start = self.pos;
            self.skip_spaces();

            match self.peek() {
                None => {
                    if self.pos > line_start {
                        return Err(self.error("trailing spaces are not allowed"));
                    }
                }
                Some(b'\n') if self.pos > line_start => {
                    return Err(self.error("trailing spaces are not allowed"));
                }
                Some(b'\n') | Some(b'#') => {
                    self.pos = line_start;
                    self.consume_line()?;
                }
                Some(_) => return Ok(()),
            }
        }
        Ok(())
    }

    /// Require exactly one space at the cursor and step over it.
    pub fn assert_space(&mut self, context: &str) -> Result<()> {
        if self.peek() != Some(b' ') {
            return Err(self.error(format!("expected single space {}", context)));
        }
        self.advance(1);
        if self.peek() == Some(b' ') {
            return Err(self.error(format!(
                "expected single space {}, found multiple",
                context
            )));
        }
        Ok(())
    }

    /// Require the `", "` separator between inline collection entries.
    pub fn expect_comma(&mut self) -> Result<()> {
        self.skip_spaces();
        if self.peek() != Some(b',') {
            return Err(self.error("expected a comma in inline collection"));
        }
        if self.prev() == Some(b' ') {
            return Err(self.error("no spaces allowed before comma"));
        }
        self.advance(1);
        self.assert_space("after comma")
    }
}
