//! Cursor over a borrowed script buffer.
//!
//! The scanner owns nothing but a position. Query methods (`first_valid`,
//! `word_end`, `string_end`, ...) report where something is without moving;
//! the `read_full_*` methods slice the token out and [`seek`](Scanner::seek)
//! past it.
//!
//! # End of Buffer
//!
//! [`current`](Scanner::current) returns `0x00` once the cursor reaches the
//! end of the text, the same sentinel convention the byte predicates in
//! [`chars`](crate::chars) rely on to stop naturally. Running out of text
//! inside a string or bracket span is a [`ScanError`]; whether plain EOF is
//! an error is the evaluator's call.

use std::fmt;

use crate::chars::{closing_bracket, is_digit, is_quote, is_whitespace, is_word};

/// What went wrong while scanning a token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanErrorKind {
    #[error("unterminated string starting with {quote}")]
    UnterminatedString { quote: char },
    #[error("missing closing bracket for `{open}`")]
    UnclosedBracket { open: char },
    #[error("malformed number `{text}`")]
    MalformedNumber { text: String },
    #[error("expected {expected}")]
    Expected { expected: &'static str },
}

/// Scanner failure with the byte offset where the offending token starts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {pos}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub pos: usize,
}

impl ScanError {
    fn new(kind: ScanErrorKind, pos: usize) -> Self {
        ScanError { kind, pos }
    }
}

/// 1-based line and column of a byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Position-based cursor over immutable script text.
///
/// The scanner is [`Copy`], so callers can snapshot and restore positions
/// freely.
#[derive(Clone, Copy, Debug)]
pub struct Scanner<'src> {
    text: &'src str,
    pos: usize,
}

impl<'src> Scanner<'src> {
    /// Create a scanner at position 0.
    pub fn new(text: &'src str) -> Self {
        Scanner { text, pos: 0 }
    }

    /// The full text being scanned.
    #[inline]
    pub fn text(&self) -> &'src str {
        self.text
    }

    #[inline]
    fn bytes(&self) -> &'src [u8] {
        self.text.as_bytes()
    }

    /// Length of the text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to `pos`, clamped to the end of the text.
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    /// Advance by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.seek(self.pos + 1);
    }

    /// Returns `true` once the cursor has reached the end of the text.
    #[inline]
    pub fn eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Byte at the cursor, or `0x00` at end of text.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.bytes().get(pos).copied().unwrap_or(0)
    }

    /// Index of the first non-whitespace byte at or after the cursor.
    ///
    /// Returns the text length when only whitespace remains.
    pub fn first_valid(&self) -> usize {
        self.valid_from(self.pos)
    }

    /// Index of the first non-whitespace byte strictly after the cursor.
    pub fn next_valid(&self) -> usize {
        self.valid_from(self.pos + 1)
    }

    fn valid_from(&self, start: usize) -> usize {
        let bytes = self.bytes();
        let start = start.min(bytes.len());
        bytes[start..]
            .iter()
            .position(|&b| !is_whitespace(b))
            .map_or(bytes.len(), |offset| start + offset)
    }

    /// Seek to [`first_valid`](Self::first_valid).
    #[inline]
    pub fn skip_whitespace(&mut self) {
        self.pos = self.first_valid();
    }

    /// End (exclusive) of the word starting at the cursor.
    ///
    /// Equals the cursor position when the current byte is not a word byte.
    pub fn word_end(&self) -> usize {
        let bytes = self.bytes();
        bytes[self.pos..]
            .iter()
            .position(|&b| !is_word(b))
            .map_or(bytes.len(), |offset| self.pos + offset)
    }

    /// Consume a maximal run of word bytes and return it.
    ///
    /// The result is empty when the cursor is not on a word byte.
    pub fn read_full_word(&mut self) -> &'src str {
        let start = self.pos;
        let end = self.word_end();
        self.pos = end;
        &self.text[start..end]
    }

    /// End (exclusive) of the digit-and-dot run starting at the cursor.
    pub fn number_end(&self) -> usize {
        let bytes = self.bytes();
        bytes[self.pos..]
            .iter()
            .position(|&b| !(is_digit(b) || b == b'.'))
            .map_or(bytes.len(), |offset| self.pos + offset)
    }

    /// Consume a number literal and convert it to `f64`.
    ///
    /// Text with more than one decimal point (`1.2.3`) or no digits at all is
    /// rejected rather than truncated.
    pub fn read_full_number(&mut self) -> Result<f64, ScanError> {
        let start = self.pos;
        let end = self.number_end();
        let literal = &self.text[start..end];
        let number = literal.parse::<f64>().map_err(|_| {
            ScanError::new(
                ScanErrorKind::MalformedNumber {
                    text: literal.to_string(),
                },
                start,
            )
        })?;
        self.pos = end;
        Ok(number)
    }

    /// End (exclusive, past the closing quote) of the string literal whose
    /// opening quote sits at `start`.
    ///
    /// A quote preceded by `\` does not close the string.
    pub fn string_end(&self, start: usize) -> Result<usize, ScanError> {
        let bytes = self.bytes();
        let quote = self.byte_at(start);
        if !is_quote(quote) {
            return Err(ScanError::new(
                ScanErrorKind::Expected {
                    expected: "a quote",
                },
                start,
            ));
        }
        let mut search = start + 1;
        while let Some(offset) = memchr::memchr(quote, &bytes[search..]) {
            let found = search + offset;
            if bytes[found - 1] != b'\\' {
                return Ok(found + 1);
            }
            search = found + 1;
        }
        Err(ScanError::new(
            ScanErrorKind::UnterminatedString {
                quote: char::from(quote),
            },
            start,
        ))
    }

    /// Consume a string literal and return its content without delimiters.
    ///
    /// No escape sequences are decoded.
    pub fn read_full_string(&mut self) -> Result<&'src str, ScanError> {
        let start = self.pos;
        let end = self.string_end(start)?;
        self.pos = end;
        Ok(&self.text[start + 1..end - 1])
    }

    /// End (exclusive, past the closing bracket) of the bracket span opening
    /// at the cursor.
    ///
    /// Only brackets of the same type affect nesting depth, and quoted spans
    /// are skipped whole.
    pub fn bracket_end(&self) -> Result<usize, ScanError> {
        let bytes = self.bytes();
        let open = self.current();
        let Some(close) = closing_bracket(open) else {
            return Err(ScanError::new(
                ScanErrorKind::Expected {
                    expected: "an opening bracket",
                },
                self.pos,
            ));
        };

        let mut depth = 1usize;
        let mut i = self.pos + 1;
        while i < bytes.len() {
            let b = bytes[i];
            if is_quote(b) {
                i = self.string_end(i)?;
                continue;
            }
            if b == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            } else if b == open {
                depth += 1;
            }
            i += 1;
        }
        Err(ScanError::new(
            ScanErrorKind::UnclosedBracket {
                open: char::from(open),
            },
            self.pos,
        ))
    }

    /// Consume a bracket span and return its content without delimiters.
    pub fn read_full_bracket(&mut self) -> Result<&'src str, ScanError> {
        let start = self.pos;
        let end = self.bracket_end()?;
        self.pos = end;
        Ok(&self.text[start + 1..end - 1])
    }

    /// Line and column of byte offset `pos`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "scripts beyond u32::MAX lines are not supported"
    )]
    pub fn line_col(&self, pos: usize) -> LineCol {
        let prefix = &self.bytes()[..pos.min(self.text.len())];
        let line = memchr::memchr_iter(b'\n', prefix).count() + 1;
        let line_start = memchr::memrchr(b'\n', prefix).map_or(0, |nl| nl + 1);
        LineCol {
            line: line as u32,
            col: (prefix.len() - line_start + 1) as u32,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests;
