//! Byte cursor and symbol classification
//!
//! Uses memchr for delimiter searches (SIMD when available):
//! - `<` for the end of a character run
//! - `-->`, `]]>`, `?>` terminators via memmem
//! - closing quotes of attribute values

use memchr::{memchr, memmem};

/// Cursor over an immutable input buffer
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Skip whitespace, returning true if anything was skipped
    #[inline]
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.pos < self.input.len() && is_whitespace(self.input[self.pos]) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Find next '<' from the cursor
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find a multi-byte terminator such as `-->`
    #[inline]
    pub fn find_sequence(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.input[self.pos..], needle).map(|i| self.pos + i)
    }

    /// Read a name: one name-start byte followed by name bytes
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_name_start_char(b) => self.pos += 1,
            _ => return None,
        }
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

/// Whitespace between markup tokens
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Bytes that may start an element or attribute name
///
/// ASCII letters, `_`, `:` and every byte from 0xC0 up except 0xF7. That
/// covers all UTF-8 lead bytes (0xC2..=0xF4) and the Latin-1 letters. 0xF7
/// (Latin-1 `÷`) can never lead a valid UTF-8 sequence.
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'_' | b':' | 0xC0..=0xF6 | 0xF8..=0xFF)
}

/// Bytes that may continue a name
///
/// Adds digits, `-`, `.` and `·` (0xB7) to the start set. UTF-8 continuation
/// bytes (0x80..=0xBF) are accepted so multi-byte names pass through intact.
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'-' | b'.' | 0x80..=0xBF) || is_name_start_char(b)
}
