//! SIMD-accelerated XML scanning using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)
//!
//! The scanner owns a shared handle to the normalized document buffer and
//! works in byte offsets. Every delimiter it looks for is ASCII, so the
//! offsets it hands out always fall on `char` boundaries.

use std::rc::Rc;

use memchr::{memchr, memchr2, memchr3, memmem};

use super::span::Span;

/// Byte cursor over the document buffer
#[derive(Debug, Clone)]
pub struct Scanner {
    input: Rc<str>,
    pos: usize,
}

impl Scanner {
    /// Create a new scanner for the given buffer
    #[inline]
    pub fn new(input: Rc<str>) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.input.as_bytes()
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.bytes()[self.pos..]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Skip whitespace characters, returning true if any were skipped
    #[inline]
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !is_whitespace(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos > start
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining()).map(|i| self.pos + i)
    }

    /// Find next '<' or '&' (text content boundaries)
    #[inline]
    pub fn find_text_boundary(&self) -> Option<usize> {
        memchr2(b'<', b'&', self.remaining()).map(|i| self.pos + i)
    }

    /// Find the ';' closing an entity reference.
    ///
    /// Stops at the first '<' or '&' so a stray ampersand does not swallow
    /// the rest of the document.
    #[inline]
    pub fn find_reference_end(&self) -> Option<usize> {
        match memchr3(b';', b'<', b'&', self.remaining()) {
            Some(i) if self.remaining()[i] == b';' => Some(self.pos + i),
            _ => None,
        }
    }

    /// Find next occurrence of a byte sequence (e.g. `-->`)
    #[inline]
    pub fn find_sequence(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), needle).map(|i| self.pos + i)
    }

    /// Read a run of bytes up to the first delimiter or whitespace.
    ///
    /// Returns the span read, which may be empty. The cursor is left on the
    /// delimiter (or at end of input).
    pub fn read_until_delimiter(&mut self, delimiters: &[u8]) -> Span {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_whitespace(b) || delimiters.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        Span::between(start, self.pos)
    }
}

/// Check if byte is XML whitespace (space, tab, newline, carriage return)
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Check if a string consists of XML whitespace only
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.bytes().all(is_whitespace)
}
