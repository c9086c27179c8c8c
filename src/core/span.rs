//! Span - offset and length into the normalized input
//!
//! Zero-copy reference to a portion of the document buffer.
//! Used for element names, PI targets and data, and text content.

/// A span referencing a portion of the normalized document buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset into the buffer
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Create a span covering `start..end`
    #[inline]
    pub const fn between(start: usize, end: usize) -> Self {
        Self {
            offset: start,
            len: end.saturating_sub(start),
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset (exclusive)
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset.saturating_add(self.len)
    }

    /// Extract the string slice from the buffer
    ///
    /// Out of range spans, or spans that do not fall on character
    /// boundaries, resolve to the empty string.
    #[inline]
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.offset..self.end()).unwrap_or("")
    }
}

/// Where the textual payload of a token lives.
///
/// Either a slice of the document buffer, or a string materialized by
/// entity substitution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// The token carries no text
    #[default]
    None,
    /// Text is a slice of the normalized buffer
    Source(Span),
    /// Text was produced by entity substitution
    Replaced(String),
}

impl Content {
    /// Resolve against the buffer the token was scanned from
    pub fn resolve<'a>(&'a self, text: &'a str) -> ContentSpan<'a> {
        match self {
            Content::None => ContentSpan::new("", 0, 0),
            Content::Source(span) => match text.get(span.offset..span.end()) {
                Some(_) => ContentSpan::new(text, span.offset, span.end()),
                None => ContentSpan::new("", 0, 0),
            },
            Content::Replaced(s) => ContentSpan::new(s, 0, s.len()),
        }
    }
}

/// Resolved payload: the source string plus the `begin..end` range of the
/// payload inside it.
///
/// This is the shape handlers see in `characters` and `comment`: a source
/// that is not necessarily terminated at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSpan<'a> {
    pub source: &'a str,
    pub begin: usize,
    pub end: usize,
}

impl<'a> ContentSpan<'a> {
    #[inline]
    pub const fn new(source: &'a str, begin: usize, end: usize) -> Self {
        Self { source, begin, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The payload itself
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.source.get(self.begin..self.end).unwrap_or("")
    }
}
