//! Line and column tracking
//!
//! Positions are computed on demand against the normalized buffer: the line
//! is one plus the number of `\n` bytes before the offset, the column is one
//! plus the number of characters between the last `\n` and the offset.

use std::cell::Cell;
use std::fmt::Display;
use std::rc::Rc;

use memchr::{memchr_iter, memrchr};

/// A position in the normalized document buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    /// Byte offset into the buffer.
    pub offset: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

impl Location {
    /// Location of the first character of a document.
    pub fn new() -> Self {
        Location {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Compute the location of `offset` inside `text`.
    ///
    /// Offsets past the end are clamped to the end of the buffer.
    pub fn locate(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text.as_bytes()[..offset];
        let line = memchr_iter(b'\n', before).count() + 1;
        let line_start = memrchr(b'\n', before).map_or(0, |i| i + 1);
        let column = text[line_start..offset].chars().count() + 1;
        Location {
            offset,
            line,
            column,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "byte: {}, line: {}, column: {}",
            self.offset, self.line, self.column
        )
    }
}

/// Live view of the tokenizer's position.
///
/// A locator is a cheap handle that shares the document buffer and the
/// cursor with the tokenizer that created it. Handlers receive one before
/// `start_document` and may keep it to ask for the current line and column
/// from inside any later callback.
#[derive(Clone, Debug)]
pub struct Locator {
    text: Rc<str>,
    cursor: Rc<Cell<usize>>,
}

impl Locator {
    pub(crate) fn new(text: Rc<str>, cursor: Rc<Cell<usize>>) -> Self {
        Locator { text, cursor }
    }

    pub fn location(&self) -> Location {
        Location::locate(&self.text, self.cursor.get())
    }

    pub fn line_number(&self) -> usize {
        self.location().line
    }

    pub fn column_number(&self) -> usize {
        self.location().column
    }

    /// Always `None`: external entities are never resolved.
    pub fn public_id(&self) -> Option<&str> {
        None
    }

    /// Always `None`: external entities are never resolved.
    pub fn system_id(&self) -> Option<&str> {
        None
    }
}
