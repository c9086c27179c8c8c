//! Parse errors
//!
//! Every malformed-input condition maps to one [`ErrorKind`]. Messages live
//! in a constant table indexed by the kind, so no parser instance shares
//! mutable state with another.

use thiserror::Error;

use super::location::Location;

/// The distinct well-formedness failures the tokenizer reports.
///
/// All of them are terminal for the parse that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PiUnterminated,
    DtdUnterminated,
    CommentUnterminated,
    CDataUnterminated,
    TagUnterminated,
    EntityUnterminated,
    TagNameNotImmediate,
    TagNameLessThan,
    AttributeNameLessThan,
    AttributeValueLessThan,
    AttributeValueMissing,
    AttributeValueUnterminated,
    AttributeDuplicate,
    EntityUnknown,
    EmptyTagMalformed,
    /// The tokenizer produced a token without consuming input. Only a bug
    /// in the tokenizer itself can trip this.
    InfiniteLoop,
    DocumentStructure,
    ElementNesting,
}

const DESCRIPTIONS: [&str; 18] = [
    "processing instruction is not terminated by '?>'",
    "document type declaration is not terminated",
    "comment is not terminated by '-->'",
    "CDATA section is not terminated by ']]>'",
    "element tag is not terminated by '>'",
    "entity reference is not terminated by ';'",
    "element name must immediately follow '<'",
    "'<' is not allowed in element names",
    "'<' is not allowed in attribute names",
    "'<' is not allowed in attribute values",
    "attribute must have the form name=\"value\"",
    "attribute value is missing its closing quote",
    "attribute is specified more than once on the same element",
    "unknown entity reference",
    "empty element tag must end with '/>'",
    "tokenizer made no progress",
    "content is not allowed outside the single root element",
    "end tag does not match the open element",
];

impl ErrorKind {
    /// Human readable description of the error
    pub const fn description(self) -> &'static str {
        DESCRIPTIONS[self as usize]
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A fatal parse error with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {}, column {}", .location.line, .location.column)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub location: Location,
}

impl ParseError {
    pub fn new(kind: ErrorKind, location: Location) -> Self {
        ParseError { kind, location }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.kind.description()
    }

    pub fn location(&self) -> Location {
        self.location
    }
}
