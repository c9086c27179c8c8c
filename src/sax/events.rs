//! SAX Event Types
//!
//! Owned records of the callbacks made during SAX-style XML parsing.

use crate::core::attributes::Attribute;
use crate::core::error::ParseError;

/// A SAX parsing event
///
/// Events own their strings so they outlive the parse that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum SaxEvent {
    StartDocument,

    EndDocument,

    /// Start of an element (also emitted for empty elements)
    StartElement {
        name: String,
        /// Attributes in document order, values entity-decoded
        attributes: Vec<Attribute>,
    },

    /// End of an element
    EndElement { name: String },

    /// Character data: text, one substituted entity, or CDATA content
    Characters(String),

    /// Processing instruction
    ProcessingInstruction { target: String, data: String },

    /// Start of a CDATA section
    StartCData,

    /// End of a CDATA section
    EndCData,

    /// Comment content (excluding markers)
    Comment(String),

    /// The error that stopped the parse
    FatalError(ParseError),
}

impl SaxEvent {
    /// Check if this is a start element event
    #[inline]
    pub fn is_start_element(&self) -> bool {
        matches!(self, SaxEvent::StartElement { .. })
    }

    /// Check if this is an end element event
    #[inline]
    pub fn is_end_element(&self) -> bool {
        matches!(self, SaxEvent::EndElement { .. })
    }

    /// Check if this is character data
    #[inline]
    pub fn is_characters(&self) -> bool {
        matches!(self, SaxEvent::Characters(_))
    }

    /// Element name for start/end element events
    pub fn element_name(&self) -> Option<&str> {
        match self {
            SaxEvent::StartElement { name, .. } | SaxEvent::EndElement { name } => Some(name),
            _ => None,
        }
    }
}
