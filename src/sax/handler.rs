//! SAX handler interfaces
//!
//! The driver talks to up to three handler roles. Only the document handler
//! is mandatory; the error and lexical roles are optional and every method
//! on them has a no-op default.
//!
//! Text arrives as `(source, start, length)`: `source[start..start + length]`
//! is the payload, and nothing may be assumed about `source` past that
//! range.

use crate::core::attributes::Attributes;
use crate::core::error::ParseError;
use crate::core::location::Locator;

/// Receives the logical content of the document
pub trait DocumentHandler {
    /// Called once before `start_document`.
    ///
    /// The locator stays valid for the whole parse and reports the
    /// position just past the construct being reported.
    fn set_document_locator(&mut self, _locator: Locator) {}

    /// Called once before any other content callback
    fn start_document(&mut self) {}

    /// Called once after the root element closed; never after an error
    fn end_document(&mut self) {}

    /// Called for start and empty element tags
    ///
    /// # Arguments
    /// * `name` - Element name, including any namespace prefix
    /// * `attributes` - Entity-decoded attributes; only valid for this call
    fn start_element(&mut self, name: &str, attributes: &Attributes);

    /// Called for end tags, and right after `start_element` for empty tags
    fn end_element(&mut self, name: &str);

    /// Called for text, entity references and CDATA content
    fn characters(&mut self, text: &str, start: usize, length: usize);

    /// Called for processing instructions, the XML declaration included
    fn processing_instruction(&mut self, _target: &str, _data: &str) {}
}

/// Receives error notifications
pub trait ErrorHandler {
    /// Non-fatal problems. The driver never reports any; available to
    /// handlers for their own diagnostics.
    fn error(&mut self, _error: &ParseError) {}

    /// Called once when the parse stops on malformed input
    fn fatal_error(&mut self, _error: &ParseError) {}
}

/// Receives lexical details that carry no document content
pub trait LexicalHandler {
    /// Called before the `characters` call for a CDATA section
    fn start_cdata(&mut self) {}

    /// Called after the `characters` call for a CDATA section
    fn end_cdata(&mut self) {}

    /// Called for comments, `<!--` and `-->` excluded
    fn comment(&mut self, _text: &str, _start: usize, _length: usize) {}
}

/// A handler that plays every role
///
/// Implemented for anything that implements the three role traits, so a
/// single object can be registered with
/// [`SaxDriver::register_handler`](super::driver::SaxDriver::register_handler).
pub trait SaxHandler: DocumentHandler + ErrorHandler + LexicalHandler {}

impl<T: DocumentHandler + ErrorHandler + LexicalHandler + ?Sized> SaxHandler for T {}
