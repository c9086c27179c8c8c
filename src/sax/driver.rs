//! SAX Driver
//!
//! Pulls tokens from a [`Tokenizer`] and turns them into handler callbacks.
//!
//! ```text
//! Tokenizer ---> SaxDriver ---> DocumentHandler
//!                    |--------> LexicalHandler
//!                    '--------> ErrorHandler
//! ```
//!
//! Handlers are borrowed for the driver's lifetime. One object can fill
//! every role through [`SaxDriver::register_handler`]; a handler registered
//! for a single role takes precedence over it for that role.

use log::{debug, trace, warn};
use thiserror::Error;

use super::handler::{DocumentHandler, ErrorHandler, LexicalHandler, SaxHandler};
use crate::core::encoding::{decode_bytes, EncodingError};
use crate::core::error::ParseError;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};

/// Why [`SaxDriver::parse`] did not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaxError {
    #[error("no document handler registered")]
    MissingDocumentHandler,
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Lifecycle of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// No parse has run yet
    #[default]
    Idle,
    /// A parse is running; only visible from inside a callback
    Parsing,
    /// The last parse reached the end of the document
    Done,
    /// The last parse stopped on an error
    Errored,
}

/// Event dispatcher over borrowed handlers
#[derive(Default)]
pub struct SaxDriver<'h> {
    document: Option<&'h mut dyn DocumentHandler>,
    errors: Option<&'h mut dyn ErrorHandler>,
    lexical: Option<&'h mut dyn LexicalHandler>,
    /// Fallback for every role
    unified: Option<&'h mut dyn SaxHandler>,
    state: DriverState,
}

impl<'h> SaxDriver<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_document_handler(&mut self, handler: &'h mut dyn DocumentHandler) {
        self.document = Some(handler);
    }

    pub fn register_error_handler(&mut self, handler: &'h mut dyn ErrorHandler) {
        self.errors = Some(handler);
    }

    pub fn register_lexical_handler(&mut self, handler: &'h mut dyn LexicalHandler) {
        self.lexical = Some(handler);
    }

    /// Install one handler in all three roles
    pub fn register_handler(&mut self, handler: &'h mut dyn SaxHandler) {
        self.unified = Some(handler);
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Parse a complete document held in memory.
    ///
    /// The document handler receives `set_document_locator` and
    /// `start_document` first, then one callback per construct, then
    /// `end_document`. On malformed input the error handler's
    /// `fatal_error` is the last callback and the error is returned.
    pub fn parse(&mut self, text: &str) -> Result<(), SaxError> {
        if self.document_handler().is_none() {
            return Err(SaxError::MissingDocumentHandler);
        }

        debug!("sax parse started: {} bytes", text.len());
        self.state = DriverState::Parsing;

        let result = self.run(Tokenizer::new(text));
        self.state = match result {
            Ok(()) => DriverState::Done,
            Err(_) => DriverState::Errored,
        };

        debug!("sax parse finished: {:?}", self.state);
        result
    }

    /// Parse raw bytes in UTF-8 or UTF-16 (either byte order).
    ///
    /// Undecodable input fails before any callback is made.
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<(), SaxError> {
        let text = decode_bytes(bytes)?;
        self.parse(&text)
    }

    fn run(&mut self, tokenizer: Tokenizer) -> Result<(), SaxError> {
        let text = tokenizer.shared_text();

        if let Some(handler) = self.document_handler() {
            handler.set_document_locator(tokenizer.locator());
            handler.start_document();
        }

        for result in tokenizer {
            match result {
                Ok(token) => self.dispatch(&token, &text),
                Err(error) => {
                    self.report_fatal(&error);
                    return Err(SaxError::Parse(error));
                }
            }
        }

        if let Some(handler) = self.document_handler() {
            handler.end_document();
        }
        Ok(())
    }

    fn dispatch(&mut self, token: &Token, text: &str) {
        trace!("token {:?} at {}..{}", token.kind, token.span.offset, token.span.end());

        match token.kind {
            TokenKind::StartTag => {
                if let Some(handler) = self.document_handler() {
                    handler.start_element(token.name(text), token.attributes());
                }
            }
            TokenKind::EmptyTag => {
                if let Some(handler) = self.document_handler() {
                    let name = token.name(text);
                    handler.start_element(name, token.attributes());
                    handler.end_element(name);
                }
            }
            TokenKind::EndTag => {
                if let Some(handler) = self.document_handler() {
                    handler.end_element(token.name(text));
                }
            }
            TokenKind::Text | TokenKind::Entity => self.characters(token, text),
            TokenKind::ProcessingInstruction => {
                if let Some(handler) = self.document_handler() {
                    handler.processing_instruction(token.name(text), token.content(text).as_str());
                }
            }
            TokenKind::CData => {
                if let Some(handler) = self.lexical_handler() {
                    handler.start_cdata();
                }
                self.characters(token, text);
                if let Some(handler) = self.lexical_handler() {
                    handler.end_cdata();
                }
            }
            TokenKind::Comment => {
                if let Some(handler) = self.lexical_handler() {
                    let content = token.content(text);
                    handler.comment(content.source, content.begin, content.len());
                }
            }
            // DOCTYPE has no callback; the iterator ends before Error and Eof
            TokenKind::DocType | TokenKind::Error | TokenKind::Eof => {}
        }
    }

    fn characters(&mut self, token: &Token, text: &str) {
        if let Some(handler) = self.document_handler() {
            let content = token.content(text);
            handler.characters(content.source, content.begin, content.len());
        }
    }

    fn report_fatal(&mut self, error: &ParseError) {
        match self.error_handler() {
            Some(handler) => handler.fatal_error(error),
            None => warn!("sax parse failed with no error handler registered: {}", error),
        }
    }

    fn document_handler(&mut self) -> Option<&mut (dyn DocumentHandler + 'h)> {
        match (&mut self.document, &mut self.unified) {
            (Some(handler), _) => Some(&mut **handler),
            (None, Some(handler)) => {
                let handler: &mut (dyn DocumentHandler + 'h) = &mut **handler;
                Some(handler)
            }
            (None, None) => None,
        }
    }

    fn error_handler(&mut self) -> Option<&mut (dyn ErrorHandler + 'h)> {
        match (&mut self.errors, &mut self.unified) {
            (Some(handler), _) => Some(&mut **handler),
            (None, Some(handler)) => {
                let handler: &mut (dyn ErrorHandler + 'h) = &mut **handler;
                Some(handler)
            }
            (None, None) => None,
        }
    }

    fn lexical_handler(&mut self) -> Option<&mut (dyn LexicalHandler + 'h)> {
        match (&mut self.lexical, &mut self.unified) {
            (Some(handler), _) => Some(&mut **handler),
            (None, Some(handler)) => {
                let handler: &mut (dyn LexicalHandler + 'h) = &mut **handler;
                Some(handler)
            }
            (None, None) => None,
        }
    }
}
