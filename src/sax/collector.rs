//! SAX Collector
//!
//! A handler that plays every role and records each callback as an owned
//! [`SaxEvent`], for callers that want the events as a list.

use super::events::SaxEvent;
use super::handler::{DocumentHandler, ErrorHandler, LexicalHandler};
use crate::core::attributes::Attributes;
use crate::core::error::ParseError;
use crate::core::location::Locator;

/// Collector that gathers SAX events during parsing
#[derive(Debug, Default)]
pub struct SaxCollector {
    /// Collected events
    events: Vec<SaxEvent>,
    /// Locator handed over by the driver
    locator: Option<Locator>,
}

impl SaxCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create with estimated capacity
    pub fn with_capacity(events: usize) -> Self {
        Self {
            events: Vec::with_capacity(events),
            locator: None,
        }
    }

    /// Take the collected events
    pub fn take_events(&mut self) -> Vec<SaxEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[SaxEvent] {
        &self.events
    }

    /// Get number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// The locator of the last parse, if one was started
    pub fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    /// All character data received so far, concatenated
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                SaxEvent::Characters(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The fatal error that ended the last parse, if any
    pub fn failure(&self) -> Option<&ParseError> {
        self.events.iter().rev().find_map(|e| match e {
            SaxEvent::FatalError(err) => Some(err),
            _ => None,
        })
    }
}

impl DocumentHandler for SaxCollector {
    fn set_document_locator(&mut self, locator: Locator) {
        self.locator = Some(locator);
    }

    fn start_document(&mut self) {
        self.events.push(SaxEvent::StartDocument);
    }

    fn end_document(&mut self) {
        self.events.push(SaxEvent::EndDocument);
    }

    fn start_element(&mut self, name: &str, attributes: &Attributes) {
        self.events.push(SaxEvent::StartElement {
            name: name.to_string(),
            attributes: attributes.iter().cloned().collect(),
        });
    }

    fn end_element(&mut self, name: &str) {
        self.events.push(SaxEvent::EndElement {
            name: name.to_string(),
        });
    }

    fn characters(&mut self, text: &str, start: usize, length: usize) {
        let chunk = text.get(start..start + length).unwrap_or("");
        self.events.push(SaxEvent::Characters(chunk.to_string()));
    }

    fn processing_instruction(&mut self, target: &str, data: &str) {
        self.events.push(SaxEvent::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        });
    }
}

impl ErrorHandler for SaxCollector {
    fn fatal_error(&mut self, error: &ParseError) {
        self.events.push(SaxEvent::FatalError(error.clone()));
    }
}

impl LexicalHandler for SaxCollector {
    fn start_cdata(&mut self) {
        self.events.push(SaxEvent::StartCData);
    }

    fn end_cdata(&mut self) {
        self.events.push(SaxEvent::EndCData);
    }

    fn comment(&mut self, text: &str, start: usize, length: usize) {
        let chunk = text.get(start..start + length).unwrap_or("");
        self.events.push(SaxEvent::Comment(chunk.to_string()));
    }
}
