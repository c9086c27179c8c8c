//! SAX (Simple API for XML) Module
//!
//! Provides callback-based XML parsing on top of the core tokenizer.
//!
//! ## Architecture
//!
//! ```text
//! Tokenizer ---> SaxDriver ---> handlers (DocumentHandler, ErrorHandler, LexicalHandler)
//!                                   |
//!                                   v
//!                             SaxCollector ---> SaxEvent[]
//! ```
//!
//! ## Callbacks
//!
//! - `start_element` / `end_element` - element tags (empty tags produce both)
//! - `characters` - text, substituted entity references, CDATA content
//! - `processing_instruction` - PI target and data
//! - `start_cdata` / `end_cdata` / `comment` - lexical details
//! - `fatal_error` - malformed input, always the last callback

pub mod collector;
pub mod driver;
pub mod events;
pub mod handler;

pub use collector::SaxCollector;
pub use driver::{DriverState, SaxDriver, SaxError};
pub use events::SaxEvent;
pub use handler::{DocumentHandler, ErrorHandler, LexicalHandler, SaxHandler};

/// Parse `text` and return every callback as an owned event.
pub fn parse_sax(text: &str) -> Result<Vec<SaxEvent>, SaxError> {
    let mut collector = SaxCollector::new();
    let mut driver = SaxDriver::new();
    driver.register_handler(&mut collector);
    driver.parse(text)?;
    Ok(collector.take_events())
}
