//! RustySAX - Streaming XML parsing with SAX callbacks
//!
//! Two layers:
//! - [`Tokenizer`]: pull parser returning one token per call, enforcing
//!   well-formedness (balanced tags, single root, unique attributes,
//!   known entities)
//! - [`SaxDriver`]: pushes tokens into [`DocumentHandler`],
//!   [`LexicalHandler`] and [`ErrorHandler`] callbacks
//!
//! ```
//! use rustysax::sax::{parse_sax, SaxEvent};
//!
//! let events = parse_sax("<root attr=\"v&amp;1\">hi</root>").unwrap();
//! assert_eq!(events[2], SaxEvent::Characters("hi".to_string()));
//! ```

pub mod core;
pub mod sax;

pub use crate::core::attributes::{Attribute, Attributes};
pub use crate::core::encoding::{decode_bytes, EncodingError, XmlEncoding};
pub use crate::core::entities::{decode_text, encode_text};
pub use crate::core::error::{ErrorKind, ParseError};
pub use crate::core::location::{Location, Locator};
pub use crate::core::span::{Content, ContentSpan, Span};
pub use crate::core::tokenizer::{ParseState, Token, TokenKind, Tokenizer};
pub use crate::sax::{
    parse_sax, DocumentHandler, DriverState, ErrorHandler, LexicalHandler, SaxCollector,
    SaxDriver, SaxError, SaxEvent, SaxHandler,
};
