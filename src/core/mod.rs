//! Core XML parsing primitives
//!
//! This module contains the fundamental building blocks for XML parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: State machine for XML token extraction
//! - Entities: XML entity decoding with Cow (zero-copy when possible)
//! - Attributes: Ordered attribute storage and value normalization
//! - Encoding: UTF-16 detection, BOM and line ending normalization
//! - Error: Well-formedness error kinds and messages
//! - Location: Line/column computation and the live Locator
//! - Span: Offsets into the normalized buffer

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod error;
pub mod location;
pub mod scanner;
pub mod span;
pub mod tokenizer;
