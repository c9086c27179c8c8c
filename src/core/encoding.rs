//! Input preparation
//!
//! Detects UTF-8 and UTF-16 input by byte order mark or byte pattern and
//! converts it to text, then normalizes line endings so every offset, line
//! and column the tokenizer reports refers to `\n`-only text.

use std::borrow::Cow;

use memchr::memchr;
use thiserror::Error;

const UTF8_BOM: &str = "\u{FEFF}";

/// Detected encoding of raw XML input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Failure to turn raw bytes into text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("invalid UTF-8 input: {0}")]
    InvalidUtf8(String),
    #[error("invalid {0:?} input: odd number of bytes")]
    OddLength(XmlEncoding),
    #[error("invalid {0:?} input: {1}")]
    InvalidUtf16(XmlEncoding, String),
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        if input.len() < 2 {
            return XmlEncoding::Utf8;
        }

        match (input[0], input[1]) {
            // UTF-16 LE BOM: 0xFF 0xFE
            (0xFF, 0xFE) => XmlEncoding::Utf16Le,
            // UTF-16 BE BOM: 0xFE 0xFF
            (0xFE, 0xFF) => XmlEncoding::Utf16Be,
            // No BOM - check for UTF-16 pattern (< followed by null or null followed by <)
            (0x00, b'<') => XmlEncoding::Utf16Be,
            (b'<', 0x00) => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }
}

/// Convert raw bytes to text.
///
/// A UTF-8 byte order mark is left in place; [`prepare_text`] strips it.
pub fn decode_bytes(input: &[u8]) -> Result<Cow<'_, str>, EncodingError> {
    match XmlEncoding::detect(input) {
        XmlEncoding::Utf8 => std::str::from_utf8(input)
            .map(Cow::Borrowed)
            .map_err(|e| EncodingError::InvalidUtf8(e.to_string())),
        encoding @ XmlEncoding::Utf16Le => {
            decode_utf16(input, encoding, [0xFF, 0xFE], u16::from_le_bytes).map(Cow::Owned)
        }
        encoding @ XmlEncoding::Utf16Be => {
            decode_utf16(input, encoding, [0xFE, 0xFF], u16::from_be_bytes).map(Cow::Owned)
        }
    }
}

fn decode_utf16(
    input: &[u8],
    encoding: XmlEncoding,
    bom: [u8; 2],
    unit: fn([u8; 2]) -> u16,
) -> Result<String, EncodingError> {
    let bytes = input.strip_prefix(&bom[..]).unwrap_or(input);

    if bytes.len() % 2 != 0 {
        return Err(EncodingError::OddLength(encoding));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| unit([chunk[0], chunk[1]]))
        .collect();

    String::from_utf16(&code_units).map_err(|e| EncodingError::InvalidUtf16(encoding, e.to_string()))
}

/// Replace every `\r\n` and bare `\r` with `\n`.
///
/// Borrows when the text has no carriage returns.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if memchr(b'\r', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = memchr(b'\r', rest.as_bytes()) {
        out.push_str(&rest[..i]);
        out.push('\n');
        rest = &rest[i + 1..];
        if let Some(after) = rest.strip_prefix('\n') {
            rest = after;
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Strip a leading byte order mark and normalize line endings.
pub fn prepare_text(text: &str) -> Cow<'_, str> {
    normalize_newlines(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(XmlEncoding::detect(b"<a/>"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xFF, 0xFE, b'<', 0]), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(&[0, b'<', 0, b'a']), XmlEncoding::Utf16Be);
        assert_eq!(XmlEncoding::detect(b"<"), XmlEncoding::Utf8);
    }

    #[test]
    fn test_decode_utf16_le() {
        let bytes: Vec<u8> = "<a/>"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(decode_bytes(&bytes).unwrap(), "<a/>");
    }

    #[test]
    fn test_decode_utf16_be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend("<a>é</a>".encode_utf16().flat_map(|u| u.to_be_bytes()));
        assert_eq!(decode_bytes(&bytes).unwrap(), "<a>é</a>");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_bytes(&[0xFF, 0xFE, b'<']),
            Err(EncodingError::OddLength(XmlEncoding::Utf16Le))
        ));
        assert!(matches!(
            decode_bytes(&[b'<', b'a', 0xC3]),
            Err(EncodingError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_normalize_newlines() {
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
        assert_eq!(normalize_newlines("a\r\nb\rc\r\r\nd"), "a\nb\nc\n\nd");
        assert_eq!(normalize_newlines("\r"), "\n");
    }

    #[test]
    fn test_prepare_text_strips_bom() {
        assert_eq!(prepare_text("\u{FEFF}<a/>\r\n"), "<a/>\n");
    }
}
