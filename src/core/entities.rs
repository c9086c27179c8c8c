//! XML Entity Decoding
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::{memchr, memchr3};
use std::borrow::Cow;

use super::error::ErrorKind;

/// Decode a single entity reference (without `&` and `;`)
///
/// Only the five predefined entities and numeric character references are
/// known. Numeric references must denote a Unicode scalar value.
pub fn decode_entity(entity: &str) -> Option<char> {
    if let Some(digits) = entity.strip_prefix('#') {
        return decode_numeric_entity(digits);
    }

    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Decode a numeric character reference (the part after `#`)
fn decode_numeric_entity(digits: &str) -> Option<char> {
    let codepoint = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => parse_digits(hex, 16)?,
        None => parse_digits(digits, 10)?,
    };
    char::from_u32(codepoint)
}

fn parse_digits(digits: &str, radix: u32) -> Option<u32> {
    // from_str_radix accepts a leading '+', references do not
    if digits.is_empty() || !digits.bytes().all(|b| (b as char).is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Substitute every entity reference in `input`.
///
/// Returns Borrowed if no entities present (zero-copy). A reference without
/// its closing `;` is [`ErrorKind::EntityUnterminated`], an unknown name is
/// [`ErrorKind::EntityUnknown`].
pub fn decode_text(input: &str) -> Result<Cow<'_, str>, ErrorKind> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        result.push_str(&rest[..amp]);
        let reference = &rest[amp + 1..];

        let semi = match memchr3(b';', b'&', b'<', reference.as_bytes()) {
            Some(i) if reference.as_bytes()[i] == b';' => i,
            _ => return Err(ErrorKind::EntityUnterminated),
        };

        let c = decode_entity(&reference[..semi]).ok_or(ErrorKind::EntityUnknown)?;
        result.push(c);
        rest = &reference[semi + 1..];
    }

    result.push_str(rest);
    Ok(Cow::Owned(result))
}

/// Escape the five predefined entities
///
/// Returns Borrowed if nothing needs escaping.
pub fn encode_text(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| matches!(b, b'<' | b'>' | b'&' | b'"' | b'\'')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
