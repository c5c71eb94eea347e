//! XML Entity Decoding
//!
//! Handles decoding of XML entities in text and attribute values:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! The five built-in entities are replaced first, then numeric references
//! are scanned. The order is observable: `&amp;#65;` decodes to `A`.
//! Uses Cow for zero-copy when no ampersand is present.

use memchr::memchr;
use std::borrow::Cow;

use crate::error::ParseError;

const PREDEFINED: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&gt;", ">"),
    ("&lt;", "<"),
    ("&apos;", "'"),
    ("&quot;", "\""),
];

/// Replace predefined entities and numeric character references
///
/// Returns Borrowed if no `&` is present.
pub fn unescape(input: &str) -> Result<Cow<'_, str>, ParseError> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut replaced = input.to_string();
    for (entity, text) in PREDEFINED {
        if replaced.contains(entity) {
            replaced = replaced.replace(entity, text);
        }
    }

    decode_char_refs(&replaced).map(Cow::Owned)
}

/// Replace every `&#DDD;` / `&#xHHH;` in the input
fn decode_char_refs(input: &str) -> Result<String, ParseError> {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(amp_offset) = memchr(b'&', &bytes[pos..]) {
        let start = pos + amp_offset;
        match match_char_ref(&bytes[start..]) {
            Some((len, is_hex, digits)) => {
                result.push_str(&input[copied..start]);
                result.push(parse_char_ref(digits, is_hex)?);
                copied = start + len;
                pos = copied;
            }
            None => pos = start + 1,
        }
    }

    result.push_str(&input[copied..]);
    Ok(result)
}

/// Match `&#x?[0-9a-fA-F]+;` at the start of the input
///
/// Returns (matched length, hexadecimal, digit bytes).
fn match_char_ref(input: &[u8]) -> Option<(usize, bool, &[u8])> {
    if !input.starts_with(b"&#") {
        return None;
    }
    let is_hex = input.get(2) == Some(&b'x');
    let digits_start = if is_hex { 3 } else { 2 };
    let digits_len = input[digits_start..]
        .iter()
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    let digits_end = digits_start + digits_len;

    if digits_len == 0 || input.get(digits_end) != Some(&b';') {
        return None;
    }
    Some((digits_end + 1, is_hex, &input[digits_start..digits_end]))
}

/// Decode the payload of a character reference into a char
fn parse_char_ref(digits: &[u8], is_hex: bool) -> Result<char, ParseError> {
    let invalid = || {
        let digits = String::from_utf8_lossy(digits);
        ParseError::InvalidCharacterReference(if is_hex {
            format!("&#x{};", digits)
        } else {
            format!("&#{};", digits)
        })
    };

    // digits were matched as ASCII hex digits
    let text = std::str::from_utf8(digits).map_err(|_| invalid())?;
    let radix = if is_hex { 16 } else { 10 };
    let codepoint = u32::from_str_radix(text, radix).map_err(|_| invalid())?;
    char::from_u32(codepoint).ok_or_else(invalid)
}
