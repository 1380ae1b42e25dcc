//! XML Entity Codec
//!
//! Decoding handles:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Anything else between `&` and `;` decodes to nothing. Both directions use
//! Cow so input without entities (or without escapable characters) is never
//! copied.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode entity references and convert to a string (invalid UTF-8 is replaced)
pub fn decode_str(input: &[u8]) -> Cow<'_, str> {
    match decode_text(input) {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
        Cow::Owned(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Cow::Owned(s),
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
    }
}

/// Decode all entity references in the input
pub fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    decode_into(input, &mut result);
    result
}

/// Decode entity references, appending to `out`
pub fn decode_into(input: &[u8], out: &mut Vec<u8>) {
    let mut pos = 0;

    while pos < input.len() {
        let Some(amp_offset) = memchr(b'&', &input[pos..]) else {
            out.extend_from_slice(&input[pos..]);
            return;
        };
        out.extend_from_slice(&input[pos..pos + amp_offset]);
        pos += amp_offset;

        let Some(semi_offset) = memchr(b';', &input[pos..]) else {
            // No terminator anywhere after '&': keep the remainder as-is
            out.extend_from_slice(&input[pos..]);
            return;
        };

        let entity = &input[pos + 1..pos + semi_offset];
        if let Some(c) = decode_entity(entity) {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        pos += semi_offset + 1;
    }
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<char> {
    match entity {
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', digits @ ..] => decode_numeric_entity(digits),
        _ => None,
    }
}

/// Decode a numeric character reference (the part after `#`)
fn decode_numeric_entity(entity: &[u8]) -> Option<char> {
    let codepoint = match entity {
        [b'x' | b'X', hex @ ..] => {
            let hex = std::str::from_utf8(hex).ok()?;
            u32::from_str_radix(hex, 16).ok()?
        }
        _ => {
            let dec = std::str::from_utf8(entity).ok()?;
            dec.parse::<u32>().ok()?
        }
    };
    char::from_u32(codepoint)
}

/// Encode text for XML output, passing non-ASCII characters through
#[inline]
pub fn encode_text(input: &str) -> Cow<'_, str> {
    encode_text_with(input, true)
}

/// Encode text for XML output
///
/// The five markup characters become named entities, control characters other
/// than tab and newline become numeric references. Non-ASCII characters are
/// numerically escaped unless `utf8_passthrough` is set.
pub fn encode_text_with(input: &str, utf8_passthrough: bool) -> Cow<'_, str> {
    let Some(first) = input.bytes().position(|b| needs_escape(b, utf8_passthrough)) else {
        return Cow::Borrowed(input);
    };

    let mut result = String::with_capacity(input.len() + 16);
    result.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            '\t' | '\n' => result.push(c),
            c if (c as u32) < 0x20 || (!c.is_ascii() && !utf8_passthrough) => {
                result.push_str("&#");
                result.push_str(&(c as u32).to_string());
                result.push(';');
            }
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[inline]
fn needs_escape(b: u8, utf8_passthrough: bool) -> bool {
    match b {
        b'&' | b'<' | b'>' | b'"' | b'\'' => true,
        b'\t' | b'\n' => false,
        0x00..=0x1F => true,
        0x80..=0xFF => !utf8_passthrough,
        _ => false,
    }
}
