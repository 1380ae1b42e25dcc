//! URL Percent Codec
//!
//! Independent of the reader. Encodes query-string style: space becomes `+`,
//! unreserved ASCII passes through, everything else is `%XX`.

use std::borrow::Cow;

#[inline]
fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'~')
}

/// Percent-encode `input`
///
/// `/` is kept as-is unless `encode_slash` is set; bytes >= 0x80 are kept
/// as-is when `utf8_passthrough` is set.
pub fn url_encode(input: &str, encode_slash: bool, utf8_passthrough: bool) -> Cow<'_, str> {
    let passes = |b: u8| is_unreserved(b) || (b == b'/' && !encode_slash) || (b >= 0x80 && utf8_passthrough);

    let bytes = input.as_bytes();
    let Some(first) = bytes.iter().position(|&b| !passes(b)) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        let mut buf = [0u8; 4];
        let encoded = c.encode_utf8(&mut buf).as_bytes();
        if passes(encoded[0]) {
            out.push(c);
        } else if c == ' ' {
            out.push('+');
        } else {
            for &b in encoded {
                out.push('%');
                out.push(hex_digit(b >> 4));
                out.push(hex_digit(b & 0x0F));
            }
        }
    }
    Cow::Owned(out)
}

/// Decode `+` and `%XX` sequences; malformed escapes are kept literally
pub fn url_decode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'+' => {
                out.push(b' ');
                pos += 1;
            }
            b'%' => match (bytes.get(pos + 1).and_then(|&b| hex_value(b)), bytes.get(pos + 2).and_then(|&b| hex_value(b))) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    pos += 3;
                }
                _ => {
                    out.push(b'%');
                    pos += 1;
                }
            },
            b => {
                out.push(b);
                pos += 1;
            }
        }
    }

    match String::from_utf8(out) {
        Ok(s) => Cow::Owned(s),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

#[inline]
fn hex_digit(n: u8) -> char {
    char::from(b"0123456789ABCDEF"[usize::from(n)])
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
