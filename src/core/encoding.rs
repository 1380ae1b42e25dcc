//! Input Encoding Detection
//!
//! The reader works on UTF-8 (or ASCII-compatible) bytes. A UTF-8 byte order
//! mark is skipped; UTF-16 input is detected so callers can report it, but is
//! not converted.

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encoding guessed from the byte order mark or the first bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            _ => XmlEncoding::Utf8,
        }
    }
}

/// Input without a leading UTF-8 byte order mark
#[inline]
pub fn strip_utf8_bom(input: &[u8]) -> &[u8] {
    input.strip_prefix(UTF8_BOM).unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(XmlEncoding::detect(b"<a/>"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xEF, 0xBB, 0xBF, b'<']), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xFF, 0xFE, b'<', 0]), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(&[0, b'<', 0, b'a']), XmlEncoding::Utf16Be);
        assert_eq!(XmlEncoding::detect(b""), XmlEncoding::Utf8);
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_utf8_bom(&[0xEF, 0xBB, 0xBF, b'<', b'a']), b"<a");
        assert_eq!(strip_utf8_bom(b"<a"), b"<a");
    }
}
