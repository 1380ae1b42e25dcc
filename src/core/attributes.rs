//! XML Attribute Spans
//!
//! Attributes are kept as raw slices of the input. Values are entity-decoded
//! only when asked for.

use super::entities::decode_str;
use memchr::memchr;
use std::borrow::Cow;
use std::fmt;

/// A raw `name=value` pair borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a [u8],
    /// Undecoded value, without quotes; empty for bare `name`
    pub value: AttributeValue<'a>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: &'a [u8]) -> Self {
        Attribute {
            name,
            value: AttributeValue::new(value),
        }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.name).ok()
    }

    /// Exact, case-sensitive comparison on raw bytes
    #[inline]
    pub fn is_named(&self, name: &[u8]) -> bool {
        self.name == name
    }

    /// Namespace prefix (before colon), if any
    pub fn prefix(&self) -> Option<&'a [u8]> {
        memchr(b':', self.name).map(|pos| &self.name[..pos])
    }

    /// Local name (after colon)
    pub fn local_name(&self) -> &'a [u8] {
        match memchr(b':', self.name) {
            Some(pos) => &self.name[pos + 1..],
            None => self.name,
        }
    }
}

/// An attribute value that is decoded on demand
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AttributeValue<'a> {
    raw: &'a [u8],
}

impl<'a> AttributeValue<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        AttributeValue { raw }
    }

    /// The undecoded bytes as they appear in the input
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Entity-decoded value (borrowed when nothing needed decoding)
    pub fn decode(&self) -> Cow<'a, str> {
        decode_str(self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Debug for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.raw))
    }
}

impl fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

impl From<AttributeValue<'_>> for String {
    fn from(value: AttributeValue<'_>) -> Self {
        value.decode().into_owned()
    }
}

/// First attribute with the given name, in document order
pub fn find_attribute<'a, 'b>(attrs: &'b [Attribute<'a>], name: &[u8]) -> Option<&'b Attribute<'a>> {
    attrs.iter().find(|a| a.is_named(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_decode() {
        let attr = Attribute::new(b"baz", b"&lt;&amp;&gt;");
        assert_eq!(attr.value.raw(), b"&lt;&amp;&gt;");
        assert_eq!(attr.value.decode(), "<&>");
        assert_eq!(attr.value.to_string(), "<&>");
    }

    #[test]
    fn test_borrowed_when_plain() {
        let attr = Attribute::new(b"id", b"main");
        assert!(matches!(attr.value.decode(), Cow::Borrowed("main")));
    }

    #[test]
    fn test_namespaced_attribute() {
        let attr = Attribute::new(b"xmlns:xlink", b"http://www.w3.org/1999/xlink");
        assert_eq!(attr.name_str(), Some("xmlns:xlink"));
        assert_eq!(attr.prefix(), Some(b"xmlns" as &[u8]));
        assert_eq!(attr.local_name(), b"xlink");
    }

    #[test]
    fn test_find_is_case_sensitive_and_first_wins() {
        let attrs = [
            Attribute::new(b"id", b"1"),
            Attribute::new(b"ID", b"2"),
            Attribute::new(b"id", b"3"),
        ];
        assert_eq!(find_attribute(&attrs, b"id").map(|a| a.value.decode()), Some("1".into()));
        assert_eq!(find_attribute(&attrs, b"ID").map(|a| a.value.decode()), Some("2".into()));
        assert!(find_attribute(&attrs, b"Id").is_none());
    }
}
