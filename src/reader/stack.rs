//! Ancestry Path Stack
//!
//! One [`TagFrame`] per open element, bottom frame is a sentinel root with an
//! empty path. Frames hold raw spans into the input; nothing is decoded until
//! a caller asks for text or attribute values.

use crate::core::attributes::Attribute;
use crate::core::entities::{decode_into, decode_text};
use std::borrow::Cow;

/// What a character fragment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharKind {
    /// Plain character run; entity-decoded on read
    Text,
    /// CDATA section body; passed through verbatim
    CData,
    /// Comment body; dropped when text is materialized
    Comment,
}

/// A tagged, undecoded slice of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharPart<'a> {
    pub kind: CharKind,
    pub raw: &'a [u8],
}

impl<'a> CharPart<'a> {
    pub fn new(kind: CharKind, raw: &'a [u8]) -> Self {
        CharPart { kind, raw }
    }

    /// Content this fragment contributes to the element text
    pub fn decode(&self) -> Cow<'a, [u8]> {
        match self.kind {
            CharKind::Text => decode_text(self.raw),
            CharKind::CData => Cow::Borrowed(self.raw),
            CharKind::Comment => Cow::Borrowed(b""),
        }
    }
}

/// One open element on the stack
#[derive(Debug, Default)]
pub struct TagFrame<'a> {
    path: String,
    attributes: Vec<Attribute<'a>>,
    chars: Vec<CharPart<'a>>,
}

impl<'a> TagFrame<'a> {
    fn new(path: String, attributes: Vec<Attribute<'a>>) -> Self {
        TagFrame {
            path,
            attributes,
            chars: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    /// Fragments recorded for this element, in document order
    pub fn chars(&self) -> &[CharPart<'a>] {
        &self.chars
    }

    /// Concatenated text: entities decoded, CDATA verbatim, comments elided
    pub fn text(&self) -> String {
        let len = self.chars.iter().map(|part| part.raw.len()).sum();
        let mut bytes = Vec::with_capacity(len);
        for part in &self.chars {
            match part.kind {
                CharKind::Text => decode_into(part.raw, &mut bytes),
                CharKind::CData => bytes.extend_from_slice(part.raw),
                CharKind::Comment => {}
            }
        }
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// True when `path` ends with `/name`
    fn closes(&self, name: &str) -> bool {
        self.path
            .strip_suffix(name)
            .is_some_and(|prefix| prefix.ends_with('/'))
    }
}

/// Stack of open elements; never empty
#[derive(Debug)]
pub struct PathStack<'a> {
    frames: Vec<TagFrame<'a>>,
}

impl<'a> PathStack<'a> {
    pub fn new() -> Self {
        let mut frames = Vec::with_capacity(16);
        frames.push(TagFrame::default());
        PathStack { frames }
    }

    /// Number of frames, sentinel included
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost frame
    #[inline]
    pub fn current(&self) -> &TagFrame<'a> {
        &self.frames[self.frames.len() - 1]
    }

    #[inline]
    fn current_mut(&mut self) -> &mut TagFrame<'a> {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    #[inline]
    pub fn path(&self) -> &str {
        self.current().path()
    }

    /// Open an element below the current one
    pub fn push(&mut self, name: &[u8], attributes: Vec<Attribute<'a>>) {
        let name = String::from_utf8_lossy(name);
        let parent = self.path();
        let mut path = String::with_capacity(parent.len() + 1 + name.len());
        path.push_str(parent);
        path.push('/');
        path.push_str(&name);
        self.frames.push(TagFrame::new(path, attributes));
    }

    /// Push a frame whose path is just `name`, for declarations
    pub fn push_transient(&mut self, name: &[u8], attributes: Vec<Attribute<'a>>) {
        let path = String::from_utf8_lossy(name).into_owned();
        self.frames.push(TagFrame::new(path, attributes));
    }

    /// Drop the innermost frame; the sentinel is never removed
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Index of the innermost frame closed by `</name>`, searching downward
    pub fn find_closing(&self, name: &[u8]) -> Option<usize> {
        let name = String::from_utf8_lossy(name);
        (1..self.frames.len())
            .rev()
            .find(|&i| self.frames[i].closes(&name))
    }

    /// Drop frame `index` and everything above it
    pub fn truncate(&mut self, index: usize) {
        self.frames.truncate(index.max(1));
    }

    /// Record a fragment on the innermost frame; empty fragments are skipped
    pub fn append_chars(&mut self, kind: CharKind, raw: &'a [u8]) {
        if !raw.is_empty() {
            self.current_mut().chars.push(CharPart::new(kind, raw));
        }
    }
}

impl Default for PathStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let mut stack = PathStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.path(), "");

        stack.push(b"hoge", Vec::new());
        stack.push(b"fuga", Vec::new());
        assert_eq!(stack.path(), "/hoge/fuga");
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn test_sentinel_is_never_popped() {
        let mut stack = PathStack::new();
        stack.pop();
        stack.pop();
        stack.truncate(0);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_find_closing_skips_partial_names() {
        let mut stack = PathStack::new();
        stack.push(b"a", Vec::new());
        stack.push(b"bc", Vec::new());
        stack.push(b"c", Vec::new());
        assert_eq!(stack.find_closing(b"c"), Some(3));
        assert_eq!(stack.find_closing(b"bc"), Some(2));
        assert_eq!(stack.find_closing(b"a"), Some(1));
        assert_eq!(stack.find_closing(b"b"), None);
    }

    #[test]
    fn test_find_closing_picks_innermost() {
        let mut stack = PathStack::new();
        stack.push(b"item", Vec::new());
        stack.push(b"item", Vec::new());
        assert_eq!(stack.find_closing(b"item"), Some(2));
    }

    #[test]
    fn test_text_concatenation() {
        let mut stack = PathStack::new();
        stack.push(b"fuga", Vec::new());
        stack.append_chars(CharKind::Text, b"He");
        stack.append_chars(CharKind::Comment, b"llo, wor");
        stack.append_chars(CharKind::Text, b"ld &amp; ");
        stack.append_chars(CharKind::CData, b"<raw &amp;>");
        stack.append_chars(CharKind::Text, b"");
        assert_eq!(stack.current().chars().len(), 4);
        assert_eq!(stack.current().text(), "Held & <raw &amp;>");
    }

    #[test]
    fn test_transient_frame() {
        let mut stack = PathStack::new();
        stack.push(b"root", Vec::new());
        stack.push_transient(b"?pi", Vec::new());
        assert_eq!(stack.path(), "?pi");
        stack.pop();
        assert_eq!(stack.path(), "/root");
    }

    #[test]
    fn test_char_part_decode() {
        assert_eq!(CharPart::new(CharKind::Text, b"&lt;").decode().as_ref(), b"<");
        assert_eq!(CharPart::new(CharKind::CData, b"&lt;").decode().as_ref(), b"&lt;");
        assert!(CharPart::new(CharKind::Comment, b"x").decode().is_empty());
    }
}
