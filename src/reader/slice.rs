//! Pull Reader over a Byte Slice
//!
//! Wraps the tokenizer with the ancestry path stack and the nest/hold
//! controller. Each `next()` moves to one event; the event's name, path,
//! attributes and text are then read from the reader. All of them borrow from
//! the input and stay valid until the next call.

use super::events::{Event, EventKind};
use super::nest::NestMarks;
use super::stack::{CharKind, CharPart, PathStack};
use crate::core::attributes::{find_attribute, Attribute, AttributeValue};
use crate::core::encoding::{strip_utf8_bom, XmlEncoding};
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::{ParseError, ParseErrorKind};
use std::borrow::Cow;
use tracing::{debug, trace};

/// What to do with an end tag that closes no open element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedEndTag {
    /// Report `EndElement` and leave the stack untouched
    ///
    /// The stray end tag is reported under the enclosing element's path, so
    /// in `<a><b></c></b></a>` both `</c>` and `</b>` satisfy
    /// `match_end("/a/b")`. Check [`SliceReader::name`] as well to tell them
    /// apart.
    #[default]
    Ignore,
    /// Enter the `Error` state
    Error,
}

/// Reader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderOptions {
    pub unmatched_end_tag: UnmatchedEndTag,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject end tags without a matching start tag
    pub fn strict() -> Self {
        Self::new().unmatched_end_tag(UnmatchedEndTag::Error)
    }

    pub fn unmatched_end_tag(mut self, policy: UnmatchedEndTag) -> Self {
        self.unmatched_end_tag = policy;
        self
    }
}

/// Stack change deferred to the start of the next event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PendingPop {
    #[default]
    None,
    /// Drop the frame at this index and everything above it
    Truncate(usize),
    /// Drop a declaration's transient frame
    Transient,
}

/// Zero-copy pull reader from a byte slice
pub struct SliceReader<'a> {
    tokenizer: Tokenizer<'a>,
    options: ReaderOptions,
    state: EventKind,
    name: &'a [u8],
    /// Set by `<name/>`: the next event is the matching `EndElement`
    pending_end: bool,
    pending_pop: PendingPop,
    stack: PathStack<'a>,
    marks: NestMarks,
    error: Option<ParseError>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader (unmatched end tags are ignored)
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, ReaderOptions::default())
    }

    /// Create a new slice reader that reports unmatched end tags as errors
    pub fn new_strict(input: &'a [u8]) -> Self {
        Self::with_options(input, ReaderOptions::strict())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }

    pub fn with_options(input: &'a [u8], options: ReaderOptions) -> Self {
        let encoding = XmlEncoding::detect(input);
        if encoding != XmlEncoding::Utf8 {
            debug!(?encoding, "input is not UTF-8; reading bytes as-is");
        }
        SliceReader {
            tokenizer: Tokenizer::new(strip_utf8_bom(input)),
            options,
            state: EventKind::None,
            name: b"",
            pending_end: false,
            pending_pop: PendingPop::None,
            stack: PathStack::new(),
            marks: NestMarks::new(),
            error: None,
        }
    }

    /// Move to the next event
    ///
    /// Returns `false` when the input is exhausted, after an `Error` has been
    /// reported, or when the event leaves the innermost region opened by
    /// [`nest`](Self::nest). In the last case the reader stays on that event
    /// and the following call reports it again.
    pub fn next(&mut self) -> bool {
        if self.marks.take_hold() {
            trace!(event = %self.state, path = self.path(), "hold replay");
            return self.admit();
        }
        if !self.advance() {
            return false;
        }
        self.admit()
    }

    /// Check the current event against the innermost nest mark
    fn admit(&mut self) -> bool {
        if self.marks.admits(self.resulting_depth()) {
            return true;
        }
        self.marks.release();
        false
    }

    /// Stack depth once the current event has taken effect
    fn resulting_depth(&self) -> usize {
        match (self.state, self.pending_pop) {
            (EventKind::EndElement, PendingPop::Truncate(index)) => index,
            (EventKind::Declaration, PendingPop::Transient) => self.stack.depth() - 1,
            _ => self.stack.depth(),
        }
    }

    /// Consume input for one event, without nest checks
    fn advance(&mut self) -> bool {
        if self.state == EventKind::Error {
            return false;
        }

        match std::mem::take(&mut self.pending_pop) {
            PendingPop::Truncate(index) => self.stack.truncate(index),
            PendingPop::Transient => self.stack.pop(),
            PendingPop::None => {}
        }

        if self.pending_end {
            self.pending_end = false;
            self.close_element(self.tokenizer.position());
            return true;
        }

        match self.tokenizer.next_token() {
            Ok(Some(token)) => {
                self.apply(token);
                true
            }
            Ok(None) => {
                self.state = EventKind::None;
                self.name = b"";
                false
            }
            Err(err) => {
                self.fail(err);
                true
            }
        }
    }

    fn apply(&mut self, token: Token<'a>) {
        match token.kind {
            TokenKind::StartTag => {
                self.state = EventKind::StartElement;
                self.name = token.name;
                self.pending_end = token.self_closing;
                self.stack.push(token.name, token.attributes);
            }
            TokenKind::EndTag => {
                self.name = token.name;
                self.close_element(token.span.0);
            }
            TokenKind::Declaration => {
                self.state = EventKind::Declaration;
                self.name = token.name;
                self.stack.push_transient(token.name, token.attributes);
                self.pending_pop = PendingPop::Transient;
            }
            TokenKind::Text | TokenKind::CData => {
                let kind = if token.kind == TokenKind::Text {
                    CharKind::Text
                } else {
                    CharKind::CData
                };
                self.state = EventKind::Characters;
                self.name = b"";
                self.stack.append_chars(kind, token.content);
            }
            TokenKind::Comment => {
                self.state = EventKind::Comment;
                self.name = b"";
                self.stack.append_chars(CharKind::Comment, token.content);
            }
        }
    }

    /// Report `EndElement` for `self.name`, scheduling the stack truncation
    fn close_element(&mut self, position: usize) {
        match self.stack.find_closing(self.name) {
            Some(index) => {
                self.state = EventKind::EndElement;
                self.pending_pop = PendingPop::Truncate(index);
            }
            None => match self.options.unmatched_end_tag {
                UnmatchedEndTag::Ignore => {
                    debug!(name = %self.name(), position, "ignoring unmatched end tag");
                    self.state = EventKind::EndElement;
                }
                UnmatchedEndTag::Error => {
                    self.fail(ParseError::new(ParseErrorKind::UnmatchedEndTag, position));
                }
            },
        }
    }

    fn fail(&mut self, err: ParseError) {
        debug!(%err, path = self.path(), "malformed markup");
        self.state = EventKind::Error;
        self.name = b"";
        self.pending_end = false;
        self.error = Some(err);
    }

    /// Kind of the current event
    #[inline]
    pub fn state(&self) -> EventKind {
        self.state
    }

    #[inline]
    pub fn is_start_element(&self) -> bool {
        self.state == EventKind::StartElement
    }

    #[inline]
    pub fn is_end_element(&self) -> bool {
        self.state == EventKind::EndElement
    }

    #[inline]
    pub fn is_characters(&self) -> bool {
        self.state == EventKind::Characters
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.state == EventKind::Comment
    }

    #[inline]
    pub fn is_declaration(&self) -> bool {
        self.state == EventKind::Declaration
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.state == EventKind::Error
    }

    pub fn is_start_element_named(&self, name: &str) -> bool {
        self.is_start_element() && self.is_name(name)
    }

    pub fn is_end_element_named(&self, name: &str) -> bool {
        self.is_end_element() && self.is_name(name)
    }

    /// Name of the current element or declaration (`?xml`, `!DOCTYPE`)
    pub fn name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }

    #[inline]
    pub fn name_bytes(&self) -> &'a [u8] {
        self.name
    }

    #[inline]
    pub fn is_name(&self, name: &str) -> bool {
        self.name == name.as_bytes()
    }

    /// Ancestry path of the current frame
    ///
    /// At `EndElement` this is still the closing element's path; at a
    /// declaration it is the declaration name.
    #[inline]
    pub fn path(&self) -> &str {
        self.stack.path()
    }

    /// Stack size, sentinel root included
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// True at a `StartElement` whose path is `pattern` (a trailing `/` is allowed)
    pub fn match_start(&self, pattern: &str) -> bool {
        self.is_start_element() && path_matches(self.path(), pattern)
    }

    /// True at an `EndElement` whose path is `pattern` (a trailing `/` is allowed)
    ///
    /// The path is the frame the end tag closes, or the current frame for an
    /// ignored unmatched end tag (see [`UnmatchedEndTag::Ignore`]).
    pub fn match_end(&self, pattern: &str) -> bool {
        self.is_end_element() && path_matches(self.path(), pattern)
    }

    /// First attribute of the current frame with this exact name
    pub fn attribute(&self, name: &str) -> Option<AttributeValue<'a>> {
        find_attribute(self.stack.current().attributes(), name.as_bytes()).map(|attr| attr.value)
    }

    /// Decoded attribute value, or `default` when absent
    pub fn attribute_or(&self, name: &str, default: &str) -> String {
        match self.attribute(name) {
            Some(value) => value.decode().into_owned(),
            None => default.to_string(),
        }
    }

    /// All attributes of the current frame as decoded pairs, in document order
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.raw_attributes()
            .iter()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.name).into_owned(),
                    attr.value.decode().into_owned(),
                )
            })
            .collect()
    }

    pub fn raw_attributes(&self) -> &[Attribute<'a>] {
        self.stack.current().attributes()
    }

    /// Character content of the current frame, comments elided
    pub fn text(&self) -> String {
        self.stack.current().text()
    }

    /// The most recently recorded fragment of the current frame
    pub fn last_fragment(&self) -> Option<CharPart<'a>> {
        self.stack.current().chars().last().copied()
    }

    /// Bound the following events to the subtree at the current depth
    pub fn nest(&mut self) {
        self.marks.nest(self.stack.depth());
    }

    /// Make the next `next()` report the current event again
    pub fn hold(&mut self) {
        self.marks.hold();
    }

    /// Details of the `Error` state
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Byte offset of the scan cursor
    pub fn position(&self) -> usize {
        self.tokenizer.position()
    }

    /// Owned snapshot of the current event
    pub fn event(&self) -> Event {
        Event::new(self.state, self.name(), self.path())
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if SliceReader::next(self) {
            Some(self.event())
        } else {
            None
        }
    }
}

/// Exact path match, or match with one trailing separator on the pattern
fn path_matches(path: &str, pattern: &str) -> bool {
    pattern == path || pattern.strip_suffix('/') == Some(path)
}

/// Parse XML from a byte slice and return all events
pub fn parse_events(input: &[u8]) -> Vec<Event> {
    SliceReader::new(input).collect()
}
