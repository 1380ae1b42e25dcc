//! Error types
//!
//! The reader never fails through `Result`: malformed markup turns into the
//! `Error` event state and the detail is kept as a [`ParseError`]. The writer
//! propagates sink failures and misuse through [`WriteError`].

use thiserror::Error;

/// What went wrong while scanning markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `<` not followed by a valid name start
    InvalidName,
    /// Tag opened but no consistent closing `>`
    UnclosedTag,
    /// Quoted attribute value without its closing quote
    UnclosedAttributeValue,
    /// `<!--` without `-->`
    UnterminatedComment,
    /// `<![CDATA[` without `]]>`
    UnterminatedCData,
    /// Declaration without its terminator
    UnterminatedDeclaration,
    /// End tag closing an element that was never opened
    UnmatchedEndTag,
}

impl ParseErrorKind {
    fn message(self) -> &'static str {
        match self {
            ParseErrorKind::InvalidName => "invalid element name",
            ParseErrorKind::UnclosedTag => "tag is not closed by '>'",
            ParseErrorKind::UnclosedAttributeValue => "attribute value is missing its closing quote",
            ParseErrorKind::UnterminatedComment => "comment is not terminated by '-->'",
            ParseErrorKind::UnterminatedCData => "CDATA section is not terminated by ']]>'",
            ParseErrorKind::UnterminatedDeclaration => "declaration is not terminated",
            ParseErrorKind::UnmatchedEndTag => "end tag has no matching open element",
        }
    }
}

/// Malformed markup, with the byte offset of the offending construct
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} at byte {position}", .kind.message())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        ParseError { kind, position }
    }
}

/// Errors reported by [`crate::XmlWriter`]
#[derive(Debug, Error)]
pub enum WriteError {
    /// The sink rejected the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `write_attribute` called after the start tag was closed
    #[error("attribute '{0}' written outside of an open start tag")]
    AttributeOutsideTag(String),

    /// `end_element` called with no element open
    #[error("no open element to close")]
    NoOpenElement,
}

pub type WriteResult<T> = std::result::Result<T, WriteError>;
