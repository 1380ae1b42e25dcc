//! XML Event Types
//!
//! The reader reports one [`EventKind`] per `next()` call; the details of the
//! current event (name, path, attributes, text) are read from the reader
//! itself. [`Event`] is an owned snapshot for callers that want to keep them.

use std::fmt;

/// Kind of the event the reader is positioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKind {
    /// Before the first event, or input exhausted
    #[default]
    None,
    /// Malformed markup; terminal
    Error,
    /// `<!-- ... -->`
    Comment,
    /// `<name ...>` or the first half of `<name/>`
    StartElement,
    /// `</name>` or the second half of `<name/>`
    EndElement,
    /// A run of text or a CDATA section
    Characters,
    /// `<?name ...?>` or `<!NAME ...>`
    Declaration,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::None => "None",
            EventKind::Error => "Error",
            EventKind::Comment => "Comment",
            EventKind::StartElement => "StartElement",
            EventKind::EndElement => "EndElement",
            EventKind::Characters => "Characters",
            EventKind::Declaration => "Declaration",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned snapshot of a reader event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Element or declaration name; empty for other kinds
    pub name: String,
    /// Ancestry path at the time of the event
    pub path: String,
}

impl Event {
    pub fn new(kind: EventKind, name: impl Into<String>, path: impl Into<String>) -> Self {
        Event {
            kind,
            name: name.into(),
            path: path.into(),
        }
    }

    /// Check if this is a start element event
    #[inline]
    pub fn is_start_element(&self) -> bool {
        self.kind == EventKind::StartElement
    }

    /// Check if this is an end element event
    #[inline]
    pub fn is_end_element(&self) -> bool {
        self.kind == EventKind::EndElement
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::StartElement | EventKind::EndElement => {
                write!(f, "{}: {} @ {}", self.kind, self.name, self.path)
            }
            EventKind::Declaration => write!(f, "{}: {}", self.kind, self.name),
            kind => write!(f, "{kind}"),
        }
    }
}
