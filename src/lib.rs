//! xstream - Streaming pull-based XML/HTML reader
//!
//! - Reader: one event per `next()` call, with the ancestry path of every
//!   event, lazily decoded attributes and character data, and `nest()` for
//!   handing a subtree to a helper loop
//! - Writer: push-model serializer with indentation and entity escaping
//! - Codecs: XML entities and URL percent-encoding
//!
//! ```
//! use xstream::SliceReader;
//!
//! let mut reader = SliceReader::from_str("<hoge><fuga foo='bar'>Hello</fuga></hoge>");
//! while reader.next() {
//!     if reader.match_end("/hoge/fuga") {
//!         assert_eq!(reader.text(), "Hello");
//!         assert_eq!(reader.attribute_or("foo", ""), "bar");
//!     }
//! }
//! ```

pub mod core;
pub mod error;
pub mod reader;
pub mod writer;

pub use crate::core::attributes::{Attribute, AttributeValue};
pub use crate::core::entities::{decode_str, decode_text, encode_text, encode_text_with};
pub use crate::core::urlencode::{url_decode, url_encode};
pub use error::{ParseError, ParseErrorKind, WriteError, WriteResult};
pub use reader::events::{Event, EventKind};
pub use reader::slice::{parse_events, ReaderOptions, SliceReader, UnmatchedEndTag};
pub use reader::stack::{CharKind, CharPart};
pub use writer::{WriterOptions, XmlWriter};
