//! XML Writer Module
//!
//! Push-model serializer: elements, attributes and escaped character data go
//! in, indented markup comes out of any `std::io::Write` sink.

pub mod xml_writer;

pub use xml_writer::{WriterOptions, XmlWriter};
