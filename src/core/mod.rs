//! Core XML parsing primitives
//!
//! This module contains the byte-level building blocks of the reader:
//! - Scanner: cursor with memchr-accelerated delimiter search, symbol classes
//! - Tokenizer: lexical grammar for tags, attributes, comments, CDATA, declarations
//! - Entities: XML entity decoding/encoding with Cow (zero-copy when possible)
//! - Attributes: raw attribute spans with lazy decoding
//! - Encoding: byte order mark handling
//! - UrlEncode: percent codec used alongside markup (independent of the reader)

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
pub mod urlencode;
