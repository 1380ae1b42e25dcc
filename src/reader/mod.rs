//! XML Reader Module
//!
//! - SliceReader: pull reader over an in-memory buffer
//! - Events: event kinds and owned event snapshots
//! - Stack / Nest: ancestry frames and subtree bounding used by the reader

pub mod events;
pub mod nest;
pub mod slice;
pub mod stack;
