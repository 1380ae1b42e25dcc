//! Indenting XML writer with a small output buffer

use crate::core::entities::encode_text_with;
use crate::error::{WriteError, WriteResult};
use std::io::{self, Write};
use tracing::warn;

const XML_DECLARATION: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Writer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Spaces per nesting level
    pub indent_step: usize,
    /// Write non-ASCII characters as-is instead of `&#N;`
    pub utf8_passthrough: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            indent_step: 4,
            utf8_passthrough: true,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent_step(mut self, step: usize) -> Self {
        self.indent_step = step;
        self
    }

    pub fn utf8_passthrough(mut self, enabled: bool) -> Self {
        self.utf8_passthrough = enabled;
        self
    }
}

/// Push-model XML writer
///
/// Start tags stay open until content or a child follows, so an element with
/// neither is closed as `<name/>`. Indentation is only inserted between
/// markup; once character data has been written into an element, its closing
/// tag follows the text directly.
///
/// Output is buffered. Dropping the writer flushes what is left; use
/// [`flush`](Self::flush) or [`into_inner`](Self::into_inner) to see errors.
pub struct XmlWriter<W: Write> {
    /// Taken by `into_inner`
    writer: Option<W>,
    buffer: Vec<u8>,
    flush_threshold: usize,
    options: WriterOptions,
    elements: Vec<String>,
    /// Between `<name` and its `>`
    inside_tag: bool,
    /// Last write ended or opened an element
    newline: bool,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, WriterOptions::default())
    }

    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        XmlWriter {
            writer: Some(writer),
            buffer: Vec::with_capacity(8192),
            flush_threshold: 4096,
            options,
            elements: Vec::new(),
            inside_tag: false,
            newline: false,
        }
    }

    /// Number of elements currently open
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    fn auto_flush(&mut self) -> WriteResult<()> {
        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    #[inline]
    fn write_raw(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    fn write_indent(&mut self, level: usize) {
        self.buffer.push(b'\n');
        let width = level * self.options.indent_step;
        self.buffer.resize(self.buffer.len() + width, b' ');
    }

    fn close_tag(&mut self) {
        if self.inside_tag {
            self.write_raw(b">");
            self.inside_tag = false;
        }
    }

    /// Write the `<?xml ...?>` declaration line
    pub fn start_document(&mut self) -> WriteResult<()> {
        self.write_raw(XML_DECLARATION);
        self.auto_flush()
    }

    /// Close every open element and flush
    pub fn end_document(&mut self) -> WriteResult<()> {
        while !self.elements.is_empty() {
            self.end_element()?;
        }
        if self.newline {
            self.write_raw(b"\n");
            self.newline = false;
        }
        self.flush()
    }

    pub fn start_element(&mut self, name: &str) -> WriteResult<()> {
        self.close_tag();
        if self.newline {
            self.write_indent(self.elements.len());
        }
        self.write_raw(b"<");
        self.write_raw(name.as_bytes());
        self.elements.push(name.to_string());
        self.inside_tag = true;
        self.newline = true;
        self.auto_flush()
    }

    pub fn end_element(&mut self) -> WriteResult<()> {
        let name = self.elements.pop().ok_or(WriteError::NoOpenElement)?;
        if self.inside_tag {
            self.write_raw(b"/>");
            self.inside_tag = false;
        } else {
            if self.newline {
                self.write_indent(self.elements.len());
            }
            self.write_raw(b"</");
            self.write_raw(name.as_bytes());
            self.write_raw(b">");
        }
        self.newline = true;
        self.auto_flush()
    }

    /// Write escaped character data into the current element
    pub fn write_characters(&mut self, text: &str) -> WriteResult<()> {
        self.close_tag();
        self.newline = false;
        let encoded = encode_text_with(text, self.options.utf8_passthrough);
        self.buffer.extend_from_slice(encoded.as_bytes());
        self.auto_flush()
    }

    /// Add `name="value"` to the open start tag
    pub fn write_attribute(&mut self, name: &str, value: &str) -> WriteResult<()> {
        if !self.inside_tag {
            return Err(WriteError::AttributeOutsideTag(name.to_string()));
        }
        let encoded = encode_text_with(value, self.options.utf8_passthrough);
        self.write_raw(b" ");
        self.write_raw(name.as_bytes());
        self.write_raw(b"=\"");
        self.buffer.extend_from_slice(encoded.as_bytes());
        self.write_raw(b"\"");
        self.auto_flush()
    }

    /// Write `name` as an element whose content is produced by `body`
    pub fn element<F>(&mut self, name: &str, body: F) -> WriteResult<()>
    where
        F: FnOnce(&mut Self) -> WriteResult<()>,
    {
        self.start_element(name)?;
        body(self)?;
        self.end_element()
    }

    /// Write `<name>text</name>`
    pub fn text_element(&mut self, name: &str, text: &str) -> WriteResult<()> {
        self.element(name, |w| w.write_characters(text))
    }

    /// Flush buffer to underlying writer
    pub fn flush(&mut self) -> WriteResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        if !self.buffer.is_empty() {
            writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        writer.flush()?;
        Ok(())
    }

    /// Flush and return the sink
    pub fn into_inner(mut self) -> WriteResult<W> {
        self.flush()?;
        self.writer
            .take()
            .ok_or_else(|| io::Error::other("sink already taken").into())
    }
}

impl<W: Write> Drop for XmlWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_none() {
            return;
        }
        if let Err(err) = self.flush() {
            warn!(%err, pending = self.buffer.len(), "XmlWriter dropped with unwritten output");
        }
    }
}
