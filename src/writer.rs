//! Low-level XML writer.
//!
//! Emits elements as explicit open and close pairs, never self-closing, and
//! routes character data through the CDATA policy in [`escape`](crate::escape).
//! With indentation enabled, an element holding child elements puts each
//! child on its own line while text stays inline.

use crate::escape;
use std::io::{self, Write};

struct Frame {
    name: String,
    nested: bool,
}

/// An XML writer that produces well-formed output.
pub struct XmlWriter<W: Write> {
    writer: W,
    stack: Vec<Frame>,
    indent: Option<String>,
    started: bool,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a compact writer.
    #[inline]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            stack: Vec::new(),
            indent: None,
            started: false,
        }
    }

    /// Creates a writer that indents nested elements.
    #[inline]
    pub fn with_indent(writer: W, indent: &str) -> Self {
        Self {
            indent: Some(indent.to_string()),
            ..Self::new(writer)
        }
    }

    /// Returns the inner writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Current nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Writes the XML declaration.
    pub fn write_declaration(&mut self, version: &str, encoding: Option<&str>) -> io::Result<()> {
        write!(self.writer, "<?xml version=\"{}\"", version)?;
        if let Some(enc) = encoding {
            write!(self.writer, " encoding=\"{}\"", enc)?;
        }
        self.writer.write_all(b"?>")?;
        self.started = true;
        Ok(())
    }

    /// Opens an element.
    pub fn start_element(&mut self, name: &str) -> io::Result<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.nested = true;
        }
        if self.started {
            self.write_indent(self.stack.len())?;
        }
        self.writer.write_all(b"<")?;
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(b">")?;
        self.stack.push(Frame {
            name: name.to_string(),
            nested: false,
        });
        self.started = true;
        Ok(())
    }

    /// Closes the innermost open element.
    pub fn end_element(&mut self) -> io::Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no element to close"))?;
        if frame.nested {
            self.write_indent(self.stack.len())?;
        }
        self.writer.write_all(b"</")?;
        self.writer.write_all(frame.name.as_bytes())?;
        self.writer.write_all(b">")
    }

    /// Writes character data, wrapped in CDATA when it cannot appear verbatim.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        if self.stack.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "text outside of an element",
            ));
        }
        self.writer.write_all(escape::text(text).as_bytes())
    }

    /// Writes a complete element with text content.
    pub fn write_element(&mut self, name: &str, text: &str) -> io::Result<()> {
        self.start_element(name)?;
        self.write_text(text)?;
        self.end_element()
    }

    /// Writes an element with no content as an open and close pair.
    pub fn write_empty_element(&mut self, name: &str) -> io::Result<()> {
        self.start_element(name)?;
        self.end_element()
    }

    fn write_indent(&mut self, level: usize) -> io::Result<()> {
        if let Some(indent) = &self.indent {
            self.writer.write_all(b"\n")?;
            for _ in 0..level {
                self.writer.write_all(indent.as_bytes())?;
            }
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
