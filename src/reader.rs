//! Low-level XML tokenizer.
//!
//! Produces a flat stream of [`XmlEvent`]s from a byte slice. Names and
//! unescaped text borrow from the input. Attributes are checked for
//! well-formedness and then discarded: the mapping never reads them.
//!
//! Whitespace is significant inside the root element and reported as text
//! exactly as written. Outside the root it is skipped.

use crate::error::{Error, ErrorKind, Position, Result};
use crate::escape::unescape;
use memchr::{memchr, memchr2};
use std::borrow::Cow;
use std::ops::Range;

static IS_WHITESPACE: [bool; 256] = {
    let mut lut = [false; 256];
    lut[b' ' as usize] = true;
    lut[b'\t' as usize] = true;
    lut[b'\n' as usize] = true;
    lut[b'\r' as usize] = true;
    lut
};

static IS_NAME_START: [bool; 256] = {
    let mut lut = [false; 256];
    let mut i = b'A';
    while i <= b'Z' {
        lut[i as usize] = true;
        lut[(i + 32) as usize] = true;
        i += 1;
    }
    lut[b'_' as usize] = true;
    lut[b':' as usize] = true;
    // Multi-byte UTF-8 sequences.
    let mut i: usize = 0x80;
    while i < 256 {
        lut[i] = true;
        i += 1;
    }
    lut
};

static IS_NAME_CHAR: [bool; 256] = {
    let mut lut = IS_NAME_START;
    let mut i = b'0';
    while i <= b'9' {
        lut[i as usize] = true;
        i += 1;
    }
    lut[b'-' as usize] = true;
    lut[b'.' as usize] = true;
    lut
};

/// An XML event produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent<'a> {
    /// `<?xml version="1.0" encoding="utf-8"?>`
    Declaration {
        /// XML version.
        version: Cow<'a, str>,
        /// Declared encoding, if any.
        encoding: Option<Cow<'a, str>>,
    },
    /// `<name>`
    Start(&'a str),
    /// `</name>`
    End(&'a str),
    /// `<name/>`
    Empty(&'a str),
    /// Character data with entities decoded.
    Text(Cow<'a, str>),
    /// `<![CDATA[...]]>` content.
    CData(&'a str),
    /// `<!-- ... -->`
    Comment(&'a str),
    /// `<?target data?>`
    ProcessingInstruction(&'a str),
    /// End of input.
    Eof,
}

/// A zero-copy XML tokenizer.
pub struct XmlReader<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    open: Vec<&'a str>,
}

impl<'a> XmlReader<'a> {
    /// Creates a tokenizer over a string.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Creates a tokenizer over bytes.
    #[inline]
    pub fn from_bytes(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            open: Vec::with_capacity(8),
        }
    }

    /// Current position in the input.
    #[inline]
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.col,
            offset: self.pos,
        }
    }

    /// Number of open elements.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Reads the next event.
    pub fn next_event(&mut self) -> Result<XmlEvent<'a>> {
        if self.open.is_empty() {
            self.skip_whitespace();
        }

        if self.pos >= self.input.len() {
            if let Some(tag) = self.open.last() {
                return Err(self.err(Error::unclosed_tag(*tag)));
            }
            return Ok(XmlEvent::Eof);
        }

        if self.input[self.pos] == b'<' {
            self.read_tag()
        } else {
            self.read_text()
        }
    }

    #[inline]
    fn err(&self, error: Error) -> Error {
        error.with_position(self.position())
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    fn starts_with(&self, s: &[u8]) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    /// Moves the cursor to `end`, tracking lines and columns.
    #[inline(always)]
    fn advance_to(&mut self, end: usize) {
        for &b in &self.input[self.pos..end] {
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.pos = end;
    }

    /// Moves the cursor over bytes known to contain no newline.
    #[inline(always)]
    fn bump(&mut self, n: usize) {
        self.pos += n;
        self.col += n;
    }

    fn utf8(&self, range: Range<usize>) -> Result<&'a str> {
        let input: &'a [u8] = self.input;
        std::str::from_utf8(&input[range]).map_err(|_| self.err(Error::new(ErrorKind::InvalidUtf8)))
    }

    #[inline(always)]
    fn skip_whitespace(&mut self) {
        let mut end = self.pos;
        while end < self.input.len() && IS_WHITESPACE[self.input[end] as usize] {
            end += 1;
        }
        self.advance_to(end);
    }

    /// Searches for `terminator` from the cursor, returning its absolute offset.
    fn find(&self, terminator: &[u8]) -> Option<usize> {
        let first = terminator[0];
        let mut from = self.pos;
        while let Some(offset) = memchr(first, &self.input[from..]) {
            let at = from + offset;
            if self.input[at..].starts_with(terminator) {
                return Some(at);
            }
            from = at + 1;
        }
        None
    }

    fn read_text(&mut self) -> Result<XmlEvent<'a>> {
        let start = self.pos;
        let end = memchr(b'<', &self.input[start..]).map_or(self.input.len(), |o| start + o);

        if self.open.is_empty() {
            return Err(self.err(Error::syntax("text outside the root element")));
        }

        let text = self.utf8(start..end)?;
        let at = self.position();
        self.advance_to(end);

        match unescape(text) {
            Ok(text) => Ok(XmlEvent::Text(text)),
            Err(e) => Err(Error::invalid_escape(e.entity).with_position(Position {
                offset: at.offset + e.position,
                ..at
            })),
        }
    }

    fn read_tag(&mut self) -> Result<XmlEvent<'a>> {
        self.bump(1);
        match self.peek(0) {
            None => Err(self.err(Error::unexpected_eof())),
            Some(b'/') => self.read_end(),
            Some(b'?') => self.read_processing_instruction(),
            Some(b'!') => self.read_special(),
            Some(_) => self.read_start(),
        }
    }

    fn read_start(&mut self) -> Result<XmlEvent<'a>> {
        let name = self.read_name()?;
        self.skip_attributes()?;

        match self.peek(0) {
            None => Err(self.err(Error::unexpected_eof())),
            Some(b'/') => {
                self.bump(1);
                self.expect(b'>')?;
                Ok(XmlEvent::Empty(name))
            }
            Some(b'>') => {
                self.bump(1);
                self.open.push(name);
                Ok(XmlEvent::Start(name))
            }
            Some(_) => Err(self.err(Error::syntax("expected '>' or '/>'"))),
        }
    }

    fn read_end(&mut self) -> Result<XmlEvent<'a>> {
        self.bump(1);
        let name = self.read_name()?;
        self.skip_whitespace();
        self.expect(b'>')?;

        match self.open.pop() {
            Some(expected) if expected == name => Ok(XmlEvent::End(name)),
            Some(expected) => Err(self.err(Error::mismatched_tag(expected, name))),
            None => Err(self.err(Error::syntax(format!("unexpected closing tag: {}", name)))),
        }
    }

    fn read_processing_instruction(&mut self) -> Result<XmlEvent<'a>> {
        self.bump(1);
        let target = self.read_name()?;

        if target.eq_ignore_ascii_case("xml") {
            return self.read_declaration();
        }

        let start = self.pos;
        let end = self
            .find(b"?>")
            .ok_or_else(|| self.err(Error::syntax("unterminated processing instruction")))?;
        let data = self.utf8(start..end)?;
        self.advance_to(end);
        self.bump(2);
        Ok(XmlEvent::ProcessingInstruction(data.trim()))
    }

    fn read_declaration(&mut self) -> Result<XmlEvent<'a>> {
        let mut version = None;
        let mut encoding = None;

        loop {
            self.skip_whitespace();
            match self.peek(0) {
                None => return Err(self.err(Error::unexpected_eof())),
                Some(b'?') => break,
                Some(_) => {}
            }
            let (name, value) = self.read_attribute()?;
            match name {
                "version" => version = Some(value),
                "encoding" => encoding = Some(value),
                _ => {}
            }
        }

        if !self.starts_with(b"?>") {
            return Err(self.err(Error::syntax("expected '?>'")));
        }
        self.bump(2);

        Ok(XmlEvent::Declaration {
            version: version.unwrap_or(Cow::Borrowed("1.0")),
            encoding,
        })
    }

    fn read_special(&mut self) -> Result<XmlEvent<'a>> {
        self.bump(1);

        if self.starts_with(b"--") {
            self.bump(2);
            let start = self.pos;
            let end = self
                .find(b"-->")
                .ok_or_else(|| self.err(Error::syntax("unterminated comment")))?;
            let comment = self.utf8(start..end)?;
            self.advance_to(end);
            self.bump(3);
            return Ok(XmlEvent::Comment(comment.trim()));
        }

        if self.starts_with(b"[CDATA[") {
            if self.open.is_empty() {
                return Err(self.err(Error::syntax("CDATA outside the root element")));
            }
            self.bump(7);
            let start = self.pos;
            let end = self
                .find(b"]]>")
                .ok_or_else(|| self.err(Error::syntax("unterminated CDATA section")))?;
            let data = self.utf8(start..end)?;
            self.advance_to(end);
            self.bump(3);
            return Ok(XmlEvent::CData(data));
        }

        if self.starts_with(b"DOCTYPE") {
            self.skip_doctype();
            return self.next_event();
        }

        Err(self.err(Error::syntax("unknown construct after '<!'")))
    }

    fn skip_doctype(&mut self) {
        let mut depth = 1usize;
        while depth > 0 {
            let Some(offset) = memchr2(b'<', b'>', &self.input[self.pos..]) else {
                self.advance_to(self.input.len());
                return;
            };
            let at = self.pos + offset;
            if self.input[at] == b'<' {
                depth += 1;
            } else {
                depth -= 1;
            }
            self.advance_to(at + 1);
        }
    }

    fn read_name(&mut self) -> Result<&'a str> {
        let start = self.pos;
        match self.peek(0) {
            None => return Err(self.err(Error::unexpected_eof())),
            Some(b) if !IS_NAME_START[b as usize] => {
                return Err(self.err(Error::invalid_name(format!(
                    "invalid name start character: {:?}",
                    b as char
                ))));
            }
            Some(_) => {}
        }

        let mut end = start + 1;
        while end < self.input.len() && IS_NAME_CHAR[self.input[end] as usize] {
            end += 1;
        }
        let name = self.utf8(start..end)?;
        self.bump(end - start);
        Ok(name)
    }

    /// Validates and drops the attributes of a start tag.
    fn skip_attributes(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            match self.peek(0) {
                None | Some(b'>') | Some(b'/') => return Ok(()),
                Some(_) => {
                    self.read_attribute()?;
                }
            }
        }
    }

    fn read_attribute(&mut self) -> Result<(&'a str, Cow<'a, str>)> {
        let name = self.read_name()?;
        self.skip_whitespace();
        self.expect(b'=')?;
        self.skip_whitespace();

        let quote = match self.peek(0) {
            None => return Err(self.err(Error::unexpected_eof())),
            Some(q @ (b'"' | b'\'')) => q,
            Some(_) => return Err(self.err(Error::syntax("expected quote"))),
        };
        self.bump(1);

        let start = self.pos;
        let end = memchr(quote, &self.input[start..])
            .map(|o| start + o)
            .ok_or_else(|| self.err(Error::syntax("unterminated attribute value")))?;
        let raw = self.utf8(start..end)?;
        self.advance_to(end);
        self.bump(1);

        let value = unescape(raw).map_err(|e| self.err(Error::invalid_escape(e.entity)))?;
        Ok((name, value))
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.peek(0) {
            None => Err(self.err(Error::unexpected_eof())),
            Some(b) if b == expected => {
                self.bump(1);
                Ok(())
            }
            Some(b) => Err(self.err(Error::syntax(format!(
                "expected '{}', found '{}'",
                expected as char, b as char
            )))),
        }
    }
}
