//! In-memory element tree.
//!
//! The deserializer reads from an [`Element`] tree built by [`parse`]. Only
//! element names, nesting and character data are kept: CDATA sections fold
//! into text, and attributes, comments and processing instructions are
//! dropped.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::reader::{XmlEvent, XmlReader};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::borrow::Cow;

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

/// An element with its children in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    children: Vec<Node>,
}

impl Element {
    /// Creates an element without children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Creates an element holding a single run of text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    /// The element's tag.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All child nodes.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Appends a child element.
    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Appends text, merging with a preceding text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given tag.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children().filter(move |e| e.name == name)
    }

    /// The first child element with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().find(|e| e.name == name)
    }

    /// Returns true if the element has at least one child element.
    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(|n| matches!(n, Node::Element(_)))
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> Cow<'_, str> {
        let mut texts = self.children.iter().filter_map(|node| match node {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) => None,
        });
        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(first), None) => Cow::Borrowed(first),
            (Some(first), Some(second)) => {
                let mut out = String::from(first);
                out.push_str(second);
                texts.for_each(|t| out.push_str(t));
                Cow::Owned(out)
            }
        }
    }

    /// Returns true if the element has no child nodes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if the element has no child elements and only
    /// whitespace text.
    pub fn is_blank(&self) -> bool {
        self.children.iter().all(|node| match node {
            Node::Text(t) => t.trim().is_empty(),
            Node::Element(_) => false,
        })
    }

    /// Drops whitespace-only text once element children are present.
    fn finish(&mut self) {
        if self.has_element_children() {
            self.children.retain(|node| match node {
                Node::Text(t) => !t.trim().is_empty(),
                Node::Element(_) => true,
            });
        }
    }

    /// Returns a serializable view of the element's content without its tag.
    pub fn content(&self) -> Content<'_> {
        Content(self)
    }
}

/// Parses a document into its root element with the default configuration.
pub fn parse(input: &str) -> Result<Element> {
    parse_with(input, &Config::default())
}

/// Parses a document into its root element.
///
/// Elements nested deeper than `config.max_depth` are rejected with
/// [`ErrorKind::RecursionLimit`](crate::ErrorKind::RecursionLimit).
pub fn parse_with(input: &str, config: &Config) -> Result<Element> {
    parse_bytes(input.as_bytes(), config)
}

/// Parses a UTF-8 document into its root element.
pub fn parse_bytes(input: &[u8], config: &Config) -> Result<Element> {
    let mut reader = XmlReader::from_bytes(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let at = reader.position();
        match reader.next_event()? {
            XmlEvent::Start(name) | XmlEvent::Empty(name) if stack.is_empty() && root.is_some() => {
                return Err(Error::syntax(format!("second root element <{}>", name)).with_position(at));
            }
            XmlEvent::Start(_) | XmlEvent::Empty(_) if stack.len() >= config.max_depth => {
                return Err(Error::recursion_limit(config.max_depth).with_position(at));
            }
            XmlEvent::Start(name) => stack.push(Element::new(name)),
            XmlEvent::Empty(name) => {
                let element = Element::new(name);
                match stack.last_mut() {
                    Some(parent) => parent.push_element(element),
                    None => root = Some(element),
                }
            }
            XmlEvent::End(_) => {
                let Some(mut element) = stack.pop() else {
                    return Err(Error::syntax("unbalanced end tag").with_position(at));
                };
                element.finish();
                match stack.last_mut() {
                    Some(parent) => parent.push_element(element),
                    None => root = Some(element),
                }
            }
            XmlEvent::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(text);
                }
            }
            XmlEvent::CData(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(text);
                }
            }
            XmlEvent::Declaration { .. } | XmlEvent::Comment(_) | XmlEvent::ProcessingInstruction(_) => {}
            XmlEvent::Eof => break,
        }
    }

    root.ok_or_else(|| Error::syntax("document has no root element").with_position(reader.position()))
}

/// Element content as JSON-shaped data.
///
/// A leaf becomes its text. Otherwise child elements become map entries
/// keyed by tag in first-appearance order, and repeated tags collapse into
/// an array.
pub struct Content<'a>(&'a Element);

impl Serialize for Content<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let element = self.0;
        if !element.has_element_children() {
            return serializer.serialize_str(&element.text());
        }

        let mut groups: Vec<(&str, Vec<&Element>)> = Vec::new();
        for child in element.children() {
            match groups.iter_mut().find(|(name, _)| *name == child.name()) {
                Some((_, members)) => members.push(child),
                None => groups.push((child.name(), vec![child])),
            }
        }

        let mut map = serializer.serialize_map(Some(groups.len()))?;
        for (name, members) in &groups {
            match members.as_slice() {
                [single] => map.serialize_entry(name, &Content(single))?,
                many => map.serialize_entry(name, &Group(many))?,
            }
        }
        map.end()
    }
}

struct Group<'a>(&'a [&'a Element]);

impl Serialize for Group<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for element in self.0 {
            seq.serialize_element(&Content(element))?;
        }
        seq.end()
    }
}

/// Serializes as a single-entry map from the tag to the content.
impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &Content(self))?;
        map.end()
    }
}
