//! The serializer.
//!
//! Walks a value through its [`View`] and writes nested elements. The
//! registered [`Shape`] decides how each value is written; a view that
//! disagrees with its shape is an [`UnsupportedShape`](crate::ErrorKind::UnsupportedShape)
//! error.

use crate::config::{Config, EnumMode};
use crate::error::{Error, ErrorKind, Result};
use crate::naming;
use crate::registry::describe;
use crate::shape::{Shape, TypeDescriptor};
use crate::table::{Table, ROW_TAG};
use crate::value::{View, Xmlize};
use crate::writer::XmlWriter;
use chrono::NaiveDateTime;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;

/// Serializes a value with the default configuration. The root tag is the
/// value's inferred tag.
///
/// # Example
///
/// ```
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// xmlize::object!(Person { name, age });
///
/// let person = Person { name: "Kevin".to_string(), age: 21 };
/// let xml = xmlize::to_string(&person).unwrap();
/// assert_eq!(xml, "<Person><Name>Kevin</Name><Age>21</Age></Person>");
/// ```
pub fn to_string<T: Xmlize>(value: &T) -> Result<String> {
    to_string_with(value, None, &Config::default())
}

/// Serializes a value under a caller-chosen root tag.
pub fn to_string_with_root<T: Xmlize>(value: &T, root: &str) -> Result<String> {
    to_string_with(value, Some(root), &Config::default())
}

/// Serializes a value with an explicit root tag and configuration.
pub fn to_string_with<T: Xmlize>(value: &T, root: Option<&str>, config: &Config) -> Result<String> {
    let mut serializer = Serializer::new(Vec::with_capacity(256), config);
    serializer.serialize_root(value, root)?;
    String::from_utf8(serializer.into_inner()).map_err(|_| Error::new(ErrorKind::InvalidUtf8))
}

/// Serializes a value to bytes with the default configuration.
pub fn to_vec<T: Xmlize>(value: &T) -> Result<Vec<u8>> {
    to_vec_with(value, &Config::default())
}

/// Serializes a value to bytes with an explicit configuration.
pub fn to_vec_with<T: Xmlize>(value: &T, config: &Config) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(Vec::with_capacity(256), config);
    serializer.serialize_root(value, None)?;
    Ok(serializer.into_inner())
}

/// Serializes a value into a writer.
pub fn to_writer<W, T>(writer: W, value: &T, config: &Config) -> Result<()>
where
    W: Write,
    T: Xmlize,
{
    let mut serializer = Serializer::new(writer, config);
    serializer.serialize_root(value, None)?;
    serializer.writer.flush()?;
    Ok(())
}

/// The XML serializer.
pub struct Serializer<'c, W: Write> {
    writer: XmlWriter<W>,
    config: &'c Config,
    depth: usize,
    /// Objects on the current path, by address and type.
    path: HashSet<(usize, TypeId)>,
    buf: String,
}

impl<'c, W: Write> Serializer<'c, W> {
    /// Creates a serializer writing into `writer`.
    pub fn new(writer: W, config: &'c Config) -> Self {
        let writer = if config.pretty_print {
            XmlWriter::with_indent(writer, &config.indent)
        } else {
            XmlWriter::new(writer)
        };
        Self {
            writer,
            config,
            depth: 0,
            path: HashSet::new(),
            buf: String::new(),
        }
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Writes a complete document.
    ///
    /// The root is always written, even for a null value.
    pub fn serialize_root<T: Xmlize>(&mut self, value: &T, root: Option<&str>) -> Result<()> {
        if self.config.xml_declaration {
            self.writer.write_declaration("1.0", Some("utf-8"))?;
        }

        let desc = describe::<T>();
        let tag = match root {
            Some(root) => Cow::Borrowed(root),
            None => desc.tag(self.config),
        };

        self.writer.start_element(&tag)?;
        let view = value.view();
        if !view.is_unset() {
            self.write_view(&desc, view)?;
        }
        self.writer.end_element()?;
        Ok(())
    }

    /// Writes `value` as an element named `tag`.
    ///
    /// Unset values produce nothing when null fields are skipped, and an
    /// empty pair otherwise.
    pub fn write_element(&mut self, tag: &str, value: &dyn Xmlize) -> Result<()> {
        let view = value.view();
        if view.is_unset() {
            if !self.config.skip_null_fields {
                self.writer.write_empty_element(tag)?;
            }
            return Ok(());
        }

        self.writer.start_element(tag)?;
        self.write_view(&value.descriptor(), view)?;
        self.writer.end_element()?;
        Ok(())
    }

    fn write_view(&mut self, desc: &TypeDescriptor, view: View<'_>) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(Error::recursion_limit(self.config.max_depth));
        }
        self.depth += 1;
        let result = self.write_shape(desc, view);
        self.depth -= 1;
        result
    }

    fn write_shape(&mut self, desc: &TypeDescriptor, view: View<'_>) -> Result<()> {
        match (&desc.shape, view) {
            (Shape::Scalar, View::Scalar(scalar)) => {
                self.buf.clear();
                scalar.write_to(&mut self.buf);
                self.writer.write_text(&self.buf)?;
            }
            (Shape::Enum, View::Enum(variant)) => match self.config.enum_mode {
                EnumMode::Name => self.writer.write_text(variant.name)?,
                EnumMode::Integer => {
                    self.writer.write_text(itoa::Buffer::new().format(variant.value))?
                }
            },
            (Shape::Timestamp, View::Timestamp(timestamp)) => self.write_timestamp(&timestamp)?,
            (Shape::List { item } | Shape::Array { item }, View::Seq(items)) => {
                let item = item.get();
                let tag = item.tag(self.config);
                for child in items {
                    self.write_element(&tag, child)?;
                }
            }
            (Shape::Dictionary { .. }, View::Map(entries)) => {
                for (key, child) in entries {
                    self.write_element(&naming::encode_key(&key), child)?;
                }
            }
            (Shape::Object, View::Object(object)) => self.write_object(object, desc)?,
            (Shape::Table, View::Table(table)) => self.write_table(table)?,
            (shape, view) => {
                return Err(Error::unsupported_shape(format!(
                    "{} is registered as {} but produced a {} view",
                    desc.type_name,
                    shape.name(),
                    view.kind()
                )));
            }
        }
        Ok(())
    }

    fn write_timestamp(&mut self, timestamp: &NaiveDateTime) -> Result<()> {
        use std::fmt::Write as _;
        self.buf.clear();
        write!(self.buf, "{}", timestamp.format(&self.config.timestamp_format)).map_err(|_| {
            Error::custom(format!(
                "invalid timestamp format {:?}",
                self.config.timestamp_format
            ))
        })?;
        self.writer.write_text(&self.buf)?;
        Ok(())
    }

    fn write_object(&mut self, object: &dyn Xmlize, desc: &TypeDescriptor) -> Result<()> {
        let key = (
            object as *const dyn Xmlize as *const () as usize,
            object.type_key(),
        );
        if !self.path.insert(key) {
            tracing::warn!(type_name = desc.type_name, "cycle detected while serializing");
            return Err(Error::cycle(desc.type_name));
        }

        let result = self.write_fields(object, desc);
        self.path.remove(&key);
        result
    }

    fn write_fields(&mut self, object: &dyn Xmlize, desc: &TypeDescriptor) -> Result<()> {
        for field in desc.fields.iter().filter(|f| !f.skip) {
            let Some(child) = object.field(field.name) else {
                continue;
            };
            let tag = naming::tag_name(&field.tag, self.config);
            self.write_element(&tag, child)?;
        }
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        let columns: Vec<Cow<'_, str>> = table.columns().iter().map(|c| naming::encode_key(c)).collect();
        for row in table.rows() {
            self.writer.start_element(ROW_TAG)?;
            for (column, cell) in columns.iter().zip(row) {
                match cell {
                    Some(text) => self.writer.write_element(column, text)?,
                    None if !self.config.skip_null_fields => self.writer.write_empty_element(column)?,
                    None => {}
                }
            }
            self.writer.end_element()?;
        }
        Ok(())
    }
}
