//! The deserializer.
//!
//! Parses input into an [`Element`] tree, then rebuilds the target type
//! guided by its registered shape. Malformed XML is an error. Content that
//! does not fit the target degrades quietly: missing fields keep their
//! defaults, unknown children are ignored, and unparsable scalars fall back
//! to their default value.

use crate::config::Config;
use crate::dom::{self, Element};
use crate::error::{Error, ErrorKind, Result};
use crate::naming;
use crate::registry::describe;
use crate::shape::Variant;
use crate::table::{Table, ROW_TAG};
use crate::value::{MapKey, Xmlize};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::str::FromStr;

/// Deserializes a value with the default configuration.
///
/// # Example
///
/// ```
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// xmlize::object!(Person { name, age });
///
/// let xml = "<Person><Name>Alice</Name><Age>30</Age></Person>";
/// let person: Person = xmlize::from_str(xml).unwrap();
/// assert_eq!(person.name, "Alice");
/// assert_eq!(person.age, 30);
/// ```
pub fn from_str<T: Xmlize>(s: &str) -> Result<T> {
    from_str_with(s, &Config::default())
}

/// Deserializes a value with an explicit configuration.
///
/// The root tag is not checked. A scalar, enum or timestamp target reads the
/// whole input as text unless it starts with an element.
pub fn from_str_with<T: Xmlize>(s: &str, config: &Config) -> Result<T> {
    let desc = describe::<T>();
    if desc.shape.is_textual() && !s.trim_start().starts_with('<') {
        return from_element(&Element::with_text(desc.name.as_str(), s), config);
    }
    let root = dom::parse_with(s, config)?;
    from_element(&root, config)
}

/// Deserializes a value from UTF-8 bytes with the default configuration.
pub fn from_bytes<T: Xmlize>(bytes: &[u8]) -> Result<T> {
    from_bytes_with(bytes, &Config::default())
}

/// Deserializes a value from UTF-8 bytes with an explicit configuration.
pub fn from_bytes_with<T: Xmlize>(bytes: &[u8], config: &Config) -> Result<T> {
    let s = std::str::from_utf8(bytes).map_err(|_| Error::new(ErrorKind::InvalidUtf8))?;
    from_str_with(s, config)
}

/// Deserializes a value from a reader.
///
/// The whole input is read before parsing starts.
///
/// ```
/// let file: &[u8] = b"<Int32>21</Int32>";
/// let age: i32 = xmlize::from_reader(file, &xmlize::Config::default()).unwrap();
/// assert_eq!(age, 21);
/// ```
pub fn from_reader<R: Read, T: Xmlize>(mut reader: R, config: &Config) -> Result<T> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_bytes_with(&bytes, config)
}

/// Deserializes a value from an already parsed element.
///
/// `root` is treated as the document root: an empty root reads as null.
pub fn from_element<T: Xmlize>(root: &Element, config: &Config) -> Result<T> {
    T::read(root, &Deserializer::with_root(config, root))
}

/// The XML deserializer.
///
/// Carries the configuration through [`Xmlize::read`] and provides the
/// shape-level reading operations that implementations delegate to.
pub struct Deserializer<'c> {
    config: &'c Config,
    root: Option<&'c Element>,
}

impl<'c> Deserializer<'c> {
    /// Creates a deserializer.
    pub fn new(config: &'c Config) -> Self {
        Self { config, root: None }
    }

    /// Creates a deserializer for the document rooted at `root`.
    pub fn with_root(config: &'c Config, root: &'c Element) -> Self {
        Self {
            config,
            root: Some(root),
        }
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &'c Config {
        self.config
    }

    /// Reads a value of type `T` from `node`.
    #[inline]
    pub fn read<T: Xmlize>(&self, node: &Element) -> Result<T> {
        T::read(node, self)
    }

    /// Reads a value of the slot's type from `node` and stores it.
    #[inline]
    pub fn read_into<T: Xmlize>(&self, slot: &mut T, node: &Element) -> Result<()> {
        *slot = T::read(node, self)?;
        Ok(())
    }

    /// Returns true if `node` stands for a null `T`.
    ///
    /// When null fields are skipped, a present element is never null, except
    /// the document root, which is written even for a null value. Otherwise
    /// text-like values are null only when the element has no content at
    /// all, and structured values are null when the element holds nothing
    /// but whitespace.
    pub fn is_null<T: Xmlize>(&self, node: &Element) -> bool {
        let at_root = self.root.is_some_and(|root| std::ptr::eq(root, node));
        if self.config.skip_null_fields && !at_root {
            return false;
        }
        if describe::<T>().shape.is_textual() {
            node.is_empty()
        } else {
            node.is_blank()
        }
    }

    /// Reads a registered object.
    ///
    /// Starts from `T::default()` and replaces each mapped field whose tag
    /// is present among the children.
    pub fn read_object<T: Xmlize + Default>(&self, node: &Element) -> Result<T> {
        let mut value = T::default();
        if !node.has_element_children() {
            return Ok(value);
        }

        let desc = describe::<T>();
        for field in desc.fields.iter().filter(|f| !f.skip) {
            let tag = naming::tag_name(&field.tag, self.config);
            if let Some(child) = node.child(&tag) {
                value.read_field(field.name, child, self)?;
            }
        }
        Ok(value)
    }

    /// Reads the children tagged with `T`'s inferred tag, in document order.
    pub fn read_items<T: Xmlize>(&self, node: &Element) -> Result<Vec<T>> {
        let item = describe::<T>();
        let tag = item.tag(self.config);

        let mut items = Vec::new();
        for child in node.children() {
            if child.name() == tag {
                items.push(T::read(child, self)?);
            } else {
                tracing::trace!(
                    expected = %tag,
                    found = child.name(),
                    "skipping collection item with unexpected tag"
                );
            }
        }
        Ok(items)
    }

    /// Reads every child as a dictionary entry keyed by its decoded tag.
    pub fn read_entries<K: MapKey, V: Xmlize>(&self, node: &Element) -> Result<Vec<(K, V)>> {
        let mut entries = Vec::new();
        for child in node.children() {
            let key = naming::decode_key(child.name());
            match K::from_key(&key) {
                Some(key) => entries.push((key, V::read(child, self)?)),
                None => tracing::debug!(key = %key, "skipping dictionary entry with unparsable key"),
            }
        }
        Ok(entries)
    }

    /// Reads `Row` children into a table, collecting columns as they appear.
    ///
    /// A missing cell is null. An empty cell is null only when null fields
    /// are written as empty elements.
    pub fn read_table(&self, node: &Element) -> Result<Table> {
        let mut table = Table::default();
        let mut rows = Vec::new();
        for row in node.children_named(ROW_TAG) {
            let mut cells = Vec::new();
            for cell in row.children() {
                let column = table.column_index(&naming::decode_key(cell.name()));
                let null = !self.config.skip_null_fields && cell.is_empty();
                let text = (!null).then(|| cell.text().into_owned());
                cells.push((column, text));
            }
            rows.push(cells);
        }

        let width = table.columns().len();
        for cells in rows {
            let mut row = vec![None; width];
            for (column, text) in cells {
                row[column] = text;
            }
            table.push_row(row);
        }
        Ok(table)
    }

    /// Parses the element text as `T`, falling back to the default.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse_scalar<T>(&self, node: &Element) -> T
    where
        T: FromStr + Default,
    {
        let text = node.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return T::default();
        }
        match trimmed.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::debug!(
                    tag = node.name(),
                    text = trimmed,
                    target = std::any::type_name::<T>(),
                    "unparsable scalar, using default"
                );
                T::default()
            }
        }
    }

    /// Parses a boolean. Accepts `true`/`false`, `1`/`0` and `yes`/`no`.
    pub fn parse_bool(&self, node: &Element) -> bool {
        let text = node.text();
        let trimmed = text.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            _ => {
                tracing::debug!(tag = node.name(), text = trimmed, "unparsable boolean, using default");
                false
            }
        }
    }

    /// Reads a single character. Anything else falls back to `'\0'`.
    pub fn parse_char(&self, node: &Element) -> char {
        let text = node.text();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            (None, _) => char::default(),
            (Some(_), Some(_)) => {
                tracing::debug!(tag = node.name(), text = %text, "expected a single character, using default");
                char::default()
            }
        }
    }

    /// Resolves the element text to a variant name.
    ///
    /// Matches a variant name first, ignoring case if no exact match exists,
    /// then an integer value. Returns `None` when nothing matches.
    pub fn read_enum(&self, node: &Element, variants: &'static [Variant]) -> Option<&'static str> {
        let text = node.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let found = variants
            .iter()
            .find(|v| v.name == trimmed)
            .or_else(|| variants.iter().find(|v| v.name.eq_ignore_ascii_case(trimmed)))
            .or_else(|| {
                let value: i64 = trimmed.parse().ok()?;
                variants.iter().find(|v| v.value == value)
            });

        if found.is_none() {
            tracing::debug!(tag = node.name(), text = trimmed, "unknown enum value, using first variant");
        }
        found.map(|v| v.name)
    }

    /// Parses a timestamp with the configured format.
    ///
    /// Date-only formats read as midnight. Empty or unparsable text yields
    /// the epoch.
    pub fn read_timestamp(&self, node: &Element) -> NaiveDateTime {
        let text = node.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return NaiveDateTime::default();
        }

        let format = self.config.timestamp_format.as_str();
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .unwrap_or_else(|| {
                tracing::debug!(tag = node.name(), text = trimmed, format, "unparsable timestamp, using epoch");
                NaiveDateTime::default()
            })
    }
}
