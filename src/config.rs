//! Mapping configuration.
//!
//! A [`Config`] is created by the caller and handed by reference to every
//! [`Serializer`](crate::ser::Serializer) and
//! [`Deserializer`](crate::de::Deserializer). Nothing in the crate reads
//! process-wide settings.

use serde::{Deserialize, Serialize};

/// Default strftime pattern for timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How enumerated values are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumMode {
    /// Symbolic variant name, e.g. `Female`.
    #[default]
    Name,
    /// Underlying integer value, e.g. `1`.
    Integer,
}

/// Formatting policy for one encode or decode call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lower the first character of every inferred and field tag.
    pub lower_camel_tags: bool,
    /// Enum rendering.
    pub enum_mode: EnumMode,
    /// chrono strftime pattern used for timestamps in both directions.
    pub timestamp_format: String,
    /// Omit elements for null values and unset timestamps.
    pub skip_null_fields: bool,
    /// Put nested elements on their own indented lines.
    pub pretty_print: bool,
    /// One level of indentation when pretty-printing.
    pub indent: String,
    /// Prefix the document with an XML declaration.
    pub xml_declaration: bool,
    /// Deepest element nesting written or parsed before failing.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lower_camel_tags: false,
            enum_mode: EnumMode::Name,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            skip_null_fields: true,
            pretty_print: false,
            indent: "  ".to_string(),
            xml_declaration: false,
            max_depth: 128,
        }
    }
}

impl Config {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables lower camel case tags.
    pub fn with_lower_camel_tags(mut self, enabled: bool) -> Self {
        self.lower_camel_tags = enabled;
        self
    }

    /// Sets the enum rendering mode.
    pub fn with_enum_mode(mut self, mode: EnumMode) -> Self {
        self.enum_mode = mode;
        self
    }

    /// Sets the timestamp pattern.
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = format.to_string();
        self
    }

    /// Controls whether null fields are omitted.
    pub fn with_skip_null_fields(mut self, skip: bool) -> Self {
        self.skip_null_fields = skip;
        self
    }

    /// Enables pretty-printing with the given indentation.
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.pretty_print = true;
        self.indent = indent.to_string();
        self
    }

    /// Includes the XML declaration in the output.
    pub fn with_declaration(mut self) -> Self {
        self.xml_declaration = true;
        self
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
