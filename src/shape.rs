//! Type shapes and descriptors.
//!
//! Every mappable type reports a [`TypeInfo`] when it is first used. The
//! classifier in [`registry`](crate::registry) folds that into a
//! [`TypeDescriptor`] whose [`Shape`] drives both the serializer and the
//! deserializer.

use crate::config::Config;
use crate::naming;
use crate::registry;
use crate::value::Xmlize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A lazily resolved reference to another type's descriptor.
#[derive(Clone, Copy)]
pub struct TypeRef(fn() -> Arc<TypeDescriptor>);

impl TypeRef {
    /// Refers to the descriptor of `T`.
    #[inline]
    pub fn of<T: Xmlize>() -> Self {
        TypeRef(registry::describe::<T>)
    }

    /// Resolves the descriptor, classifying the type on first use.
    #[inline]
    pub fn get(&self) -> Arc<TypeDescriptor> {
        (self.0)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.get().type_name).finish()
    }
}

/// The mapping classification of a type.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Text, boolean or number written as character data.
    Scalar,
    /// Enumerated value written as its name or integer.
    Enum,
    /// Date and time written with the configured pattern.
    Timestamp,
    /// Growable sequence.
    List {
        /// Declared item type.
        item: TypeRef,
    },
    /// Fixed-size sequence.
    Array {
        /// Declared item type.
        item: TypeRef,
    },
    /// Keyed map whose keys become element names.
    Dictionary {
        /// Declared value type.
        value: TypeRef,
    },
    /// Composite with registered fields.
    Object,
    /// Rows of named text columns.
    Table,
}

impl Shape {
    /// Returns the shape name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Scalar => "Scalar",
            Shape::Enum => "Enum",
            Shape::Timestamp => "Timestamp",
            Shape::List { .. } => "List",
            Shape::Array { .. } => "Array",
            Shape::Dictionary { .. } => "Dictionary",
            Shape::Object => "Object",
            Shape::Table => "Table",
        }
    }

    /// Returns true for shapes whose content is a single run of text.
    #[inline]
    pub fn is_textual(&self) -> bool {
        matches!(self, Shape::Scalar | Shape::Enum | Shape::Timestamp)
    }

    /// Returns the declared item or value type of a collection shape.
    pub fn element(&self) -> Option<TypeRef> {
        match self {
            Shape::List { item } | Shape::Array { item } => Some(*item),
            Shape::Dictionary { value } => Some(*value),
            _ => None,
        }
    }
}

/// A registered object field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field identifier.
    pub name: &'static str,
    /// Never written or read.
    pub skip: bool,
}

impl FieldInfo {
    /// A mapped field.
    pub const fn new(name: &'static str) -> Self {
        Self { name, skip: false }
    }

    /// A field carrying the "do not serialize" marker.
    pub const fn skipped(name: &'static str) -> Self {
        Self { name, skip: true }
    }
}

/// An enum variant's symbolic name and integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    /// Symbolic name.
    pub name: &'static str,
    /// Underlying integer.
    pub value: i64,
}

impl Variant {
    /// Creates a variant description.
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self { name, value }
    }
}

/// What a type reports about itself to the classifier.
#[derive(Debug, Clone, Copy)]
pub enum TypeInfo {
    /// Nullable or pointer wrapper, classified as its inner type.
    Wrapped(TypeRef),
    /// Text, boolean or number.
    Scalar {
        /// Inferred tag name.
        name: &'static str,
    },
    /// Enumerated value.
    Enum {
        /// Type name.
        name: &'static str,
        /// Variants in declaration order.
        variants: &'static [Variant],
    },
    /// Date and time value.
    Timestamp {
        /// Inferred tag name.
        name: &'static str,
    },
    /// Tuple-like composite without a declared name.
    Anonymous {
        /// Positional fields in order.
        fields: &'static [FieldInfo],
    },
    /// Keyed map.
    Map {
        /// Value type.
        value: TypeRef,
    },
    /// Growable sequence.
    List {
        /// Item type.
        item: TypeRef,
    },
    /// Fixed-size sequence.
    Array {
        /// Item type.
        item: TypeRef,
    },
    /// Named composite.
    Object {
        /// Type name.
        name: &'static str,
        /// Fields in declaration order.
        fields: &'static [FieldInfo],
    },
    /// Tabular rows.
    Table,
}

/// A field as the serializer and deserializer see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field identifier, used to get and set the field.
    pub name: &'static str,
    /// PascalCase tag before configured casing.
    pub tag: String,
    /// Never written or read.
    pub skip: bool,
}

/// The classification of one type. Immutable once registered.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// The shape driving the mapping.
    pub shape: Shape,
    /// Rust type name, for diagnostics.
    pub type_name: &'static str,
    /// Inferred tag before configured casing.
    pub name: String,
    /// Registered fields in declaration order (objects only).
    pub fields: Vec<FieldDescriptor>,
    /// Variants in declaration order (enums only).
    pub variants: &'static [Variant],
}

impl TypeDescriptor {
    /// Creates a descriptor without fields or variants.
    pub fn new(shape: Shape, type_name: &'static str, name: impl Into<String>) -> Self {
        Self {
            shape,
            type_name,
            name: name.into(),
            fields: Vec::new(),
            variants: &[],
        }
    }

    /// Inferred tag under the given configuration.
    #[inline]
    pub fn tag(&self, config: &Config) -> Cow<'_, str> {
        naming::tag_name(&self.name, config)
    }
}
