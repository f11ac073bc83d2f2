//! The [`Xmlize`] trait and the value views the serializer walks.
//!
//! A type takes part in mapping by describing itself ([`Xmlize::type_info`]),
//! exposing a read-only [`View`] of its current value, and rebuilding itself
//! from an element. Named structs and enums are registered with the
//! [`object!`](crate::object) and [`enumeration!`](crate::enumeration)
//! macros; the standard library, chrono and indexmap types are covered by
//! the crate.

use crate::de::Deserializer;
use crate::dom::Element;
use crate::error::Result;
use crate::registry::Described;
use crate::shape::{TypeInfo, Variant};
use crate::table::Table;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::borrow::Cow;

/// A type that can be mapped to and from XML.
pub trait Xmlize: Described + 'static {
    /// Describes the type to the classifier.
    fn type_info() -> TypeInfo
    where
        Self: Sized;

    /// Returns a read-only view of the current value.
    fn view(&self) -> View<'_>;

    /// Rebuilds a value from an element.
    ///
    /// Missing or unparsable content yields the type's default rather than
    /// an error.
    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self>
    where
        Self: Sized;

    /// Returns a registered field by Rust identifier.
    fn field(&self, _name: &str) -> Option<&dyn Xmlize> {
        None
    }

    /// Replaces a registered field with the value read from `node`.
    fn read_field(&mut self, _name: &str, _node: &Element, _de: &Deserializer<'_>) -> Result<()> {
        Ok(())
    }
}

/// A primitive value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Text.
    Str(&'a str),
    /// A single character.
    Char(char),
    /// Boolean, written `true` or `false`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Single precision float.
    F32(f32),
    /// Double precision float.
    F64(f64),
    /// Fixed point decimal.
    Decimal(Decimal),
}

impl Scalar<'_> {
    /// Appends the textual form of the scalar.
    ///
    /// Strings are appended verbatim; CDATA wrapping is the writer's job.
    pub fn write_to(&self, out: &mut String) {
        match *self {
            Scalar::Str(s) => out.push_str(s),
            Scalar::Char(c) => out.push(c),
            Scalar::Bool(b) => out.push_str(if b { "true" } else { "false" }),
            Scalar::Int(n) => out.push_str(itoa::Buffer::new().format(n)),
            Scalar::UInt(n) => out.push_str(itoa::Buffer::new().format(n)),
            Scalar::F32(n) => out.push_str(ryu::Buffer::new().format(n)),
            Scalar::F64(n) => out.push_str(ryu::Buffer::new().format(n)),
            Scalar::Decimal(d) => {
                use std::fmt::Write;
                let _ = write!(out, "{}", d);
            }
        }
    }
}

/// A read-only view of a value, as the serializer sees it.
pub enum View<'a> {
    /// No value. Written as an empty element or skipped.
    Null,
    /// Primitive value.
    Scalar(Scalar<'a>),
    /// Enumerated value.
    Enum(Variant),
    /// Date and time.
    Timestamp(NaiveDateTime),
    /// Items of a list or array, in order.
    Seq(Box<dyn Iterator<Item = &'a dyn Xmlize> + 'a>),
    /// Dictionary entries with their keys already rendered as text.
    Map(Vec<(Cow<'a, str>, &'a dyn Xmlize)>),
    /// Composite whose fields are read through [`Xmlize::field`].
    ///
    /// Carries the composite itself so wrappers can expose it transparently.
    Object(&'a dyn Xmlize),
    /// Tabular rows.
    Table(&'a Table),
}

impl View<'_> {
    /// Returns the view kind used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            View::Null => "Null",
            View::Scalar(_) => "Scalar",
            View::Enum(_) => "Enum",
            View::Timestamp(_) => "Timestamp",
            View::Seq(_) => "Seq",
            View::Map(_) => "Map",
            View::Object(_) => "Object",
            View::Table(_) => "Table",
        }
    }

    /// Returns true for values the serializer treats as absent: nulls and
    /// timestamps still at the epoch default.
    pub fn is_unset(&self) -> bool {
        match self {
            View::Null => true,
            View::Timestamp(t) => *t == NaiveDateTime::default(),
            _ => false,
        }
    }
}

/// A dictionary key type.
pub trait MapKey: Sized {
    /// Renders the key before tag escaping.
    fn to_key(&self) -> Cow<'_, str>;

    /// Parses a decoded key. `None` drops the entry.
    fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }
}

macro_rules! int_keys {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                fn to_key(&self) -> Cow<'_, str> {
                    Cow::Owned(itoa::Buffer::new().format(*self).to_string())
                }

                fn from_key(key: &str) -> Option<Self> {
                    key.parse().ok()
                }
            }
        )*
    };
}

int_keys!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

#[doc(hidden)]
#[macro_export]
macro_rules! __field_info {
    ($field:ident) => {
        $crate::FieldInfo::new(stringify!($field))
    };
    ($field:ident skip) => {
        $crate::FieldInfo::skipped(stringify!($field))
    };
}

/// Registers a struct as an object.
///
/// Fields are listed in the order they are written. A field marked
/// `#[skip]` is never written or read. The struct must implement
/// `Default`, which supplies every field the document does not.
///
/// ```
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: i32,
///     password: String,
/// }
///
/// xmlize::object!(Person { name, age, #[skip] password });
///
/// let xml = xmlize::to_string(&Person { name: "Kevin".into(), age: 21, password: "x".into() }).unwrap();
/// assert_eq!(xml, "<Person><Name>Kevin</Name><Age>21</Age></Person>");
/// ```
#[macro_export]
macro_rules! object {
    ($ty:ident { $( $(#[$marker:ident])? $field:ident ),* $(,)? }) => {
        impl $crate::Xmlize for $ty {
            fn type_info() -> $crate::TypeInfo {
                const FIELDS: &[$crate::FieldInfo] = &[
                    $( $crate::__field_info!($field $($marker)?) ),*
                ];
                $crate::TypeInfo::Object { name: stringify!($ty), fields: FIELDS }
            }

            fn view(&self) -> $crate::View<'_> {
                $crate::View::Object(self)
            }

            fn read(node: &$crate::Element, de: &$crate::Deserializer<'_>) -> $crate::Result<Self> {
                de.read_object::<Self>(node)
            }

            fn field(&self, name: &str) -> Option<&dyn $crate::Xmlize> {
                match name {
                    $( stringify!($field) => Some(&self.$field as &dyn $crate::Xmlize), )*
                    _ => None,
                }
            }

            fn read_field(
                &mut self,
                name: &str,
                node: &$crate::Element,
                de: &$crate::Deserializer<'_>,
            ) -> $crate::Result<()> {
                match name {
                    $( stringify!($field) => de.read_into(&mut self.$field, node), )*
                    _ => Ok(()),
                }
            }
        }
    };
}

/// Registers a fieldless enum.
///
/// Each variant is listed with its integer value. The first variant is the
/// fallback for text that matches no variant.
///
/// ```
/// #[derive(Debug, PartialEq)]
/// enum Sex {
///     Male,
///     Female,
/// }
///
/// xmlize::enumeration!(Sex { Male = 0, Female = 1 });
///
/// assert_eq!(xmlize::to_string(&Sex::Female).unwrap(), "<Sex>Female</Sex>");
/// assert_eq!(xmlize::from_str::<Sex>("1").unwrap(), Sex::Female);
/// ```
#[macro_export]
macro_rules! enumeration {
    ($ty:ident { $first:ident = $first_value:expr $(, $variant:ident = $value:expr )* $(,)? }) => {
        impl $crate::Xmlize for $ty {
            fn type_info() -> $crate::TypeInfo {
                const VARIANTS: &[$crate::Variant] = &[
                    $crate::Variant::new(stringify!($first), $first_value),
                    $( $crate::Variant::new(stringify!($variant), $value), )*
                ];
                $crate::TypeInfo::Enum { name: stringify!($ty), variants: VARIANTS }
            }

            fn view(&self) -> $crate::View<'_> {
                match self {
                    $ty::$first => $crate::View::Enum(
                        $crate::Variant::new(stringify!($first), $first_value),
                    ),
                    $( $ty::$variant => $crate::View::Enum(
                        $crate::Variant::new(stringify!($variant), $value),
                    ), )*
                }
            }

            fn read(node: &$crate::Element, de: &$crate::Deserializer<'_>) -> $crate::Result<Self> {
                let desc = $crate::registry::describe::<Self>();
                Ok(match de.read_enum(node, desc.variants) {
                    $( Some(stringify!($variant)) => $ty::$variant, )*
                    _ => $ty::$first,
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(s: Scalar<'_>) -> String {
        let mut out = String::new();
        s.write_to(&mut out);
        out
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(render(Scalar::Str("a<b")), "a<b");
        assert_eq!(render(Scalar::Bool(true)), "true");
        assert_eq!(render(Scalar::Int(-42)), "-42");
        assert_eq!(render(Scalar::UInt(u64::MAX)), "18446744073709551615");
        assert_eq!(render(Scalar::F64(1.5)), "1.5");
        assert_eq!(render(Scalar::F32(0.1)), "0.1");
        assert_eq!(render(Scalar::Decimal(Decimal::new(12345, 2))), "123.45");
    }

    #[test]
    fn test_unset_views() {
        assert!(View::Null.is_unset());
        assert!(View::Timestamp(NaiveDateTime::default()).is_unset());
        assert!(!View::Scalar(Scalar::Int(0)).is_unset());
        assert!(!View::Scalar(Scalar::Str("")).is_unset());
    }

    #[test]
    fn test_map_keys() {
        assert_eq!(42u32.to_key(), "42");
        assert_eq!(i64::from_key("-7"), Some(-7));
        assert_eq!(u8::from_key("300"), None);
        assert_eq!(String::from_key("a b").as_deref(), Some("a b"));
    }
}
