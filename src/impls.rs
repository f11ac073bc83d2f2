//! `Xmlize` for standard library, chrono, rust_decimal and indexmap types.

use crate::de::Deserializer;
use crate::dom::Element;
use crate::error::Result;
use crate::shape::{FieldInfo, TypeInfo, TypeRef};
use crate::value::{MapKey, Scalar, View, Xmlize};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

macro_rules! number_impls {
    ($($ty:ty => $name:literal, $variant:ident($wide:ty);)*) => {
        $(
            impl Xmlize for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::Scalar { name: $name }
                }

                #[allow(clippy::unnecessary_cast)]
                fn view(&self) -> View<'_> {
                    View::Scalar(Scalar::$variant(*self as $wide))
                }

                fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
                    Ok(de.parse_scalar(node))
                }
            }
        )*
    };
}

number_impls! {
    i8 => "SByte", Int(i64);
    i16 => "Int16", Int(i64);
    i32 => "Int32", Int(i64);
    i64 => "Int64", Int(i64);
    isize => "Int64", Int(i64);
    u8 => "Byte", UInt(u64);
    u16 => "UInt16", UInt(u64);
    u32 => "UInt32", UInt(u64);
    u64 => "UInt64", UInt(u64);
    usize => "UInt64", UInt(u64);
    f32 => "Single", F32(f32);
    f64 => "Double", F64(f64);
}

impl Xmlize for Decimal {
    fn type_info() -> TypeInfo {
        TypeInfo::Scalar { name: "Decimal" }
    }

    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Decimal(*self))
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.parse_scalar(node))
    }
}

impl Xmlize for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::Scalar { name: "Boolean" }
    }

    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Bool(*self))
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.parse_bool(node))
    }
}

impl Xmlize for char {
    fn type_info() -> TypeInfo {
        TypeInfo::Scalar { name: "Char" }
    }

    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Char(*self))
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.parse_char(node))
    }
}

impl Xmlize for String {
    fn type_info() -> TypeInfo {
        TypeInfo::Scalar { name: "String" }
    }

    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Str(self))
    }

    /// Text is taken as written, whitespace included.
    fn read(node: &Element, _de: &Deserializer<'_>) -> Result<Self> {
        Ok(node.text().into_owned())
    }
}

impl Xmlize for NaiveDateTime {
    fn type_info() -> TypeInfo {
        TypeInfo::Timestamp { name: "DateTime" }
    }

    fn view(&self) -> View<'_> {
        View::Timestamp(*self)
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.read_timestamp(node))
    }
}

impl Xmlize for DateTime<Utc> {
    fn type_info() -> TypeInfo {
        TypeInfo::Timestamp { name: "DateTime" }
    }

    fn view(&self) -> View<'_> {
        View::Timestamp(self.naive_utc())
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(Utc.from_utc_datetime(&de.read_timestamp(node)))
    }
}

impl<T: Xmlize> Xmlize for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Wrapped(TypeRef::of::<T>())
    }

    fn view(&self) -> View<'_> {
        match self {
            Some(value) => value.view(),
            None => View::Null,
        }
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        if de.is_null::<T>(node) {
            return Ok(None);
        }
        T::read(node, de).map(Some)
    }
}

impl<T: Xmlize> Xmlize for OnceCell<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Wrapped(TypeRef::of::<T>())
    }

    fn view(&self) -> View<'_> {
        self.get().map_or(View::Null, Xmlize::view)
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        if de.is_null::<T>(node) {
            return Ok(OnceCell::new());
        }
        T::read(node, de).map(OnceCell::from)
    }
}

macro_rules! pointer_impls {
    ($($ptr:ident),*) => {
        $(
            impl<T: Xmlize> Xmlize for $ptr<T> {
                fn type_info() -> TypeInfo {
                    TypeInfo::Wrapped(TypeRef::of::<T>())
                }

                fn view(&self) -> View<'_> {
                    (**self).view()
                }

                fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
                    T::read(node, de).map($ptr::new)
                }
            }
        )*
    };
}

pointer_impls!(Box, Rc, Arc);

fn seq<'a, T: Xmlize, I>(items: I) -> View<'a>
where
    I: Iterator<Item = &'a T> + 'a,
{
    View::Seq(Box::new(items.map(|item| item as &dyn Xmlize)))
}

impl<T: Xmlize> Xmlize for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::List { item: TypeRef::of::<T>() }
    }

    fn view(&self) -> View<'_> {
        seq(self.iter())
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        de.read_items(node)
    }
}

impl<T: Xmlize> Xmlize for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::List { item: TypeRef::of::<T>() }
    }

    fn view(&self) -> View<'_> {
        seq(self.iter())
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        de.read_items(node).map(VecDeque::from)
    }
}

impl<T: Xmlize> Xmlize for Box<[T]> {
    fn type_info() -> TypeInfo {
        TypeInfo::Array { item: TypeRef::of::<T>() }
    }

    fn view(&self) -> View<'_> {
        seq(self.iter())
    }

    /// Sized to the number of matching children.
    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        de.read_items(node).map(Vec::into_boxed_slice)
    }
}

impl<T: Xmlize + Default, const N: usize> Xmlize for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::Array { item: TypeRef::of::<T>() }
    }

    fn view(&self) -> View<'_> {
        seq(self.iter())
    }

    /// Missing trailing items are defaulted and surplus items dropped.
    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        let mut items = de.read_items::<T>(node)?.into_iter();
        Ok(std::array::from_fn(|_| items.next().unwrap_or_default()))
    }
}

fn entries<'a, K, V, I>(iter: I) -> Vec<(Cow<'a, str>, &'a dyn Xmlize)>
where
    K: MapKey + 'a,
    V: Xmlize,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    iter.map(|(k, v)| (k.to_key(), v as &dyn Xmlize)).collect()
}

impl<K, V> Xmlize for HashMap<K, V>
where
    K: MapKey + Eq + Hash + 'static,
    V: Xmlize,
{
    fn type_info() -> TypeInfo {
        TypeInfo::Map { value: TypeRef::of::<V>() }
    }

    /// Entries are sorted by key text so output is deterministic.
    fn view(&self) -> View<'_> {
        let mut entries = entries(self.iter());
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        View::Map(entries)
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.read_entries(node)?.into_iter().collect())
    }
}

impl<K, V> Xmlize for BTreeMap<K, V>
where
    K: MapKey + Ord + 'static,
    V: Xmlize,
{
    fn type_info() -> TypeInfo {
        TypeInfo::Map { value: TypeRef::of::<V>() }
    }

    fn view(&self) -> View<'_> {
        View::Map(entries(self.iter()))
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.read_entries(node)?.into_iter().collect())
    }
}

impl<K, V> Xmlize for IndexMap<K, V>
where
    K: MapKey + Eq + Hash + 'static,
    V: Xmlize,
{
    fn type_info() -> TypeInfo {
        TypeInfo::Map { value: TypeRef::of::<V>() }
    }

    /// Entries keep insertion order.
    fn view(&self) -> View<'_> {
        View::Map(entries(self.iter()))
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        Ok(de.read_entries(node)?.into_iter().collect())
    }
}

macro_rules! tuple_impls {
    ($($name:ident : $idx:tt => $field:literal),+) => {
        impl<$($name: Xmlize + Default),+> Xmlize for ($($name,)+) {
            fn type_info() -> TypeInfo {
                const FIELDS: &[FieldInfo] = &[$(FieldInfo::new($field)),+];
                TypeInfo::Anonymous { fields: FIELDS }
            }

            fn view(&self) -> View<'_> {
                View::Object(self)
            }

            fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
                de.read_object(node)
            }

            fn field(&self, name: &str) -> Option<&dyn Xmlize> {
                match name {
                    $($field => Some(&self.$idx as &dyn Xmlize),)+
                    _ => None,
                }
            }

            fn read_field(&mut self, name: &str, node: &Element, de: &Deserializer<'_>) -> Result<()> {
                match name {
                    $($field => de.read_into(&mut self.$idx, node),)+
                    _ => Ok(()),
                }
            }
        }
    };
}

tuple_impls!(A: 0 => "item1", B: 1 => "item2");
tuple_impls!(A: 0 => "item1", B: 1 => "item2", C: 2 => "item3");

#[cfg(test)]
mod tests {
    use crate::{from_str, to_string};
    use chrono::{DateTime, NaiveDate, Utc};
    use indexmap::IndexMap;
    use rust_decimal::Decimal;
    use std::cell::OnceCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::Arc;

    #[test]
    fn test_integer_extremes() {
        let xml = to_string(&i64::MIN).unwrap();
        assert_eq!(xml, "<Int64>-9223372036854775808</Int64>");
        assert_eq!(from_str::<i64>(&xml).unwrap(), i64::MIN);
        assert_eq!(to_string(&usize::MAX).unwrap(), format!("<UInt64>{}</UInt64>", usize::MAX));
    }

    #[test]
    fn test_floats_and_decimal() {
        assert_eq!(to_string(&0.1f32).unwrap(), "<Single>0.1</Single>");
        assert_eq!(from_str::<f32>("<Single>0.1</Single>").unwrap(), 0.1f32);
        assert!(from_str::<f64>("<Double>NaN</Double>").unwrap().is_nan());

        let price = Decimal::new(1999, 2);
        let xml = to_string(&price).unwrap();
        assert_eq!(xml, "<Decimal>19.99</Decimal>");
        assert_eq!(from_str::<Decimal>(&xml).unwrap(), price);
    }

    #[test]
    fn test_utc_timestamp() {
        let at: DateTime<Utc> = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
            .and_utc();
        let xml = to_string(&at).unwrap();
        assert_eq!(xml, "<DateTime>2024-01-02 03:04:05</DateTime>");
        assert_eq!(from_str::<DateTime<Utc>>(&xml).unwrap(), at);
    }

    #[test]
    fn test_pointers_are_transparent() {
        assert_eq!(to_string(&Box::new(5u8)).unwrap(), "<Byte>5</Byte>");
        assert_eq!(to_string(&Rc::new("x".to_string())).unwrap(), "<String>x</String>");
        assert_eq!(*from_str::<Arc<u8>>("<Byte>5</Byte>").unwrap(), 5);

        let cell: OnceCell<u8> = from_str("<Byte>5</Byte>").unwrap();
        assert_eq!(cell.get(), Some(&5));
        let empty: OnceCell<u8> = from_str("<Byte></Byte>").unwrap();
        assert!(empty.get().is_none());
    }

    #[test]
    fn test_sequences() {
        let queue: VecDeque<char> = "ab".chars().collect();
        assert_eq!(to_string(&queue).unwrap(), "<Chars><Char>a</Char><Char>b</Char></Chars>");

        let fixed = [true, false];
        let xml = to_string(&fixed).unwrap();
        assert_eq!(xml, "<Booleans><Boolean>true</Boolean><Boolean>false</Boolean></Booleans>");
        assert_eq!(from_str::<[bool; 2]>(&xml).unwrap(), fixed);

        let boxed: Box<[u32]> = vec![1, 2, 3].into_boxed_slice();
        assert_eq!(from_str::<Box<[u32]>>(&to_string(&boxed).unwrap()).unwrap(), boxed);
    }

    #[test]
    fn test_index_map_keeps_order() {
        let mut map = IndexMap::new();
        map.insert("z".to_string(), 1u8);
        map.insert("a".to_string(), 2u8);
        let xml = to_string(&map).unwrap();
        assert_eq!(xml, "<Dictionary><z>1</z><a>2</a></Dictionary>");
        assert_eq!(from_str::<IndexMap<String, u8>>(&xml).unwrap(), map);
    }

    #[test]
    fn test_triples() {
        let triple = ("a".to_string(), 1i32, Some(2.5f64));
        let xml = to_string(&triple).unwrap();
        assert_eq!(
            xml,
            "<Item><Item1>a</Item1><Item2>1</Item2><Item3>2.5</Item3></Item>"
        );
        assert_eq!(from_str::<(String, i32, Option<f64>)>(&xml).unwrap(), triple);
    }
}
