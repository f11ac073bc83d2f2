//! Type classification and the descriptor registry.
//!
//! [`classify`] turns what a type reports about itself into a
//! [`TypeDescriptor`]. [`describe`] memoizes that per type for the life of
//! the process: descriptors are written once and shared read-only by every
//! encode and decode call on every thread.

use crate::naming::{pascal_case, pluralize};
use crate::shape::{FieldDescriptor, FieldInfo, Shape, TypeDescriptor, TypeInfo};
use crate::value::Xmlize;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type Registry = RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Tag synthesized for composites without a declared name.
pub const ANONYMOUS_TAG: &str = "Item";

/// Tag inferred for dictionaries.
pub const DICTIONARY_TAG: &str = "Dictionary";

/// Tag inferred for tables.
pub const TABLE_TAG: &str = "Table";

/// Runtime access to a value's descriptor through `dyn Xmlize`.
pub trait Described {
    /// Returns the descriptor of the value's concrete type.
    fn descriptor(&self) -> Arc<TypeDescriptor>;

    /// Returns the value's concrete type identity.
    fn type_key(&self) -> TypeId;
}

impl<T: Xmlize> Described for T {
    #[inline]
    fn descriptor(&self) -> Arc<TypeDescriptor> {
        describe::<T>()
    }

    #[inline]
    fn type_key(&self) -> TypeId {
        TypeId::of::<T>()
    }
}

/// Returns the memoized descriptor of `T`, classifying it on first use.
pub fn describe<T: Xmlize>() -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    let registry = REGISTRY.get_or_init(Registry::default);

    if let Some(found) = registry
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Arc::clone(found);
    }

    // Classify without holding the lock: item types resolve recursively.
    let descriptor = Arc::new(classify(T::type_info(), std::any::type_name::<T>()));

    let mut map = registry.write().unwrap_or_else(PoisonError::into_inner);
    let entry = map.entry(id).or_insert_with(|| {
        tracing::trace!(
            type_name = descriptor.type_name,
            shape = descriptor.shape.name(),
            tag = %descriptor.name,
            "registered type descriptor"
        );
        Arc::clone(&descriptor)
    });
    Arc::clone(entry)
}

fn fields(fields: &'static [FieldInfo]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .map(|f| FieldDescriptor {
            name: f.name,
            tag: pascal_case(f.name),
            skip: f.skip,
        })
        .collect()
}

/// Classifies a type. Every input resolves to exactly one shape.
///
/// The checks run in a fixed order: wrappers unwrap first, then scalars,
/// enums, timestamps, anonymous composites, maps, lists, arrays, and
/// finally named objects.
pub fn classify(info: TypeInfo, type_name: &'static str) -> TypeDescriptor {
    match info {
        TypeInfo::Wrapped(inner) => {
            let mut descriptor = TypeDescriptor::clone(&inner.get());
            descriptor.type_name = type_name;
            descriptor
        }
        TypeInfo::Scalar { name } => TypeDescriptor::new(Shape::Scalar, type_name, name),
        TypeInfo::Enum { name, variants } => {
            let mut descriptor = TypeDescriptor::new(Shape::Enum, type_name, name);
            descriptor.variants = variants;
            descriptor
        }
        TypeInfo::Timestamp { name } => TypeDescriptor::new(Shape::Timestamp, type_name, name),
        TypeInfo::Anonymous { fields: list } => {
            let mut descriptor = TypeDescriptor::new(Shape::Object, type_name, ANONYMOUS_TAG);
            descriptor.fields = fields(list);
            descriptor
        }
        TypeInfo::Map { value } => {
            TypeDescriptor::new(Shape::Dictionary { value }, type_name, DICTIONARY_TAG)
        }
        TypeInfo::List { item } => {
            let name = pluralize(&item.get().name);
            TypeDescriptor::new(Shape::List { item }, type_name, name)
        }
        TypeInfo::Array { item } => {
            let name = pluralize(&item.get().name);
            TypeDescriptor::new(Shape::Array { item }, type_name, name)
        }
        TypeInfo::Object { name, fields: list } => {
            let mut descriptor = TypeDescriptor::new(Shape::Object, type_name, name);
            descriptor.fields = fields(list);
            descriptor
        }
        TypeInfo::Table => TypeDescriptor::new(Shape::Table, type_name, TABLE_TAG),
    }
}
