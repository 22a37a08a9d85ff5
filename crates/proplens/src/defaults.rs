//! Zero-value synthesis for property value types.
//!
//! Assigning an absent value to a property substitutes the value type's zero
//! value. Well-known primitive types are answered from a fixed table; every
//! other type needs a factory, captured once at descriptor construction and
//! registered here during table build. The factory cache is deliberately
//! separate from the accessor-table cache: different key and value shapes.
//!
//! A request for a type with no registered factory fails with
//! [`ViewError::UnconstructableDefault`] rather than silently producing an
//! absent value, keeping "legitimately absent" distinct from "could not
//! determine".

use std::any::TypeId;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::error::ViewError;
use crate::metadata::{PropValue, PropertyDescriptor};
use crate::DynValue;

/// Monomorphized "construct the zero value" function.
pub(crate) type DefaultFn = fn() -> DynValue;

/// Produce `V`'s zero value, widened.
pub(crate) fn zero_value<V: PropValue>() -> DynValue {
    Box::new(V::default())
}

/// Zero values for the well-known primitive types: booleans, all integer
/// widths, characters, floats, native-size integers, and strings.
static WELL_KNOWN: Lazy<FxHashMap<TypeId, DefaultFn>> = Lazy::new(|| {
    let mut table: FxHashMap<TypeId, DefaultFn> = FxHashMap::default();
    table.insert(TypeId::of::<bool>(), zero_value::<bool>);
    table.insert(TypeId::of::<char>(), zero_value::<char>);
    table.insert(TypeId::of::<i8>(), zero_value::<i8>);
    table.insert(TypeId::of::<u8>(), zero_value::<u8>);
    table.insert(TypeId::of::<i16>(), zero_value::<i16>);
    table.insert(TypeId::of::<u16>(), zero_value::<u16>);
    table.insert(TypeId::of::<i32>(), zero_value::<i32>);
    table.insert(TypeId::of::<u32>(), zero_value::<u32>);
    table.insert(TypeId::of::<i64>(), zero_value::<i64>);
    table.insert(TypeId::of::<u64>(), zero_value::<u64>);
    table.insert(TypeId::of::<i128>(), zero_value::<i128>);
    table.insert(TypeId::of::<u128>(), zero_value::<u128>);
    table.insert(TypeId::of::<isize>(), zero_value::<isize>);
    table.insert(TypeId::of::<usize>(), zero_value::<usize>);
    table.insert(TypeId::of::<f32>(), zero_value::<f32>);
    table.insert(TypeId::of::<f64>(), zero_value::<f64>);
    table.insert(TypeId::of::<String>(), zero_value::<String>);
    table
});

/// Produces and caches zero values by value-type identity.
#[derive(Debug, Default)]
pub struct DefaultValueProvider {
    /// Factories for non-primitive value types, keyed by type identity.
    factories: DashMap<TypeId, DefaultFn>,
}

impl DefaultValueProvider {
    /// Create a provider knowing only the well-known primitive types.
    pub fn new() -> Self {
        Self::default()
    }

    /// The zero value for the given value type.
    ///
    /// Primitive lookups are O(1) against the fixed table; other types hit
    /// the registered-factory cache. Unknown types fail explicitly.
    pub fn default_for(&self, value_type: TypeId, type_name: &str) -> Result<DynValue, ViewError> {
        if let Some(ctor) = WELL_KNOWN.get(&value_type) {
            return Ok(ctor());
        }
        if let Some(ctor) = self.factories.get(&value_type) {
            return Ok((*ctor)());
        }
        Err(ViewError::UnconstructableDefault {
            type_name: type_name.to_string(),
        })
    }

    /// Register `V`'s zero-value factory.
    pub fn register<V: PropValue>(&self) {
        self.factories
            .entry(TypeId::of::<V>())
            .or_insert(zero_value::<V>);
    }

    /// Register the factory captured by a property descriptor. Primitive
    /// value types are already covered by the fixed table and are skipped.
    pub(crate) fn register_descriptor(&self, descriptor: &PropertyDescriptor) {
        if WELL_KNOWN.contains_key(&descriptor.value_type()) {
            return;
        }
        self.factories
            .entry(descriptor.value_type())
            .or_insert(descriptor.default_fn());
    }

    /// Number of registered non-primitive factories.
    pub fn registered(&self) -> usize {
        self.factories.len()
    }
}
