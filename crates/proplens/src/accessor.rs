//! Accessor compilation: one-time production of reusable get/set functions.
//!
//! Property access happens many times per instance over a process lifetime,
//! so nothing here resolves metadata per call. Instead, each property is
//! "compiled" once: a monomorphized trampoline narrows the descriptor's
//! erased accessor hook a single time and closes over the recovered fn
//! pointer, yielding a specialized closure that only has to downcast the
//! instance on each call. The resulting [`AccessorPair`] is immutable and
//! shared for the remainder of the process via its type's accessor table.

use std::any::Any;
use std::sync::Arc;

use crate::error::ViewError;
use crate::metadata::{PropValue, PropertyDescriptor};
use crate::DynValue;

/// Compiled getter: narrows an untyped instance, widens the value back out.
///
/// Fails only when handed an instance of the wrong type; never for a
/// correctly-typed one.
pub type GetFn = Arc<dyn Fn(&dyn Any) -> Result<DynValue, ViewError> + Send + Sync>;

/// Compiled setter: narrows an untyped instance and an untyped value, then
/// performs the assignment. Absent-value coercion is the view's job, not the
/// setter's; the compiled function stays pure and reusable.
pub type SetFn = Arc<dyn Fn(&mut dyn Any, DynValue) -> Result<(), ViewError> + Send + Sync>;

/// Renders a widened value of a known value type for display output.
pub(crate) type FormatFn = fn(&dyn Any) -> String;

/// The compiled get/set function pair for one property.
///
/// Either side may be absent: read-only and write-only properties are valid
/// and keep the present accessor only. Two pairs compare equal when they
/// describe the same named property on the same declaring type, regardless
/// of function identity.
pub struct AccessorPair {
    name: &'static str,
    get: Option<GetFn>,
    set: Option<SetFn>,
    descriptor: PropertyDescriptor,
}

impl AccessorPair {
    /// The property name this pair was compiled for.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The compiled getter, absent for write-only properties.
    pub fn get(&self) -> Option<&GetFn> {
        self.get.as_ref()
    }

    /// The compiled setter, absent for read-only properties.
    pub fn set(&self) -> Option<&SetFn> {
        self.set.as_ref()
    }

    /// The descriptor this pair was compiled from.
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    pub(crate) fn format(&self, value: &dyn Any) -> String {
        (self.descriptor.format_fn())(value)
    }
}

impl PartialEq for AccessorPair {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.descriptor.declaring_type() == other.descriptor.declaring_type()
    }
}

impl Eq for AccessorPair {}

impl std::fmt::Debug for AccessorPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorPair")
            .field("name", &self.name)
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .finish()
    }
}

/// Compile one property's metadata into its accessor pair.
///
/// A getter is built only when the descriptor is publicly readable, a setter
/// only when it is publicly writable; the missing side is left absent.
pub fn compile(descriptor: PropertyDescriptor) -> AccessorPair {
    let get = descriptor.build_getter();
    let set = descriptor.build_setter();
    AccessorPair {
        name: descriptor.name(),
        get,
        set,
        descriptor,
    }
}

/// Monomorphized getter trampoline. Recovers the descriptor's typed hook
/// once and returns a closure specialized for `(T, V)`.
pub(crate) fn compile_getter<T: Any, V: PropValue>(
    descriptor: &PropertyDescriptor,
) -> Option<GetFn> {
    let raw = *descriptor.typed_get()?.downcast_ref::<fn(&T) -> V>()?;
    let property = descriptor.name();
    let declaring = descriptor.declaring_type_name();

    Some(Arc::new(move |instance: &dyn Any| {
        let target = instance
            .downcast_ref::<T>()
            .ok_or_else(|| ViewError::InstanceType {
                property: property.to_string(),
                expected: declaring,
            })?;
        Ok(Box::new(raw(target)) as DynValue)
    }))
}

/// Monomorphized setter trampoline, the write-side counterpart of
/// [`compile_getter`].
pub(crate) fn compile_setter<T: Any, V: PropValue>(
    descriptor: &PropertyDescriptor,
) -> Option<SetFn> {
    let raw = *descriptor.typed_set()?.downcast_ref::<fn(&mut T, V)>()?;
    let property = descriptor.name();
    let declaring = descriptor.declaring_type_name();
    let expected_value = descriptor.value_type_name();

    Some(Arc::new(move |instance: &mut dyn Any, value: DynValue| {
        let target = instance
            .downcast_mut::<T>()
            .ok_or_else(|| ViewError::InstanceType {
                property: property.to_string(),
                expected: declaring,
            })?;
        let value = value.downcast::<V>().map_err(|_| ViewError::ValueType {
            property: property.to_string(),
            expected: expected_value,
        })?;
        raw(target, *value);
        Ok(())
    }))
}

/// Monomorphized display hook for values of type `V`.
pub(crate) fn format_value<V: PropValue>(value: &dyn Any) -> String {
    match value.downcast_ref::<V>() {
        Some(value) => value.to_string(),
        None => String::from("<?>"),
    }
}
