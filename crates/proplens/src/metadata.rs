//! Property metadata and the host reflection capability.
//!
//! Rust has no ambient runtime reflection, so the "enumerate a type's public
//! properties" capability is expressed as the [`Reflectable`] trait: a type
//! opts in by returning one [`PropertyDescriptor`] per exposed property, in
//! declaration order. That order is the authority for positional indexing.
//!
//! Descriptors are built through typed constructors that capture
//! monomorphized fn-pointer hooks for the property's native accessors. The
//! hooks stay type-erased inside the descriptor until the accessor compiler
//! narrows them exactly once per property (see the `accessor` module).
//! The [`reflectable!`](crate::reflectable) macro generates `Reflectable`
//! impls from a plain field list.

use std::any::{Any, TypeId};
use std::fmt;

use crate::accessor::{self, FormatFn, GetFn, SetFn};
use crate::defaults::{self, DefaultFn};

/// Bound required of property value types.
///
/// `Clone` lets compiled getters widen a copy of the value out of the
/// instance, `Default` supplies the type's zero value for absent-value
/// substitution, and `Display` backs `render()` output.
pub trait PropValue: Any + Clone + Default + fmt::Display {}

impl<T: Any + Clone + Default + fmt::Display> PropValue for T {}

/// A type whose public properties can be enumerated at runtime.
///
/// Implementations are usually generated with [`reflectable!`](crate::reflectable);
/// manual impls only need [`descriptors`](Reflectable::descriptors).
pub trait Reflectable: Any {
    /// Enumerate the type's properties, in declaration order.
    fn descriptors(&self) -> Vec<PropertyDescriptor>;

    /// The type's name, used in errors and rendered output.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether this type is itself a view facade. Facades cannot be wrapped
    /// a second time.
    fn is_view(&self) -> bool {
        false
    }
}

/// Type-erased storage for a monomorphized accessor fn pointer.
type TypedHook = Box<dyn Any + Send + Sync>;

/// Read-only metadata for one public property.
///
/// Carries the property's identity (name, declaring type, value type), its
/// readability and writability, and the erased typed hooks the accessor
/// compiler turns into reusable get/set functions. Never mutated after
/// construction.
pub struct PropertyDescriptor {
    name: &'static str,
    declaring_type: TypeId,
    declaring_type_name: &'static str,
    value_type: TypeId,
    value_type_name: &'static str,
    /// Erased `fn(&T) -> V`, present when publicly readable.
    typed_get: Option<TypedHook>,
    /// Erased `fn(&mut T, V)`, present when publicly writable.
    typed_set: Option<TypedHook>,
    /// Monomorphized compile trampolines; these re-narrow the hooks above.
    compile_get: fn(&PropertyDescriptor) -> Option<GetFn>,
    compile_set: fn(&PropertyDescriptor) -> Option<SetFn>,
    /// Renders a widened value of this property's value type.
    format_value: FormatFn,
    /// Produces the value type's zero value.
    default_value: DefaultFn,
}

impl PropertyDescriptor {
    /// Describe a property with public read and write accessors.
    pub fn read_write<T: Any, V: PropValue>(
        name: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
    ) -> Self {
        Self::build::<T, V>(name, Some(Box::new(get)), Some(Box::new(set)))
    }

    /// Describe a property with a public read accessor only.
    pub fn read_only<T: Any, V: PropValue>(name: &'static str, get: fn(&T) -> V) -> Self {
        Self::build::<T, V>(name, Some(Box::new(get)), None)
    }

    /// Describe a property with a public write accessor only.
    pub fn write_only<T: Any, V: PropValue>(name: &'static str, set: fn(&mut T, V)) -> Self {
        Self::build::<T, V>(name, None, Some(Box::new(set)))
    }

    fn build<T: Any, V: PropValue>(
        name: &'static str,
        typed_get: Option<TypedHook>,
        typed_set: Option<TypedHook>,
    ) -> Self {
        Self {
            name,
            declaring_type: TypeId::of::<T>(),
            declaring_type_name: std::any::type_name::<T>(),
            value_type: TypeId::of::<V>(),
            value_type_name: std::any::type_name::<V>(),
            typed_get,
            typed_set,
            compile_get: accessor::compile_getter::<T, V>,
            compile_set: accessor::compile_setter::<T, V>,
            format_value: accessor::format_value::<V>,
            default_value: defaults::zero_value::<V>,
        }
    }

    /// The property name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the declaring type.
    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    /// Name of the declaring type.
    pub fn declaring_type_name(&self) -> &'static str {
        self.declaring_type_name
    }

    /// Identity of the property's value type.
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// Name of the property's value type.
    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Whether the property exposes a public read accessor.
    pub fn readable(&self) -> bool {
        self.typed_get.is_some()
    }

    /// Whether the property exposes a public write accessor.
    pub fn writable(&self) -> bool {
        self.typed_set.is_some()
    }

    pub(crate) fn typed_get(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.typed_get.as_deref()
    }

    pub(crate) fn typed_set(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.typed_set.as_deref()
    }

    pub(crate) fn build_getter(&self) -> Option<GetFn> {
        (self.compile_get)(self)
    }

    pub(crate) fn build_setter(&self) -> Option<SetFn> {
        (self.compile_set)(self)
    }

    pub(crate) fn format_fn(&self) -> FormatFn {
        self.format_value
    }

    pub(crate) fn default_fn(&self) -> DefaultFn {
        self.default_value
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type_name)
            .field("value_type", &self.value_type_name)
            .field("readable", &self.readable())
            .field("writable", &self.writable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_read_write_descriptor_flags() {
        let desc =
            PropertyDescriptor::read_write::<Point, i32>("x", |p| p.x, |p, v| p.x = v);

        assert_eq!(desc.name(), "x");
        assert!(desc.readable());
        assert!(desc.writable());
        assert_eq!(desc.declaring_type(), TypeId::of::<Point>());
        assert_eq!(desc.value_type(), TypeId::of::<i32>());
    }

    #[test]
    fn test_read_only_descriptor_has_no_setter() {
        let desc = PropertyDescriptor::read_only::<Point, i32>("y", |p| p.y);

        assert!(desc.readable());
        assert!(!desc.writable());
        assert!(desc.build_setter().is_none());
        assert!(desc.build_getter().is_some());
    }

    #[test]
    fn test_write_only_descriptor_has_no_getter() {
        let desc = PropertyDescriptor::write_only::<Point, i32>("x", |p, v| p.x = v);

        assert!(!desc.readable());
        assert!(desc.writable());
        assert!(desc.build_getter().is_none());
        assert!(desc.build_setter().is_some());
    }

    #[test]
    fn test_descriptor_debug_output() {
        let desc = PropertyDescriptor::read_only::<Point, i32>("x", |p| p.x);
        let rendered = format!("{:?}", desc);

        assert!(rendered.contains("\"x\""));
        assert!(rendered.contains("readable: true"));
        assert!(rendered.contains("writable: false"));
    }
}
