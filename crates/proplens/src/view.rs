//! Dictionary-style views over a single wrapped instance.
//!
//! A [`DynamicView`] wraps one [`Reflectable`] instance together with its
//! type's shared accessor table and exposes get/set by name, get by
//! position, containment, enumeration, and multi-line rendering. The view
//! performs no locking of its own: it owns the instance, so Rust's borrow
//! rules already serialize access through one view.
//!
//! [`TypedView`] is the statically-typed specialization; it dereferences to
//! `DynamicView` and can return the wrapped instance at its original type.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::accessor::AccessorPair;
use crate::cache::{global_cache, TypeAccessorCache};
use crate::defaults::DefaultValueProvider;
use crate::error::ViewError;
use crate::metadata::{PropertyDescriptor, Reflectable};
use crate::table::AccessorTable;
use crate::DynValue;

/// A name- and position-indexed view over one object instance.
pub struct DynamicView {
    instance: Box<dyn Reflectable>,
    table: Arc<AccessorTable>,
    defaults: Arc<DefaultValueProvider>,
    /// Policy flag: fail on missing members/indices, or degrade to
    /// absent/no-op. Affects subsequent operations only.
    throw_on_missing: bool,
}

impl DynamicView {
    /// Wrap an instance with `throw_on_missing` enabled.
    ///
    /// Fails with [`ViewError::AlreadyWrapped`] when the instance is itself
    /// a view facade.
    pub fn wrap(instance: impl Reflectable) -> Result<Self, ViewError> {
        Self::wrap_with(instance, true)
    }

    /// Wrap an instance with an explicit missing-member policy.
    pub fn wrap_with(
        instance: impl Reflectable,
        throw_on_missing: bool,
    ) -> Result<Self, ViewError> {
        Self::wrap_in(global_cache(), instance, throw_on_missing)
    }

    /// Wrap an instance against a specific cache instead of the process-wide
    /// one. Useful for tests that want isolated cache state.
    pub fn wrap_in(
        cache: &TypeAccessorCache,
        instance: impl Reflectable,
        throw_on_missing: bool,
    ) -> Result<Self, ViewError> {
        if instance.is_view() {
            return Err(ViewError::AlreadyWrapped);
        }
        let instance: Box<dyn Reflectable> = Box::new(instance);
        let table = cache.table_for(instance.as_ref())?;
        Ok(Self {
            instance,
            table,
            defaults: Arc::clone(cache.defaults()),
            throw_on_missing,
        })
    }

    /// The value of the named property.
    ///
    /// Without a readable accessor for `name` this fails with
    /// [`ViewError::MissingMember`] under the throwing policy and returns
    /// `Ok(None)` otherwise.
    pub fn get(&self, name: &str) -> Result<Option<DynValue>, ViewError> {
        match self.table.get(name).and_then(AccessorPair::get) {
            Some(getter) => getter.as_ref()(self.instance_any()).map(Some),
            None => self.missing(name).map(|_| None),
        }
    }

    /// Assign a value to the named property.
    ///
    /// An absent value is substituted with the property value type's zero
    /// value before the setter runs; that substitution is never
    /// policy-gated. A missing entry or missing setter fails with
    /// [`ViewError::MissingMember`] under the throwing policy and is a no-op
    /// otherwise.
    pub fn set(&mut self, name: &str, value: Option<DynValue>) -> Result<(), ViewError> {
        let table = Arc::clone(&self.table);
        let Some(pair) = table.get(name) else {
            return self.missing(name);
        };
        let Some(setter) = pair.set() else {
            return self.missing(name);
        };
        let value = match value {
            Some(value) => value,
            None => self.defaults.default_for(
                pair.descriptor().value_type(),
                pair.descriptor().value_type_name(),
            )?,
        };
        let instance: &mut dyn Any = self.instance.as_mut();
        setter.as_ref()(instance, value)
    }

    /// Like [`get`](Self::get), but an absent result is coerced to `V`'s
    /// zero value. A present value of another type is a
    /// [`ViewError::ValueType`] failure.
    pub fn get_as<V: Any + Default>(&self, name: &str) -> Result<V, ViewError> {
        match self.get(name)? {
            None => Ok(V::default()),
            Some(value) => value
                .downcast::<V>()
                .map(|value| *value)
                .map_err(|_| ViewError::ValueType {
                    property: name.to_string(),
                    expected: std::any::type_name::<V>(),
                }),
        }
    }

    /// Like [`set`](Self::set), substituting `V`'s zero value for an absent
    /// input before delegating.
    pub fn set_as<V: Any + Default>(
        &mut self,
        name: &str,
        value: Option<V>,
    ) -> Result<(), ViewError> {
        let value = value.unwrap_or_default();
        self.set(name, Some(Box::new(value)))
    }

    /// The `(name, value)` pair at a position in the table's stable order.
    ///
    /// Out of `[0, len)` this fails with [`ViewError::IndexOutOfRange`]
    /// under the throwing policy and returns `Ok(None)` (the empty pair)
    /// otherwise. In range, the value is obtained exactly as
    /// [`get`](Self::get) would obtain it.
    pub fn at(&self, index: usize) -> Result<Option<(&'static str, Option<DynValue>)>, ViewError> {
        match self.table.by_index(index) {
            Some(pair) => {
                let value = self.get(pair.name())?;
                Ok(Some((pair.name(), value)))
            }
            None if self.throw_on_missing => Err(ViewError::IndexOutOfRange {
                type_name: self.table.type_name(),
                index,
                len: self.table.len(),
            }),
            None => Ok(None),
        }
    }

    /// Whether an entry exists for `name`, independent of readability or
    /// writability.
    pub fn contains_key(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    /// The value of the named property, or `None` without a readable
    /// accessor. Never fails, regardless of policy.
    pub fn try_get(&self, name: &str) -> Option<DynValue> {
        let getter = self.table.get(name)?.get()?;
        getter.as_ref()(self.instance_any()).ok()
    }

    /// Property names in table order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.names()
    }

    /// The keys mapped through [`get`](Self::get), in table order.
    pub fn values(&self) -> Result<Vec<Option<DynValue>>, ViewError> {
        self.table.names().map(|name| self.get(name)).collect()
    }

    /// Iterate `(name, value)` pairs in table order. Unreadable properties
    /// yield an absent value; iteration never fails and never mutates.
    ///
    /// Note that iteration is not policy-gated: under the throwing policy,
    /// [`values`](Self::values) fails on an unreadable property where this
    /// iterator yields `(name, None)` for the same entry.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            view: self,
            index: 0,
        }
    }

    /// Number of entries in the table, not the number currently readable.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the wrapped type exposes no properties.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The current missing-member policy.
    pub fn throw_on_missing(&self) -> bool {
        self.throw_on_missing
    }

    /// Change the missing-member policy. Takes effect for subsequent
    /// operations only.
    pub fn set_throw_on_missing(&mut self, throw_on_missing: bool) {
        self.throw_on_missing = throw_on_missing;
    }

    /// Name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.table.type_name()
    }

    /// Borrow the wrapped instance untyped.
    pub fn instance(&self) -> &dyn Any {
        self.instance_any()
    }

    /// Mutably borrow the wrapped instance untyped.
    pub fn instance_mut(&mut self) -> &mut dyn Any {
        self.instance.as_mut()
    }

    /// Give the wrapped instance back to the caller.
    pub fn into_inner(self) -> Box<dyn Reflectable> {
        self.instance
    }

    /// Multi-line description: the type's short name, then `name: value`
    /// for every key in table order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(short_type_name(self.table.type_name()));
        out.push('\n');
        for pair in self.table.iter() {
            out.push_str(pair.name());
            out.push_str(": ");
            if let Some(value) = self.try_get(pair.name()) {
                out.push_str(&pair.format(value.as_ref()));
            }
            out.push('\n');
        }
        out
    }

    fn instance_any(&self) -> &dyn Any {
        let instance: &dyn Reflectable = self.instance.as_ref();
        instance
    }

    fn missing(&self, name: &str) -> Result<(), ViewError> {
        if self.throw_on_missing {
            Err(ViewError::MissingMember {
                type_name: self.table.type_name(),
                member: name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Reflectable for DynamicView {
    fn descriptors(&self) -> Vec<PropertyDescriptor> {
        Vec::new()
    }

    fn is_view(&self) -> bool {
        true
    }
}

impl fmt::Display for DynamicView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for DynamicView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicView")
            .field("type_name", &self.table.type_name())
            .field("len", &self.table.len())
            .field("throw_on_missing", &self.throw_on_missing)
            .finish()
    }
}

impl<'a> IntoIterator for &'a DynamicView {
    type Item = (&'static str, Option<DynValue>);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a view's `(name, value)` pairs in table order.
pub struct Entries<'a> {
    view: &'a DynamicView,
    index: usize,
}

impl Iterator for Entries<'_> {
    type Item = (&'static str, Option<DynValue>);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.view.table.by_index(self.index)?;
        self.index += 1;
        Some((pair.name(), self.view.try_get(pair.name())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.table.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// A [`DynamicView`] that remembers the wrapped instance's static type.
pub struct TypedView<T: Reflectable> {
    inner: DynamicView,
    _marker: PhantomData<T>,
}

impl<T: Reflectable> TypedView<T> {
    /// Wrap an instance with `throw_on_missing` enabled.
    pub fn wrap(instance: T) -> Result<Self, ViewError> {
        Self::wrap_with(instance, true)
    }

    /// Wrap an instance with an explicit missing-member policy.
    pub fn wrap_with(instance: T, throw_on_missing: bool) -> Result<Self, ViewError> {
        Ok(Self {
            inner: DynamicView::wrap_with(instance, throw_on_missing)?,
            _marker: PhantomData,
        })
    }

    /// Wrap an instance against a specific cache.
    pub fn wrap_in(
        cache: &TypeAccessorCache,
        instance: T,
        throw_on_missing: bool,
    ) -> Result<Self, ViewError> {
        Ok(Self {
            inner: DynamicView::wrap_in(cache, instance, throw_on_missing)?,
            _marker: PhantomData,
        })
    }

    /// Borrow the wrapped instance at its static type.
    pub fn typed_ref(&self) -> &T {
        match self.inner.instance().downcast_ref::<T>() {
            Some(instance) => instance,
            None => unreachable!("typed view always wraps its own type parameter"),
        }
    }

    /// Mutably borrow the wrapped instance at its static type.
    pub fn typed_mut(&mut self) -> &mut T {
        match self.inner.instance_mut().downcast_mut::<T>() {
            Some(instance) => instance,
            None => unreachable!("typed view always wraps its own type parameter"),
        }
    }

    /// Return the originally wrapped instance, narrowed back to its static
    /// type.
    pub fn into_instance(self) -> T {
        let boxed: Box<dyn Any> = self.inner.into_inner();
        match boxed.downcast::<T>() {
            Ok(instance) => *instance,
            Err(_) => unreachable!("typed view always wraps its own type parameter"),
        }
    }
}

impl<T: Reflectable> Deref for TypedView<T> {
    type Target = DynamicView;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Reflectable> DerefMut for TypedView<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Reflectable> Reflectable for TypedView<T> {
    fn descriptors(&self) -> Vec<PropertyDescriptor> {
        Vec::new()
    }

    fn is_view(&self) -> bool {
        true
    }
}

impl<T: Reflectable> fmt::Display for TypedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<T: Reflectable> fmt::Debug for TypedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedView").field(&self.inner).finish()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}
