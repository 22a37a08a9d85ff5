//! Per-type accessor table cache.
//!
//! Tables are built lazily on the first wrap of a type and served from the
//! cache forever after. Storage is unbounded and never evicted: the set of
//! types in a process is finite and stable, so expiry would only cause
//! needless recompilation.
//!
//! Concurrent first use is safe. A build happens outside any lock; the
//! publish step goes through the map's entry API, so duplicate concurrent
//! builds reconcile to a single winner and every caller leaves with the same
//! shared table. No caller can observe a partially-built table. A failed
//! build is not cached — the next request retries it.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::accessor;
use crate::defaults::DefaultValueProvider;
use crate::error::ViewError;
use crate::metadata::Reflectable;
use crate::table::AccessorTable;
use crate::view::DynamicView;

/// Builds, caches, and serves one [`AccessorTable`] per concrete type.
///
/// The cache is an injectable service rather than ambient state: tests can
/// construct a fresh instance per test, while ordinary callers share the
/// process-wide [`global_cache`].
#[derive(Debug, Default)]
pub struct TypeAccessorCache {
    tables: DashMap<TypeId, Arc<AccessorTable>>,
    defaults: Arc<DefaultValueProvider>,
}

impl TypeAccessorCache {
    /// Create an empty cache with its own default-value provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache sharing an existing default-value provider.
    pub fn with_defaults(defaults: Arc<DefaultValueProvider>) -> Self {
        Self {
            tables: DashMap::new(),
            defaults,
        }
    }

    /// The default-value provider fed by this cache's table builds.
    pub fn defaults(&self) -> &Arc<DefaultValueProvider> {
        &self.defaults
    }

    /// The accessor table for the instance's runtime type, building it on
    /// first use. Repeated calls return the identical shared table.
    pub fn table_for(&self, instance: &dyn Reflectable) -> Result<Arc<AccessorTable>, ViewError> {
        let any: &dyn Any = instance;
        let type_id = any.type_id();

        if let Some(table) = self.tables.get(&type_id) {
            return Ok(Arc::clone(&table));
        }

        let built = Arc::new(self.build(instance, type_id)?);
        // First insert wins under concurrent first use; everyone gets the
        // published table.
        let table = self.tables.entry(type_id).or_insert(built).value().clone();
        Ok(table)
    }

    fn build(
        &self,
        instance: &dyn Reflectable,
        type_id: TypeId,
    ) -> Result<AccessorTable, ViewError> {
        let facade = TypeId::of::<DynamicView>();
        let mut table = AccessorTable::new(type_id, instance.type_name());
        for descriptor in instance.descriptors() {
            // A subtype embedding the facade must not expose the facade's
            // own incidental properties as indexed data.
            if descriptor.declaring_type() == facade {
                continue;
            }
            self.defaults.register_descriptor(&descriptor);
            table.insert(accessor::compile(descriptor))?;
        }
        Ok(table)
    }

    /// Whether a table has been published for the given type.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.tables.contains_key(&type_id)
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The process-wide cache used by [`DynamicView::wrap`](crate::DynamicView::wrap).
pub fn global_cache() -> &'static TypeAccessorCache {
    static GLOBAL: Lazy<TypeAccessorCache> = Lazy::new(TypeAccessorCache::new);
    &GLOBAL
}
