//! Ordered per-type accessor tables.
//!
//! An [`AccessorTable`] holds one [`AccessorPair`] per property of a single
//! concrete type, in descriptor-enumeration order. The order is the
//! authority for positional indexing and is stable for the table's lifetime.
//! Once published by the cache a table is never rebuilt or mutated; every
//! view over the type shares the same `Arc`.

use std::any::TypeId;

use rustc_hash::FxHashMap;

use crate::accessor::AccessorPair;
use crate::error::ViewError;

/// Immutable, ordered name-to-accessor-pair table for one runtime type.
#[derive(Debug)]
pub struct AccessorTable {
    type_id: TypeId,
    type_name: &'static str,
    /// Pairs in discovery order; positions here are the positional index.
    pairs: Vec<AccessorPair>,
    /// Name lookup into `pairs`.
    index: FxHashMap<&'static str, usize>,
}

impl AccessorTable {
    pub(crate) fn new(type_id: TypeId, type_name: &'static str) -> Self {
        Self {
            type_id,
            type_name,
            pairs: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Append a pair, keeping enumeration order. Property names are unique.
    pub(crate) fn insert(&mut self, pair: AccessorPair) -> Result<(), ViewError> {
        if self.index.contains_key(pair.name()) {
            return Err(ViewError::DuplicateProperty {
                type_name: self.type_name,
                property: pair.name(),
            });
        }
        self.index.insert(pair.name(), self.pairs.len());
        self.pairs.push(pair);
        Ok(())
    }

    /// Identity of the type this table was built for.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the type this table was built for.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look up a pair by property name.
    pub fn get(&self, name: &str) -> Option<&AccessorPair> {
        self.index.get(name).map(|&position| &self.pairs[position])
    }

    /// Look up a pair by position in enumeration order.
    pub fn by_index(&self, index: usize) -> Option<&AccessorPair> {
        self.pairs.get(index)
    }

    /// Whether an entry exists for `name`, readable or not.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate the pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &AccessorPair> {
        self.pairs.iter()
    }

    /// Iterate the property names in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(AccessorPair::name)
    }
}
