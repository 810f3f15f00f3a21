//! Dimension — an insertion-ordered, first-occurrence-wins key map.
//!
//! Dimension rows are emitted in the order their key was first seen, so two
//! runs over the same log produce byte-identical tables.

use std::hash::Hash;

use indexmap::map::Entry;
use indexmap::IndexMap;

/// Ordered map that never overwrites an existing key.
#[derive(Debug, Clone)]
pub struct Dimension<K, V> {
    rows: IndexMap<K, V>,
}

impl<K, V> Default for Dimension<K, V> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> Dimension<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` unless the key is already present.
    ///
    /// Returns `true` if the row was inserted. An existing row is left
    /// untouched, whatever `value` holds.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        match self.rows.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in first-seen order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    pub fn into_values(self) -> Vec<V> {
        self.rows.into_values().collect()
    }
}
