//! The canonical interface table.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::network::InterfaceRecord;

/// Interfaces keyed by name, iterated in name order.
///
/// Consumers only ever see a table through an `Arc` handed out after a
/// complete commit, so they never observe one mid-reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTable {
    records: BTreeMap<String, InterfaceRecord>,
}

impl InterfaceTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Returns the number of interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no interfaces are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up an interface by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&InterfaceRecord> {
        self.records.get(name)
    }

    /// Returns true if an interface with this name is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Iterates over records in name order.
    pub fn iter(&self) -> btree_map::Values<'_, String, InterfaceRecord> {
        self.records.values()
    }

    /// Iterates over interface names in order.
    pub fn names(&self) -> btree_map::Keys<'_, String, InterfaceRecord> {
        self.records.keys()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut InterfaceRecord> {
        self.records.get_mut(name)
    }

    /// Inserts a record, replacing any record with the same name.
    pub(crate) fn insert(&mut self, record: InterfaceRecord) -> Option<InterfaceRecord> {
        self.records.insert(record.name.clone(), record)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<InterfaceRecord> {
        self.records.remove(name)
    }
}

impl FromIterator<InterfaceRecord> for InterfaceTable {
    fn from_iter<I: IntoIterator<Item = InterfaceRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.name.clone(), r)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InterfaceTable {
    type Item = &'a InterfaceRecord;
    type IntoIter = btree_map::Values<'a, String, InterfaceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
