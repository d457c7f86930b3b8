//! In-memory cache for testing code that depends on [`Cache`]
//!
//! Holds values in a `HashMap` for the lifetime of the instance and counts how
//! often each operation was called.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::Cache;
use crate::error::CacheResult;

/// Number of calls made to each cache operation
///
/// A call through either the quiet or the `try_*` form counts once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub set_entry: usize,
    pub get_entry: usize,
    pub get_all_entries: usize,
    pub remove_entry: usize,
    pub remove_all_entries: usize,
    pub entry_exists: usize,
}

/// Cache test double backed by a `HashMap`
///
/// Never fails and never touches the filesystem. `get_all_entries` returns
/// values in no particular order.
#[derive(Debug, Default)]
pub struct MemoryCache<T> {
    name: String,
    entries: RefCell<HashMap<String, T>>,
    counts: Cell<CallCounts>,
}

impl<T> MemoryCache<T> {
    /// Creates an empty cache named `name` with all counters at zero
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RefCell::new(HashMap::new()),
            counts: Cell::new(CallCounts::default()),
        }
    }

    /// Snapshot of the call counters
    pub fn call_counts(&self) -> CallCounts {
        self.counts.get()
    }

    /// Sets every counter back to zero, keeping stored entries
    pub fn reset_call_counts(&self) {
        self.counts.set(CallCounts::default());
    }

    /// Number of stored entries (not counted as a call)
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no entries are stored (not counted as a call)
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn record(&self, bump: impl FnOnce(&mut CallCounts)) {
        let mut counts = self.counts.get();
        bump(&mut counts);
        self.counts.set(counts);
    }
}

impl<T: Clone> Cache for MemoryCache<T> {
    type Value = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn try_set_entry(&self, value: &T, key: &str) -> CacheResult<()> {
        self.record(|c| c.set_entry += 1);
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn try_get_entry(&self, key: &str) -> CacheResult<Option<T>> {
        self.record(|c| c.get_entry += 1);
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn try_get_all_entries(&self) -> CacheResult<Vec<T>> {
        self.record(|c| c.get_all_entries += 1);
        Ok(self.entries.borrow().values().cloned().collect())
    }

    fn try_remove_entry(&self, key: &str) -> CacheResult<bool> {
        self.record(|c| c.remove_entry += 1);
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }

    fn try_remove_all_entries(&self) -> CacheResult<usize> {
        self.record(|c| c.remove_all_entries += 1);
        let mut entries = self.entries.borrow_mut();
        let count = entries.len();
        entries.clear();
        Ok(count)
    }

    fn entry_exists(&self, key: &str) -> bool {
        self.record(|c| c.entry_exists += 1);
        self.entries.borrow().contains_key(key)
    }
}
