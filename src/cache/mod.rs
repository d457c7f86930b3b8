//! Cache interface and its implementations
//!
//! [`Cache`] is the contract shared by the file-backed [`FileCache`] and the
//! in-memory [`MemoryCache`] test double. Each operation comes in two forms:
//! a `try_*` method that returns a [`CacheResult`], and a quiet method that
//! logs failures and reports them as absence.

mod file;
mod memory;

pub use file::{EntryInfo, FileCache};
pub use memory::{CallCounts, MemoryCache};

use tracing::{debug, warn};

use crate::error::{CacheError, CacheResult};

/// Operations every cache implementation exposes
pub trait Cache {
    /// Type of the stored values
    type Value;

    /// Name of the namespace this cache is bound to
    fn name(&self) -> &str;

    /// Store `value` under `key`, replacing any existing entry
    fn try_set_entry(&self, value: &Self::Value, key: &str) -> CacheResult<()>;

    /// Read the entry for `key`
    ///
    /// Returns `Ok(None)` when no entry is stored and `Err` when one exists
    /// but could not be read or decoded.
    fn try_get_entry(&self, key: &str) -> CacheResult<Option<Self::Value>>;

    /// Read every entry in the namespace
    ///
    /// All-or-nothing: a single unreadable entry fails the whole call.
    fn try_get_all_entries(&self) -> CacheResult<Vec<Self::Value>>;

    /// Delete the entry for `key`, returning whether one existed
    fn try_remove_entry(&self, key: &str) -> CacheResult<bool>;

    /// Delete every entry, returning how many were deleted
    fn try_remove_all_entries(&self) -> CacheResult<usize>;

    /// Whether an entry is currently stored for `key`
    fn entry_exists(&self, key: &str) -> bool;

    /// Store `value` under `key`. Failures are logged, never returned.
    fn set_entry(&self, value: &Self::Value, key: &str) {
        if let Err(e) = self.try_set_entry(value, key) {
            log_failure(self.name(), "caching value", &e);
        }
    }

    /// Read the entry for `key`, or `None` if it is missing or unreadable
    fn get_entry(&self, key: &str) -> Option<Self::Value> {
        self.try_get_entry(key).unwrap_or_else(|e| {
            log_failure(self.name(), "fetching cached value", &e);
            None
        })
    }

    /// Read every entry, or `None` if the namespace is unusable or any entry fails
    ///
    /// A usable namespace with no entries yields `Some(vec![])`.
    fn get_all_entries(&self) -> Option<Vec<Self::Value>> {
        self.try_get_all_entries()
            .map_err(|e| log_failure(self.name(), "fetching all cached values", &e))
            .ok()
    }

    /// Delete the entry for `key` if present
    fn remove_entry(&self, key: &str) {
        if let Err(e) = self.try_remove_entry(key) {
            log_failure(self.name(), "removing cached value", &e);
        }
    }

    /// Delete every entry in the namespace
    fn remove_all_entries(&self) {
        if let Err(e) = self.try_remove_all_entries() {
            log_failure(self.name(), "removing all cached values", &e);
        }
    }
}

/// Unusable caches fail every call the same way, so that case only goes to debug.
fn log_failure(cache: &str, action: &str, error: &CacheError) {
    if error.is_unusable() {
        debug!(cache, "Skipped {}: {}", action, error);
    } else {
        warn!(cache, "Error {}: {}", action, error);
    }
}
