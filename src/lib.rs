//! AnyCache - a generic on-disk key-value cache
//!
//! Each [`FileCache`] is bound to a value type and a cache name, and stores
//! every entry as its own file under `<platform cache dir>/<cache name>/`.
//! [`MemoryCache`] implements the same [`Cache`] trait in memory for tests.
//!
//! ```no_run
//! use anycache::{Cache, FileCache};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Profile {
//!     age: u32,
//! }
//!
//! let profiles: FileCache<Profile> = FileCache::new("profiles");
//! profiles.set_entry(&Profile { age: 30 }, "alice");
//! assert!(profiles.entry_exists("alice"));
//! ```

pub mod cache;
pub mod cli;
pub mod codec;
pub mod error;

pub use cache::{Cache, CallCounts, EntryInfo, FileCache, MemoryCache};
pub use codec::{Codec, JsonCodec};
pub use error::{CacheError, CacheResult};
