//! File-backed cache storing one file per entry
//!
//! Entries live at `<cache root>/<cache name>/<key>`, where the cache root is
//! the platform cache directory (`~/.cache` on Linux, `~/Library/Caches` on
//! macOS). The directory listing is the index: there is no manifest file.

use chrono::{DateTime, Utc};
use directories::BaseDirs;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::Cache;
use crate::codec::{Codec, JsonCodec};
use crate::error::{CacheError, CacheResult};

/// Backing directory, resolved once at construction
#[derive(Debug, Clone)]
enum Directory {
    Usable(PathBuf),
    Unusable,
}

/// Size and modification time of one stored entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// The entry's key (its file name)
    pub key: String,
    /// Size of the encoded value in bytes
    pub size: u64,
    /// When the entry file was last written
    pub modified: DateTime<Utc>,
}

/// Cache that persists each value of type `T` as its own file
///
/// Construction never fails. If the platform cache directory cannot be
/// determined, the cache name is not a plain directory name, or the namespace
/// directory cannot be created, the cache is unusable: writes are dropped,
/// reads return nothing, and the `try_*` methods return
/// [`CacheError::Unusable`].
///
/// Writes are not atomic and nothing guards against concurrent access to the
/// same namespace. Callers that share a namespace must serialize access
/// themselves.
pub struct FileCache<T, C = JsonCodec> {
    name: String,
    directory: Directory,
    codec: C,
    _value: PhantomData<fn() -> T>,
}

impl<T> FileCache<T, JsonCodec>
where
    JsonCodec: Codec<T>,
{
    /// Creates a JSON cache named `name` inside the platform cache directory
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_codec(None, name, JsonCodec::default())
    }

    /// Creates a JSON cache named `name` inside `root` instead of the platform cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_root(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::with_codec(Some(root.into()), name, JsonCodec::default())
    }
}

impl<T, C> FileCache<T, C>
where
    C: Codec<T>,
{
    /// Creates a cache with a custom codec
    ///
    /// `root` of `None` uses the platform cache directory.
    pub fn with_codec(root: Option<PathBuf>, name: impl Into<String>, codec: C) -> Self {
        let name = name.into();
        let directory = match root.or_else(platform_cache_root) {
            Some(root) => prepare_directory(&root, &name),
            None => {
                warn!(cache = %name, "Cache directory is unavailable");
                Directory::Unusable
            }
        };

        Self {
            name,
            directory,
            codec,
            _value: PhantomData,
        }
    }

    /// Whether the namespace directory was resolved and created
    pub fn is_usable(&self) -> bool {
        matches!(self.directory, Directory::Usable(_))
    }

    /// The namespace directory, if the cache is usable
    pub fn directory(&self) -> Option<&Path> {
        match &self.directory {
            Directory::Usable(dir) => Some(dir),
            Directory::Unusable => None,
        }
    }

    /// Path of the file that holds the entry for `key`
    pub fn entry_path(&self, key: &str) -> CacheResult<PathBuf> {
        let dir = self.usable_dir()?;
        validate_component(key).map_err(|reason| CacheError::InvalidKey {
            key: key.to_string(),
            reason,
        })?;
        Ok(dir.join(key))
    }

    /// Every stored key, sorted
    ///
    /// File names that are not valid UTF-8 cannot be addressed by a key and
    /// are left out with a warning.
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self
            .entry_paths()?
            .iter()
            .filter_map(|path| match path.file_name().and_then(|name| name.to_str()) {
                Some(key) => Some(key.to_string()),
                None => {
                    warn!(cache = %self.name, "Skipping non-UTF-8 entry {}", path.display());
                    None
                }
            })
            .collect())
    }

    /// Size and modification time of the entry for `key`, or `None` if it is not stored
    pub fn entry_info(&self, key: &str) -> CacheResult<Option<EntryInfo>> {
        let path = self.entry_path(key)?;
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io("reading metadata of", path, e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| CacheError::io("reading modification time of", &path, e))?;

        Ok(Some(EntryInfo {
            key: key.to_string(),
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
        }))
    }

    /// Reads every entry independently, keeping per-entry failures
    ///
    /// Unlike [`Cache::try_get_all_entries`], one unreadable entry does not
    /// hide the others. Only a failure to list the directory fails the call.
    pub fn load_each(&self) -> CacheResult<Vec<(String, CacheResult<T>)>> {
        Ok(self
            .entry_paths()?
            .into_iter()
            .map(|path| {
                let value = self.read_value(&path);
                (file_key(&path), value)
            })
            .collect())
    }

    fn usable_dir(&self) -> CacheResult<&Path> {
        self.directory().ok_or_else(|| CacheError::Unusable {
            name: self.name.clone(),
        })
    }

    /// Paths of every directory entry, sorted by file name
    fn entry_paths(&self) -> CacheResult<Vec<PathBuf>> {
        let dir = self.usable_dir()?;
        let read_dir = fs::read_dir(dir).map_err(|e| CacheError::io("listing", dir, e))?;

        let mut paths = read_dir
            .map(|entry| {
                entry
                    .map(|entry| entry.path())
                    .map_err(|e| CacheError::io("listing", dir, e))
            })
            .collect::<CacheResult<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }

    fn read_value(&self, path: &Path) -> CacheResult<T> {
        let bytes = fs::read(path).map_err(|e| CacheError::io("reading", path, e))?;
        self.codec
            .decode(&bytes)
            .map_err(|source| CacheError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl<T, C> Cache for FileCache<T, C>
where
    C: Codec<T>,
{
    type Value = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn try_set_entry(&self, value: &T, key: &str) -> CacheResult<()> {
        let path = self.entry_path(key)?;
        let bytes = self
            .codec
            .encode(value)
            .map_err(|source| CacheError::Encode {
                key: key.to_string(),
                source,
            })?;

        fs::write(&path, bytes).map_err(|e| CacheError::io("writing", path, e))
    }

    fn try_get_entry(&self, key: &str) -> CacheResult<Option<T>> {
        let path = self.entry_path(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io("reading", path, e)),
        };

        self.codec
            .decode(&bytes)
            .map(Some)
            .map_err(|source| CacheError::Decode { path, source })
    }

    fn try_get_all_entries(&self) -> CacheResult<Vec<T>> {
        self.entry_paths()?
            .iter()
            .map(|path| self.read_value(path))
            .collect()
    }

    fn try_remove_entry(&self, key: &str) -> CacheResult<bool> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(cache = %self.name, key, "No cached value to remove");
                Ok(false)
            }
            Err(e) => Err(CacheError::io("removing", path, e)),
        }
    }

    fn try_remove_all_entries(&self) -> CacheResult<usize> {
        let paths = self.entry_paths()?;
        // Stops at the first failure; entries already removed stay removed.
        for path in &paths {
            fs::remove_file(path).map_err(|e| CacheError::io("removing", path, e))?;
        }
        debug!(cache = %self.name, count = paths.len(), "Removed all cached values");
        Ok(paths.len())
    }

    fn entry_exists(&self, key: &str) -> bool {
        self.entry_path(key).map(|path| path.exists()).unwrap_or(false)
    }
}

impl<T, C: fmt::Debug> fmt::Debug for FileCache<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCache")
            .field("name", &self.name)
            .field("directory", &self.directory)
            .field("codec", &self.codec)
            .finish()
    }
}

impl<T, C: Clone> Clone for FileCache<T, C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            directory: self.directory.clone(),
            codec: self.codec.clone(),
            _value: PhantomData,
        }
    }
}

/// The platform cache directory, e.g. `$XDG_CACHE_HOME` or `~/.cache` on Linux
fn platform_cache_root() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Resolves `<root>/<name>` and creates it if missing
fn prepare_directory(root: &Path, name: &str) -> Directory {
    if let Err(reason) = validate_component(name) {
        warn!(cache = %name, "Invalid cache name: {}", reason);
        return Directory::Unusable;
    }

    let dir = root.join(name);
    if !dir.is_dir() {
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!(cache = %name, "Cannot create cache directory {}: {}", dir.display(), e);
            return Directory::Unusable;
        }
        debug!(cache = %name, "Created cache directory {}", dir.display());
    }
    Directory::Usable(dir)
}

/// Checks that `s` can be used as a single file or directory name
fn validate_component(s: &str) -> Result<(), &'static str> {
    if s.is_empty() {
        return Err("must not be empty");
    }
    if s == "." || s == ".." {
        return Err("reserved name");
    }
    if s.contains(['/', '\\', '\0']) {
        return Err("must not contain path separators or NUL");
    }
    // Drive prefixes such as `C:` would make `join` leave the base directory
    let mut components = Path::new(s).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err("must be a single plain path component"),
    }
}

/// Key for display in per-entry results; lossy for non-UTF-8 names
fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
