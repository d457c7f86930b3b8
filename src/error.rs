//! Error types for cache operations
//!
//! Every fallible cache operation returns `CacheResult<T>`. The quiet methods on
//! [`Cache`](crate::cache::Cache) log these errors and turn them into absence.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a [`Codec`](crate::codec::Codec)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors a cache operation can report
#[derive(Debug, Error)]
pub enum CacheError {
    /// The namespace directory could not be resolved or created at construction
    #[error("Cache '{name}' is unusable: no backing directory")]
    Unusable { name: String },

    /// The key cannot be used as a file name
    #[error("Invalid cache key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// A filesystem operation failed
    #[error("Failed {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The value could not be encoded
    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: BoxError,
    },

    /// The stored bytes could not be decoded
    #[error("Failed to decode cached value at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl CacheError {
    /// Create an I/O error with context
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether this error comes from an unusable cache rather than a single operation
    pub fn is_unusable(&self) -> bool {
        matches!(self, Self::Unusable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_includes_action_and_path() {
        let err = CacheError::io(
            "reading",
            "/tmp/profiles/alice",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("reading"));
        assert!(msg.contains("/tmp/profiles/alice"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_is_unusable() {
        let err = CacheError::Unusable {
            name: "profiles".to_string(),
        };
        assert!(err.is_unusable());
        assert!(err.to_string().contains("profiles"));

        let err = CacheError::InvalidKey {
            key: "..".to_string(),
            reason: "reserved name",
        };
        assert!(!err.is_unusable());
    }
}
