//! Value encoding for the file-backed cache
//!
//! The cache only sees the [`Codec`] trait. [`JsonCodec`] is the default and
//! handles anything serde can serialize and deserialize.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BoxError;

/// Encodes values to bytes and decodes them back
pub trait Codec<T> {
    /// Encode one value into the bytes stored in its entry file
    fn encode(&self, value: &T) -> Result<Vec<u8>, BoxError>;

    /// Decode the bytes of one entry file
    fn decode(&self, bytes: &[u8]) -> Result<T, BoxError>;
}

/// JSON codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    /// Write indented JSON instead of compact JSON
    pub pretty: bool,
}

impl JsonCodec {
    /// Codec that writes compact JSON
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Codec that writes indented JSON, easier to read when inspecting the cache by hand
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>, BoxError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
