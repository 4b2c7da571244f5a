//! Postcard-based cache serialization with versioned envelopes.
//!
//! Every cached value is stored as:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│ VERSION (varint)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "CTLG"              u32                postcard::to_allocvec(T)
//! ```
//!
//! The header is decoded before the payload, so an entry written by another
//! schema version is reported as [`Error::VersionMismatch`] even when its
//! payload no longer parses. Callers treat every decode error as a miss and
//! evict the entry.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Magic header for catalog cache entries.
pub const CACHE_MAGIC: [u8; 4] = *b"CTLG";

/// Current schema version of cached DTOs.
///
/// **CRITICAL:** Increment when a cached DTO changes shape (fields added,
/// removed, reordered or retyped). Postcard is not self-describing, so an
/// old payload would otherwise decode into garbage.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    magic: [u8; 4],
    version: u32,
}

/// Envelope written for every cache entry.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    pub magic: [u8; 4],
    pub version: u32,
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Wrap `payload` with the current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for cache storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    postcard::to_allocvec(&CacheEnvelope::new(value)).map_err(|e| {
        error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from cache storage with validation.
///
/// # Errors
///
/// - `Error::InvalidCacheEntry`: missing or wrong magic header
/// - `Error::VersionMismatch`: written by another schema version
/// - `Error::DeserializationError`: corrupted payload or trailing bytes
pub fn deserialize_from_cache<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (header, payload) = postcard::take_from_bytes::<Header>(bytes)
        .map_err(|e| Error::InvalidCacheEntry(format!("unreadable header: {}", e)))?;

    if header.magic != CACHE_MAGIC {
        warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC, header.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, header.magic
        )));
    }

    if header.version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, header.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: header.version,
        });
    }

    let (value, rest) = postcard::take_from_bytes::<T>(payload).map_err(|e| {
        error!("Cache deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;
    if !rest.is_empty() {
        return Err(Error::DeserializationError(format!(
            "{} trailing bytes after payload",
            rest.len()
        )));
    }
    Ok(value)
}
