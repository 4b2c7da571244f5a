//! Password hashing.
//!
//! The catalog only needs an opaque `hash` / `verify` pair. The bundled
//! implementation derives an Argon2id hash over a random salt and stores
//! `base64(salt || hash)` as the digest.

use crate::error::{Error, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use std::sync::Arc;

/// Size of the random salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Size of the derived hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Opaque password hashing service.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// True when `plaintext` matches `digest`. Malformed digests never match.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id cost parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests and benches. Not for production digests.
    pub fn fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Argon2Hasher {
    params: KdfParams,
}

impl Argon2Hasher {
    pub fn new(params: KdfParams) -> Self {
        Argon2Hasher { params }
    }

    fn derive(&self, plaintext: &str, salt: &[u8]) -> Result<[u8; HASH_SIZE]> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            Some(HASH_SIZE),
        )
        .map_err(|e| Error::HashingError(e.to_string()))?;

        let mut hash = [0u8; HASH_SIZE];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(plaintext.as_bytes(), salt, &mut hash)
            .map_err(|e| Error::HashingError(e.to_string()))?;
        Ok(hash)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let mut salt = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let hash = self.derive(plaintext, &salt)?;

        let mut digest = Vec::with_capacity(SALT_SIZE + HASH_SIZE);
        digest.extend_from_slice(&salt);
        digest.extend_from_slice(&hash);
        Ok(STANDARD.encode(digest))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(bytes) = STANDARD.decode(digest) else {
            return false;
        };
        if bytes.len() != SALT_SIZE + HASH_SIZE {
            return false;
        }
        let (salt, expected) = bytes.split_at(SALT_SIZE);
        match self.derive(plaintext, salt) {
            Ok(actual) => constant_time_eq(&actual, expected),
            Err(e) => {
                warn!("Password verification failed: {}", e);
                false
            }
        }
    }
}

/// Run `f` against `hasher` on the blocking pool.
///
/// Key derivation is CPU-bound; it must not stall the async workers or run
/// while a store session is open.
pub(crate) async fn offload<T, F>(hasher: &Arc<dyn PasswordHasher>, f: F) -> Result<T>
where
    F: FnOnce(&dyn PasswordHasher) -> T + Send + 'static,
    T: Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || f(hasher.as_ref()))
        .await
        .map_err(|e| Error::HashingError(e.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
