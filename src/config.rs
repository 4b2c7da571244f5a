//! Catalog configuration.

use crate::error::{Error, Result};
use crate::hasher::KdfParams;
use crate::observability::TtlPolicy;
use std::str::FromStr;
use std::time::Duration;

/// Cache lifetime in seconds (`0` keeps entries until the next write).
pub const ENV_CACHE_TTL_SECS: &str = "CATALOG_CACHE_TTL_SECS";
/// Argon2id memory cost in KiB.
pub const ENV_KDF_MEMORY_KIB: &str = "CATALOG_KDF_MEMORY_KIB";
/// Argon2id iterations.
pub const ENV_KDF_TIME_COST: &str = "CATALOG_KDF_TIME_COST";

/// Settings shared by every service of a [`Catalog`](crate::Catalog).
#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    pub ttl_policy: TtlPolicy,
    pub kdf: KdfParams,
}

impl CatalogConfig {
    /// Fixed TTL for every cached read.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_policy = TtlPolicy::Fixed(ttl);
        self
    }

    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Defaults overridden by `CATALOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when a variable is set but unparsable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = CatalogConfig::default();

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_CACHE_TTL_SECS)? {
            config.ttl_policy = match secs {
                0 => TtlPolicy::Infinite,
                secs => TtlPolicy::Fixed(Duration::from_secs(secs)),
            };
        }
        if let Some(memory_cost) = parse_var::<u32>(&lookup, ENV_KDF_MEMORY_KIB)? {
            config.kdf.memory_cost = memory_cost;
        }
        if let Some(time_cost) = parse_var::<u32>(&lookup, ENV_KDF_TIME_COST)? {
            config.kdf.time_cost = time_cost;
        }

        debug!("Loaded catalog config: {:?}", config);
        Ok(config)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::ConfigError(format!("{}={:?}: {}", name, raw, e))),
    }
}
