//! Error types for the catalog core.

use std::fmt;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the catalog core.
///
/// Every service operation returns `Result<T>`. Validation failures are data,
/// not panics: callers pattern-match on [`Error::ValidationFailed`] to get the
/// ordered violation list. Everything else is an infrastructure failure that
/// propagates unchanged to the caller's boundary (no retries happen here).
#[derive(Debug, Clone)]
pub enum Error {
    /// A validator rejected the candidate entity state.
    ///
    /// Carries every violation that was found, in the order the checks ran.
    /// "Not found" is reported through this variant as well, with a single
    /// `"<Entity> with id <id> does not exist"` message.
    ValidationFailed(Vec<String>),

    /// Serialization failed when converting a value to cache bytes.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes back to a value.
    ///
    /// **Recovery:** the entry is evicted and recomputed from the store.
    DeserializationError(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Persistence gateway error (lost handle, write on a read-only
    /// unit of work, dangling relation at commit time, ...).
    RepositoryError(String),

    /// Password hashing primitive failed.
    HashingError(String),

    /// Invalid configuration value.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Build a validation failure from a list of messages.
    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::ValidationFailed(messages.into_iter().map(Into::into).collect())
    }

    /// Violation messages carried by a validation failure, empty otherwise.
    pub fn messages(&self) -> &[String] {
        match self {
            Error::ValidationFailed(messages) => messages,
            _ => &[],
        }
    }

    /// True for [`Error::ValidationFailed`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::ValidationFailed(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValidationFailed(messages) => {
                write!(f, "Validation failed: {}", messages.join(", "))
            }
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            Error::HashingError(msg) => write!(f, "Hashing error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
