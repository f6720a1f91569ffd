//! Error types for caching.

use std::fmt;

use thiserror::Error;

/// Cache-specific errors.
///
/// Cloneable, because one failed computation is shared by every caller that
/// fetched the same key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The fetcher failed to produce a value.
    #[error("fetch failed for key '{key}': {message}")]
    Fetch { key: String, message: String },
}

impl CacheError {
    /// Creates a fetch error for `key` from any displayable error.
    #[must_use]
    pub fn fetch(key: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::Fetch {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
