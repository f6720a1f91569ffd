//! Cache configuration.

use std::time::Duration;

use serde::Deserialize;

/// How long entries live and how many are kept.
///
/// ```
/// use std::time::Duration;
/// use agnostic_cache::CacheOptions;
///
/// let options: CacheOptions = serde_json::from_str(r#"{"max_age_ms": 60000}"#).unwrap();
/// assert_eq!(options, CacheOptions::new(Duration::from_secs(60)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheOptions {
    /// Time-to-live of an entry, in milliseconds.
    pub max_age_ms: u64,
    /// Upper bound on stored entries. `None` or `0` means unbounded.
    #[serde(default)]
    pub max_items: Option<usize>,
}

impl CacheOptions {
    /// Creates options with the given time-to-live and no item bound.
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age_ms: u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX),
            max_items: None,
        }
    }

    /// Bounds the number of stored entries.
    #[must_use]
    pub const fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Returns the time-to-live.
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    /// Returns the item bound, if any.
    #[must_use]
    pub fn item_limit(&self) -> Option<usize> {
        self.max_items.filter(|&n| n > 0)
    }
}
