//! Serving cached text bodies with entity tags.

use std::future::Future;

use agnostic_router::{Request, Response};
use tracing::debug;

use crate::clock::Clock;
use crate::options::CacheOptions;
use crate::ttl::{Computation, FetchResponse, TtlCache};

/// Response header reporting whether the body came from the cache.
pub const CACHE_HIT_HEADER: &str = "x-internal-cache-hit";

/// Builds the default `cache-control` value for a time-to-live.
///
/// ```
/// use std::time::Duration;
///
/// assert_eq!(
///     agnostic_cache::default_cache_control(Duration::from_millis(90_500)),
///     "public, max-age=90, s-maxage=90, stale-while-revalidate=90, stale-if-error=90"
/// );
/// ```
#[must_use]
pub fn default_cache_control(max_age: std::time::Duration) -> String {
    let secs = max_age.as_secs();
    format!(
        "public, max-age={secs}, s-maxage={secs}, stale-while-revalidate={secs}, stale-if-error={secs}"
    )
}

/// A [`TtlCache`] of text bodies that answers HTTP requests directly.
#[derive(Debug)]
pub struct HttpResponseCacher<E> {
    cache: TtlCache<String, E>,
    cache_control: String,
}

impl<E> HttpResponseCacher<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Creates a cacher whose `cache-control` header is derived from the
    /// time-to-live.
    #[must_use]
    pub fn new<F, Fut>(fetcher: F, options: CacheOptions) -> Self
    where
        F: Fn(&str, Option<Computation<String, E>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<FetchResponse<String>, E>> + Send + 'static,
    {
        let cache_control = default_cache_control(options.max_age());
        Self {
            cache: TtlCache::new(fetcher, options),
            cache_control,
        }
    }

    /// Replaces the default `cache-control` header.
    #[must_use]
    pub fn with_cache_control(mut self, header: impl Into<String>) -> Self {
        self.cache_control = header.into();
        self
    }

    /// Replaces the time source of the underlying cache.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.cache = self.cache.with_clock(clock);
        self
    }

    /// Answers `req` from the cache entry for `key`.
    ///
    /// Replies `304 Not Modified` when the request's `if-none-match` carries
    /// the entry's hash, otherwise sends the body with `cache-control` and
    /// `etag` headers.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error when the cached computation failed. The
    /// response is left open in that case.
    pub async fn fetch_and_serve(
        &self,
        req: &Request,
        res: &mut Response,
        key: &str,
        cache_control_override: Option<&str>,
    ) -> Result<(), E> {
        let entry = self.cache.fetch(key);
        res.set_header(CACHE_HIT_HEADER, if entry.cache_hit { "HIT" } else { "MISS" });

        let response = entry.computation.await?;

        if let Some(etag) = response.hash.as_deref().map(|hash| format!("\"{hash}\"")) {
            if if_none_match(req, &etag) {
                debug!(key, "Entity tag matched, not modified");
                res.status(304).end();
                return Ok(());
            }
            res.set_header("etag", etag);
        }

        res.set_header(
            "cache-control",
            cache_control_override.unwrap_or(&self.cache_control),
        );
        res.send(response.data);
        Ok(())
    }
}

impl<E> HttpResponseCacher<E> {
    #[must_use]
    pub const fn cache(&self) -> &TtlCache<String, E> {
        &self.cache
    }

    #[must_use]
    pub fn cache_control(&self) -> &str {
        &self.cache_control
    }
}

fn if_none_match(req: &Request, etag: &str) -> bool {
    req.header_values("if-none-match")
        .iter()
        .flat_map(|value| value.split(','))
        .any(|candidate| candidate.trim() == etag)
}
