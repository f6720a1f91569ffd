//! # agnostic-cache
//!
//! In-memory caching for handlers built on `agnostic-router`.
//!
//! [`TtlCache`] stores the *computation* for a key rather than its value, so
//! callers that arrive while a fetch is still running share it instead of
//! starting their own. [`HttpResponseCacher`] layers entity tags and
//! `cache-control` headers on top for text responses.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use agnostic_cache::{CacheError, CacheOptions, FetchResponse, HttpResponseCacher};
//! use agnostic_router::{Request, Router};
//!
//! let pages: Arc<HttpResponseCacher<CacheError>> = Arc::new(HttpResponseCacher::new(
//!     |key: &str, _previous| {
//!         let body = format!("rendered {key}");
//!         async move { Ok(FetchResponse::hashed(body)) }
//!     },
//!     CacheOptions::new(Duration::from_secs(60)),
//! ));
//!
//! let router = Router::new().get("/pages/{name}", move |req, res| {
//!     let pages = Arc::clone(&pages);
//!     Box::pin(async move {
//!         let key = req.params.require("name")?.to_string();
//!         pages.fetch_and_serve(req, res, &key, None).await?;
//!         Ok(())
//!     })
//! });
//!
//! let res = futures::executor::block_on(router.respond(Request::get("/pages/about")));
//! assert_eq!(res.body, "rendered about");
//! assert_eq!(res.get_header("x-internal-cache-hit"), Some("MISS"));
//! ```

mod clock;
mod error;
mod hash;
mod http;
mod options;
mod settlement;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, Result};
pub use hash::hash_string;
pub use http::{default_cache_control, HttpResponseCacher, CACHE_HIT_HEADER};
pub use options::CacheOptions;
pub use settlement::{Settlement, Tracked};
pub use ttl::{CacheEntry, Computation, FetchResponse, TtlCache};
