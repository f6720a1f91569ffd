//! # agnostic-router
//!
//! A platform-agnostic HTTP router. Thin adapters (Lambda, Workers, a hyper
//! server, ...) turn their native events into a generic [`Request`], let the
//! [`Router`] write a generic [`Response`], and translate it back.
//!
//! This crate provides:
//! - Path templates with named parameters, wildcards and optional trailing slashes
//! - Per-method route tables matched in registration order
//! - Middleware that can end the response to short-circuit dispatch
//! - An [`Adapter`] contract for platform integrations
//!
//! ## Quick Start
//!
//! ```
//! use agnostic_router::{BoxFuture, HandlerResult, Request, Response, Router};
//!
//! fn user<'a>(req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
//!     Box::pin(async move {
//!         let id = req.params.get("id").unwrap_or("unknown").to_string();
//!         res.status(200).json(&serde_json::json!({ "id": id }))?;
//!         Ok(())
//!     })
//! }
//!
//! let router = Router::new().get("/users/{id}", user);
//!
//! # futures::executor::block_on(async {
//! let response = router.respond(Request::get("/users/123")).await;
//! assert_eq!(response.body, r#"{"id":"123"}"#);
//! # });
//! ```
//!
//! ## Path Templates
//!
//! - `/users/{id}` captures one segment as `id`
//! - `/static/*` matches `/static` and everything below it
//! - `/docs/` and `/docs` both accept an optional trailing slash
//! - a query string after the path is ignored by matching
//!
//! Routes are tried in the order they were registered and the first match
//! wins, so a wildcard registered early shadows more specific routes.
//!
//! ## Middleware
//!
//! ```
//! use agnostic_router::{CorsMiddleware, LoggingMiddleware, Router};
//!
//! let router = Router::new()
//!     .with_middleware(LoggingMiddleware)
//!     .with_middleware(CorsMiddleware::permissive())
//!     .middleware(|req, res| {
//!         Box::pin(async move {
//!             if req.get_header("authorization").is_none() {
//!                 res.status(401).send("Unauthorized");
//!             }
//!             Ok(())
//!         })
//!     });
//! ```

mod adapter;
mod error;
mod handler;
mod middleware;
mod options;
mod path;
mod request;
mod response;
mod router;

pub use adapter::Adapter;
pub use error::{BoxError, Result, RouterError};
pub use handler::{BoxFuture, BoxedHandler, Handler, HandlerResult};
pub use middleware::{CorsMiddleware, LoggingMiddleware};
pub use options::RouterOptions;
pub use path::PathPattern;
pub use request::{Method, MultiValueMap, PathParams, Request, Underlying};
pub use response::Response;
pub use router::{Route, Router};
