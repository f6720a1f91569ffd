//! Ready-made middleware.
//!
//! Middleware runs before route matching, in registration order. Ending the
//! response stops dispatch; leaving it open lets the request continue.

use tracing::info;

use crate::handler::{BoxFuture, Handler, HandlerResult};
use crate::request::{Method, Request};
use crate::response::Response;

/// Middleware that logs every request.
pub struct LoggingMiddleware;

impl Handler for LoggingMiddleware {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        _res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            info!(method = %req.method, path = %req.path, "--> request");
            Ok(())
        })
    }
}

/// Middleware that adds CORS headers and answers preflight requests.
///
/// The request's `origin` header is echoed back when it is allowed. A `*`
/// entry allows any origin.
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    origins: Vec<String>,
    methods: Vec<Method>,
    headers: Vec<String>,
    max_age_secs: u32,
}

impl CorsMiddleware {
    /// Allows every origin, the common methods and any header.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            origins: vec!["*".to_string()],
            methods: vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Delete,
                Method::Patch,
                Method::Options,
            ],
            headers: vec!["*".to_string()],
            max_age_secs: 86_400,
        }
    }

    /// Allows only the given origins.
    #[must_use]
    pub fn new(origins: &[&str]) -> Self {
        Self {
            origins: origins.iter().map(|&o| o.to_string()).collect(),
            methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete],
            headers: vec!["content-type".to_string(), "authorization".to_string()],
            max_age_secs: 86_400,
        }
    }

    #[must_use]
    pub fn methods(mut self, methods: &[Method]) -> Self {
        self.methods = methods.to_vec();
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|&h| h.to_ascii_lowercase()).collect();
        self
    }

    /// How long browsers may cache a preflight answer.
    #[must_use]
    pub const fn max_age_secs(mut self, secs: u32) -> Self {
        self.max_age_secs = secs;
        self
    }

    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.origins.iter().any(|o| o == "*") {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.origins
            .iter()
            .any(|o| o.eq_ignore_ascii_case(origin))
            .then(|| origin.to_string())
    }
}

impl Handler for CorsMiddleware {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let Some(origin) = self.allow_origin(req.get_header("origin")) else {
                return Ok(());
            };
            if origin != "*" {
                res.append_header("vary", "origin");
            }
            res.set_header("access-control-allow-origin", origin);

            // Preflight requests never reach a route.
            if req.method == Method::Options {
                let methods: Vec<String> = self
                    .methods
                    .iter()
                    .map(|m| m.as_str().to_ascii_uppercase())
                    .collect();
                res.set_header("access-control-allow-methods", methods.join(", "))
                    .set_header("access-control-allow-headers", self.headers.join(", "))
                    .set_header("access-control-max-age", self.max_age_secs.to_string())
                    .status(204)
                    .end();
            }
            Ok(())
        })
    }
}
