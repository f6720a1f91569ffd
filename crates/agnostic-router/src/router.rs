//! Main router implementation.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::adapter::Adapter;
use crate::error::{Result, RouterError};
use crate::handler::{BoxFuture, BoxedHandler, Handler, HandlerResult};
use crate::options::RouterOptions;
use crate::path::PathPattern;
use crate::request::{Method, PathParams, Request};
use crate::response::Response;

const NOT_FOUND_BODY: &str = "Not found";
const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

/// A single route definition.
#[derive(Clone)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Path pattern.
    pub pattern: PathPattern,
    /// Request handler.
    pub handler: BoxedHandler,
}

impl Route {
    /// Creates a new route.
    #[must_use]
    pub fn new(method: Method, pattern: PathPattern, handler: impl Handler + 'static) -> Self {
        Self {
            method,
            pattern,
            handler: Arc::new(handler),
        }
    }
}

/// The main router for handling HTTP requests.
///
/// Routes and middleware are registered while building the router; once built
/// it is only read, so one instance can serve concurrent requests.
///
/// ```
/// use agnostic_router::{BoxFuture, HandlerResult, Request, Response, Router};
///
/// fn user<'a>(req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
///     Box::pin(async move {
///         let id = req.params.get("id").unwrap_or_default().to_string();
///         res.send(format!("User: {id}"));
///         Ok(())
///     })
/// }
///
/// let router = Router::new().get("/users/{id}", user);
/// assert_eq!(router.routes(agnostic_router::Method::Get).len(), 1);
/// ```
pub struct Router {
    /// Registered routes, one table per method.
    routes: [Vec<Route>; Method::COUNT],
    /// Global middleware.
    middleware: Vec<BoxedHandler>,
    options: RouterOptions,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Default::default(),
            middleware: Vec::new(),
            options: RouterOptions::default(),
        }
    }

    /// Replaces the router options.
    #[must_use]
    pub fn with_options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the router options.
    #[must_use]
    pub const fn config(&self) -> &RouterOptions {
        &self.options
    }

    /// Adds a GET route.
    #[must_use]
    pub fn get<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Get, path, handler)
    }

    /// Adds a POST route.
    #[must_use]
    pub fn post<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Post, path, handler)
    }

    /// Adds a PUT route.
    #[must_use]
    pub fn put<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Put, path, handler)
    }

    /// Adds a DELETE route.
    #[must_use]
    pub fn delete<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Delete, path, handler)
    }

    /// Adds a PATCH route.
    #[must_use]
    pub fn patch<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Patch, path, handler)
    }

    /// Adds a HEAD route.
    #[must_use]
    pub fn head<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Head, path, handler)
    }

    /// Adds an OPTIONS route.
    #[must_use]
    pub fn options<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Options, path, handler)
    }

    /// Adds a CONNECT route.
    #[must_use]
    pub fn connect<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Connect, path, handler)
    }

    /// Adds a TRACE route.
    #[must_use]
    pub fn trace<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Trace, path, handler)
    }

    /// Adds a route with any method.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid path template. Use [`Router::try_route`]
    /// to handle the error instead.
    #[must_use]
    pub fn route<F>(self, method: Method, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        match self.try_route(method, path, handler) {
            Ok(router) => router,
            Err(err) => panic!("{err}"),
        }
    }

    /// Adds a route with any method, failing on an invalid path template.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when `path` is not a valid
    /// path template.
    pub fn try_route<F>(self, method: Method, path: &str, handler: F) -> Result<Self>
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        let pattern = PathPattern::new(path)?;
        Ok(self.route_with(method, pattern, handler))
    }

    /// Adds a route from a compiled pattern and any [`Handler`].
    ///
    /// Use this for precompiled regex patterns or handlers that are structs.
    #[must_use]
    pub fn route_with(
        mut self,
        method: Method,
        pattern: impl Into<PathPattern>,
        handler: impl Handler + 'static,
    ) -> Self {
        self.routes[method.index()].push(Route::new(method, pattern.into(), handler));
        self
    }

    /// Adds global middleware. Runs before routing, in registration order.
    #[must_use]
    pub fn middleware<F>(self, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.with_middleware(handler)
    }

    /// Adds any [`Handler`] as global middleware.
    #[must_use]
    pub fn with_middleware(mut self, mw: impl Handler + 'static) -> Self {
        self.middleware.push(Arc::new(mw));
        self
    }

    /// Returns the routes registered for `method`, in match order.
    #[must_use]
    pub fn routes(&self, method: Method) -> &[Route] {
        &self.routes[method.index()]
    }

    /// Handles an incoming request, writing the outcome to `res`.
    ///
    /// Never fails: every failure mode ends in a response.
    pub fn handle<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            debug!(method = %req.method, path = %req.path, "Routing request");

            for mw in &self.middleware {
                if let Err(err) = mw.call(req, res).await {
                    let err = RouterError::Middleware(err);
                    error!(method = %req.method, path = %req.path, error = %err, "Request failed");
                    self.write_error(res, &err);
                    return;
                }
                if res.ended {
                    debug!(method = %req.method, path = %req.path, "Middleware ended the response");
                    return;
                }
            }

            let Some((route, params)) = self.find_route(req) else {
                info!(method = %req.method, path = %req.path, "Route not found");
                res.status(404).send(NOT_FOUND_BODY);
                return;
            };
            req.params.merge(params);

            match route.handler.call(req, res).await {
                Ok(()) if res.ended => {}
                Ok(()) => {
                    error!(
                        method = %req.method,
                        path = %req.path,
                        "Route did not end the response"
                    );
                    self.write_unended(res);
                }
                Err(err) => {
                    let err = RouterError::Handler(err);
                    error!(method = %req.method, path = %req.path, error = %err, "Request failed");
                    self.write_error(res, &err);
                }
            }
        })
    }

    /// Handles an owned request and returns the finished response.
    pub async fn respond(&self, mut req: Request) -> Response {
        let mut res = Response::new();
        self.handle(&mut req, &mut res).await;
        res
    }

    /// Runs a platform event through `adapter`, the router, and back.
    ///
    /// A request that cannot be mapped is answered with a 500 response, which
    /// is still mapped back.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error when the response cannot be mapped.
    pub async fn dispatch<A>(&self, adapter: &A, native: A::Native) -> Result<A::Reply>
    where
        A: Adapter + Sync,
        A::Native: Send,
    {
        let mut res = Response::new();
        match adapter.map_request(native) {
            Ok(mut req) => self.handle(&mut req, &mut res).await,
            Err(err) => {
                error!(error = %err, "Failed to map platform request");
                self.write_error(&mut res, &err);
            }
        }
        adapter.map_response(res)
    }

    /// Finds the first route for the request's method whose pattern accepts its path.
    fn find_route(&self, request: &Request) -> Option<(&Route, PathParams)> {
        self.routes(request.method)
            .iter()
            .find_map(|route| route.pattern.match_path(&request.path).map(|p| (route, p)))
    }

    fn write_unended(&self, res: &mut Response) {
        let status = self.options.unended_status;
        if status == 404 {
            res.status(404).send(NOT_FOUND_BODY);
        } else {
            let message = res.status(status).status_text();
            write_json_error(res, status, message);
        }
    }

    fn write_error(&self, res: &mut Response, err: &RouterError) {
        if res.ended {
            return;
        }
        let message = if self.options.expose_errors {
            err.to_string()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        };
        write_json_error(res, 500, &message);
    }
}

/// Writes `{"message": ...}` with the given status and ends the response.
fn write_json_error(res: &mut Response, status: u16, message: &str) {
    let body = serde_json::json!({ "message": message });
    res.status(status)
        .set_header("content-type", "application/json")
        .send(body.to_string());
}
