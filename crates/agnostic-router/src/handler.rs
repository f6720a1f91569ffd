//! Handler trait shared by route handlers and middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::BoxError;
use crate::request::Request;
use crate::response::Response;

/// A boxed future for async handler operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a handler or middleware call.
///
/// The response is communicated through the `&mut Response`; the `Ok` value
/// carries nothing.
pub type HandlerResult = std::result::Result<(), BoxError>;

/// Something that can act on a request by writing to a response.
///
/// Route handlers must end the response. Middleware may end it to stop
/// dispatch, or leave it open to let the request continue.
///
/// Any `Fn(&mut Request, &mut Response) -> BoxFuture<HandlerResult>` is a
/// handler:
///
/// ```
/// use agnostic_router::{BoxFuture, HandlerResult, Request, Response};
///
/// fn status<'a>(_req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
///     Box::pin(async move {
///         res.status(200).send("ok");
///         Ok(())
///     })
/// }
/// ```
pub trait Handler: Send + Sync {
    /// Handles the request.
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response)
        -> BoxFuture<'a, HandlerResult>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        self(req, res)
    }
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;
