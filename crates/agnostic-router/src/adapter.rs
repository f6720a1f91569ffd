//! Contract between the router and platform adapters.

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// Translates a platform's native request/reply pair to and from the generic
/// [`Request`] and [`Response`].
///
/// Implementations must lower-case the method and header names, keep repeated
/// headers and query parameters as separate values, and hand the body over as
/// a string. Failures are reported as [`RouterError::Adapter`](crate::RouterError::Adapter).
/// See [`Router::dispatch`](crate::Router::dispatch).
pub trait Adapter {
    /// The platform's incoming event.
    type Native;
    /// The platform's reply shape.
    type Reply;

    /// Builds a generic request from a platform event.
    fn map_request(&self, native: Self::Native) -> Result<Request>;

    /// Converts a finished generic response into the platform's reply.
    fn map_response(&self, response: Response) -> Result<Self::Reply>;
}
