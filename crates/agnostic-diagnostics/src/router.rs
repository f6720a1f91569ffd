//! The diagnostic routes.

use agnostic_router::{Request, Router};
use serde_json::json;

/// Path of the readiness route.
pub const STATUS_PATH: &str = "/status";

/// Builds a router exposing the diagnostic endpoints.
///
/// - `GET /status` answers `200 ok`.
/// - `GET /diagnostic/{pathParam1}` answers `201` with `outheader1: xxx, yyy`
///   and a JSON echo of what the handler saw of the request.
///
/// Platform adapters mount it and check themselves with
/// [`crate::verify_adapter`].
#[must_use]
pub fn diagnostic_router() -> Router {
    Router::new()
        .get(STATUS_PATH, |_req, res| {
            Box::pin(async move {
                res.status(200).send("ok");
                Ok(())
            })
        })
        .get("/diagnostic/{pathParam1}", |req, res| {
            Box::pin(async move {
                res.append_header("outheader1", "xxx")
                    .append_header("outheader1", "yyy")
                    .status(201);
                res.json(&echo(req))?;
                Ok(())
            })
        })
}

fn echo(req: &Request) -> serde_json::Value {
    json!({
        "method": req.method,
        "path": req.path,
        "headers": { "inheader1": req.headers.get("inheader1") },
        "params": req.params,
        "query": req.query,
        "body": req.body,
    })
}
