//! Conformance checks against the diagnostic routes.

use agnostic_router::{Adapter, Method, Request, Response, Router};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{DiagnosticError, Result};
use crate::router::STATUS_PATH;

/// URL of the canonical diagnostic request.
pub const DIAGNOSTIC_URL: &str = "/diagnostic/abc?query1=123&query1=456";

/// Builds the canonical diagnostic request.
///
/// Adapters under test translate it into their platform's request type.
#[must_use]
pub fn diagnostic_request() -> Request {
    Request::from_url(Method::Get, DIAGNOSTIC_URL).header("inheader1", "aaa, bbb")
}

/// Checks a response to [`diagnostic_request`].
///
/// # Errors
///
/// Returns the first check that failed.
pub fn verify_response(res: &Response) -> Result<()> {
    expect("res status code", json!(201), Some(&json!(res.status_code)))?;

    let outheader = res
        .headers
        .get("outheader1")
        .map(|values| values.join(",").split_whitespace().collect::<String>());
    expect(
        "res headers",
        json!("xxx,yyy"),
        outheader.map(Value::String).as_ref(),
    )?;

    let body: Value = serde_json::from_str(&res.body)?;
    expect("req method", json!("get"), body.get("method"))?;
    expect("req path", json!("/diagnostic/abc"), body.get("path"))?;
    expect("req headers", json!(["aaa, bbb"]), body.pointer("/headers/inheader1"))?;
    expect("req query", json!(["123", "456"]), body.pointer("/query/query1"))?;
    expect("req path params", json!("abc"), body.pointer("/params/pathParam1"))?;
    Ok(())
}

/// Runs the diagnostic checks against a router in-process.
///
/// # Errors
///
/// Returns the first check that failed.
pub async fn verify_router(router: &Router) -> Result<()> {
    let status = router.respond(Request::get(STATUS_PATH)).await;
    expect("status route", json!(200), Some(&json!(status.status_code)))?;

    verify_response(&router.respond(diagnostic_request()).await)
}

/// Runs the diagnostic checks through a platform adapter.
///
/// `native` should be the adapter's rendition of [`diagnostic_request`];
/// `read_reply` turns the platform reply back into a [`Response`] for
/// checking.
///
/// # Errors
///
/// Returns the dispatch failure or the first check that failed.
pub async fn verify_adapter<A, F>(
    router: &Router,
    adapter: &A,
    native: A::Native,
    read_reply: F,
) -> Result<()>
where
    A: Adapter + Sync,
    A::Native: Send,
    F: FnOnce(A::Reply) -> Response + Send,
{
    let reply = router.dispatch(adapter, native).await?;
    verify_response(&read_reply(reply))
}

fn expect(check: &'static str, expected: Value, actual: Option<&Value>) -> Result<()> {
    match actual {
        Some(actual) if *actual == expected => {
            debug!(check, "Diagnostic check passed");
            Ok(())
        }
        actual => Err(DiagnosticError::Mismatch {
            check,
            expected: expected.to_string(),
            actual: actual.map_or_else(|| "nothing".to_string(), Value::to_string),
        }),
    }
}
