//! Generic HTTP response type.

use serde::Serialize;
use tracing::warn;

use crate::request::{MultiValueMap, Underlying};

/// A generic HTTP response, written by middleware and handlers and read back
/// by the platform adapter.
///
/// A response is finished by exactly one terminal write: [`Response::send`],
/// [`Response::json`] or [`Response::end`]. Later terminal writes are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: MultiValueMap,
    /// Response body.
    pub body: String,
    /// Whether a terminal write has happened.
    pub ended: bool,
    /// Platform response this will be written to.
    #[serde(skip)]
    pub underlying: Underlying,
}

impl Response {
    /// Creates a fresh, unended 200 response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status_code: 200,
            headers: MultiValueMap::new(),
            body: String::new(),
            ended: false,
            underlying: Underlying::default(),
        }
    }

    /// Creates a response bound to a platform response object.
    #[must_use]
    pub fn with_underlying(underlying: Underlying) -> Self {
        Self {
            underlying,
            ..Self::new()
        }
    }

    /// Sets the status code.
    pub const fn status(&mut self, status: u16) -> &mut Self {
        self.status_code = status;
        self
    }

    /// Replaces every value of a header. The name is lower-cased.
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.headers.insert(key.to_ascii_lowercase(), vec![value.into()]);
        self
    }

    /// Appends a value to a header. The name is lower-cased.
    pub fn append_header(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.headers
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    /// Gets the first value of a header, ignoring the name's case.
    #[must_use]
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Writes the body and ends the response.
    pub fn send(&mut self, body: impl Into<String>) {
        if self.guard_ended("send") {
            return;
        }
        self.body = body.into();
        self.ended = true;
    }

    /// Serializes `data` as the JSON body and ends the response.
    ///
    /// # Errors
    ///
    /// Returns the serialization error; the response is left untouched.
    pub fn json<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<(), serde_json::Error> {
        if self.guard_ended("json") {
            return Ok(());
        }
        let body = serde_json::to_string(data)?;
        self.set_header("content-type", "application/json");
        self.body = body;
        self.ended = true;
        Ok(())
    }

    /// Ends the response without touching the body.
    pub fn end(&mut self) {
        if self.guard_ended("end") {
            return;
        }
        self.ended = true;
    }

    fn guard_ended(&self, op: &str) -> bool {
        if self.ended {
            warn!(op, status = self.status_code, "Ignoring write to an ended response");
        }
        self.ended
    }

    /// Returns the status text for the current status code.
    #[must_use]
    pub const fn status_text(&self) -> &'static str {
        match self.status_code {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_defaults() {
        let res = Response::new();
        assert_eq!(res.status_code, 200);
        assert!(res.headers.is_empty());
        assert!(res.body.is_empty());
        assert!(!res.ended);
    }

    #[test]
    fn test_response_json() {
        let mut res = Response::new();
        res.status(201)
            .json(&serde_json::json!({"name": "test"}))
            .unwrap();

        assert_eq!(res.status_code, 201);
        assert_eq!(res.get_header("content-type"), Some("application/json"));
        assert_eq!(res.body, r#"{"name":"test"}"#);
        assert!(res.ended);
    }

    #[test]
    fn test_response_headers() {
        let mut res = Response::new();
        res.append_header("outheader1", "xxx")
            .append_header("outheader1", "yyy")
            .set_header("x-custom", "one")
            .set_header("x-custom", "two");

        assert_eq!(res.headers["outheader1"], ["xxx", "yyy"]);
        assert_eq!(res.headers["x-custom"], ["two"]);
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let mut res = Response::new();
        res.set_header("Content-Type", "text/plain")
            .set_header("content-type", "application/json")
            .append_header("X-Trace", "a")
            .append_header("x-trace", "b");

        assert_eq!(res.headers.len(), 2);
        assert_eq!(res.headers["content-type"], ["application/json"]);
        assert_eq!(res.get_header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(res.headers["x-trace"], ["a", "b"]);
    }

    #[test]
    fn test_terminal_writes_after_end_are_ignored() {
        let mut res = Response::new();
        res.status(202).send("first");
        res.send("second");
        res.json(&"third").unwrap();

        assert_eq!(res.body, "first");
        assert!(res.ended);

        // Header mutation stays allowed.
        res.set_header("x-late", "1");
        assert_eq!(res.get_header("x-late"), Some("1"));
    }

    #[test]
    fn test_end_keeps_body() {
        let mut res = Response::new();
        res.body = "prefilled".to_string();
        res.status(304).end();
        assert_eq!(res.body, "prefilled");
        assert_eq!(res.status_text(), "Not Modified");
        assert!(res.ended);
    }
}
