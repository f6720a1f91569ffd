//! Router configuration.

use serde::Deserialize;

/// Tunable router behaviour.
///
/// Deserializable so it can live in the application's own config file:
///
/// ```
/// use agnostic_router::RouterOptions;
///
/// let options: RouterOptions = serde_json::from_str(r#"{"expose_errors": true}"#).unwrap();
/// assert!(options.expose_errors);
/// assert_eq!(options.unended_status, 404);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Put the failing error's text into 500 responses instead of a generic message.
    pub expose_errors: bool,
    /// Status used when a matched handler returns without ending the response.
    pub unended_status: u16,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            expose_errors: false,
            unended_status: 404,
        }
    }
}
