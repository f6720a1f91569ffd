//! Error types for diagnostics.

use agnostic_router::RouterError;
use thiserror::Error;

/// A failed conformance check.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// An observed value differs from the expected one.
    #[error("{check}: expected {expected}, got {actual}")]
    Mismatch {
        check: &'static str,
        expected: String,
        actual: String,
    },

    /// The diagnostic endpoint did not answer with JSON.
    #[error("response body is not JSON: {0}")]
    Body(#[from] serde_json::Error),

    /// Dispatching through the adapter failed.
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Result type alias for diagnostics.
pub type Result<T> = std::result::Result<T, DiagnosticError>;
