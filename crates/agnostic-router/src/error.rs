//! Error types for routing.

use thiserror::Error;

/// Boxed error returned by handlers and middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid path template.
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Parameter extraction was attempted on a path the pattern does not accept.
    #[error("path '{path}' does not match path matcher '{pattern}'")]
    PathMismatch { path: String, pattern: String },

    /// A middleware function failed.
    #[error("middleware failed: {0}")]
    Middleware(#[source] BoxError),

    /// A route handler failed.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// Translating between a platform event and the generic types failed.
    #[error("adapter mapping failed: {0}")]
    Adapter(String),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
