//! # agnostic-diagnostics
//!
//! A small router with known behaviour, plus checks that a platform adapter
//! carries requests and responses through it faithfully.
//!
//! ```
//! use agnostic_diagnostics::{diagnostic_router, verify_router};
//!
//! futures::executor::block_on(verify_router(&diagnostic_router())).unwrap();
//! ```

mod error;
mod router;
mod verify;

pub use error::{DiagnosticError, Result};
pub use router::{diagnostic_router, STATUS_PATH};
pub use verify::{diagnostic_request, verify_adapter, verify_response, verify_router, DIAGNOSTIC_URL};
