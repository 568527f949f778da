//! Error types for stub resolution.

use thiserror::Error;

/// No captured call matched a stub's method and URL.
///
/// Returned from every delivery attempt (`and_return`, `respond`,
/// `respond_with`) when the code under test never issued a matching request.
/// A stub declared for a call that was never made is a test-authoring bug, so
/// resolution fails loudly instead of silently doing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no captured {method} request matching {url}")]
pub struct RequestNotFoundError {
    /// HTTP method the stub was declared for.
    pub method: String,
    /// URL the stub was declared for, including any query string.
    pub url: String,
}
