//! Error types for the Rework backend client.

use super::scope::ScopeId;
use thiserror::Error;

/// Errors produced by the credential-scoped backend clients.
///
/// Callers never see reqwest's native error type for a rejected call: every
/// non-success response becomes [`ApiError::Backend`] and every no-response
/// failure becomes [`ApiError::Network`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// A credential scope was constructed with an empty secret.
    #[error("Rework {scope} credentials not found in configuration")]
    MissingCredentials { scope: ScopeId },

    /// The backend answered with a non-success status.
    #[error("Rework API error ({status}): {payload}")]
    Backend { status: u16, payload: String },

    /// The backend could not be reached (connect failure, timeout).
    #[error("Rework API unreachable: {0}")]
    Network(#[source] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request body could not be form-encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}
