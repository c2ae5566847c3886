//! Error types shared across the crate
//!
//! Every failure path surfaces as one of these kinds; nothing is silently
//! swallowed except usage telemetry, whose errors are discarded by design
//! (see [`crate::usage`]).

use serde::Deserialize;
use thiserror::Error;

use crate::validate::Violations;

/// Structured error body returned by the Distribution API on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detail: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}: {}", self.status_code, self.message, self.detail)
    }
}

#[derive(Debug, Error)]
pub enum DistError {
    /// Configuration violates a static constraint; reported before any
    /// network call and never retried.
    #[error("invalid configuration:\n{0}")]
    Validation(Violations),

    /// Network or connection failure calling the API. Retry, if any, is the
    /// transport's concern, not this layer's.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API returned a non-2xx status with a structured error body,
    /// surfaced verbatim.
    #[error("API request failed: {0}")]
    Api(ApiError),

    /// The requested resource does not exist. Read maps this to "drop from
    /// state"; Delete treats it as already-deleted.
    #[error("resource not found")]
    NotFound,

    /// Signing-key creation report contained no SUCCESS entry.
    #[error("failed to deploy signing key: {0}")]
    KeyDeployment(String),

    /// Malformed or unsupported import identifier.
    #[error("unexpected import identifier {id:?}: expected {expected}")]
    ImportId { id: String, expected: &'static str },

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

impl DistError {
    /// Whether this error is a not-found signal rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DistError::NotFound)
    }
}

impl From<Violations> for DistError {
    fn from(violations: Violations) -> Self {
        DistError::Validation(violations)
    }
}
