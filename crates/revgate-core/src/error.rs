//! Shared error type across revgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Missing or malformed input.
    BadRequest,
    /// Rejected by the experiment policy.
    PolicyRejected,
    /// Model service answered with a failure.
    UpstreamError,
    /// Model service could not be reached.
    UpstreamUnavailable,
    /// Invalid configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PolicyRejected => "POLICY_REJECTED",
            ClientCode::UpstreamError => "UPSTREAM_ERROR",
            ClientCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Your review is too short. Please write at least {min_required} words for a more meaningful review.")]
    ShortReview { word_count: usize, min_required: usize },
    #[error("Model service error: {0}")]
    UpstreamStatus(u16),
    #[error("Model service returned an invalid response: {0}")]
    UpstreamInvalid(String),
    #[error("Failed to connect to model service: {0}")]
    UpstreamUnavailable(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GatewayError::BadRequest(_) => ClientCode::BadRequest,
            GatewayError::ShortReview { .. } => ClientCode::PolicyRejected,
            GatewayError::UpstreamStatus(_) | GatewayError::UpstreamInvalid(_) => {
                ClientCode::UpstreamError
            }
            GatewayError::UpstreamUnavailable(_) => ClientCode::UpstreamUnavailable,
            GatewayError::Config(_) => ClientCode::Config,
            GatewayError::Internal(_) => ClientCode::Internal,
        }
    }
}
