//! Client error model.

use thiserror::Error;

/// Failure of a remote call.
///
/// `is_transient` decides retry eligibility: connection-level failures and
/// rate-limit/server statuses are retried, validation and auth failures
/// propagate immediately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopifyError {
    /// Connection-level failure (DNS, TLS, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the API.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Top-level GraphQL errors (malformed query, access denied to a field).
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The response did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Parse(String),
}

impl ShopifyError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ShopifyError::Network(_) => true,
            ShopifyError::Api { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            ShopifyError::Graphql(_) | ShopifyError::Parse(_) => false,
        }
    }
}
