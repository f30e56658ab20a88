//! CDM client errors

use thiserror::Error;

/// Errors that can occur when interacting with the CDM REST API or the
/// cloud GraphQL API
#[derive(Debug, Error)]
pub enum CdmError {
    /// HTTP request/response error (connection refused, TLS, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status
    #[error("CDM API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, or the raw body
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, wrong credentials, missing role)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A name lookup matched more than one remote object
    #[error("Multiple {object_type} objects named '{name}' ({count} matches)")]
    AmbiguousMatch {
        /// Object type that was searched
        object_type: String,
        /// Name that was searched for
        name: String,
        /// Number of exact-name matches
        count: usize,
    },

    /// Invalid request (e.g., missing required fields, disallowed values)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The GraphQL endpoint returned an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

impl CdmError {
    /// Whether this error means the remote resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CdmError::NotFound(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CdmError::Api { status, .. } => Some(*status),
            CdmError::NotFound(_) => Some(404),
            CdmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
