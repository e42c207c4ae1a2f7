//! Error types for Platform API operations.

use thiserror::Error;

/// Errors that can occur during Platform API operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Configuration is missing or incomplete.
    #[error("Platform API configuration required: {0}")]
    ConfigMissing(String),

    /// Required fields were absent from a create request body.
    ///
    /// Raised locally, before any request is sent.
    #[error("Validation failed: {}", .missing.join("; "))]
    Validation { missing: Vec<String> },

    /// The property is absent or is a reserved metadata key.
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// The resource has no link with this relation.
    #[error("Link not found: {0}")]
    LinkNotFound(String),

    /// The server did not advertise this operation for the resource.
    #[error("Operation not available: {0}")]
    OperationUnavailable(String),

    /// The caller passed an argument the operation cannot act on.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A long-running operation did not return an embedded activity.
    #[error("Expected activity not found in response to operation '{operation}'")]
    MissingActivity { operation: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The API answered with a non-success status.
    #[error("API error: {method} {url} returned {status_code}: {message}")]
    Api {
        method: String,
        url: String,
        status_code: u16,
        message: String,
        body: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl PlatformError {
    /// The HTTP status code, if this is an API response error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether the API answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for Platform API operations.
pub type Result<T> = core::result::Result<T, PlatformError>;
