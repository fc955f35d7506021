//! Pub/Sub error types.

/// Errors that can occur when publishing to Pub/Sub.
#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Topic name is not a valid Pub/Sub topic id
    #[error("invalid topic name {0:?}")]
    InvalidTopic(String),

    /// Base URL cannot carry a path
    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),

    /// Could not obtain an access token
    #[error("access token unavailable: {0}")]
    Token(String),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to encode or decode JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Publish succeeded but no message id came back
    #[error("publish returned no message id")]
    MissingMessageId,
}
