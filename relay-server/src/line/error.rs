//! LINE error types.

/// Errors from handling LINE webhooks and calling the LINE API.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Event source type is not user, group or room
    #[error("Unknown type : {0}")]
    UnknownSourceType(String),
}
