//! Chat client error types.

/// Errors from the chat completions client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by chat API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response contained no choices
    #[error("chat API returned no choices")]
    EmptyResponse,
}
