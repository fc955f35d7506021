//! Voice relay error types.

/// Errors that can occur when relaying a voice message.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// AutoRemote returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}
