//! Transit lookup error types.

/// Errors that can occur while looking up the next departure.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Search page returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The result page did not contain a departure time
    #[error("Cannot get next_time. Please check the parameters.")]
    NotFound,

    /// The departure time text could not be parsed as HH:MM
    #[error("malformed departure time {text:?}: {reason}")]
    MalformedTime { text: String, reason: &'static str },

    /// The departure does not exist in the configured time zone
    #[error("departure time {0} does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

impl TransitError {
    pub(crate) fn malformed(text: &str, reason: &'static str) -> Self {
        TransitError::MalformedTime {
            text: text.to_string(),
            reason,
        }
    }
}
