//! Access tokens for the Pub/Sub API.

use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use super::error::PubSubError;

/// Token endpoint of the compute metadata server.
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Where publish requests get their bearer token from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// A fixed token from configuration.
    Static(String),
    /// The runtime service account, via the metadata server.
    Metadata { url: String },
}

impl TokenSource {
    /// The default metadata server token source.
    pub fn metadata() -> Self {
        TokenSource::Metadata {
            url: METADATA_TOKEN_URL.to_string(),
        }
    }

    /// Fetch a token. Metadata tokens are requested fresh every call.
    pub async fn token(&self, http: &reqwest::Client) -> Result<String, PubSubError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Metadata { url } => {
                let response = http
                    .get(url)
                    .header(
                        HeaderName::from_static("metadata-flavor"),
                        HeaderValue::from_static("Google"),
                    )
                    .send()
                    .await
                    .map_err(|e| PubSubError::Token(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(PubSubError::Token(format!(
                        "metadata server returned {status}"
                    )));
                }

                let token: MetadataToken = response
                    .json()
                    .await
                    .map_err(|e| PubSubError::Token(e.to_string()))?;
                debug!("fetched access token from metadata server");

                Ok(token.access_token)
            }
        }
    }
}
