//! AutoRemote HTTP client.

use tracing::info;

use super::error::VoiceError;
use super::message::VoiceMessage;

/// Default AutoRemote send endpoint.
const DEFAULT_ENDPOINT: &str = "https://autoremotejoaomgcd.appspot.com/sendmessage";

/// Configuration for the AutoRemote client.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// AutoRemote device key
    pub token: String,
    /// Send endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl VoiceConfig {
    /// Create a new config with the given device key.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }
}

/// Client that sends voice messages through AutoRemote.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl VoiceClient {
    pub fn new(config: VoiceConfig) -> Result<Self, VoiceError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            token: config.token,
        })
    }

    /// Send a message; returns the response body.
    pub async fn send(&self, message: &VoiceMessage) -> Result<String, VoiceError> {
        info!(speaker = message.speaker(), words = %message.words(), "sending voice message");

        let payload = message.payload();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("key", self.token.as_str()), ("message", payload.as_str())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(VoiceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        info!(response = %body, "voice relay response");
        Ok(body)
    }
}
