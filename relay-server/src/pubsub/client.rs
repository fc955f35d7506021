//! Pub/Sub REST client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::PubSubError;
use super::token::TokenSource;

/// Default base URL for the Pub/Sub API.
const DEFAULT_BASE_URL: &str = "https://pubsub.googleapis.com/v1";

/// Configuration for the Pub/Sub client.
#[derive(Debug, Clone)]
pub struct PubSubConfig {
    /// Project that owns the topics
    pub project_id: String,
    /// Bearer token source
    pub token: TokenSource,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PubSubConfig {
    /// Create a config that authenticates as the runtime service account.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            token: TokenSource::metadata(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Use a fixed access token.
    pub fn with_token(mut self, token: TokenSource) -> Self {
        self.token = token;
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: Vec<PubsubMessage>,
}

#[derive(Debug, Serialize)]
struct PubsubMessage {
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

/// Check a topic id: starts with a letter, 3-255 characters of
/// letters, digits and `-_.~+%`.
pub fn validate_topic(topic: &str) -> Result<(), PubSubError> {
    let valid_len = (3..=255).contains(&topic.len());
    let starts_with_letter = topic.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_chars = topic
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.~+%".contains(c));

    if valid_len && starts_with_letter && valid_chars && !topic.starts_with("goog") {
        Ok(())
    } else {
        Err(PubSubError::InvalidTopic(topic.to_string()))
    }
}

/// Client for publishing to Pub/Sub topics in one project.
#[derive(Debug, Clone)]
pub struct PubSubClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    token: TokenSource,
}

impl PubSubClient {
    pub fn new(config: PubSubConfig) -> Result<Self, PubSubError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| PubSubError::InvalidBaseUrl(config.base_url.clone()))?;

        Ok(Self {
            http,
            base_url,
            project_id: config.project_id,
            token: config.token,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `{base}/projects/{project}/topics/{topic}:publish`, with the project
    /// and topic percent-encoded as path segments.
    fn publish_url(&self, topic: &str) -> Result<Url, PubSubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PubSubError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "topics",
                format!("{topic}:publish").as_str(),
            ]);
        Ok(url)
    }

    /// Publish `payload` as JSON to `topic`; returns the message id.
    pub async fn publish<T: Serialize + ?Sized>(
        &self,
        topic: &str,
        payload: &T,
    ) -> Result<String, PubSubError> {
        validate_topic(topic)?;

        let data = serde_json::to_vec(payload)?;
        let request = PublishRequest {
            messages: vec![PubsubMessage {
                data: STANDARD.encode(data),
            }],
        };

        let url = self.publish_url(topic)?;
        let token = self.token.token(&self.http).await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PubSubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: PublishResponse = serde_json::from_str(&body)?;
        let message_id = parsed
            .message_ids
            .into_iter()
            .next()
            .ok_or(PubSubError::MissingMessageId)?;

        info!(topic, message_id = %message_id, "published message");
        Ok(message_id)
    }
}
