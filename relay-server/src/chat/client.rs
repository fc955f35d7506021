//! Chat completions HTTP client.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, info};

use super::error::ChatError;
use super::types::{ChatMessage, ChatRequest, ChatResponse};

/// Default base URL for the chat completions API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// System prompt sent ahead of every question.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Bearer API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Base URL for the API
    pub base_url: String,
    /// System prompt
    pub system_prompt: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ChatConfig {
    /// Create a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_secs: 60,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for a chat completions API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    system_prompt: String,
}

impl ChatClient {
    /// Create a new chat client with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
            ChatError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            model: config.model,
            system_prompt: config.system_prompt,
        })
    }

    /// The model this client asks.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask a single question and return the answer text.
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(&self.system_prompt),
                ChatMessage::user(question),
            ],
        };
        debug!(model = %self.model, question, "sending chat request");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ChatError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| ChatError::Json {
            message: e.to_string(),
        })?;

        let answer = parsed
            .first_content()
            .ok_or(ChatError::EmptyResponse)?
            .to_string();
        info!(answer_len = answer.len(), "received chat answer");

        Ok(answer)
    }
}
