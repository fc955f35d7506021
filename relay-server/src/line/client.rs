//! LINE Messaging API client.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::info;

use super::error::LineError;

/// Default base URL for the LINE Messaging API.
const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// Configuration for the LINE client.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Channel access token
    pub channel_token: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LineConfig {
    pub fn new(channel_token: impl Into<String>) -> Self {
        Self {
            channel_token: channel_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Client for the LINE Messaging API.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    base_url: String,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Result<Self, LineError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.channel_token))
            .map_err(|_| LineError::Api {
                status: 0,
                message: "Invalid channel token format".to_string(),
            })?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Reply to a webhook event with a single text message.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let request = ReplyRequest {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        info!("sent LINE reply");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reply_posts_text_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .and(header("authorization", "Bearer chan"))
            .and(body_json(serde_json::json!({
                "replyToken": "r-1",
                "messages": [{"type": "text", "text": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = LineClient::new(LineConfig::new("chan").with_base_url(server.uri())).unwrap();
        client.reply("r-1", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn reply_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid reply token"))
            .mount(&server)
            .await;

        let client = LineClient::new(LineConfig::new("chan").with_base_url(server.uri())).unwrap();
        let err = client.reply("bad", "hello").await.unwrap_err();
        assert!(matches!(err, LineError::Api { status: 400, .. }));
    }
}
