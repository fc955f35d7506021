//! Transit route search client.

use tracing::{debug, info};

use super::error::TransitError;

/// Default endpoint for the printable route search result page.
const DEFAULT_BASE_URL: &str = "https://transit.yahoo.co.jp/search/print";

/// Fixed search options: allow limited express and shinkansen, IC fares,
/// first result only.
const SEARCH_OPTIONS: &[(&str, &str)] = &[
    ("type", "1"),
    ("flatlon", ""),
    ("tlatlon", ""),
    ("viacode", ""),
    ("shin", "1"),
    ("ex", "1"),
    ("hb", "1"),
    ("al", "1"),
    ("lb", "1"),
    ("sr", "1"),
    ("ws", "3"),
    ("s", "0"),
    ("ei", ""),
    ("fl", "1"),
    ("tl", "3"),
    ("expkind", "1"),
    ("mtf", ""),
    ("out_y", ""),
    ("mode", ""),
    ("c", ""),
    ("searchOpt", ""),
    ("stype", ""),
    ("ticket", "ic"),
    ("userpass", "1"),
    ("passtype", ""),
    ("detour_id", ""),
    ("no", "1"),
];

/// Configuration for the transit search client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Search page URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl TransitConfig {
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

/// Client for the transit route search page.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransitClient {
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the printable result page for a route search.
    pub async fn fetch_result_page(&self, from: &str, to: &str) -> Result<String, TransitError> {
        let mut query: Vec<(&str, &str)> = vec![("from", from), ("to", to)];
        query.extend_from_slice(SEARCH_OPTIONS);

        info!(from, to, "searching route");

        let response = self.http.get(&self.base_url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "fetched result page");

        Ok(body)
    }
}
