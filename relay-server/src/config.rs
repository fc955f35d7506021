//! Server configuration.
//!
//! Settings are read once at startup from a JSON file, then overridden by
//! environment variables, and handed to the router as part of its state.
//! Every upstream credential is optional; a handler whose upstream is not
//! configured answers with an error instead of calling out.
//!
//! ```json
//! {
//!   "port": 8080,
//!   "transit": { "timezone": "Asia/Tokyo" },
//!   "chat": { "api_key": "sk-...", "model": "gpt-4o-mini" },
//!   "voice": { "token": "..." },
//!   "pubsub": { "project_id": "my-project" },
//!   "line": { "channel_token": "..." }
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{info, warn};

use crate::chat::DEFAULT_MODEL;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.json";

/// Errors while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for this schema
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Time zone name is not in the tz database
    #[error("unknown time zone: {0}")]
    InvalidTimezone(String),

    /// An environment override could not be parsed
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port to listen on
    pub port: u16,
    pub transit: TransitSettings,
    pub chat: ChatSettings,
    pub voice: VoiceSettings,
    pub pubsub: PubSubSettings,
    pub line: LineSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            transit: TransitSettings::default(),
            chat: ChatSettings::default(),
            voice: VoiceSettings::default(),
            pubsub: PubSubSettings::default(),
            line: LineSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransitSettings {
    /// Civil time zone departure times are read in
    pub timezone: String,
    /// Override for the search page URL
    pub base_url: Option<String>,
}

impl Default for TransitSettings {
    fn default() -> Self {
        Self {
            timezone: "Asia/Tokyo".to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub api_key: Option<String>,
    pub model: String,
    /// Override for the API base URL
    pub base_url: Option<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// AutoRemote device key
    pub token: Option<String>,
    /// Override for the send endpoint
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PubSubSettings {
    pub project_id: Option<String>,
    /// Static access token; the metadata server is used when absent
    pub access_token: Option<String>,
    /// Override for the API base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LineSettings {
    pub channel_token: Option<String>,
    /// Override for the API base URL
    pub base_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Read the config file at `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "loaded config");
        Ok(config.normalized())
    }

    /// Read the config file and apply process environment overrides.
    pub fn from_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.time_zone()?;
        Ok(config)
    }

    /// Override settings from environment-style lookups.
    ///
    /// Recognised keys: `PORT`, `TRANSIT_TIMEZONE`, `OPENAI_API_KEY`,
    /// `OPENAI_MODEL`, `AUTOREMOTE_TOKEN`, `GCP_PROJECT_ID`,
    /// `PUBSUB_ACCESS_TOKEN`, `LINE_CHANNEL_TOKEN`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let get = |key: &str| non_empty(lookup(key));

        if let Some(port) = get("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port,
            })?;
        }
        if let Some(tz) = get("TRANSIT_TIMEZONE") {
            self.transit.timezone = tz;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.chat.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.chat.model = model;
        }
        if let Some(token) = get("AUTOREMOTE_TOKEN") {
            self.voice.token = Some(token);
        }
        if let Some(project) = get("GCP_PROJECT_ID") {
            self.pubsub.project_id = Some(project);
        }
        if let Some(token) = get("PUBSUB_ACCESS_TOKEN") {
            self.pubsub.access_token = Some(token);
        }
        if let Some(token) = get("LINE_CHANNEL_TOKEN") {
            self.line.channel_token = Some(token);
        }
        Ok(())
    }

    /// The civil time zone for departure times.
    pub fn time_zone(&self) -> Result<Tz, ConfigError> {
        self.transit
            .timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.transit.timezone.clone()))
    }

    // Empty strings in the file mean "not configured".
    fn normalized(mut self) -> Self {
        self.chat.api_key = non_empty(self.chat.api_key);
        self.voice.token = non_empty(self.voice.token);
        self.pubsub.project_id = non_empty(self.pubsub.project_id);
        self.pubsub.access_token = non_empty(self.pubsub.access_token);
        self.line.channel_token = non_empty(self.line.channel_token);
        self
    }
}
