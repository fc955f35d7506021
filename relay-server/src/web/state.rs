//! Application state for the web layer.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::chat::{ChatClient, ChatConfig, ChatError};
use crate::config::{AppConfig, ConfigError};
use crate::line::{LineClient, LineConfig, LineError};
use crate::pubsub::{PubSubClient, PubSubConfig, PubSubError, TokenSource};
use crate::transit::{NextTrainFinder, TransitClient, TransitConfig, TransitError};
use crate::voice::{VoiceClient, VoiceConfig, VoiceError};

/// Errors while building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("transit client: {0}")]
    Transit(#[from] TransitError),
    #[error("chat client: {0}")]
    Chat(#[from] ChatError),
    #[error("voice client: {0}")]
    Voice(#[from] VoiceError),
    #[error("pubsub client: {0}")]
    PubSub(#[from] PubSubError),
    #[error("LINE client: {0}")]
    Line(#[from] LineError),
}

/// Shared application state.
///
/// Upstream clients are `None` when their credentials are not configured.
#[derive(Clone)]
pub struct AppState {
    /// Next-train lookup
    pub transit: Arc<NextTrainFinder>,

    /// Civil time zone for departure times
    pub time_zone: Tz,

    pub chat: Option<Arc<ChatClient>>,
    pub voice: Option<Arc<VoiceClient>>,
    pub pubsub: Option<Arc<PubSubClient>>,
    pub line: Option<Arc<LineClient>>,
}

impl AppState {
    /// Build all clients from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let time_zone = config.time_zone()?;

        let mut transit_config = TransitConfig::default();
        if let Some(url) = &config.transit.base_url {
            transit_config = transit_config.with_base_url(url);
        }
        let transit = NextTrainFinder::new(TransitClient::new(transit_config)?);

        let chat = config
            .chat
            .api_key
            .as_ref()
            .map(|key| {
                let mut chat_config = ChatConfig::new(key, &config.chat.model);
                if let Some(url) = &config.chat.base_url {
                    chat_config = chat_config.with_base_url(url);
                }
                ChatClient::new(chat_config).map(Arc::new)
            })
            .transpose()?;

        let voice = config
            .voice
            .token
            .as_ref()
            .map(|token| {
                let mut voice_config = VoiceConfig::new(token);
                if let Some(url) = &config.voice.endpoint {
                    voice_config = voice_config.with_endpoint(url);
                }
                VoiceClient::new(voice_config).map(Arc::new)
            })
            .transpose()?;

        let pubsub = config
            .pubsub
            .project_id
            .as_ref()
            .map(|project| {
                let mut pubsub_config = PubSubConfig::new(project);
                if let Some(token) = &config.pubsub.access_token {
                    pubsub_config = pubsub_config.with_token(TokenSource::Static(token.clone()));
                }
                if let Some(url) = &config.pubsub.base_url {
                    pubsub_config = pubsub_config.with_base_url(url);
                }
                PubSubClient::new(pubsub_config).map(Arc::new)
            })
            .transpose()?;

        let line = config
            .line
            .channel_token
            .as_ref()
            .map(|token| {
                let mut line_config = LineConfig::new(token);
                if let Some(url) = &config.line.base_url {
                    line_config = line_config.with_base_url(url);
                }
                LineClient::new(line_config).map(Arc::new)
            })
            .transpose()?;

        Ok(Self {
            transit: Arc::new(transit),
            time_zone,
            chat,
            voice,
            pubsub,
            line,
        })
    }
}
