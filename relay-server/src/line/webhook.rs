//! LINE webhook payload types.

use serde::Deserialize;

/// Top-level webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event. Only message events carry everything needed
/// for an echo; other event kinds deserialize with the fields missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub reply_token: Option<String>,
    pub message: Option<EventMessage>,
    pub source: Option<EventSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

impl EventSource {
    /// The id a reply or push should target, by source type.
    ///
    /// A source without a type has no target.
    pub fn target_id(&self) -> Result<Option<&str>, super::LineError> {
        let Some(kind) = self.kind.as_deref() else {
            return Ok(None);
        };
        let id = match kind {
            "user" => &self.user_id,
            "group" => &self.group_id,
            "room" => &self.room_id,
            other => return Err(super::LineError::UnknownSourceType(other.to_string())),
        };
        Ok(id.as_deref())
    }
}

/// A reply to send for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReply {
    pub reply_token: String,
    pub text: String,
}

impl WebhookEvent {
    /// Build the echo reply for this event.
    ///
    /// Returns `Ok(None)` for events that cannot be echoed: no text, no
    /// source type, no target id, or no reply token.
    pub fn echo(&self) -> Result<Option<EchoReply>, super::LineError> {
        let (Some(text), Some(source)) = (
            self.message.as_ref().and_then(|m| m.text.as_deref()),
            self.source.as_ref(),
        ) else {
            return Ok(None);
        };
        let Some(kind) = source.kind.as_deref() else {
            return Ok(None);
        };

        let Some(target) = source.target_id()? else {
            return Ok(None);
        };

        let Some(reply_token) = self.reply_token.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        Ok(Some(EchoReply {
            reply_token: reply_token.to_string(),
            text: format!("Type: {kind}\nTargetId: {target}\nMessage: {text}"),
        }))
    }
}
