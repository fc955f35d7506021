//! LINE Messaging API webhook echo.
//!
//! Incoming webhook events are answered with a reply describing where the
//! message came from, which makes it easy to discover user, group and room
//! ids for push targets.

mod client;
mod error;
mod webhook;

pub use client::{LineClient, LineConfig};
pub use error::LineError;
pub use webhook::{EchoReply, EventMessage, EventSource, WebhookBody, WebhookEvent};
