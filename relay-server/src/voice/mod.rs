//! Text-to-speech relay via AutoRemote.
//!
//! A message is sent to a phone running AutoRemote, which speaks it with
//! the named voice. AutoRemote messages are single strings of the form
//! `"{speaker} {words}=:=voice"`, where words are comma-separated.

mod client;
mod error;
mod message;

pub use client::{VoiceClient, VoiceConfig};
pub use error::VoiceError;
pub use message::VoiceMessage;
