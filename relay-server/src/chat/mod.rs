//! Chat completion relay.
//!
//! Forwards a single question to an OpenAI-compatible chat completions
//! endpoint and returns the first choice's message content.

mod client;
mod error;
mod types;

pub use client::{ChatClient, ChatConfig, DEFAULT_MODEL};
pub use error::ChatError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, Role};
