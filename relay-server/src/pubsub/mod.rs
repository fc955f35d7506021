//! Pub/Sub publishing over the REST API.
//!
//! Messages are JSON objects, base64-encoded into the `data` field of a
//! single-message publish request. Credentials come either from a static
//! access token or from the compute metadata server.

mod client;
mod error;
mod token;

pub use client::{PubSubClient, PubSubConfig, validate_topic};
pub use error::PubSubError;
pub use token::TokenSource;
