//! Relay server.
//!
//! A handful of small HTTP functions, each forwarding one request to a
//! third-party web API: next-train lookup from a transit search page, chat
//! completion, text-to-speech relay, Pub/Sub publish, and a LINE webhook
//! echo.

pub mod chat;
pub mod config;
pub mod line;
pub mod pubsub;
pub mod transit;
pub mod voice;
pub mod web;
