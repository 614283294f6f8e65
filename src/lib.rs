//! assistant-chat - a streaming chat client for assistant services.
//!
//! The core is [`sse::StreamDecoder`], which turns a server-sent-event reply
//! stream into ordered text tokens, and [`session::ConversationSession`],
//! which ties consecutive exchanges into one server-side conversation.
//! [`client::AssistantClient`] combines the two over an injectable
//! [`traits::HttpClient`].

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;

pub use client::AssistantClient;
pub use config::ClientConfig;
pub use error::{ChatError, ChatResult};
pub use session::ConversationSession;
pub use sse::{DecodeEvent, StreamDecoder, StreamOutcome};
