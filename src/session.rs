//! Per-conversation state.
//!
//! A [`ConversationSession`] is the explicit context handed to every send:
//! which assistant is addressed, the bearer token, and the server-assigned
//! conversation id once it is known.

use crate::traits::{header_value, Headers};

/// Response header carrying the server-assigned conversation id.
pub const CONVERSATION_ID_HEADER: &str = "X-Conversation-Id";

/// Query parameter that passes the conversation id back to the server.
pub const CONVERSATION_ID_PARAM: &str = "conversation_id";

/// State of one logical conversation with an assistant.
///
/// The conversation id is captured at most once: the first successful
/// response that carries a non-empty [`CONVERSATION_ID_HEADER`] fixes it, and
/// later responses can never overwrite it. Only [`reset`](Self::reset) (or
/// switching assistant) clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSession {
    assistant: String,
    token: Option<String>,
    conversation_id: Option<String>,
    exchanges: usize,
    last_reply: String,
}

impl ConversationSession {
    pub fn new(assistant: impl Into<String>) -> Self {
        Self {
            assistant: assistant.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn assistant(&self) -> &str {
        &self.assistant
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Address a different assistant.
    ///
    /// A conversation belongs to one assistant, so changing it starts a new
    /// conversation. Setting the same name again keeps the current one.
    pub fn set_assistant(&mut self, assistant: impl Into<String>) {
        let assistant = assistant.into();
        if assistant != self.assistant {
            self.assistant = assistant;
            self.reset();
        }
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Number of replies received in this conversation.
    pub fn exchanges(&self) -> usize {
        self.exchanges
    }

    /// Text of the most recent reply.
    pub fn reply(&self) -> &str {
        &self.last_reply
    }

    /// Store the conversation id from response headers if none is stored yet.
    ///
    /// Returns true only when this call captured the id.
    pub fn capture_correlation(&mut self, headers: &Headers) -> bool {
        let Some(value) = header_value(headers, CONVERSATION_ID_HEADER) else {
            return false;
        };
        if value.is_empty() {
            return false;
        }

        match &self.conversation_id {
            None => {
                tracing::info!(conversation_id = %value, assistant = %self.assistant, "Conversation started");
                self.conversation_id = Some(value.to_string());
                true
            }
            Some(existing) if existing != value => {
                tracing::debug!(
                    stored = %existing,
                    received = %value,
                    "Ignoring different conversation id for an ongoing conversation"
                );
                false
            }
            Some(_) => false,
        }
    }

    /// Forget the conversation; the next send starts a new one.
    pub fn reset(&mut self) {
        if let Some(id) = self.conversation_id.take() {
            tracing::debug!(conversation_id = %id, "Conversation reset");
        }
        self.exchanges = 0;
        self.last_reply.clear();
    }

    /// Record a finished reply.
    pub fn record_exchange(&mut self, reply: String) {
        self.exchanges += 1;
        self.last_reply = reply;
    }
}
