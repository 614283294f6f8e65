use serde::{Deserialize, Serialize};

/// Body of `POST /assistants/{name}/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub stream: bool,
}

impl ChatRequest {
    /// A non-streaming request.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stream: false,
        }
    }
}

/// Response of `POST /assistants/{name}/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
