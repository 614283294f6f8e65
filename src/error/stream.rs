//! Reply-stream error types.
//!
//! These describe a send that reached the assistant service successfully but
//! did not produce a usable reply.

use std::fmt;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The assistant reported a failure through an in-band error frame.
    AssistantReported {
        message: String,
    },

    /// The user cancelled the reply.
    Cancelled,

    /// Nothing to send: the message was empty after trimming.
    EmptyMessage,

    /// No assistant is selected for the conversation.
    NoAssistant,
}

impl StreamError {
    /// In-band errors are worth resending; the rest need a user action first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StreamError::AssistantReported { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::AssistantReported { message } => {
                format!("The assistant reported an error: {}", message)
            }
            StreamError::Cancelled => "The reply was cancelled.".to_string(),
            StreamError::EmptyMessage => "Type a message before sending.".to_string(),
            StreamError::NoAssistant => {
                "Choose an assistant before sending a message.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::AssistantReported { .. } => "E_STREAM_ASSISTANT",
            StreamError::Cancelled => "E_STREAM_CANCEL",
            StreamError::EmptyMessage => "E_STREAM_EMPTY",
            StreamError::NoAssistant => "E_STREAM_NO_ASSISTANT",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::AssistantReported { message } => {
                write!(f, "Assistant error: {}", message)
            }
            StreamError::Cancelled => write!(f, "Stream cancelled"),
            StreamError::EmptyMessage => write!(f, "Message is empty"),
            StreamError::NoAssistant => write!(f, "No assistant selected"),
        }
    }
}

impl std::error::Error for StreamError {}
