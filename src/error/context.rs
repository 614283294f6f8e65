//! Error context for enriched error information.

use chrono::{DateTime, Utc};

/// Context information attached to errors for debugging.
///
/// Records which operation failed and which conversation it belonged to, so
/// a log line can be traced back to the exchange that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Human-readable description of the operation that failed.
    pub operation: String,

    /// Assistant the request was addressed to.
    pub assistant: Option<String>,

    /// Conversation id, if one had been assigned when the error occurred.
    pub conversation_id: Option<String>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    /// Create a new ErrorContext for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            assistant: None,
            conversation_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the assistant name for this context.
    pub fn with_assistant(mut self, assistant: impl Into<String>) -> Self {
        self.assistant = Some(assistant.into());
        self
    }

    /// Set the conversation id for this context.
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref assistant) = self.assistant {
            parts.push(format!("assistant={}", assistant));
        }

        if let Some(ref conversation_id) = self.conversation_id {
            parts.push(format!("conversation_id={}", conversation_id));
        }

        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;

        if let Some(ref assistant) = self.assistant {
            write!(f, " assistant={}", assistant)?;
        }

        if let Some(ref conversation_id) = self.conversation_id {
            write!(f, " conversation={}", conversation_id)?;
        }

        Ok(())
    }
}
