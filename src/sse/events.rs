//! Events produced by the stream decoder.

use crate::error::StreamError;

/// One step of a decoded reply, in the order it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// Append this text to the reply.
    Append(String),
    /// The reply finished normally.
    Completed,
    /// The assistant reported a failure in-band.
    Failed(String),
}

/// Terminal result of one decode run. Exactly one per stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Terminator seen, or the server closed the stream cleanly.
    Completed,
    /// The assistant reported an error through an error frame.
    CompletedWithError(String),
    /// The caller cancelled before the stream finished.
    Cancelled,
}

impl StreamOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StreamOutcome::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StreamOutcome::Cancelled)
    }

    /// The in-band error message, if the assistant reported one.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            StreamOutcome::CompletedWithError(message) => Some(message),
            _ => None,
        }
    }

    /// Convert into a `Result` for callers that treat anything but a clean
    /// completion as a failure.
    pub fn into_result(self) -> Result<(), StreamError> {
        match self {
            StreamOutcome::Completed => Ok(()),
            StreamOutcome::CompletedWithError(message) => {
                Err(StreamError::AssistantReported { message })
            }
            StreamOutcome::Cancelled => Err(StreamError::Cancelled),
        }
    }
}

impl std::fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamOutcome::Completed => write!(f, "completed"),
            StreamOutcome::CompletedWithError(message) => {
                write!(f, "completed with error: {}", message)
            }
            StreamOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}
