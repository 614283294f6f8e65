//! Unified error type for the chat client.

use std::fmt;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::config::ConfigError;

/// Unified error type for the chat client.
///
/// Transport faults and in-band assistant errors stay in separate variants so
/// callers never confuse a dead connection with a reply the assistant refused.
#[derive(Debug)]
pub enum ChatError {
    /// Transport errors (connections, HTTP status, interrupted bodies).
    Network(NetworkError),

    /// Reply-level errors (in-band failures, cancellation, bad input).
    Stream(StreamError),

    /// Configuration could not be loaded.
    Config(ConfigError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<ChatError>,
        context: ErrorContext,
    },
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Network(NetworkError::HttpStatus { status, .. }) if *status < 500 => {
                ErrorCategory::User
            }
            ChatError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Client,
            ChatError::Network(_) => ErrorCategory::Network,
            ChatError::Stream(StreamError::AssistantReported { .. }) => ErrorCategory::Server,
            ChatError::Stream(_) => ErrorCategory::User,
            ChatError::Config(_) => ErrorCategory::Configuration,
            ChatError::WithContext { error, .. } => error.category(),
        }
    }

    /// True when the failure happened at the transport level.
    pub fn is_transport(&self) -> bool {
        matches!(self.inner(), ChatError::Network(_))
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(err) => err.is_retryable(),
            ChatError::Stream(err) => err.is_retryable(),
            ChatError::Config(_) => false,
            ChatError::WithContext { error, .. } => error.is_retryable(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Config(err) => format!("Configuration problem: {}", err),
            ChatError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Config(_) => "E_CONFIG",
            ChatError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        ChatError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ChatError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &ChatError {
        match self {
            ChatError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
            ChatError::Config(err) => write!(f, "{}", err),
            ChatError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::Config(err) => Some(err),
            ChatError::WithContext { error, .. } => error.source(),
        }
    }
}

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<ConfigError> for ChatError {
    fn from(err: ConfigError) -> Self {
        ChatError::Config(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
