//! Transport-level error types.
//!
//! Everything that goes wrong between this client and the assistant service
//! before a reply could be decoded ends up here: refused connections, non-2xx
//! statuses, bodies that break off mid-stream. These are never mixed up with
//! errors the assistant reports inside the stream itself.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the service failed.
    ConnectionFailed {
        url: String,
        message: String,
    },

    /// Request timed out.
    Timeout {
        operation: String,
    },

    /// HTTP status error (non-2xx response).
    HttpStatus {
        status: u16,
        message: String,
    },

    /// A reply stream broke off after decoding had started.
    StreamInterrupted {
        message: String,
    },

    /// A response body could not be read in full.
    BodyRead {
        url: String,
        message: String,
    },

    /// The response could not be interpreted (bad JSON, wrong shape).
    InvalidResponse {
        message: String,
    },

    /// The request URL could not be built.
    InvalidUrl {
        url: String,
    },

    /// Generic network error.
    Other {
        message: String,
    },
}

impl NetworkError {
    /// Map an [`HttpError`] from the transport seam into a network error for `url`.
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => NetworkError::Timeout {
                operation: format!("request to {}", url),
            },
            HttpError::ServerError { status, message } => {
                NetworkError::HttpStatus { status, message }
            }
            HttpError::Io(message) => NetworkError::BodyRead {
                url: url.to_string(),
                message,
            },
            HttpError::InvalidUrl(_) => NetworkError::InvalidUrl {
                url: url.to_string(),
            },
            HttpError::Other(message) => NetworkError::Other { message },
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::StreamInterrupted { .. } => true,
            NetworkError::BodyRead { .. } => true,
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { url, .. } => {
                format!("Unable to reach the assistant service at {}.", url)
            }
            NetworkError::Timeout { .. } => {
                "The assistant service did not answer in time.".to_string()
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was rejected by the assistant service.".to_string(),
                401 => "Authentication required. Check your access token.".to_string(),
                403 => "Access denied for this assistant.".to_string(),
                404 => "The assistant was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The assistant service is experiencing issues. Please try again later."
                        .to_string()
                }
                _ => format!("The assistant service returned HTTP {}.", status),
            },
            NetworkError::StreamInterrupted { .. } => {
                "The reply was interrupted before it finished.".to_string()
            }
            NetworkError::BodyRead { .. } => {
                "The connection dropped while reading the service's response.".to_string()
            }
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the assistant service.".to_string()
            }
            NetworkError::InvalidUrl { url } => format!("'{}' is not a valid URL.", url),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::StreamInterrupted { .. } => "E_NET_STREAM",
            NetworkError::BodyRead { .. } => "E_NET_BODY",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { operation } => write!(f, "{} timed out", operation),
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::StreamInterrupted { message } => {
                write!(f, "Stream interrupted: {}", message)
            }
            NetworkError::BodyRead { url, message } => {
                write!(f, "Failed to read response from '{}': {}", url, message)
            }
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::InvalidUrl { url } => write!(f, "Invalid URL: {}", url),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_connection_failed_keeps_url() {
        let err = NetworkError::from_http(
            HttpError::ConnectionFailed("refused".to_string()),
            "http://localhost:8000/assistants/list",
        );
        assert_eq!(
            err,
            NetworkError::ConnectionFailed {
                url: "http://localhost:8000/assistants/list".to_string(),
                message: "refused".to_string(),
            }
        );
        assert_eq!(err.error_code(), "E_NET_CONN");
    }

    #[test]
    fn test_from_http_server_error_becomes_status() {
        let err = NetworkError::from_http(
            HttpError::ServerError {
                status: 404,
                message: "Assistant not found".to_string(),
            },
            "http://x",
        );
        assert!(matches!(err, NetworkError::HttpStatus { status: 404, .. }));
        assert!(err.user_message().contains("not found"));
    }

    #[test]
    fn test_from_http_io_is_body_read() {
        let err = NetworkError::from_http(
            HttpError::Io("reset by peer".to_string()),
            "http://x/assistants/list",
        );
        match &err {
            NetworkError::BodyRead { url, message } => {
                assert_eq!(url, "http://x/assistants/list");
                assert_eq!(message, "reset by peer");
            }
            other => panic!("expected BodyRead, got {:?}", other),
        }
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "E_NET_BODY");
        assert!(!err.user_message().contains("reply"));
    }

    #[test]
    fn test_stream_interrupted_mentions_reply() {
        let err = NetworkError::StreamInterrupted {
            message: "reset".to_string(),
        };
        assert!(err.user_message().contains("reply"));
        assert_eq!(err.error_code(), "E_NET_STREAM");
    }

    #[test]
    fn test_http_status_retryable_for_server_errors() {
        for status in [500, 502, 503, 429, 408] {
            let err = NetworkError::HttpStatus {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "{} should be retryable", status);
        }
    }

    #[test]
    fn test_http_status_not_retryable_for_client_errors() {
        for status in [400, 401, 403, 404] {
            let err = NetworkError::HttpStatus {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "{} should not be retryable", status);
        }
    }

    #[test]
    fn test_invalid_response_not_retryable() {
        let err = NetworkError::InvalidResponse {
            message: "expected array".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "E_NET_INVALID");
    }

    #[test]
    fn test_display_format() {
        let err = NetworkError::ConnectionFailed {
            url: "http://assistants.local".to_string(),
            message: "refused".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("assistants.local"));
        assert!(display.contains("refused"));
    }
}
