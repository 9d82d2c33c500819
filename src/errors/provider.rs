//! Upstream provider errors.

use std::time::Duration;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for upstream calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure of a single call to the upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration error (missing API key, malformed base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The provider rejected the credential.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message from the API.
        message: String,
    },

    /// The provider rejected the request parameters (HTTP 400).
    #[error("Invalid request: {message}")]
    Validation {
        /// Error message from the API.
        message: String,
        /// The parameter that caused the error.
        param: Option<String>,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message.
        message: String,
        /// Duration to wait before retrying, from the `retry-after` header.
        retry_after: Option<Duration>,
    },

    /// Server error (5xx status codes).
    #[error("Server error (HTTP {status_code}): {message}")]
    Server {
        /// Error message.
        message: String,
        /// HTTP status code.
        status_code: u16,
        /// Request ID for debugging.
        request_id: Option<String>,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The call exceeded its deadline.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Any other non-success status.
    #[error("Request failed (HTTP {status_code}): {message}")]
    Request {
        /// HTTP status code.
        status_code: u16,
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Returns true if a generic transient-fault policy may retry this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimit { .. }
                | ProviderError::Server { status_code: 500..=504, .. }
                | ProviderError::Timeout { .. }
                | ProviderError::Network { .. }
        )
    }

    /// Returns true if the call timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }

    /// Returns true if the provider throttled the call.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::RateLimit { .. })
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns the HTTP status code, if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Authentication { .. } => Some(401),
            ProviderError::Validation { .. } => Some(400),
            ProviderError::RateLimit { .. } => Some(429),
            ProviderError::Server { status_code, .. }
            | ProviderError::Request { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        ProviderError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        ProviderError::Serialization {
            message: message.into(),
        }
    }
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { .. } => ProviderError::Timeout {
                message: err.to_string(),
            },
            TransportError::Connection { .. } | TransportError::InvalidResponse { .. } => {
                ProviderError::Network {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ProviderError {
    fn from(err: url::ParseError) -> Self {
        ProviderError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(ProviderError::RateLimit {
            message: "slow down".to_string(),
            retry_after: None,
        }
        .is_retryable());

        assert!(ProviderError::Server {
            message: "unavailable".to_string(),
            status_code: 503,
            request_id: None,
        }
        .is_retryable());

        assert!(!ProviderError::Authentication {
            message: "bad key".to_string(),
        }
        .is_retryable());

        assert!(!ProviderError::Validation {
            message: "bad file".to_string(),
            param: Some("file".to_string()),
        }
        .is_retryable());
    }

    #[test]
    fn test_timeout_and_rate_limit_predicates() {
        let timeout = ProviderError::Timeout {
            message: "deadline".to_string(),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_rate_limit());

        let limited = ProviderError::RateLimit {
            message: "slow down".to_string(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert!(limited.is_rate_limit());
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(limited.status_code(), Some(429));
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: ProviderError = TransportError::Timeout {
            timeout: Duration::from_secs(5),
        }
        .into();
        assert!(err.is_timeout());

        let err: ProviderError = TransportError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert!(matches!(err, ProviderError::Network { .. }));
    }
}
