//! Dispatch error types

use std::time::Duration;

use thiserror::Error;

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// Errors raised while configuring or dispatching a request
#[derive(Debug, Error)]
pub enum HttpError {
    /// The configuration store was read before `initialize` was called
    #[error("Dispatch configuration has not been initialized")]
    NotConfigured,

    /// The request cannot be issued as described
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network request failed inside reqwest
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Transport-level failure reported by a non-reqwest transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A configured header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),

    /// Reading a multipart attachment failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a request body failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Loading or validating dispatch settings failed
    #[error("Settings error: {0}")]
    Settings(String),

    /// The configured attempt cap was reached
    #[error("Retry limit exceeded after {attempts} attempts: {last}")]
    RetryLimitExceeded {
        attempts: u32,
        last: Box<HttpError>,
    },
}

/// How the dispatcher reacts to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Startup-order bug; surfaced immediately, no hooks run
    Configuration,
    /// Retried when a delay is configured, otherwise re-signaled silently
    Timeout,
    /// Retried when a delay is configured, otherwise reported then re-signaled
    Transport,
    /// Never retried; reported then re-signaled
    Other,
}

impl HttpError {
    /// Classify the error for retry and reporting purposes
    pub fn class(&self) -> ErrorClass {
        match self {
            HttpError::NotConfigured => ErrorClass::Configuration,
            HttpError::Timeout(_) => ErrorClass::Timeout,
            HttpError::RequestFailed(e) => {
                if e.is_timeout() {
                    ErrorClass::Timeout
                } else if e.is_connect() || e.is_request() || e.is_body() {
                    ErrorClass::Transport
                } else {
                    ErrorClass::Other
                }
            }
            HttpError::Transport(_) => ErrorClass::Transport,
            HttpError::RetryLimitExceeded { last, .. } => last.class(),
            _ => ErrorClass::Other,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        !matches!(self, HttpError::RetryLimitExceeded { .. })
            && matches!(self.class(), ErrorClass::Timeout | ErrorClass::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(HttpError::NotConfigured.class(), ErrorClass::Configuration);
        assert_eq!(
            HttpError::Timeout(Duration::from_secs(1)).class(),
            ErrorClass::Timeout
        );
        assert_eq!(
            HttpError::Transport("connection reset".into()).class(),
            ErrorClass::Transport
        );
        assert_eq!(
            HttpError::InvalidRequest("empty".into()).class(),
            ErrorClass::Other
        );
        assert_eq!(
            HttpError::InvalidHeader("bad name".into()).class(),
            ErrorClass::Other
        );
    }

    #[test]
    fn test_retryable() {
        assert!(HttpError::Timeout(Duration::from_millis(5)).is_retryable());
        assert!(HttpError::Transport("refused".into()).is_retryable());
        assert!(!HttpError::NotConfigured.is_retryable());
        assert!(!HttpError::InvalidRequest("empty".into()).is_retryable());
    }

    #[test]
    fn test_exhausted_retry_keeps_class_but_stops() {
        let err = HttpError::RetryLimitExceeded {
            attempts: 3,
            last: Box::new(HttpError::Transport("refused".into())),
        };
        assert_eq!(err.class(), ErrorClass::Transport);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("3 attempts"));
    }
}
