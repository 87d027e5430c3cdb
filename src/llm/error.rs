//! LLM error types

use thiserror::Error;

/// LLM error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Timeout, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Unreachable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Rejected, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::InvalidResponse, message)
    }

    /// Classify a transport-level failure from the HTTP client
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::unreachable(format!("Connection failed: {e}"))
        } else {
            Self::unreachable(format!("Request failed: {e}"))
        }
    }
}

/// Failure classification. Every kind collapses to the same fallback
/// reply for the user; the distinction is for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// No answer within the deadline
    Timeout,
    /// Connection or transport failure
    Unreachable,
    /// Non-success HTTP status (auth, quota, server error)
    Rejected,
    /// Success status but no usable text in the body
    InvalidResponse,
}

impl LlmErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::Rejected => "rejected",
            Self::InvalidResponse => "invalid_response",
        }
    }
}
