//! Weather lookup error types

use thiserror::Error;

/// Why a weather lookup produced nothing
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key configured, lookups are disabled
    #[error("weather lookups are not configured")]
    NotConfigured,
    #[error("weather request timed out: {0}")]
    Timeout(String),
    #[error("weather service unreachable: {0}")]
    Unreachable(String),
    /// Non-success HTTP status (unknown city, bad key, rate limit, ...)
    #[error("weather service returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid weather response: {0}")]
    InvalidResponse(String),
}

impl WeatherError {
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            WeatherError::Timeout(e.to_string())
        } else {
            WeatherError::Unreachable(e.to_string())
        }
    }
}
