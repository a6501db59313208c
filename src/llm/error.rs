use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by a `Provider` call. Classified so the outer retry
/// boundary (spec §4.6/§7 `ProviderTransient`) can dispatch without string
/// matching — mirrors `examples/taskdaemon-taskdaemon/src/llm/error.rs`.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// True for `ProviderTransient`-classified errors (spec §7): connect/
    /// timeout/5xx. False for application-level (4xx) or parse errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { status, .. } => *status >= 500,
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::Json(_) => false,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
