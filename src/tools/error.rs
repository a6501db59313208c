use thiserror::Error;

/// `Execute` failures (spec §4.2): transient per-call errors. Always dropped
/// per-query by the Search phase's error boundary (§4.6 a), never fatal to
/// the batch.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("transient tool error: {0}")]
    Transient(String),

    #[error("tool request timed out")]
    Timeout,
}

impl ToolError {
    pub fn is_retryable(&self) -> bool {
        true
    }
}
