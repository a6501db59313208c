//! Top-level Loop error type (spec §4.12). A `thiserror` leaf enum, not an
//! `eyre::Result`, because `Loop::run`'s callers (the composition-root binary,
//! a resuming caller) need to match on error kind rather than just display it
//! — mirroring `llm::error::LlmError`'s shape one layer up.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("invalid configuration: {0:?}")]
    ConfigInvalid(Vec<ConfigError>),

    #[error("research loop cancelled")]
    Cancelled,

    #[error("no checkpoint found for correlation id {0}")]
    CheckpointNotFound(String),

    #[error("provider error: {0}")]
    Provider(#[from] crate::llm::LlmError),

    #[error("checkpoint persistence failed: {0}")]
    Checkpoint(#[source] eyre::Error),

    #[error("maximum session continuations ({0}) exceeded")]
    ContinuationLimitExceeded(u32),
}

impl LoopError {
    /// Whether this failure should be reported through an `EventSink` as
    /// `AgentFailed` (spec §6) rather than silently retried.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoopError::Provider(err) if err.is_retryable())
    }
}
