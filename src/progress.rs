//! Host-facing progress reporting boundary (spec §6 callback shape). A thin
//! async trait so a CLI can render a spinner/progress bar while a web backend
//! can push SSE events, without the `Loop` knowing which; grounded in the
//! teacher's `progress/system_captured.rs` reporter seam.

use async_trait::async_trait;

#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// `step` is the phase name (`"plan"`, `"search"`, ...); `message` is a
    /// short human-readable status line.
    async fn report(&self, step: &str, message: &str);
}

/// Reports nothing; the default when a host doesn't need progress output.
pub struct NullProgressReporter;

#[async_trait]
impl ProgressReporter for NullProgressReporter {
    async fn report(&self, _step: &str, _message: &str) {}
}

/// Forwards every report to `tracing::info!`, used by the composition-root
/// CLI binary.
pub struct TracingProgressReporter;

#[async_trait]
impl ProgressReporter for TracingProgressReporter {
    async fn report(&self, step: &str, message: &str) {
        tracing::info!(step, message, "progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_reporter_does_not_panic() {
        let reporter = NullProgressReporter;
        reporter.report("plan", "starting").await;
    }

    #[tokio::test]
    async fn tracing_reporter_does_not_panic() {
        let reporter = TracingProgressReporter;
        reporter.report("search", "3 sub-queries dispatched").await;
    }
}
