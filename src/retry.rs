//! Outer retry boundary around `Loop::run` (spec §4.6 "Outer retry
//! boundary"). Reimplements the Celery task policy
//! (`autoretry_for=(ConnectionError, TimeoutError), retry_backoff=True,
//! retry_backoff_max=60, max_retries=2`, `research_workflow.py`) as an
//! explicit async helper, since there's no task-queue framework underneath
//! this crate.

use std::time::Duration;

use rand::Rng;

use crate::llm::LlmError;

const MAX_RETRIES: u32 = 2;
const BACKOFF_MAX: Duration = Duration::from_secs(60);

/// Only network-ish failures are retried at this boundary: a rate limit or a
/// malformed response from the provider is the caller's problem, not a
/// transient blip worth re-running the whole loop for.
fn is_outer_retryable(err: &LlmError) -> bool {
    matches!(err, LlmError::Network(_) | LlmError::Timeout(_))
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = Duration::from_secs(2u64.saturating_pow(attempt)).min(BACKOFF_MAX);
    let jitter_ms = rand::thread_rng().gen_range(0..250);
    base + Duration::from_millis(jitter_ms)
}

/// Runs `f` up to `MAX_RETRIES + 1` times, retrying only on connection/timeout
/// provider errors with exponential backoff capped at `BACKOFF_MAX`.
pub async fn with_outer_retry<F, Fut, T>(mut f: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_RETRIES && is_outer_retryable(&err) => {
                let delay = backoff_delay(attempt);
                tracing::warn!(attempt, ?delay, error = %err, "retrying after transient error");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_network_errors_up_to_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, LlmError> = with_outer_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(LlmError::Timeout(Duration::from_millis(1)))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, LlmError> = with_outer_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(LlmError::Timeout(Duration::from_millis(1))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn does_not_retry_non_network_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, LlmError> = with_outer_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(LlmError::ApiError {
                    status: 400,
                    message: "bad request".to_string(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
