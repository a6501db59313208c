//! Test double returning a fixed, ordered sequence of canned responses.
//! Direct analogue of `src_teacher_ref/llm/client.rs`'s `mock::MockLlmClient`
//! and `original_source/.../tests/helpers.py`'s `make_test_provider`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::LlmError;
use super::types::Message;
use super::Provider;

pub struct MockProvider {
    responses: Mutex<Vec<String>>,
    call_count: AtomicUsize,
    context_window_tokens: Option<u64>,
    model: Option<String>,
}

impl MockProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: AtomicUsize::new(0),
            context_window_tokens: None,
            model: None,
        }
    }

    /// The canned sequence used by the happy-path scenario (spec §8.1):
    /// plan, extract, evaluate, completeness, synthesis.
    pub fn happy_path() -> Self {
        Self::new(vec![
            serde_json::json!({
                "sub_queries": [{ "query": "What is X?", "source_target": "web" }],
                "strategy_notes": "Simple",
            })
            .to_string(),
            serde_json::json!({
                "findings": [{
                    "source_index": 0,
                    "extracted_fields": { "claim": { "type": "text", "value": "test" } },
                    "raw_quote": "Q",
                    "relationships": [],
                }],
            })
            .to_string(),
            serde_json::json!({
                "evaluations": [{
                    "finding_index": 0,
                    "relevance_score": 0.9,
                    "quality_score": 0.8,
                    "evaluation_notes": "OK",
                }],
            })
            .to_string(),
            serde_json::json!({ "complete": true }).to_string(),
            "# Summary\n\nResult.".to_string(),
        ])
    }

    pub fn with_context_window(mut self, tokens: u64) -> Self {
        self.context_window_tokens = Some(tokens);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(
        &self,
        _messages: &[Message],
        _system_prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, LlmError> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap();
        responses
            .get(index)
            .cloned()
            .ok_or_else(|| LlmError::InvalidResponse("no more mock responses".to_string()))
    }

    fn context_window_tokens(&self) -> Option<u64> {
        self.context_window_tokens
    }

    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_responses_in_order() {
        let provider = MockProvider::new(vec!["first".to_string(), "second".to_string()]);
        let first = provider.generate(&[], "", 100, 0.0).await.unwrap();
        let second = provider.generate(&[], "", 100, 0.0).await.unwrap();
        assert_eq!(first, "first");
        assert_eq!(second, "second");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn errors_once_exhausted() {
        let provider = MockProvider::new(vec!["only".to_string()]);
        provider.generate(&[], "", 100, 0.0).await.unwrap();
        let err = provider.generate(&[], "", 100, 0.0).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn context_window_and_model_absent_by_default() {
        let provider = MockProvider::new(vec![]);
        assert!(provider.context_window_tokens().is_none());
        assert!(provider.model().is_none());
    }
}
