use async_trait::async_trait;

use super::error::ToolError;
use super::Tool;
use crate::domain::SearchResult;

/// Test double returning a fixed list of results, or erroring once if
/// configured to (used to exercise the Search-phase error boundary).
pub struct MockTool {
    name: String,
    results: Vec<SearchResult>,
    fail: bool,
}

impl MockTool {
    pub fn new(name: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            name: name.into(),
            results,
            fail: false,
        }
    }

    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _query: &str, _source_target: &str, limit: usize) -> Result<Vec<SearchResult>, ToolError> {
        if self.fail {
            return Err(ToolError::Transient("connection refused".to_string()));
        }
        Ok(self.results.iter().take(limit.max(1)).cloned().collect())
    }
}
