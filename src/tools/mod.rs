//! The Tool capability interface (spec §4.2/§6). The Loop never instantiates
//! Tools; it receives them pre-resolved and treats them as opaque.

mod error;
pub mod http;
#[cfg(test)]
mod mock;

pub use error::ToolError;
pub use http::HttpSearchTool;
#[cfg(test)]
pub use mock::MockTool;

use async_trait::async_trait;

use crate::domain::SearchResult;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, query: &str, source_target: &str, limit: usize) -> Result<Vec<SearchResult>, ToolError>;
}

/// Picks the Tool whose name matches `source_target` exactly; falls back to
/// the first tool in construction order when nothing matches (spec §4.6 "Tool
/// dispatch", recorded as an open question in DESIGN.md — the fallback is
/// kept literally since the spec does not resolve whether it's intentional).
pub fn dispatch<'a>(tools: &'a [std::sync::Arc<dyn Tool>], source_target: &str) -> Option<&'a std::sync::Arc<dyn Tool>> {
    tools
        .iter()
        .find(|tool| tool.name() == source_target)
        .or_else(|| tools.first())
}
