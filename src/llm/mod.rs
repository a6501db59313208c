//! The LLM capability interface (spec §4.3) plus the JSON-extraction contract
//! every phase parser relies on.

mod anthropic;
pub mod error;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use error::LlmError;
pub use types::{Message, MessageContent, Role, ToolDefinition, TokenUsage};

use async_trait::async_trait;

use crate::llm::types::Message as Msg;

/// LLM capability interface. Optional attributes (`context_window_tokens`,
/// `model`) are modeled as default trait methods returning `None` rather than
/// probed at runtime — the idiomatic Rust analogue of the teacher corpus's
/// `hasattr`/`del`-based optional-attribute probing.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The primary structured-output workhorse; all phase prompts expect
    /// JSON inside the returned text.
    async fn generate(
        &self,
        messages: &[Msg],
        system_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError>;

    /// Function-call-style structured output. Default implementation signals
    /// unsupported; providers that support it override this.
    async fn generate_with_tools(
        &self,
        _messages: &[Msg],
        _tools: &[ToolDefinition],
        _system_prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<serde_json::Value, LlmError> {
        Err(LlmError::InvalidResponse(
            "generate_with_tools is not supported by this provider".to_string(),
        ))
    }

    /// `None` when the provider doesn't expose its context window; the Loop
    /// only constructs a `BudgetTracker` when this returns `Some`.
    fn context_window_tokens(&self) -> Option<u64> {
        None
    }

    /// `None` when the provider doesn't expose a model name; the Loop only
    /// constructs a `CostTracker` when this returns `Some`.
    fn model(&self) -> Option<&str> {
        None
    }
}

/// Extracts a JSON object from an LLM response robustly: direct JSON, a
/// fenced ` ```json ` block, or the substring from the first `{` to the last
/// balanced `}`. Never fails — an unparsable response yields `{}` (spec
/// §4.3 JSON parsing contract).
pub fn parse_json_response(text: &str) -> serde_json::Value {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return value;
    }

    if let Some(fenced) = extract_fenced_json(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&fenced) {
            return value;
        }
    }

    if let Some(braces) = extract_balanced_braces(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&braces) {
            return value;
        }
    }

    serde_json::json!({})
}

fn extract_fenced_json(text: &str) -> Option<String> {
    let start_marker = "```json";
    let start = text.find(start_marker)? + start_marker.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim().to_string())
}

/// The substring from the first `{` to the last `}`, trusting the caller's
/// JSON parser to reject anything that isn't actually balanced JSON.
fn extract_balanced_braces(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].to_string())
}
