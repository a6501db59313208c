//! Provider-facing wire types. Kept close to the teacher's Anthropic-shaped
//! types (`examples/taskdaemon-taskdaemon/src/llm/types.rs`) since the spec's
//! Provider contract (messages, system prompt, tool schemas, token usage) maps
//! onto them directly; the streaming half of the teacher's types is dropped —
//! this spec's Provider has no streaming method.

use serde::{Deserialize, Serialize};

/// A message in the conversation sent to `Provider::generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
}

impl MessageContent {
    pub fn as_text(&self) -> &str {
        match self {
            MessageContent::Text(text) => text,
        }
    }
}

/// A tool definition offered to `Provider::generate_with_tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    pub fn to_anthropic_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
        })
    }
}

/// Token usage for a single Provider call, used by `CostTracker`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
}

impl TokenUsage {
    /// Cost in USD based on a coarse model-name-substring price table.
    pub fn cost_usd(&self, model: &str) -> f64 {
        let (input_price, output_price) = match model {
            m if m.contains("opus") => (15.0, 75.0),
            m if m.contains("haiku") => (0.25, 1.25),
            _ => (3.0, 15.0), // default to sonnet-class pricing
        };

        let input_cost = (self.prompt_tokens as f64 / 1_000_000.0) * input_price;
        let output_cost = (self.completion_tokens as f64 / 1_000_000.0) * output_price;
        // cache reads are billed at 10% of the input rate
        let cache_cost = (self.cache_read_tokens as f64 / 1_000_000.0) * input_price * 0.1;

        input_cost + output_cost + cache_cost
    }

    pub fn add(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.cache_read_tokens += other.cache_read_tokens;
        self.cache_creation_tokens += other.cache_creation_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_user_is_text() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content.as_text(), "Hello");
    }

    #[test]
    fn cost_sonnet_default() {
        let usage = TokenUsage {
            prompt_tokens: 1_000_000,
            completion_tokens: 100_000,
            cache_read_tokens: 500_000,
            cache_creation_tokens: 0,
        };
        let cost = usage.cost_usd("claude-sonnet-4");
        assert!((cost - 4.65).abs() < 0.01);
    }

    #[test]
    fn cost_opus() {
        let usage = TokenUsage {
            prompt_tokens: 1_000_000,
            completion_tokens: 100_000,
            cache_read_tokens: 0,
            cache_creation_tokens: 0,
        };
        let cost = usage.cost_usd("claude-opus-4");
        assert!((cost - 22.5).abs() < 0.01);
    }

    #[test]
    fn tool_definition_schema_shape() {
        let tool = ToolDefinition::new("search", "Search the web", serde_json::json!({"type": "object"}));
        let schema = tool.to_anthropic_schema();
        assert_eq!(schema["name"], "search");
    }
}
