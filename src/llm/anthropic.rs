//! Anthropic Messages API Provider implementation. Grounded in
//! `examples/taskdaemon-taskdaemon/src/llm/anthropic.rs`'s request/response
//! mapping; the streaming half is dropped since the spec's Provider contract
//! has no streaming method.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::error::LlmError;
use super::types::{Message, MessageContent, Role, ToolDefinition};
use super::Provider;

pub struct AnthropicProvider {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    context_window_tokens: u64,
}

impl AnthropicProvider {
    /// Reads the API key from the given environment variable name.
    pub fn from_env(
        api_key_env: &str,
        model: impl Into<String>,
        max_tokens: u32,
        context_window_tokens: u64,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| LlmError::InvalidResponse(format!("environment variable {api_key_env} not set")))?;

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: model.into(),
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
            http,
            max_tokens,
            context_window_tokens,
        })
    }

    fn build_request_body(
        &self,
        messages: &[Message],
        system_prompt: &str,
        max_tokens: u32,
        temperature: f32,
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens.min(self.max_tokens),
            "system": system_prompt,
            "temperature": temperature,
            "messages": messages
                .iter()
                .map(|m| serde_json::json!({
                    "role": match m.role { Role::User => "user", Role::Assistant => "assistant" },
                    "content": m.content.as_text(),
                }))
                .collect::<Vec<_>>(),
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(tools.iter().map(|t| t.to_anthropic_schema()).collect::<Vec<_>>());
        }

        body
    }

    async fn send(&self, body: serde_json::Value) -> Result<AnthropicResponse, LlmError> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status().as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn generate(
        &self,
        messages: &[Message],
        system_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let body = self.build_request_body(messages, system_prompt, max_tokens, temperature, &[]);
        let response = self.send(body).await?;

        Ok(response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::ToolUse { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(""))
    }

    async fn generate_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        system_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<serde_json::Value, LlmError> {
        let body = self.build_request_body(messages, system_prompt, max_tokens, temperature, tools);
        let response = self.send(body).await?;

        for block in response.content {
            if let AnthropicContentBlock::ToolUse { input, .. } = block {
                return Ok(input);
            }
        }

        Ok(serde_json::json!({}))
    }

    fn context_window_tokens(&self) -> Option<u64> {
        Some(self.context_window_tokens)
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    #[allow(dead_code)]
    stop_reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        #[allow(dead_code)]
        id: String,
        #[allow(dead_code)]
        name: String,
        input: serde_json::Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> AnthropicProvider {
        AnthropicProvider {
            model: "claude-sonnet-4".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens: 4096,
            context_window_tokens: 200_000,
        }
    }

    #[test]
    fn request_body_caps_max_tokens_to_client_limit() {
        let provider = test_provider();
        let body = provider.build_request_body(&[Message::user("hi")], "sys", 100_000, 0.2, &[]);
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn request_body_omits_tools_when_empty() {
        let provider = test_provider();
        let body = provider.build_request_body(&[Message::user("hi")], "sys", 100, 0.2, &[]);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn request_body_includes_tool_schema() {
        let provider = test_provider();
        let tools = vec![ToolDefinition::new(
            "submit",
            "Submit a structured result",
            serde_json::json!({ "type": "object" }),
        )];
        let body = provider.build_request_body(&[Message::user("hi")], "sys", 100, 0.2, &tools);
        assert_eq!(body["tools"][0]["name"], "submit");
    }

    #[test]
    fn reports_context_window_and_model() {
        let provider = test_provider();
        assert_eq!(provider.context_window_tokens(), Some(200_000));
        assert_eq!(provider.model(), Some("claude-sonnet-4"));
    }
}
