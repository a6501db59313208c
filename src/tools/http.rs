//! A generic HTTP-backed search `Tool` (spec §4.2). The choice of search
//! backend is explicitly out of scope (SPEC_FULL.md's Non-goals), so this
//! implementation only fixes a minimal wire contract: a GET against a
//! configured base URL with `q`/`limit` query parameters, expecting a JSON
//! array of `{url, title, snippet}` objects back. Grounded in
//! `llm/anthropic.rs`'s reqwest client construction and status-code handling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::SearchResult;

use super::{Tool, ToolError};

pub struct HttpSearchTool {
    name: String,
    base_url: String,
    http: Client,
}

impl HttpSearchTool {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, ToolError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ToolError::Transient(err.to_string()))?;
        Ok(Self {
            name: name.into(),
            base_url: base_url.into(),
            http,
        })
    }
}

#[derive(Deserialize)]
struct RawResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl Tool for HttpSearchTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, query: &str, _source_target: &str, limit: usize) -> Result<Vec<SearchResult>, ToolError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ToolError::Timeout
                } else {
                    ToolError::Transient(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ToolError::Transient(format!("search endpoint returned {}", response.status())));
        }

        let raw: Vec<RawResult> = response.json().await.map_err(|err| ToolError::Transient(err.to_string()))?;

        Ok(raw
            .into_iter()
            .take(limit)
            .map(|r| {
                let domain = domain_of(&r.url);
                SearchResult::new(r.url, r.title, r.snippet, domain)
            })
            .collect())
    }
}

fn domain_of(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    without_scheme.split('/').next().unwrap_or(without_scheme).to_string()
}
