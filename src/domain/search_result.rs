use serde::{Deserialize, Serialize};

/// One result emitted by a `Tool`. The URL is the deduplication identity
/// across the whole run (§3 invariant 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub domain: String,
    #[serde(default)]
    pub published_date: Option<String>,
}

impl SearchResult {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
            domain: domain.into(),
            published_date: None,
        }
    }

    /// Synthetic result used as the source of a compacted-findings digest
    /// (§4.6 compaction).
    pub fn compacted_digest() -> Self {
        Self::new("", "Compacted findings digest", "", "")
    }
}
