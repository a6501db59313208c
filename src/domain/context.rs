use serde::{Deserialize, Serialize};

/// Run-level inputs beyond the question itself. Immutable per run (§3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchContext {
    #[serde(default)]
    pub case_title: String,
    #[serde(default)]
    pub case_position: String,
    #[serde(default)]
    pub signals: Vec<serde_json::Value>,
    #[serde(default)]
    pub evidence: Vec<serde_json::Value>,
    #[serde(default)]
    pub graph_context: String,
}

impl ResearchContext {
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }

    pub fn from_dict(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}
