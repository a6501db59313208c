//! Checkpoint persistence (spec §4.8). A `Checkpoint` is a flat, serializable
//! snapshot of in-flight Loop state, emitted at minimum after Plan and after
//! every Evaluate (§4.6 step numbering), sufficient to resume a run from cold
//! storage. Field set and round-trip semantics grounded in
//! `original_source/backend/apps/agents/tests/test_checkpoint.py`.

mod store;

pub use store::FileCheckpointStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Plan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub correlation_id: String,
    pub question: String,
    #[serde(default)]
    pub iteration: u32,
    pub phase: String,
    #[serde(default)]
    pub total_sources_found: u32,
    #[serde(default)]
    pub search_rounds: u32,
    #[serde(default)]
    pub plan_dict: Value,
    #[serde(default)]
    pub findings_dicts: Vec<Value>,
    #[serde(default)]
    pub config_dict: Value,
    #[serde(default)]
    pub prompt_extension: String,
    #[serde(default)]
    pub context_dict: Value,
}

impl Checkpoint {
    pub fn to_dict(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Missing keys default to their zero-value (spec §4.8), matching the
    /// teacher's round-trip convention of never failing on a partial
    /// checkpoint payload.
    pub fn from_dict(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|_| Checkpoint {
            correlation_id: String::new(),
            question: String::new(),
            iteration: 0,
            phase: String::new(),
            total_sources_found: 0,
            search_rounds: 0,
            plan_dict: Value::Null,
            findings_dicts: Vec::new(),
            config_dict: Value::Null,
            prompt_extension: String::new(),
            context_dict: Value::Null,
        })
    }

    pub fn restored_plan(&self) -> Plan {
        Plan::from_dict(self.plan_dict.clone())
    }
}

/// Host-provided sink used by the Loop to persist checkpoints as they're
/// produced. Distinct from `CheckpointSource` since a write path (e.g. a
/// queue) need not also support lookup by id.
#[async_trait]
pub trait CheckpointSink: Send + Sync {
    async fn save(&self, checkpoint: &Checkpoint) -> eyre::Result<()>;
}

/// Host-provided source used by the composition root to load a checkpoint
/// before calling `Loop::resume_from_checkpoint`.
#[async_trait]
pub trait CheckpointSource: Send + Sync {
    async fn load(&self, correlation_id: &str) -> eyre::Result<Option<Checkpoint>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubQuery;

    #[test]
    fn round_trips_through_dict() {
        let mut plan = Plan::new(vec![SubQuery::new("q", "web")], "notes");
        plan.push_followups(vec![SubQuery::new("f", "web")]);

        let checkpoint = Checkpoint {
            correlation_id: "abc-123".to_string(),
            question: "What is X?".to_string(),
            iteration: 2,
            phase: "evaluate".to_string(),
            total_sources_found: 5,
            search_rounds: 3,
            plan_dict: plan.to_dict(),
            findings_dicts: vec![serde_json::json!({"source": {"url": "u", "title": "t", "snippet": "s", "domain": "d"}, "relevance_score": 0.9, "quality_score": 0.8})],
            config_dict: serde_json::json!({}),
            prompt_extension: String::new(),
            context_dict: serde_json::json!({}),
        };

        let restored = Checkpoint::from_dict(checkpoint.to_dict());
        assert_eq!(restored, checkpoint);
        assert_eq!(restored.restored_plan(), plan);
    }

    #[test]
    fn missing_keys_default_to_zero_values() {
        let checkpoint = Checkpoint::from_dict(serde_json::json!({
            "correlation_id": "abc",
            "question": "Q?",
            "phase": "plan",
        }));
        assert_eq!(checkpoint.iteration, 0);
        assert_eq!(checkpoint.total_sources_found, 0);
        assert_eq!(checkpoint.search_rounds, 0);
        assert!(checkpoint.findings_dicts.is_empty());
        assert_eq!(checkpoint.prompt_extension, "");
    }

    #[test]
    fn malformed_payload_falls_back_to_empty_checkpoint() {
        let checkpoint = Checkpoint::from_dict(serde_json::json!("not an object"));
        assert_eq!(checkpoint.correlation_id, "");
        assert_eq!(checkpoint.phase, "");
    }
}
