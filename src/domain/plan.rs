use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::sub_query::SubQuery;

/// The output of the Plan phase. `sub_queries` is set once and never shrunk;
/// `followups` is the only field Completeness may mutate (§3 invariant 3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub sub_queries: Vec<SubQuery>,
    #[serde(default)]
    pub strategy_notes: String,
    #[serde(default)]
    pub followups: VecDeque<SubQuery>,
}

impl Plan {
    pub fn new(sub_queries: Vec<SubQuery>, strategy_notes: impl Into<String>) -> Self {
        Self {
            sub_queries,
            strategy_notes: strategy_notes.into(),
            followups: VecDeque::new(),
        }
    }

    /// The single-query fallback used when Plan's JSON response fails to
    /// parse (§4.6 failure table).
    pub fn fallback(question: &str) -> Self {
        Self::new(vec![SubQuery::new(question, "")], String::new())
    }

    /// Appends Completeness-produced followups to the mutable queue.
    pub fn push_followups(&mut self, queries: impl IntoIterator<Item = SubQuery>) {
        self.followups.extend(queries);
    }

    /// Drains and returns the current followup queue, leaving it empty.
    pub fn drain_followups(&mut self) -> Vec<SubQuery> {
        self.followups.drain(..).collect()
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }

    pub fn from_dict(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_carries_literal_question() {
        let plan = Plan::fallback("What is X?");
        assert_eq!(plan.sub_queries.len(), 1);
        assert_eq!(plan.sub_queries[0].query, "What is X?");
        assert!(plan.followups.is_empty());
    }

    #[test]
    fn drain_followups_empties_queue() {
        let mut plan = Plan::new(vec![], "notes");
        plan.push_followups(vec![SubQuery::new("followup", "web")]);
        let drained = plan.drain_followups();
        assert_eq!(drained.len(), 1);
        assert!(plan.followups.is_empty());
    }

    #[test]
    fn round_trips_through_dict() {
        let mut plan = Plan::new(vec![SubQuery::new("q", "web")], "notes");
        plan.push_followups(vec![SubQuery::new("f", "web")]);
        let restored = Plan::from_dict(plan.to_dict());
        assert_eq!(restored, plan);
    }

    #[test]
    fn from_dict_missing_keys_default_to_empty() {
        let plan = Plan::from_dict(serde_json::json!({}));
        assert!(plan.sub_queries.is_empty());
        assert!(plan.followups.is_empty());
        assert_eq!(plan.strategy_notes, "");
    }
}
