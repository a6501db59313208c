use serde::{Deserialize, Serialize};

/// A single unit of search work derived from the research question, either by
/// the Plan phase or appended by Completeness as a followup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuery {
    pub query: String,

    /// Tag used to pick the Tool this query is dispatched to (§4.6 tool
    /// dispatch: exact match against `Tool::name`, else the first tool).
    #[serde(default)]
    pub source_target: String,

    #[serde(default)]
    pub rationale: Option<String>,
}

impl SubQuery {
    pub fn new(query: impl Into<String>, source_target: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source_target: source_target.into(),
            rationale: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_rationale() {
        let sq = SubQuery::new("what is x", "web");
        assert_eq!(sq.query, "what is x");
        assert_eq!(sq.source_target, "web");
        assert!(sq.rationale.is_none());
    }

    #[test]
    fn deserializes_missing_fields_to_defaults() {
        let sq: SubQuery = serde_json::from_value(serde_json::json!({ "query": "q" })).unwrap();
        assert_eq!(sq.query, "q");
        assert_eq!(sq.source_target, "");
        assert!(sq.rationale.is_none());
    }
}
