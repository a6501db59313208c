use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::search_result::SearchResult;

/// A config-declared extracted value, tagged over the five field types
/// recognized by `config::ExtractConfig` (spec §9 design note: dynamic-typed
/// findings are re-architected as a typed envelope instead of a bare map).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractedValue {
    Text { value: String },
    Number { value: f64 },
    Boolean { value: bool },
    Date { value: String },
    Enum { value: String },
}

impl ExtractedValue {
    /// Best-effort coercion from an arbitrary JSON value into the requested
    /// field type, used when parsing Extract's structured output against the
    /// configured field schema. Never fails: unparsable input becomes the
    /// default for the requested type.
    pub fn coerce(field_type: &str, raw: &serde_json::Value) -> Self {
        match field_type {
            "number" => ExtractedValue::Number {
                value: raw.as_f64().unwrap_or(0.0),
            },
            "boolean" => ExtractedValue::Boolean {
                value: raw.as_bool().unwrap_or(false),
            },
            "date" => ExtractedValue::Date {
                value: raw.as_str().unwrap_or_default().to_string(),
            },
            "enum" => ExtractedValue::Enum {
                value: raw.as_str().unwrap_or_default().to_string(),
            },
            _ => ExtractedValue::Text {
                value: raw.as_str().map(str::to_string).unwrap_or_else(|| raw.to_string()),
            },
        }
    }
}

/// A typed edge asserted between findings, e.g. "corroborates" / "contradicts".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub relation: String,
    /// Free-text description of the related finding/claim; this spec does not
    /// mandate a structural link between findings (§4.6: "finding dedup: none
    /// at the engine level"), so relationships are recorded descriptively.
    pub target: String,
}

/// One extracted claim, created in Extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub source: SearchResult,
    #[serde(default)]
    pub extracted_fields: HashMap<String, ExtractedValue>,
    #[serde(default)]
    pub raw_quote: Option<String>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Finding {
    pub fn new(source: SearchResult) -> Self {
        Self {
            id: Uuid::now_v7(),
            source,
            extracted_fields: HashMap::new(),
            raw_quote: None,
            relationships: Vec::new(),
        }
    }
}

/// A Finding augmented with evaluator scores, produced by Evaluate (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFinding {
    #[serde(flatten)]
    pub finding: Finding,
    pub relevance_score: f64,
    pub quality_score: f64,
    #[serde(default)]
    pub evaluation_notes: Option<String>,
}

impl ScoredFinding {
    pub fn new(finding: Finding, relevance_score: f64, quality_score: f64) -> Self {
        Self {
            finding,
            relevance_score: relevance_score.clamp(0.0, 1.0),
            quality_score: quality_score.clamp(0.0, 1.0),
            evaluation_notes: None,
        }
    }

    /// Compaction score: `0.6 * relevance + 0.4 * quality` (§4.6 e).
    pub fn compaction_score(&self) -> f64 {
        0.6 * self.relevance_score + 0.4 * self.quality_score
    }

    /// The synthetic finding standing in for a batch of compacted findings.
    pub fn compacted_digest(digest: impl Into<String>) -> Self {
        let mut finding = Finding::new(SearchResult::compacted_digest());
        finding.extracted_fields.insert(
            "digest".to_string(),
            ExtractedValue::Text { value: digest.into() },
        );
        Self::new(finding, 0.0, 0.0)
    }

    pub fn is_compacted_digest(&self) -> bool {
        self.finding.source.title == "Compacted findings digest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compaction_score_weights_relevance_higher() {
        let sf = ScoredFinding::new(Finding::new(SearchResult::new("u", "t", "s", "d")), 1.0, 0.0);
        assert!((sf.compaction_score() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn scores_are_clamped() {
        let sf = ScoredFinding::new(Finding::new(SearchResult::new("u", "t", "s", "d")), 1.5, -0.5);
        assert_eq!(sf.relevance_score, 1.0);
        assert_eq!(sf.quality_score, 0.0);
    }

    #[test]
    fn compacted_digest_is_recognizable() {
        let sf = ScoredFinding::compacted_digest("Summary.");
        assert!(sf.is_compacted_digest());
        assert_eq!(
            sf.finding.extracted_fields.get("digest"),
            Some(&ExtractedValue::Text {
                value: "Summary.".to_string()
            })
        );
    }

    #[test]
    fn coerce_number_falls_back_to_zero() {
        let v = ExtractedValue::coerce("number", &serde_json::json!("not a number"));
        assert_eq!(v, ExtractedValue::Number { value: 0.0 });
    }
}
