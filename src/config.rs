//! The declarative surface that makes the Loop behave domain-appropriately
//! without code changes (spec §4.1). Mirrors the teacher's config-loading
//! idiom (`serde(default)` throughout, kebab-case wire names, a fallback
//! chain for file loading, a `Validate` that enumerates every error rather
//! than failing on the first).

use std::path::Path;

use eyre::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedPublisher {
    pub domain: String,
    pub trust: TrustLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub name: String,
    #[serde(default)]
    pub source_target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub primary: Vec<SourceEntry>,
    pub supplementary: Vec<SourceEntry>,
    pub trusted_publishers: Vec<TrustedPublisher>,
    pub excluded_domains: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decomposition {
    Simple,
    IssueSpotting,
    HypothesisDriven,
    Chronological,
    Comparative,
    MultiJurisdictional,
}

impl Default for Decomposition {
    fn default() -> Self {
        Decomposition::Simple
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    pub max_sources: u32,
    pub max_search_rounds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub decomposition: Decomposition,
    pub parallel_branches: u32,
    pub max_iterations: u32,
    pub budget: SearchBudget,
    pub follow_citations: bool,
    pub citation_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            decomposition: Decomposition::default(),
            parallel_branches: 3,
            max_iterations: 5,
            budget: SearchBudget {
                max_sources: 30,
                max_search_rounds: 10,
            },
            follow_citations: false,
            citation_depth: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Enum,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub fields: Vec<ExtractionField>,
    pub relationships: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluateMode {
    Corroborative,
    Hierarchical,
    Comparative,
}

impl Default for EvaluateMode {
    fn default() -> Self {
        EvaluateMode::Corroborative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub importance: Importance,
    #[serde(default)]
    pub guidance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluateConfig {
    pub mode: EvaluateMode,
    pub quality_rubric: String,
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessConfig {
    pub min_sources: u32,
    pub max_sources: u32,
    pub require_contrary_check: bool,
    pub require_source_diversity: bool,
    pub done_when: String,
}

impl Default for CompletenessConfig {
    fn default() -> Self {
        Self {
            min_sources: 3,
            max_sources: 30,
            require_contrary_check: false,
            require_source_diversity: false,
            done_when: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Report,
    Memo,
    Brief,
    Summary,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Report
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationStyle {
    Bluebook,
    Apa,
    Mla,
    Chicago,
    Inline,
}

impl Default for CitationStyle {
    fn default() -> Self {
        CitationStyle::Inline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetLength {
    Brief,
    Standard,
    Detailed,
}

impl Default for TargetLength {
    fn default() -> Self {
        TargetLength::Standard
    }
}

impl TargetLength {
    /// `_target_length_to_tokens` (§4.6 step 3): synthesis token ceiling.
    pub fn to_tokens(self) -> u32 {
        match self {
            TargetLength::Brief => 1500,
            TargetLength::Standard => 4000,
            TargetLength::Detailed => 8000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub sections: Vec<String>,
    pub citation_style: CitationStyle,
    pub target_length: TargetLength,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub search: SearchConfig,
    pub extract: ExtractConfig,
    pub evaluate: EvaluateConfig,
    pub completeness: CompletenessConfig,
    pub output: OutputConfig,
}

/// Enumerates every validation error at once (spec §4.1 `Validate`), rather
/// than failing on the first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("search.parallel_branches must be in [1, 10], got {0}")]
    ParallelBranchesOutOfRange(u32),
    #[error("search.max_iterations must be in [1, 20], got {0}")]
    MaxIterationsOutOfRange(u32),
    #[error("search.citation_depth must be in [0, 5], got {0}")]
    CitationDepthOutOfRange(u32),
    #[error("completeness.min_sources ({min_sources}) > completeness.max_sources ({max_sources})")]
    MinSourcesExceedsMax { min_sources: u32, max_sources: u32 },
    #[error(
        "search.budget.max_sources ({budget_max}) < completeness.min_sources ({completeness_min})"
    )]
    BudgetBelowCompletenessFloor { budget_max: u32, completeness_min: u32 },
    #[error("extract.fields[{index}] has an empty name")]
    EmptyFieldName { index: usize },
    #[error("sources.trusted_publishers[{index}] has an empty domain")]
    EmptyTrustedPublisherDomain { index: usize },
}

impl Config {
    /// A documented-default Config; always valid.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Merges a partial JSON document with defaults; missing keys take
    /// defaults at every nesting level via `#[serde(default)]`.
    pub fn from_dict(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }

    /// Enumerates all validation errors; an empty Vec means the Config is
    /// valid (spec §4.1).
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(1..=10).contains(&self.search.parallel_branches) {
            errors.push(ConfigError::ParallelBranchesOutOfRange(self.search.parallel_branches));
        }
        if !(1..=20).contains(&self.search.max_iterations) {
            errors.push(ConfigError::MaxIterationsOutOfRange(self.search.max_iterations));
        }
        if !(0..=5).contains(&self.search.citation_depth) {
            errors.push(ConfigError::CitationDepthOutOfRange(self.search.citation_depth));
        }
        if self.completeness.min_sources > self.completeness.max_sources {
            errors.push(ConfigError::MinSourcesExceedsMax {
                min_sources: self.completeness.min_sources,
                max_sources: self.completeness.max_sources,
            });
        }
        if self.search.budget.max_sources < self.completeness.min_sources {
            errors.push(ConfigError::BudgetBelowCompletenessFloor {
                budget_max: self.search.budget.max_sources,
                completeness_min: self.completeness.min_sources,
            });
        }
        for (index, field) in self.extract.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                errors.push(ConfigError::EmptyFieldName { index });
            }
        }
        for (index, publisher) in self.sources.trusted_publishers.iter().enumerate() {
            if publisher.domain.trim().is_empty() {
                errors.push(ConfigError::EmptyTrustedPublisherDomain { index });
            }
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Loads from an explicit path if given, else falls back to the
    /// project-local then user-level file, else `Default()`. Mirrors the
    /// teacher's config-loading fallback chain: every read/parse failure is
    /// logged and falls through rather than aborting.
    pub fn load(explicit_path: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = explicit_path {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading config file {}", path.display()))?;
            return serde_yaml::from_str(&text)
                .wrap_err_with(|| format!("parsing config file {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            match std::fs::read_to_string(&candidate) {
                Ok(text) => match serde_yaml::from_str(&text) {
                    Ok(config) => return Ok(config),
                    Err(err) => {
                        tracing::warn!(path = %candidate.display(), error = %err, "failed to parse config file, falling back");
                    }
                },
                Err(err) => {
                    tracing::debug!(path = %candidate.display(), error = %err, "config file not found, falling back");
                }
            }
        }

        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<std::path::PathBuf> {
        let mut paths = vec![std::path::PathBuf::from("research-loop.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("research-loop").join("config.yml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.is_valid(), "{:?}", config.validate());
    }

    #[test]
    fn validate_enumerates_multiple_errors() {
        let mut config = Config::default();
        config.search.parallel_branches = 0;
        config.search.max_iterations = 99;
        config.completeness.min_sources = 10;
        config.completeness.max_sources = 5;

        let errors = config.validate();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn from_dict_merges_missing_keys_with_defaults() {
        let config = Config::from_dict(serde_json::json!({
            "search": { "parallel_branches": 5 }
        }));
        assert_eq!(config.search.parallel_branches, 5);
        assert_eq!(config.search.max_iterations, Config::default().search.max_iterations);
        assert_eq!(config.completeness.min_sources, Config::default().completeness.min_sources);
    }

    #[test]
    fn target_length_maps_to_token_ceiling() {
        assert_eq!(TargetLength::Brief.to_tokens(), 1500);
        assert_eq!(TargetLength::Standard.to_tokens(), 4000);
        assert_eq!(TargetLength::Detailed.to_tokens(), 8000);
    }

    #[test]
    fn empty_field_name_is_invalid() {
        let mut config = Config::default();
        config.extract.fields.push(ExtractionField {
            name: "  ".to_string(),
            field_type: FieldType::Text,
            required: false,
            description: String::new(),
        });
        assert!(config
            .validate()
            .contains(&ConfigError::EmptyFieldName { index: 0 }));
    }
}
