use serde::{Deserialize, Serialize};

use super::block::Block;
use super::finding::ScoredFinding;
use super::plan::Plan;

/// The metadata bag populated at Finalize (§4.6 step 4).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub iterations: u32,
    pub total_sources: u32,
    pub findings_count: usize,
    pub generation_time_ms: u64,
    pub needs_continuation: bool,
    pub resumed_from_checkpoint: bool,
    #[serde(default)]
    pub resumed_at_iteration: Option<u32>,
    #[serde(default)]
    pub continuations: u32,
    /// Omitted (not zero) when no CostTracker was constructed (§4.6 tie-break).
    #[serde(default)]
    pub cost_usd: Option<f64>,
    /// Omitted when no BudgetTracker was constructed.
    #[serde(default)]
    pub budget_remaining_tokens: Option<u64>,
}

/// The final product of a Loop run (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchResult {
    pub content: String,
    pub blocks: Vec<Block>,
    pub findings: Vec<ScoredFinding>,
    pub plan: Plan,
    pub metadata: ResultMetadata,
}
