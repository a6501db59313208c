//! Finding compaction (spec §4.6 step e). Thresholds are literal named
//! constants taken from the source as observed (DESIGN.md Open Question 1):
//! they are not derived from a written policy, so they stay as plain
//! constants rather than config fields.

use crate::budget::BudgetTracker;
use crate::domain::ScoredFinding;

/// Minimum findings count before compaction is even considered.
pub const COMPACTION_FLOOR: usize = 20;
/// Estimated-token ceiling used only when no `BudgetTracker` is present.
pub const COMPACTION_TOKEN_CEILING: u64 = 60_000;
/// Fraction of findings retained, sorted by compaction score, descending.
pub const KEEP_RATIO: f64 = 0.60;

/// A crude per-finding token estimate (chars / 4) used only for the
/// budget-less ceiling check; never used once a real `BudgetTracker` exists.
fn estimate_tokens(findings: &[ScoredFinding]) -> u64 {
    findings
        .iter()
        .map(|f| {
            let quote_len = f.finding.raw_quote.as_deref().map(str::len).unwrap_or(0);
            let fields_len: usize = f
                .finding
                .extracted_fields
                .values()
                .map(|v| serde_json::to_string(v).map(|s| s.len()).unwrap_or(0))
                .sum();
            ((quote_len + fields_len) / 4) as u64
        })
        .sum()
}

pub fn should_compact(findings: &[ScoredFinding], budget: Option<&BudgetTracker>) -> bool {
    if findings.len() < COMPACTION_FLOOR {
        return false;
    }
    match budget {
        Some(tracker) => tracker.should_compact(findings.len()),
        None => estimate_tokens(findings) > COMPACTION_TOKEN_CEILING,
    }
}

/// Splits findings into (kept, dropped) by compaction score, descending,
/// keeping the top `KEEP_RATIO` fraction. Ties broken by original order.
pub fn split_by_score(mut findings: Vec<ScoredFinding>) -> (Vec<ScoredFinding>, Vec<ScoredFinding>) {
    let keep_count = ((findings.len() as f64) * KEEP_RATIO).ceil() as usize;
    let keep_count = keep_count.clamp(1, findings.len());

    let mut indexed: Vec<(usize, f64)> = findings
        .iter()
        .enumerate()
        .map(|(i, f)| (i, f.compaction_score()))
        .collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));

    let keep_indices: std::collections::HashSet<usize> = indexed.iter().take(keep_count).map(|(i, _)| *i).collect();

    let mut kept = Vec::with_capacity(keep_count);
    let mut dropped = Vec::with_capacity(findings.len() - keep_count);
    for (i, finding) in findings.drain(..).enumerate() {
        if keep_indices.contains(&i) {
            kept.push(finding);
        } else {
            dropped.push(finding);
        }
    }
    (kept, dropped)
}

/// Replaces `dropped` with a single synthetic digest finding and appends it
/// to `kept` (spec §4.6 step e).
pub fn compact_with_digest(mut kept: Vec<ScoredFinding>, digest: String) -> Vec<ScoredFinding> {
    kept.push(ScoredFinding::compacted_digest(digest));
    kept
}
