//! Session Continuation (spec §4.8): the bounded outer controller that kicks
//! in when a `Loop::run`/`resume_from_checkpoint` call returns with
//! `metadata.needs_continuation = true` — a BudgetTracker signaled exhaustion
//! beyond what compaction could recover. Grounded in
//! `original_source/backend/apps/agents/research_workflow.py`'s continuation
//! while-loop: rather than resuming the same session, each pass spawns a
//! brand-new `Loop` seeded with a handoff summary and merges its Result back
//! in. The controller's own state is exactly `(continuation_count,
//! merged_result)`, per spec §4.8 — no iteration counters or trackers leak
//! across sessions.

use crate::domain::{ResearchContext, ResearchResult};
use crate::error::LoopError;
use crate::r#loop::Loop;

/// Bound on additional sessions after the first (spec §4.8).
pub const MAX_CONTINUATIONS: u32 = 3;

fn continuation_prompt(summary: &str, question: &str, continuation_number: u32) -> String {
    format!(
        "Continuation session {continuation_number} of a research run that ran out of \
         context mid-way. Original question: {question}\n\nHandoff summary of prior progress:\n{summary}\n\n\
         Continue the research from here without repeating work already covered above."
    )
}

/// Runs `initial_loop` and, while the result asks for continuation and the
/// bound hasn't been hit, spawns fresh sessions off a handoff summary,
/// merging each one's findings/blocks/content/metadata into the running
/// result (spec §4.8 step 4).
pub async fn run_with_continuations(
    initial_loop: &Loop,
    question: &str,
    context: &ResearchContext,
) -> Result<ResearchResult, LoopError> {
    let mut result = initial_loop.run(question, context).await?;

    let mut continuation_count = 0u32;
    while result.metadata.needs_continuation && continuation_count < MAX_CONTINUATIONS {
        continuation_count += 1;

        let summary = initial_loop.handoff_summary(question, &result).await;
        let prompt = continuation_prompt(&summary, question, continuation_count);
        let forked = initial_loop.fork_for_continuation(&prompt);

        let continuation_result = forked.run(question, context).await?;

        result.findings.extend(continuation_result.findings);
        result.blocks = continuation_result.blocks;
        result.content = continuation_result.content;
        result.metadata.generation_time_ms += continuation_result.metadata.generation_time_ms;
        result.metadata.total_sources += continuation_result.metadata.total_sources;
        result.metadata.continuations = continuation_count;
        result.metadata.needs_continuation = continuation_result.metadata.needs_continuation;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::Config;
    use crate::domain::{ResearchContext, SearchResult};
    use crate::llm::mock::MockProvider;
    use crate::tools::MockTool;
    use crate::r#loop::Loop;

    use super::*;

    fn tools_with_one_result() -> Vec<Arc<dyn crate::tools::Tool>> {
        vec![Arc::new(MockTool::new(
            "web",
            vec![SearchResult::new("https://a.com", "Source A", "snippet", "a.com")],
        ))]
    }

    #[tokio::test]
    async fn clean_run_needs_no_continuation() {
        // A roomy context window never exhausts, so needs_continuation stays
        // false throughout and the controller runs zero extra sessions.
        let provider = Arc::new(MockProvider::happy_path().with_context_window(1_000_000));
        let initial_loop = Loop::new(Config::default(), "", provider.clone(), tools_with_one_result());

        let result = run_with_continuations(&initial_loop, "What is X?", &ResearchContext::default())
            .await
            .unwrap();

        assert_eq!(result.metadata.continuations, 0);
        assert!(!result.metadata.needs_continuation);
        assert_eq!(provider.call_count(), 5);
    }

    #[tokio::test]
    async fn stops_at_max_continuations_even_if_still_exhausted() {
        // Every session (initial + all continuations) exhausts its budget
        // immediately, so this only terminates because continuation_count
        // hits MAX_CONTINUATIONS, not because needs_continuation clears.
        let responses = vec![
            serde_json::json!({"sub_queries": [{"query": "q", "source_target": "web"}]}).to_string(),
            serde_json::json!({"findings": [{"source_index": 0, "extracted_fields": {}, "raw_quote": "q"}]}).to_string(),
            serde_json::json!({"evaluations": [{"finding_index": 0, "relevance_score": 0.5, "quality_score": 0.5}]})
                .to_string(),
            serde_json::json!({"complete": true}).to_string(),
            "# Degraded\n\n".to_string(),
        ];

        // One response set for the initial run, then one handoff-summary
        // response plus one full run per continuation (3 continuations).
        let mut all_responses = responses.clone();
        for _ in 0..MAX_CONTINUATIONS {
            all_responses.push("Summary.".to_string());
            all_responses.extend(responses.clone());
        }

        let provider = Arc::new(MockProvider::new(all_responses).with_context_window(10));
        let mut config = Config::default();
        config.search.max_iterations = 1;

        let initial_loop = Loop::new(config, "", provider, tools_with_one_result());

        let result = run_with_continuations(&initial_loop, "Q?", &ResearchContext::default()).await.unwrap();

        assert_eq!(result.metadata.continuations, MAX_CONTINUATIONS);
    }
}
