//! Search-phase fan-out (spec §4.6 step a, §5). Bounded concurrency via a
//! `tokio::sync::Semaphore`, grounded in the general async-worker-pool idiom
//! the teacher uses for scheduling (`scheduler/core.rs`), generalized here to
//! per-query tool dispatch with an independent per-call error boundary.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::domain::{SearchResult, SubQuery};
use crate::tools::Tool;

/// Runs `queries` through `tools` with at most `parallel_branches` concurrent
/// calls. Each query dispatches to the tool whose name exactly matches its
/// `source_target`, falling back to the first tool in `tools` (§4.6 "Tool
/// dispatch"). A failing call contributes no results and is logged; it never
/// aborts the batch (§4.6 failure table). Results are deduplicated against
/// `seen_urls`, which is updated in place. Each in-flight tool call is a
/// suspension point the caller's `cancellation` token can interrupt (spec
/// §5); a cancelled call contributes no results, same as a failing one.
pub async fn run_search(
    queries: &[SubQuery],
    tools: &[Arc<dyn Tool>],
    parallel_branches: usize,
    limit: usize,
    seen_urls: &mut HashSet<String>,
    cancellation: &CancellationToken,
) -> Vec<SearchResult> {
    let semaphore = Arc::new(Semaphore::new(parallel_branches.max(1)));

    let tasks = queries.iter().map(|query| {
        let semaphore = Arc::clone(&semaphore);
        let tool = crate::tools::dispatch(tools, &query.source_target).cloned();
        let query = query.clone();
        let cancellation = cancellation.clone();
        async move {
            let _permit = semaphore.acquire().await.expect("semaphore not closed");
            let Some(tool) = tool else {
                warn!(query = %query.query, "no tool available to dispatch search query");
                return Vec::new();
            };
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => Vec::new(),
                result = tool.execute(&query.query, &query.source_target, limit) => match result {
                    Ok(results) => results,
                    Err(err) => {
                        warn!(query = %query.query, tool = tool.name(), error = %err, "search tool call failed, dropping query");
                        Vec::new()
                    }
                },
            }
        }
    });

    let batches = join_all(tasks).await;

    let mut new_results = Vec::new();
    for batch in batches {
        for result in batch {
            if seen_urls.insert(result.url.clone()) {
                new_results.push(result);
            }
        }
    }
    new_results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::MockTool;
    use std::time::{Duration, Instant};

    fn sub_query(query: &str, target: &str) -> SubQuery {
        SubQuery::new(query, target)
    }

    #[tokio::test]
    async fn dedups_results_by_url_across_queries() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(MockTool::new(
            "web",
            vec![SearchResult::new("https://a.com", "A", "snippet", "a.com")],
        ))];
        let mut seen = HashSet::new();
        let first = run_search(&[sub_query("q1", "web")], &tools, 3, 10, &mut seen, &CancellationToken::new()).await;
        let second = run_search(&[sub_query("q2", "web")], &tools, 3, 10, &mut seen, &CancellationToken::new()).await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn failing_tool_drops_its_query_not_the_batch() {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(MockTool::new("web", vec![SearchResult::new("https://a.com", "A", "s", "a.com")])),
            Arc::new(MockTool::failing("broken")),
        ];
        let mut seen = HashSet::new();
        let queries = vec![sub_query("q1", "web"), sub_query("q2", "broken"), sub_query("q3", "web")];
        let results = run_search(&queries, &tools, 3, 10, &mut seen, &CancellationToken::new()).await;

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn unknown_source_target_falls_back_to_first_tool() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(MockTool::new(
            "web",
            vec![SearchResult::new("https://a.com", "A", "s", "a.com")],
        ))];
        let mut seen = HashSet::new();
        let results = run_search(&[sub_query("q1", "nonexistent")], &tools, 3, 10, &mut seen, &CancellationToken::new()).await;

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn parallel_branches_of_one_serializes_calls() {
        struct SlowTool;
        #[async_trait::async_trait]
        impl Tool for SlowTool {
            fn name(&self) -> &str {
                "slow"
            }
            async fn execute(
                &self,
                _query: &str,
                _source_target: &str,
                _limit: usize,
            ) -> Result<Vec<SearchResult>, crate::tools::ToolError> {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(vec![])
            }
        }

        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(SlowTool)];
        let mut seen = HashSet::new();
        let queries = vec![sub_query("q1", "slow"), sub_query("q2", "slow"), sub_query("q3", "slow")];

        let start = Instant::now();
        run_search(&queries, &tools, 1, 10, &mut seen, &CancellationToken::new()).await;
        assert!(start.elapsed() >= Duration::from_millis(140));
    }

    #[tokio::test]
    async fn cancelled_token_yields_no_results() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(MockTool::new(
            "web",
            vec![SearchResult::new("https://a.com", "A", "s", "a.com")],
        ))];
        let mut seen = HashSet::new();
        let token = CancellationToken::new();
        token.cancel();

        let results = run_search(&[sub_query("q1", "web")], &tools, 3, 10, &mut seen, &token).await;
        assert!(results.is_empty());
    }
}
