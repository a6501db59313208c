//! The `Loop` struct and its phase orchestration (spec §4.6). Construction
//! shape and the `run`/resume split are grounded in the teacher's
//! `loop/engine.rs` (`LoopEngine::new`, `run`, `run_iteration`), generalized
//! from a validation-loop to the five-phase research loop this spec
//! describes; the fresh-run/resume unification is DESIGN.md's Open Question
//! decision 2.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::budget::BudgetTracker;
use crate::checkpoint::{Checkpoint, CheckpointSink};
use crate::config::Config;
use crate::cost::CostTracker;
use crate::domain::{
    Block, ExtractedValue, Finding, Plan, Relationship, ResearchContext, ResearchResult, ResultMetadata, ScoredFinding,
    SearchResult, SubQuery,
};
use crate::error::LoopError;
use crate::llm::{Message, Provider};
use crate::progress::{NullProgressReporter, ProgressReporter};
use crate::tools::Tool;
use crate::trajectory::TrajectoryRecorder;

use super::{blocks, compaction, prompts, search};

/// Findings-count ceiling past which Completeness short-circuits (spec §4.6
/// step f, first ceiling).
fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64 / 4).max(1)
}

/// Mutable, single-task-owned state threaded through one research session
/// (spec §5 "Shared-resource policy"): no part of this is shared across
/// concurrent Loop instances.
struct RunState {
    findings: Vec<ScoredFinding>,
    seen_urls: HashSet<String>,
    total_sources: u32,
    search_rounds: u32,
    budget: Option<BudgetTracker>,
    cost: Option<CostTracker>,
    needs_continuation: bool,
}

impl RunState {
    fn fresh(provider: &dyn Provider) -> Self {
        Self {
            findings: Vec::new(),
            seen_urls: HashSet::new(),
            total_sources: 0,
            search_rounds: 0,
            budget: provider.context_window_tokens().map(BudgetTracker::new),
            cost: provider.model().map(CostTracker::new),
            needs_continuation: false,
        }
    }
}

/// Where a run starts, unifying fresh runs and checkpoint resumption into one
/// code path (DESIGN.md Open Question decision 2).
enum EntryPoint {
    /// Resume at the start of an iteration, with the queries that iteration
    /// should search for already decided (plan.sub_queries on a `plan`-phase
    /// resume, or drained followups on an `evaluate`-phase resume).
    Iterate { iteration: u32, queries: Vec<SubQuery> },
    /// Resume straight at Synthesize (an `evaluate`-phase resume with an
    /// empty followup queue).
    Synthesize,
}

/// The research engine. Construction parameters mirror spec §4.6: `config`,
/// `prompt_extension` (the skill-injection seam), `provider`, `tools`, and
/// optional observability callbacks.
pub struct Loop {
    config: Config,
    prompt_extension: String,
    provider: Arc<dyn Provider>,
    tools: Vec<Arc<dyn Tool>>,
    progress: Arc<dyn ProgressReporter>,
    checkpoint_sink: Option<Arc<dyn CheckpointSink>>,
    trajectory: Arc<TrajectoryRecorder>,
    correlation_id: String,
    cancellation: CancellationToken,
}

impl Loop {
    pub fn new(config: Config, prompt_extension: impl Into<String>, provider: Arc<dyn Provider>, tools: Vec<Arc<dyn Tool>>) -> Self {
        let correlation_id = Uuid::now_v7().to_string();
        Self {
            config,
            prompt_extension: prompt_extension.into(),
            provider,
            tools,
            progress: Arc::new(NullProgressReporter),
            checkpoint_sink: None,
            trajectory: Arc::new(TrajectoryRecorder::new(correlation_id.clone())),
            correlation_id,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_checkpoint_sink(mut self, sink: Arc<dyn CheckpointSink>) -> Self {
        self.checkpoint_sink = Some(sink);
        self
    }

    pub fn with_trajectory_recorder(mut self, trajectory: Arc<TrajectoryRecorder>) -> Self {
        self.trajectory = trajectory;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    /// Wires an externally-held `CancellationToken` so a caller can abort an
    /// in-flight run (spec §5 "Cancellation") by calling `.cancel()` on its
    /// own clone of the same token.
    pub fn with_cancellation_token(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn trajectory(&self) -> Arc<TrajectoryRecorder> {
        Arc::clone(&self.trajectory)
    }

    fn check_cancelled(&self) -> Result<(), LoopError> {
        if self.cancellation.is_cancelled() {
            Err(LoopError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Builds a fresh `Loop` for one continuation session (spec §4.8),
    /// sharing provider, tools, and observability wiring with `self` but
    /// appending `continuation_prompt` to the *original* `prompt_extension`
    /// rather than compounding previous continuations' prompts, mirroring
    /// `research_workflow.py`'s continuation while-loop (each pass reuses
    /// `skill_context['system_prompt_extension']`, not the last pass's
    /// combined extension).
    pub(crate) fn fork_for_continuation(&self, continuation_prompt: &str) -> Loop {
        Loop {
            config: self.config.clone(),
            prompt_extension: format!("{}\n\n{continuation_prompt}", self.prompt_extension),
            provider: Arc::clone(&self.provider),
            tools: self.tools.clone(),
            progress: Arc::clone(&self.progress),
            checkpoint_sink: self.checkpoint_sink.clone(),
            trajectory: Arc::clone(&self.trajectory),
            correlation_id: self.correlation_id.clone(),
            cancellation: self.cancellation.clone(),
        }
    }

    /// Summarizes a finished run's findings and plan for the next
    /// continuation's prompt_extension (spec §4.8 handoff summary), grounded
    /// in `research_workflow.py`'s `build_handoff_summary(question,
    /// findings_dicts, plan_dict, provider)`. One extra provider call, kept
    /// off the run's own `RunState` since it happens between runs rather than
    /// inside one.
    pub(crate) async fn handoff_summary(&self, question: &str, result: &ResearchResult) -> String {
        let findings_listing = result
            .findings
            .iter()
            .map(|f| f.finding.raw_quote.clone().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
        let user_prompt = format!(
            "Question: {question}\n\nStrategy notes: {}\n\nFindings so far:\n{findings_listing}",
            result.plan.strategy_notes
        );
        let messages = vec![Message::user(user_prompt)];
        let mut scratch = RunState::fresh(self.provider.as_ref());

        self.generate(&messages, prompts::DEFAULT_HANDOFF_PROMPT, 500, 0.3, "handoff", &mut scratch)
            .await
            .unwrap_or_else(|_| {
                format!(
                    "{} findings gathered so far. Strategy notes: {}",
                    result.findings.len(),
                    result.plan.strategy_notes
                )
            })
    }

    /// Runs a fresh research session (spec §4.6 main algorithm).
    pub async fn run(&self, question: &str, context: &ResearchContext) -> Result<ResearchResult, LoopError> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(LoopError::ConfigInvalid(errors));
        }
        self.check_cancelled()?;

        let started = Instant::now();
        let mut state = RunState::fresh(self.provider.as_ref());
        let mut plan = self.run_plan_phase(question, context, &mut state).await?;

        self.emit_checkpoint(&state, &plan, "plan", question, 0).await;

        let entry = EntryPoint::Iterate {
            iteration: 0,
            queries: plan.sub_queries.clone(),
        };
        let (content, blocks, iterations) = self
            .run_from(question, context, &mut plan, &mut state, entry)
            .await?;

        Ok(self.finalize(content, blocks, plan, state, iterations, started, false, None))
    }

    /// Reconstructs Loop state from a `Checkpoint` and resumes at the phase
    /// following `checkpoint.phase` (spec §4.6 "Resume from checkpoint").
    pub async fn resume_from_checkpoint(&self, checkpoint: Checkpoint, context: &ResearchContext) -> Result<ResearchResult, LoopError> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(LoopError::ConfigInvalid(errors));
        }
        self.check_cancelled()?;

        let started = Instant::now();
        let mut plan = checkpoint.restored_plan();
        let findings = restore_findings(&checkpoint.findings_dicts);
        let seen_urls: HashSet<String> = findings
            .iter()
            .map(|f| f.finding.source.url.clone())
            .filter(|url| !url.is_empty())
            .collect();

        let entry = match checkpoint.phase.as_str() {
            "plan" => EntryPoint::Iterate {
                iteration: 0,
                queries: plan.sub_queries.clone(),
            },
            "evaluate" => {
                let followups = plan.drain_followups();
                if followups.is_empty() {
                    EntryPoint::Synthesize
                } else {
                    EntryPoint::Iterate {
                        iteration: checkpoint.iteration + 1,
                        queries: followups,
                    }
                }
            }
            other => {
                warn!(phase = other, "resuming from an unrecognized checkpoint phase; treating as plan-equivalent");
                EntryPoint::Iterate {
                    iteration: 0,
                    queries: plan.sub_queries.clone(),
                }
            }
        };

        let mut state = RunState::fresh(self.provider.as_ref());
        state.total_sources = checkpoint.total_sources_found;
        state.search_rounds = checkpoint.search_rounds;
        state.findings = findings;
        state.seen_urls = seen_urls;

        let (content, blocks, iterations) = self
            .run_from(&checkpoint.question, context, &mut plan, &mut state, entry)
            .await?;

        Ok(self.finalize(
            content,
            blocks,
            plan,
            state,
            iterations,
            started,
            true,
            Some(checkpoint.iteration),
        ))
    }

    /// Shared iterate-then-synthesize path for fresh runs and resumed runs
    /// alike (DESIGN.md Open Question decision 2).
    async fn run_from(
        &self,
        question: &str,
        _context: &ResearchContext,
        plan: &mut Plan,
        state: &mut RunState,
        entry: EntryPoint,
    ) -> Result<(String, Vec<Block>, u32), LoopError> {
        let (mut iteration, mut next_queries) = match entry {
            EntryPoint::Synthesize => {
                let (content, blocks) = self.run_synthesize_phase(question, state).await?;
                return Ok((content, blocks, 1));
            }
            EntryPoint::Iterate { iteration, queries } => (iteration, queries),
        };

        let mut completed_iterations = 0u32;

        loop {
            if iteration >= self.config.search.max_iterations {
                break;
            }
            self.check_cancelled()?;

            self.progress.report("search", &format!("iteration {iteration}: searching")).await;
            let new_results = search::run_search(
                &next_queries,
                &self.tools,
                self.config.search.parallel_branches as usize,
                self.config.search.budget.max_sources.max(1) as usize,
                &mut state.seen_urls,
                &self.cancellation,
            )
            .await;
            self.check_cancelled()?;
            state.total_sources += new_results.len() as u32;
            state.search_rounds += 1;
            self.trajectory.record_step(
                "search",
                format!("{} queries", next_queries.len()),
                format!("{} new results", new_results.len()),
                "",
                serde_json::Map::new(),
                0,
            );

            let followups_pending = !plan.followups.is_empty();
            if new_results.is_empty() && !followups_pending {
                debug!(iteration, "empty search and no pending followups, proceeding to synthesize");
                break;
            }

            let new_findings = self.run_extract_phase(&new_results, state).await?;
            let scored = self.run_evaluate_phase(&new_findings, state).await?;
            state.findings.extend(scored);

            if compaction::should_compact(&state.findings, state.budget.as_ref()) {
                self.run_compaction_phase(state).await?;
            }

            completed_iterations = iteration + 1;

            let complete = self.run_completeness_phase(plan, state, iteration).await?;
            self.emit_checkpoint(state, plan, "evaluate", question, iteration).await;

            if complete {
                break;
            }

            iteration += 1;
            next_queries = plan.drain_followups();
            if next_queries.is_empty() {
                break;
            }
        }

        let (content, blocks) = self.run_synthesize_phase(question, state).await?;
        Ok((content, blocks, completed_iterations.max(1)))
    }

    async fn run_plan_phase(&self, question: &str, context: &ResearchContext, state: &mut RunState) -> Result<Plan, LoopError> {
        self.progress.report("plan", "decomposing question").await;
        let system_prompt = prompts::plan_system_prompt(&self.config, &self.prompt_extension);
        let user_prompt = prompts::plan_user_prompt(question, context);
        let messages = vec![Message::user(user_prompt.clone())];

        let response = self.generate(&messages, &system_prompt, 2000, 0.2, "plan", state).await?;
        let value = crate::llm::parse_json_response(&response);

        #[derive(Deserialize)]
        struct PlanPayload {
            #[serde(default)]
            sub_queries: Vec<SubQuery>,
            #[serde(default)]
            strategy_notes: String,
        }

        let plan = match serde_json::from_value::<PlanPayload>(value) {
            Ok(payload) if !payload.sub_queries.is_empty() => Plan::new(payload.sub_queries, payload.strategy_notes),
            _ => {
                warn!("plan response failed to parse or was empty, falling back to single-query plan");
                Plan::fallback(question)
            }
        };

        self.trajectory.record_step(
            "plan",
            question,
            format!("{} sub-queries", plan.sub_queries.len()),
            plan.strategy_notes.clone(),
            serde_json::Map::new(),
            0,
        );

        Ok(plan)
    }

    async fn run_extract_phase(&self, sources: &[SearchResult], state: &mut RunState) -> Result<Vec<Finding>, LoopError> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }
        self.progress.report("extract", &format!("extracting from {} sources", sources.len())).await;

        let system_prompt = prompts::extract_system_prompt(&self.config, &self.prompt_extension);
        let user_prompt = prompts::extract_user_prompt(sources);
        let messages = vec![Message::user(user_prompt)];

        let response = self.generate(&messages, &system_prompt, 3000, 0.2, "extract", state).await?;
        let value = crate::llm::parse_json_response(&response);

        #[derive(Deserialize)]
        struct FindingPayload {
            source_index: i64,
            #[serde(default)]
            extracted_fields: HashMap<String, ExtractedValue>,
            #[serde(default)]
            raw_quote: Option<String>,
            #[serde(default)]
            relationships: Vec<Relationship>,
        }
        #[derive(Deserialize)]
        struct ExtractPayload {
            #[serde(default)]
            findings: Vec<FindingPayload>,
        }

        let payload: ExtractPayload = serde_json::from_value(value).unwrap_or(ExtractPayload { findings: Vec::new() });

        let findings: Vec<Finding> = payload
            .findings
            .into_iter()
            .filter_map(|f| {
                let source = sources.get(usize::try_from(f.source_index).ok()?)?.clone();
                Some(Finding {
                    id: Uuid::now_v7(),
                    source,
                    extracted_fields: f.extracted_fields,
                    raw_quote: f.raw_quote,
                    relationships: f.relationships,
                })
            })
            .collect();

        self.trajectory.record_step(
            "extract",
            format!("{} sources", sources.len()),
            format!("{} findings", findings.len()),
            "",
            serde_json::Map::new(),
            0,
        );

        Ok(findings)
    }

    async fn run_evaluate_phase(&self, findings: &[Finding], state: &mut RunState) -> Result<Vec<ScoredFinding>, LoopError> {
        if findings.is_empty() {
            return Ok(Vec::new());
        }
        self.progress.report("evaluate", &format!("scoring {} findings", findings.len())).await;

        let system_prompt = prompts::evaluate_system_prompt(&self.config, &self.prompt_extension);
        let user_prompt = findings
            .iter()
            .enumerate()
            .map(|(i, f)| format!("[{i}] {}", f.raw_quote.clone().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("\n");
        let messages = vec![Message::user(user_prompt)];

        let response = self.generate(&messages, &system_prompt, 2000, 0.2, "evaluate", state).await?;
        let value = crate::llm::parse_json_response(&response);

        #[derive(Deserialize)]
        struct EvaluationPayload {
            finding_index: i64,
            #[serde(default)]
            relevance_score: f64,
            #[serde(default)]
            quality_score: f64,
            #[serde(default)]
            evaluation_notes: Option<String>,
        }
        #[derive(Deserialize)]
        struct EvaluatePayload {
            #[serde(default)]
            evaluations: Vec<EvaluationPayload>,
        }

        let payload: EvaluatePayload = serde_json::from_value(value).unwrap_or(EvaluatePayload { evaluations: Vec::new() });

        let mut scored: Vec<ScoredFinding> = Vec::with_capacity(findings.len());
        for evaluation in payload.evaluations {
            let Ok(index) = usize::try_from(evaluation.finding_index) else { continue };
            let Some(finding) = findings.get(index) else { continue };
            let mut sf = ScoredFinding::new(finding.clone(), evaluation.relevance_score, evaluation.quality_score);
            sf.evaluation_notes = evaluation.evaluation_notes;
            scored.push(sf);
        }

        self.trajectory.record_step(
            "evaluate",
            format!("{} findings", findings.len()),
            format!("{} scored", scored.len()),
            "",
            serde_json::Map::new(),
            0,
        );

        Ok(scored)
    }

    async fn run_compaction_phase(&self, state: &mut RunState) -> Result<(), LoopError> {
        self.progress.report("compact", "compacting low-scored findings").await;

        let findings = std::mem::take(&mut state.findings);
        let (kept, dropped) = compaction::split_by_score(findings);

        let summary_input = dropped
            .iter()
            .map(|f| f.finding.raw_quote.clone().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
        let messages = vec![Message::user(summary_input)];
        let digest = self
            .generate(&messages, prompts::DEFAULT_COMPACTION_PROMPT, 300, 0.3, "compact", state)
            .await
            .unwrap_or_else(|_| "Summary unavailable.".to_string());

        state.findings = compaction::compact_with_digest(kept, digest);

        self.trajectory.record_step(
            "compact",
            format!("{} findings", dropped.len() + state.findings.len()),
            format!("{} retained", state.findings.len()),
            "",
            serde_json::Map::new(),
            0,
        );

        Ok(())
    }

    /// Returns `true` when the run is complete (spec §4.6 step f).
    async fn run_completeness_phase(&self, plan: &mut Plan, state: &mut RunState, iteration: u32) -> Result<bool, LoopError> {
        if state.findings.len() as u32 >= self.config.search.budget.max_sources {
            debug!("completeness short-circuit: max_sources ceiling reached");
            return Ok(true);
        }
        if iteration + 1 >= self.config.search.max_iterations {
            debug!("completeness short-circuit: max_iterations ceiling reached");
            return Ok(true);
        }

        self.progress.report("completeness", "checking whether enough evidence has been gathered").await;
        let system_prompt = prompts::completeness_system_prompt(&self.config, &self.prompt_extension);
        let summary = state
            .findings
            .iter()
            .map(|f| f.finding.raw_quote.clone().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
        let messages = vec![Message::user(summary)];

        let response = self.generate(&messages, &system_prompt, 800, 0.2, "completeness", state).await?;
        let value = crate::llm::parse_json_response(&response);

        #[derive(Deserialize)]
        struct CompletenessPayload {
            #[serde(default)]
            complete: bool,
            #[serde(default)]
            followup_queries: Vec<SubQuery>,
        }

        let payload: CompletenessPayload = serde_json::from_value(value).unwrap_or(CompletenessPayload {
            complete: false,
            followup_queries: Vec::new(),
        });

        if !payload.complete {
            plan.push_followups(payload.followup_queries);
        }

        self.trajectory.record_step(
            "completeness",
            format!("{} findings", state.findings.len()),
            format!("complete={}", payload.complete),
            "",
            serde_json::Map::new(),
            0,
        );

        Ok(payload.complete)
    }

    async fn run_synthesize_phase(&self, question: &str, state: &mut RunState) -> Result<(String, Vec<Block>), LoopError> {
        self.progress.report("synthesize", "writing the final report").await;

        if state.findings.is_empty() {
            let degraded = format!("# {question}\n\nNo findings were gathered for this question.");
            return Ok((degraded.clone(), blocks::parse_blocks(&degraded)));
        }

        let system_prompt = prompts::synthesize_system_prompt(&self.config, &self.prompt_extension);
        let user_prompt = prompts::synthesize_user_prompt(question, &state.findings);
        let messages = vec![Message::user(user_prompt)];
        let max_tokens = self.config.output.target_length.to_tokens();

        let content = match self.generate(&messages, &system_prompt, max_tokens, 0.4, "synthesize", state).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "synthesis failed, returning degraded result");
                format!("# {question}\n\nSynthesis failed; {} findings were gathered but could not be summarized.", state.findings.len())
            }
        };

        let parsed_blocks = blocks::parse_blocks(&content);

        self.trajectory.record_step(
            "synthesize",
            format!("{} findings", state.findings.len()),
            format!("{} blocks", parsed_blocks.len()),
            "",
            serde_json::Map::new(),
            0,
        );

        Ok((content, parsed_blocks))
    }

    /// Invokes `Provider::generate`, estimating token usage from text length
    /// since this spec's `Generate` returns plain text rather than a usage
    /// struct (DESIGN.md notes this as an interpretation, not a guess: there
    /// is no other source of truth for per-call token counts here).
    async fn generate(
        &self,
        messages: &[Message],
        system_prompt: &str,
        max_tokens: u32,
        temperature: f32,
        phase: &str,
        state: &mut RunState,
    ) -> Result<String, LoopError> {
        self.check_cancelled()?;
        let response = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => return Err(LoopError::Cancelled),
            result = self.provider.generate(messages, system_prompt, max_tokens, temperature) => result.map_err(LoopError::Provider)?,
        };

        let prompt_text: String = messages.iter().map(|m| m.content.as_text()).collect::<Vec<_>>().join("\n");
        let prompt_tokens = estimate_tokens(system_prompt) + estimate_tokens(&prompt_text);
        let completion_tokens = estimate_tokens(&response);

        if let Some(budget) = state.budget.as_mut() {
            budget.add(prompt_tokens, completion_tokens);
            if budget.is_exhausted() {
                state.needs_continuation = true;
            }
        }
        if let Some(cost) = state.cost.as_mut() {
            cost.record(
                phase,
                crate::llm::TokenUsage {
                    prompt_tokens,
                    completion_tokens,
                    cache_read_tokens: 0,
                    cache_creation_tokens: 0,
                },
            );
        }

        Ok(response)
    }

    async fn emit_checkpoint(&self, state: &RunState, plan: &Plan, phase: &str, question: &str, iteration: u32) {
        let Some(sink) = &self.checkpoint_sink else { return };

        let checkpoint = Checkpoint {
            correlation_id: self.correlation_id.clone(),
            question: question.to_string(),
            iteration,
            phase: phase.to_string(),
            total_sources_found: state.total_sources,
            search_rounds: state.search_rounds,
            plan_dict: plan.to_dict(),
            findings_dicts: state.findings.iter().map(|f| serde_json::to_value(f).unwrap_or(serde_json::json!({}))).collect(),
            config_dict: self.config.to_dict(),
            prompt_extension: self.prompt_extension.clone(),
            context_dict: serde_json::json!({}),
        };

        if let Err(err) = sink.save(&checkpoint).await {
            warn!(error = %err, phase, "checkpoint save failed, continuing best-effort");
        }
    }

    fn finalize(
        &self,
        content: String,
        blocks: Vec<Block>,
        plan: Plan,
        state: RunState,
        iterations: u32,
        started: Instant,
        resumed_from_checkpoint: bool,
        resumed_at_iteration: Option<u32>,
    ) -> ResearchResult {
        let findings_count = state.findings.len();
        ResearchResult {
            content,
            blocks,
            findings: state.findings,
            plan,
            metadata: ResultMetadata {
                iterations,
                total_sources: state.total_sources,
                findings_count,
                generation_time_ms: started.elapsed().as_millis() as u64,
                needs_continuation: state.needs_continuation,
                resumed_from_checkpoint,
                resumed_at_iteration,
                continuations: 0,
                cost_usd: state.cost.as_ref().map(CostTracker::total_cost_usd),
                budget_remaining_tokens: state.budget.as_ref().map(BudgetTracker::remaining),
            },
        }
    }
}

fn restore_findings(findings_dicts: &[serde_json::Value]) -> Vec<ScoredFinding> {
    findings_dicts
        .iter()
        .filter_map(|value| serde_json::from_value(value.clone()).ok())
        .collect()
}
