//! Per-phase prompt construction (spec §4.6). Constant-prompt-plus-context
//! assembly grounded in `planning/decomposer.rs`'s `DEFAULT_DECOMPOSE_PROMPT`
//! pattern: a static system prompt per phase, with `prompt_extension` (the
//! skill-injection seam, spec §9) appended once per call.

use crate::config::{Config, EvaluateConfig};
use crate::domain::{ResearchContext, ScoredFinding, SearchResult};

pub const DEFAULT_PLAN_PROMPT: &str = "You are a research planner. Decompose the research question into a \
small set of targeted sub-queries appropriate to the requested decomposition strategy. \
Respond with JSON: {\"sub_queries\": [{\"query\": str, \"source_target\": str, \"rationale\": str}], \"strategy_notes\": str}.";

pub const DEFAULT_EXTRACT_PROMPT: &str = "You are a research analyst extracting structured claims from sources. \
For each source, extract zero or more findings. Respond with JSON: \
{\"findings\": [{\"source_index\": int, \"extracted_fields\": object, \"raw_quote\": str, \"relationships\": [{\"relation\": str, \"target\": str}]}]}.";

pub const DEFAULT_EVALUATE_PROMPT: &str = "You are a research evaluator scoring findings against a rubric. \
Respond with JSON: {\"evaluations\": [{\"finding_index\": int, \"relevance_score\": number, \"quality_score\": number, \"evaluation_notes\": str}]}.";

pub const DEFAULT_COMPLETENESS_PROMPT: &str = "You decide whether a research run has gathered enough evidence to stop. \
Respond with JSON: {\"complete\": bool, \"reasoning\": str, \"followup_queries\": [{\"query\": str, \"source_target\": str, \"rationale\": str}]}.";

pub const DEFAULT_SYNTHESIZE_PROMPT: &str = "You are a research writer. Synthesize the findings into a \
source-grounded report matching the requested format, sections, and citation style. Respond with markdown only.";

pub const DEFAULT_COMPACTION_PROMPT: &str = "Summarize the following findings into a short digest (2-4 sentences) \
capturing their collective import, for readers who will not see the originals.";

pub const DEFAULT_HANDOFF_PROMPT: &str = "Summarize the research session so far in under 300 words, covering: \
(1) the original question, (2) what has been established, (3) what remains to investigate. \
This summary will seed a fresh continuation session.";

fn with_extension(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{base}\n\n{extension}")
    }
}

pub fn plan_system_prompt(config: &Config, extension: &str) -> String {
    let decomposition = serde_json::to_value(&config.search.decomposition)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "simple".to_string());
    with_extension(
        &format!("{DEFAULT_PLAN_PROMPT}\n\nDecomposition strategy: {decomposition}."),
        extension,
    )
}

pub fn plan_user_prompt(question: &str, context: &ResearchContext) -> String {
    format!(
        "Question: {question}\n\nCase: {}\nPosition: {}\nGraph context: {}",
        context.case_title, context.case_position, context.graph_context
    )
}

pub fn extract_system_prompt(config: &Config, extension: &str) -> String {
    let fields = config
        .extract
        .fields
        .iter()
        .map(|f| format!("{} ({}, {})", f.name, f.field_type.as_str(), if f.required { "required" } else { "optional" }))
        .collect::<Vec<_>>()
        .join(", ");
    let relationships = config.extract.relationships.join(", ");
    with_extension(
        &format!("{DEFAULT_EXTRACT_PROMPT}\n\nFields: {fields}\nAllowed relationships: {relationships}"),
        extension,
    )
}

pub fn extract_user_prompt(sources: &[SearchResult]) -> String {
    let listed = sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{i}] {} ({})\n{}", s.title, s.url, s.snippet))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Sources:\n\n{listed}")
}

pub fn effective_rubric(evaluate: &EvaluateConfig) -> String {
    if !evaluate.quality_rubric.is_empty() {
        return evaluate.quality_rubric.clone();
    }
    if evaluate.criteria.is_empty() {
        return "Score relevance to the research question and the reliability of the source.".to_string();
    }
    evaluate
        .criteria
        .iter()
        .map(|c| format!("- {} ({:?}): {}", c.name, c.importance, c.guidance))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn evaluate_system_prompt(config: &Config, extension: &str) -> String {
    let rubric = effective_rubric(&config.evaluate);
    with_extension(&format!("{DEFAULT_EVALUATE_PROMPT}\n\nRubric:\n{rubric}"), extension)
}

pub fn completeness_system_prompt(config: &Config, extension: &str) -> String {
    with_extension(
        &format!(
            "{DEFAULT_COMPLETENESS_PROMPT}\n\n\
             done_when: {}\n\
             require_contrary_check: {}\n\
             require_source_diversity: {}\n\
             min_sources: {}",
            config.completeness.done_when,
            config.completeness.require_contrary_check,
            config.completeness.require_source_diversity,
            config.completeness.min_sources
        ),
        extension,
    )
}

pub fn synthesize_system_prompt(config: &Config, extension: &str) -> String {
    with_extension(
        &format!(
            "{DEFAULT_SYNTHESIZE_PROMPT}\n\n\
             Format: {:?}\nSections: {}\nCitation style: {:?}",
            config.output.format,
            config.output.sections.join(", "),
            config.output.citation_style,
        ),
        extension,
    )
}

pub fn synthesize_user_prompt(question: &str, findings: &[ScoredFinding]) -> String {
    let listed = findings
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                "[{i}] {} (relevance={:.2}, quality={:.2})\n{}",
                f.finding.source.title,
                f.relevance_score,
                f.quality_score,
                f.finding.raw_quote.clone().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Question: {question}\n\nFindings:\n\n{listed}")
}
