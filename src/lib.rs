//! Research Loop - iterative, config-driven research orchestration
//!
//! This crate turns a research question into a synthesized, source-grounded
//! report by cycling through five phases — Plan, Search, Extract, Evaluate,
//! Completeness, Synthesize — with context-budget-aware compaction, periodic
//! checkpointing, and session continuation when a run outgrows its context
//! window.
//!
//! # Modules
//!
//! - [`domain`] - Core data model: sub-queries, findings, plan, result
//! - [`config`] - Declarative configuration surface and loading
//! - [`llm`] - Provider trait and Anthropic implementation
//! - [`tools`] - Tool capability interface for search backends
//! - [`budget`] - Context-window budget tracking
//! - [`cost`] - Per-phase token-cost accounting
//! - [`trajectory`] - Append-only per-step audit log
//! - [`checkpoint`] - Checkpoint persistence and resume
//! - [`events`] - Outbound event persistence boundary
//! - [`progress`] - Host-facing progress reporting
//! - [`r#loop`] - The five-phase loop engine
//! - [`continuation`] - Bounded session-continuation controller
//! - [`error`] - Top-level Loop error type
//! - [`retry`] - Outer retry boundary around a Loop run

pub mod budget;
pub mod checkpoint;
pub mod config;
pub mod continuation;
pub mod cost;
pub mod domain;
pub mod error;
pub mod events;
pub mod llm;
pub mod progress;
pub mod retry;
pub mod tools;
pub mod trajectory;

// Note: 'loop' is a reserved keyword, so we use r#loop
#[path = "loop/mod.rs"]
pub mod r#loop;

// Re-export commonly used types
pub use budget::BudgetTracker;
pub use checkpoint::{Checkpoint, CheckpointSink, CheckpointSource, FileCheckpointStore};
pub use config::{Config, ConfigError};
pub use continuation::{run_with_continuations, MAX_CONTINUATIONS};
pub use cost::CostTracker;
pub use domain::{
    Block, BlockType, ExtractedValue, Finding, Plan, Relationship, ResearchContext, ResearchResult, ResultMetadata,
    ScoredFinding, SearchResult, SubQuery,
};
pub use error::LoopError;
pub use events::{EventSink, NullEventSink, PersistedEvent, PersistedEventType};
pub use llm::{AnthropicProvider, LlmError, Message, MessageContent, Provider, Role, TokenUsage, ToolDefinition};
pub use progress::{NullProgressReporter, ProgressReporter, TracingProgressReporter};
pub use r#loop::Loop;
pub use retry::with_outer_retry;
pub use tools::{HttpSearchTool, Tool, ToolError};
pub use trajectory::{TrajectoryEvent, TrajectoryRecorder};

// Re-exported so callers can construct a cancellation token for
// `Loop::with_cancellation_token` without adding a direct `tokio-util`
// dependency of their own.
pub use tokio_util::sync::CancellationToken;
