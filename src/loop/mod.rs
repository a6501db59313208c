//! The Loop: the engine itself (spec §4.6), the largest component by far.
//! Split the way the teacher splits its own `loop/` module — `engine.rs`
//! owns the `Loop` struct and phase orchestration; `search.rs`,
//! `compaction.rs`, `blocks.rs`, and `prompts.rs` hold independently testable
//! concerns the engine calls into (mirroring the teacher's
//! `engine.rs`/`cascade.rs`/`metrics.rs`/`type_loader.rs` split).

mod blocks;
mod compaction;
mod engine;
mod prompts;
mod search;

pub use engine::Loop;
