//! Core data model shared by every phase of the research loop: sub-queries,
//! search results, findings, the plan, run-level context and the final result.

mod block;
mod context;
mod finding;
mod plan;
mod result;
mod search_result;
mod sub_query;

pub use block::{Block, BlockType};
pub use context::ResearchContext;
pub use finding::{ExtractedValue, Finding, Relationship, ScoredFinding};
pub use plan::Plan;
pub use result::{ResearchResult, ResultMetadata};
pub use search_result::SearchResult;
pub use sub_query::SubQuery;
