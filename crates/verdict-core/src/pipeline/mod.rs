//! Query orchestration: rules path, retrieval path, guards, gate, fallback.

pub mod error;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod response;
pub mod signals;
pub mod stats;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
pub use pipeline::AskPipeline;
pub use response::{AnswerMode, PipelineResponse};
pub use signals::{evidence_coverage, retrieval_margin, validate_query};
pub use stats::{PipelineStats, StatsSnapshot};
