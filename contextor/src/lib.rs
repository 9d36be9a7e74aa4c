//! Question answering over the Harry Potter books.
//!
//! [`RagPipeline`] classifies a question ([`classify`]), retrieves and filters
//! passages ([`select`]), composes the prompt ([`prompt`]) and frames the
//! completion into a user-facing answer ([`messages`]). Retrieval and
//! completion sit behind the [`PassageSource`] and [`Completion`] traits.

mod api_types;
mod cfg;
pub mod classify;
mod error;
pub mod messages;
mod pipeline;
pub mod prompt;
pub mod select;
pub mod source;

pub use api_types::{InitReport, PipelineStatus, RagStats};
pub use cfg::{ContextorConfig, DEFAULT_RETRIEVAL_K};
pub use classify::{QueryAnalysis, QueryKind, analyze_query};
pub use error::ContextorError;
pub use pipeline::{RagPipeline, WARMUP_QUERIES};
pub use prompt::SYSTEM_PROMPT;
pub use source::{Completion, PassageSource};
