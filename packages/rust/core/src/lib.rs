//! Daily paper pipeline for Preprint Alert.
//!
//! Three fixed stages share one [`PipelineState`]:
//! - [`selection`]: the model picks interesting papers from the feed
//! - [`analysis`]: each pick is analyzed concurrently from its full text
//! - [`synthesis`]: the analyses become one markdown article
//!
//! [`run_daily`] wraps the stages with report storage and the site build.

pub mod analysis;
pub mod pipeline;
pub mod prompts;
pub mod selection;
pub mod sources;
pub mod state;
pub mod synthesis;

#[cfg(test)]
pub(crate) mod test_support;

pub use pipeline::{
    DailyRunOptions, Pipeline, ProgressReporter, RunSummary, SilentProgress, run_daily,
};
pub use sources::{ContentSource, PaperSource};
pub use state::{PipelineState, Stage, StageFailure};
