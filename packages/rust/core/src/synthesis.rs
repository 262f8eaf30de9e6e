//! Synthesis stage: turn the analyses into one article.

use tracing::{info, instrument, warn};

use preprint_llm::ChatModel;
use preprint_shared::PaperAnalysis;

use crate::prompts;
use crate::state::{PipelineState, Stage, StageFailure};

/// Article for a day with nothing worth reading.
pub const EMPTY_REPORT: &str = "# No interesting papers found today\n\nCheck back tomorrow!";

/// Heading of the article written when the model call fails.
pub const FALLBACK_HEADING: &str = "# Today's Papers";

/// Explanation placed under [`FALLBACK_HEADING`].
pub const FALLBACK_NOTE: &str =
    "*Article generation failed today, so here are the selected papers without commentary.*";

/// At most this many authors are listed per paper in the prompt.
const MAX_AUTHORS: usize = 5;

const ANALYSIS_SEPARATOR: &str = "\n\n---\n\n";

/// Fill `final_report`. Always produces an article.
#[instrument(skip_all, fields(analyses = state.analyses.len()))]
pub async fn run(
    mut state: PipelineState,
    llm: &dyn ChatModel,
    research_interests: &str,
) -> PipelineState {
    if state.analyses.is_empty() {
        info!("no analyses, writing placeholder report");
        state.final_report = EMPTY_REPORT.to_string();
        return state;
    }

    let system = prompts::synthesis_system(research_interests);
    let user = build_synthesis_input(&state.analyses);

    state.final_report = match llm.complete(&system, &user).await {
        Ok(article) => {
            info!(chars = article.len(), "article written");
            article
        }
        Err(e) => {
            warn!(error = %e, "article generation failed, writing fallback list");
            state
                .failures
                .push(StageFailure::new(Stage::Synthesizing, e.to_string()));
            fallback_article(&state.analyses)
        }
    };

    state
}

/// The user message carrying every analysis.
pub fn build_synthesis_input(analyses: &[PaperAnalysis]) -> String {
    let blocks = analyses
        .iter()
        .map(|a| {
            let authors = a
                .paper
                .authors
                .iter()
                .take(MAX_AUTHORS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Paper: {}\nLink: {}\nAuthors: {authors}\nAnalysis:\n{}",
                a.paper.title, a.paper.link, a.methodology_insights
            )
        })
        .collect::<Vec<_>>()
        .join(ANALYSIS_SEPARATOR);

    format!("Here are the papers I analyzed today:\n\n{blocks}")
}

/// Deterministic article listing each analyzed paper as a link.
pub fn fallback_article(analyses: &[PaperAnalysis]) -> String {
    let links = analyses
        .iter()
        .map(|a| format!("- [{}]({})", a.paper.title, a.paper.link))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{FALLBACK_HEADING}\n\n{FALLBACK_NOTE}\n\n{links}\n")
}
