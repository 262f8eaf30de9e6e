//! Analysis stage: one model call per selected paper, run concurrently.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use preprint_fetcher::extract_methodology_section;
use preprint_llm::ChatModel;
use preprint_shared::{Paper, PaperAnalysis, Result};

use crate::pipeline::ProgressReporter;
use crate::prompts::ANALYST_SYSTEM;
use crate::sources::ContentSource;
use crate::state::{PipelineState, Stage, StageFailure};

/// Methodology text sent to the model is cut to this many characters.
pub const METHODOLOGY_MAX_CHARS: usize = 10_000;

/// `summary` is this many leading characters of the model's reply.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Marks a prompt built from the abstract alone.
pub const NO_FULL_TEXT_NOTE: &str = "(Full HTML not available for this paper)";

/// Fill `analyses` with one entry per selected paper.
///
/// Every paper is analyzed in its own task. A failing or panicking task drops
/// only its paper, which is recorded in `failures`. Results follow fetch order.
#[instrument(skip_all, fields(selected = state.interesting_ids.len()))]
pub async fn run(
    mut state: PipelineState,
    llm: Arc<dyn ChatModel>,
    content: Arc<dyn ContentSource>,
    progress: &dyn ProgressReporter,
) -> PipelineState {
    state.analyses.clear();

    let papers = state.interesting_papers();
    if papers.is_empty() {
        info!("no papers to analyze");
        return state;
    }

    let total = papers.len();
    let mut handles = Vec::with_capacity(total);

    for paper in papers {
        let title = paper.title.clone();
        let llm = Arc::clone(&llm);
        let content = Arc::clone(&content);
        let handle =
            tokio::spawn(async move { analyze_paper(paper, llm.as_ref(), content.as_ref()).await });
        handles.push((title, handle));
    }

    for (done, (title, handle)) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(analysis)) => state.analyses.push(analysis),
            Ok(Err(e)) => {
                warn!(%title, error = %e, "analysis failed, dropping paper");
                state
                    .failures
                    .push(StageFailure::for_paper(Stage::Analyzing, &title, e.to_string()));
            }
            Err(join_err) => {
                warn!(%title, error = %join_err, "analysis task panicked, dropping paper");
                state.failures.push(StageFailure::for_paper(
                    Stage::Analyzing,
                    &title,
                    format!("task failed: {join_err}"),
                ));
            }
        }
        progress.paper_analyzed(&title, done + 1, total);
    }

    info!(
        analyzed = state.analyses.len(),
        dropped = total - state.analyses.len(),
        "analysis complete"
    );

    state
}

/// Fetch one paper's text and ask the model about it.
async fn analyze_paper(
    paper: Paper,
    llm: &dyn ChatModel,
    content: &dyn ContentSource,
) -> Result<PaperAnalysis> {
    let full_text = match content.fetch_content(&paper).await {
        Ok(text) => text,
        Err(e) => {
            warn!(arxiv_id = %paper.arxiv_id, error = %e, "full text unavailable");
            None
        }
    };
    debug!(arxiv_id = %paper.arxiv_id, has_full_text = full_text.is_some(), "analyzing paper");

    let input = build_analysis_input(&paper, full_text.as_deref());
    let reply = llm.complete(ANALYST_SYSTEM, &input).await?;

    Ok(PaperAnalysis {
        summary: reply.chars().take(SUMMARY_MAX_CHARS).collect(),
        methodology_insights: reply,
        why_interesting: String::new(),
        paper,
    })
}

/// The user message for one paper. Without full text, the prompt says so.
pub fn build_analysis_input(paper: &Paper, full_text: Option<&str>) -> String {
    match full_text {
        Some(text) => {
            let methodology: String = extract_methodology_section(text)
                .chars()
                .take(METHODOLOGY_MAX_CHARS)
                .collect();
            format!(
                "Title: {}\n\nAbstract: {}\n\nMethodology section:\n{methodology}",
                paper.title, paper.abstract_text
            )
        }
        None => format!(
            "Title: {}\n\nAbstract: {}\n\n{NO_FULL_TEXT_NOTE}",
            paper.title, paper.abstract_text
        ),
    }
}
