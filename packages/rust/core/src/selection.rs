//! Selection stage: ask the model which papers deserve a closer look.

use std::collections::HashSet;

use tracing::{info, instrument, warn};

use preprint_llm::ChatModel;
use preprint_shared::Paper;

use crate::prompts;
use crate::state::{PipelineState, Stage, StageFailure};

/// Abstracts are cut to this many characters in the selection prompt.
pub const ABSTRACT_PREVIEW_CHARS: usize = 500;

/// Fill `interesting_ids` from `papers`.
///
/// The reply is untrusted: only ids of fetched papers survive. A model
/// failure leaves the set empty and is recorded in `failures`.
#[instrument(skip_all, fields(papers = state.papers.len()))]
pub async fn run(
    mut state: PipelineState,
    llm: &dyn ChatModel,
    research_interests: &str,
) -> PipelineState {
    state.interesting_ids.clear();

    if state.papers.is_empty() {
        info!("no papers to select from");
        return state;
    }

    let system = prompts::selection_system(research_interests);
    let user = build_selection_input(&state.papers);

    match llm.complete(&system, &user).await {
        Ok(reply) => {
            state.interesting_ids = parse_selection(&reply, &state.papers);
            info!(selected = state.interesting_ids.len(), "selection complete");
        }
        Err(e) => {
            warn!(error = %e, "selection failed, continuing with no papers");
            state
                .failures
                .push(StageFailure::new(Stage::Selecting, e.to_string()));
        }
    }

    state
}

/// The user message listing every paper.
pub fn build_selection_input(papers: &[Paper]) -> String {
    let listing = papers
        .iter()
        .map(|p| {
            let preview: String = p.abstract_text.chars().take(ABSTRACT_PREVIEW_CHARS).collect();
            format!("ID: {}\nTitle: {}\nAbstract: {preview}...", p.arxiv_id, p.title)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Here are today's papers:\n\n{listing}")
}

/// Extract known paper ids from a newline-delimited reply, first occurrence wins.
pub fn parse_selection(reply: &str, papers: &[Paper]) -> Vec<String> {
    let known: HashSet<&str> = papers.iter().map(|p| p.arxiv_id.as_str()).collect();
    let mut seen = HashSet::new();

    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(normalize_id)
        .filter(|id| known.contains(id) && seen.insert(*id))
        .map(String::from)
        .collect()
}

fn normalize_id(line: &str) -> &str {
    let line = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .unwrap_or(line)
        .trim_start();
    line.strip_prefix("arXiv:")
        .or_else(|| line.strip_prefix("arxiv:"))
        .unwrap_or(line)
        .trim()
}
