//! The record threaded through the three pipeline stages.

use serde::Serialize;

use preprint_shared::{Paper, PaperAnalysis};

/// Position in the pipeline. Stages run strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Selecting,
    Analyzing,
    Synthesizing,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Selecting => "selecting",
            Self::Analyzing => "analyzing",
            Self::Synthesizing => "synthesizing",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// A degraded but non-fatal failure inside a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    /// Title of the affected paper, for per-paper failures.
    pub subject: Option<String>,
    pub reason: String,
}

impl StageFailure {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            subject: None,
            reason: reason.into(),
        }
    }

    pub fn for_paper(stage: Stage, title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage,
            subject: Some(title.into()),
            reason: reason.into(),
        }
    }
}

/// State for one run. Each stage takes it by value, fills in its own fields
/// and hands it back:
///
/// | stage        | writes                       |
/// |--------------|------------------------------|
/// | Selecting    | `papers`, `interesting_ids`  |
/// | Analyzing    | `analyses`                   |
/// | Synthesizing | `final_report`               |
///
/// Every stage may append to `failures`.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub papers: Vec<Paper>,
    pub interesting_ids: Vec<String>,
    pub analyses: Vec<PaperAnalysis>,
    pub final_report: String,
    pub failures: Vec<StageFailure>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Papers whose id was selected, in fetch order.
    pub fn interesting_papers(&self) -> Vec<Paper> {
        self.papers
            .iter()
            .filter(|p| self.interesting_ids.contains(&p.arxiv_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::paper;

    #[test]
    fn interesting_papers_keep_fetch_order() {
        let state = PipelineState {
            papers: vec![paper("a", "A"), paper("b", "B"), paper("c", "C")],
            interesting_ids: vec!["c".into(), "a".into()],
            ..PipelineState::default()
        };
        let ids: Vec<String> = state
            .interesting_papers()
            .into_iter()
            .map(|p| p.arxiv_id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Synthesizing.to_string(), "synthesizing");
    }
}
