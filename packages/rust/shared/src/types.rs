//! Core domain types shared by the pipeline crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base URL for the LaTeXML-rendered HTML version of a paper.
const ARXIV_HTML_BASE: &str = "https://arxiv.org/html";

/// Base URL for the PDF version of a paper.
const ARXIV_PDF_BASE: &str = "https://arxiv.org/pdf";

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Paper
// ---------------------------------------------------------------------------

/// A paper announced in the feed, normalized by the feed parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Source-assigned identifier (e.g. `2401.12345`), unique within a batch.
    pub arxiv_id: String,
    /// Whitespace-collapsed title.
    pub title: String,
    /// Author names in feed order.
    pub authors: Vec<String>,
    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Canonical abstract page URL.
    pub link: String,
}

impl Paper {
    /// URL of the HTML rendering of this paper.
    pub fn html_url(&self) -> String {
        format!("{ARXIV_HTML_BASE}/{}", self.arxiv_id)
    }

    /// URL of the PDF of this paper.
    pub fn pdf_url(&self) -> String {
        format!("{ARXIV_PDF_BASE}/{}", self.arxiv_id)
    }
}

// ---------------------------------------------------------------------------
// PaperAnalysis
// ---------------------------------------------------------------------------

/// The analysis stage's output for one paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperAnalysis {
    /// The paper this analysis was produced from.
    pub paper: Paper,
    /// Leading prefix of `methodology_insights`.
    pub summary: String,
    /// Full model output for the paper.
    pub methodology_insights: String,
    /// Reserved. Always empty for now.
    #[serde(default)]
    pub why_interesting: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paper() -> Paper {
        Paper {
            arxiv_id: "2401.12345".into(),
            title: "Reasoning in the Small".into(),
            authors: vec!["Ada Lovelace".into(), "Alan Turing".into()],
            abstract_text: "We study reasoning.".into(),
            link: "https://arxiv.org/abs/2401.12345".into(),
        }
    }

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn derived_urls_use_identifier() {
        let paper = sample_paper();
        assert_eq!(paper.html_url(), "https://arxiv.org/html/2401.12345");
        assert_eq!(paper.pdf_url(), "https://arxiv.org/pdf/2401.12345");
    }

    #[test]
    fn paper_serializes_abstract_field() {
        let json = serde_json::to_string(&sample_paper()).expect("serialize");
        assert!(json.contains(r#""abstract":"We study reasoning.""#));

        let parsed: Paper = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, sample_paper());
    }
}
