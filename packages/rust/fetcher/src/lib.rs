//! Full-text retrieval for announced papers.
//!
//! This crate provides:
//! - [`PaperFetcher`]: downloads a paper's HTML rendering and extracts its text
//! - [`extract_text`]: LaTeXML-aware text extraction
//! - [`extract_methodology_section`]: locates the methods part of the text

mod extract;
mod methodology;

use std::time::Duration;

use preprint_shared::{FetcherConfig, Paper, PreprintError, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

pub use extract::extract_text;
pub use methodology::{FALLBACK_CHARS, SECTION_WINDOW_CHARS, extract_methodology_section};

/// User-Agent string for paper requests.
const USER_AGENT: &str = concat!("PreprintAlert/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// PaperFetcher
// ---------------------------------------------------------------------------

/// Downloads HTML renderings of papers.
#[derive(Debug, Clone)]
pub struct PaperFetcher {
    client: Client,
    /// Overrides the host part of [`Paper::html_url`] when set.
    html_base: Option<String>,
}

impl PaperFetcher {
    /// Build a fetcher from config.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PreprintError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            html_base: None,
        })
    }

    /// Fetch HTML pages from `base/<id>` instead of arXiv.
    pub fn with_html_base(mut self, base: impl Into<String>) -> Self {
        self.html_base = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    fn html_url(&self, paper: &Paper) -> String {
        match &self.html_base {
            Some(base) => format!("{base}/{}", paper.arxiv_id),
            None => paper.html_url(),
        }
    }

    /// Fetch a paper's HTML rendering and return its plain text.
    ///
    /// `Ok(None)` means the paper has no HTML version (404) or the page
    /// contained no text.
    #[instrument(skip_all, fields(arxiv_id = %paper.arxiv_id))]
    pub async fn fetch_paper_text(&self, paper: &Paper) -> Result<Option<String>> {
        let url = self.html_url(paper);
        debug!(%url, "fetching paper html");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PreprintError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "no html rendering available");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PreprintError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PreprintError::Network(format!("{url}: body read failed: {e}")))?;

        let text = extract_text(&body);
        if text.is_none() {
            warn!(%url, "html page had no extractable text");
        }

        Ok(text)
    }
}
