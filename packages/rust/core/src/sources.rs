//! Collaborator seams for the pipeline.
//!
//! The stages only see these traits, so tests can drive them with in-memory
//! doubles while production wires in the feed and fetcher clients.

use async_trait::async_trait;

use preprint_feed::ArxivFeed;
use preprint_fetcher::PaperFetcher;
use preprint_shared::{Paper, Result};

/// Supplies the day's announced papers.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn fetch_papers(&self) -> Result<Vec<Paper>>;
}

/// Supplies a paper's full text. `Ok(None)` means no full text exists.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_content(&self, paper: &Paper) -> Result<Option<String>>;
}

#[async_trait]
impl PaperSource for ArxivFeed {
    async fn fetch_papers(&self) -> Result<Vec<Paper>> {
        ArxivFeed::fetch_papers(self).await
    }
}

#[async_trait]
impl ContentSource for PaperFetcher {
    async fn fetch_content(&self, paper: &Paper) -> Result<Option<String>> {
        self.fetch_paper_text(paper).await
    }
}
