//! Daily paper feed retrieval.
//!
//! Fetches the configured RSS feed (arXiv `cs.CL` by default) and normalizes
//! each announced item into a [`Paper`]. Callers that must not fail on an
//! unreachable feed treat an error here as "no papers today".

mod parser;

use std::time::Duration;

use preprint_shared::{FeedConfig, Paper, PreprintError, Result};
use reqwest::Client;
use tracing::{info, instrument};

pub use parser::{clean_text, parse_arxiv_id};

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("PreprintAlert/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// ArxivFeed
// ---------------------------------------------------------------------------

/// Client for the daily announcement feed.
#[derive(Debug, Clone)]
pub struct ArxivFeed {
    client: Client,
    url: String,
}

impl ArxivFeed {
    /// Build a feed client from config.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PreprintError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// The feed URL this client reads.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse today's papers.
    #[instrument(skip_all, fields(url = %self.url))]
    pub async fn fetch_papers(&self) -> Result<Vec<Paper>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PreprintError::Network(format!("{}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreprintError::Network(format!("{}: HTTP {status}", self.url)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PreprintError::Network(format!("{}: failed to read body: {e}", self.url)))?;

        let papers = parser::parse_feed(&body)?;
        info!(count = papers.len(), "feed parsed");

        Ok(papers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ITEM_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>cs.CL updates on arXiv.org</title>
    <link>http://rss.arxiv.org/rss/cs.CL</link>
    <description>cs.CL updates</description>
    <item>
      <title>Chains of Thought at Scale</title>
      <link>https://arxiv.org/abs/2401.09999</link>
      <description>An abstract.</description>
      <dc:creator>Author A</dc:creator>
    </item>
  </channel>
</rss>"#;

    fn config_for(url: String) -> FeedConfig {
        FeedConfig {
            url,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/rss/cs.CL"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(ONE_ITEM_RSS))
            .mount(&server)
            .await;

        let feed = ArxivFeed::new(&config_for(format!("{}/rss/cs.CL", server.uri()))).unwrap();
        let papers = feed.fetch_papers().await.unwrap();

        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].arxiv_id, "2401.09999");
        assert_eq!(papers[0].title, "Chains of Thought at Scale");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let feed = ArxivFeed::new(&config_for(format!("{}/rss/cs.CL", server.uri()))).unwrap();
        let err = feed.fetch_papers().await.unwrap_err();
        assert!(matches!(err, PreprintError::Network(_)));
    }
}
