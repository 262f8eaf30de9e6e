//! RSS parsing for the arXiv announcement feed.
//!
//! Each `<item>` becomes a [`Paper`]:
//! - id: last path segment of `<link>`
//! - title: whitespace-collapsed, with a leading `<id>:` removed
//! - authors: `<dc:creator>`, comma-separated
//! - abstract: `<description>`, whitespace-collapsed

use std::collections::HashSet;

use preprint_shared::{Paper, PreprintError, Result};
use tracing::debug;

/// Parse a raw RSS/Atom document into papers, in feed order.
///
/// Items without a title or link are skipped, as are later items repeating
/// an identifier already seen in this batch.
pub(crate) fn parse_feed(bytes: &[u8]) -> Result<Vec<Paper>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| PreprintError::parse(format!("failed to parse feed: {e}")))?;

    let mut seen = HashSet::new();
    let mut papers = Vec::with_capacity(feed.entries.len());

    for entry in feed.entries {
        let Some(link) = entry.links.first().map(|l| l.href.trim().to_string()) else {
            debug!(id = %entry.id, "feed item without link, skipping");
            continue;
        };
        let Some(raw_title) = entry.title.map(|t| t.content) else {
            debug!(%link, "feed item without title, skipping");
            continue;
        };

        let arxiv_id = parse_arxiv_id(&link);
        if arxiv_id.is_empty() || !seen.insert(arxiv_id.clone()) {
            continue;
        }

        let mut title = clean_text(&raw_title);
        if let Some(rest) = title.strip_prefix(&format!("{arxiv_id}:")) {
            title = rest.trim().to_string();
        }

        let authors = entry
            .authors
            .iter()
            .flat_map(|person| person.name.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        let abstract_text = entry
            .summary
            .map(|t| clean_text(&t.content))
            .unwrap_or_default();

        papers.push(Paper {
            arxiv_id,
            title,
            authors,
            abstract_text,
            link,
        });
    }

    Ok(papers)
}

/// Extract the identifier from a link like `https://arxiv.org/abs/2401.12345`.
pub fn parse_arxiv_id(link: &str) -> String {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Collapse all runs of whitespace into single spaces and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>cs.CL updates on arXiv.org</title>
    <link>http://rss.arxiv.org/rss/cs.CL</link>
    <description>cs.CL updates</description>
    <item>
      <title>Thinking   Slowly,
        Answering Quickly</title>
      <link>https://arxiv.org/abs/2401.00001</link>
      <description>We propose   a method
        for deliberate reasoning.</description>
      <dc:creator>Ada Lovelace, Alan Turing</dc:creator>
    </item>
    <item>
      <title>2401.00002: Tokenizers Revisited</title>
      <link>https://arxiv.org/abs/2401.00002/</link>
      <description>Another abstract.</description>
      <dc:creator>Grace Hopper</dc:creator>
    </item>
    <item>
      <title>Duplicate of the first</title>
      <link>https://arxiv.org/abs/2401.00001</link>
      <description>Should be dropped.</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_arxiv_id() {
        assert_eq!(parse_arxiv_id("https://arxiv.org/abs/2401.12345"), "2401.12345");
        assert_eq!(parse_arxiv_id("https://arxiv.org/abs/2401.12345/"), "2401.12345");
        assert_eq!(parse_arxiv_id("http://arxiv.org/abs/cs/0123456"), "0123456");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello   world  "), "hello world");
        assert_eq!(clean_text("line1\n\nline2"), "line1 line2");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn parses_items_in_feed_order() {
        let papers = parse_feed(SAMPLE_RSS.as_bytes()).expect("parse");
        let ids: Vec<&str> = papers.iter().map(|p| p.arxiv_id.as_str()).collect();
        assert_eq!(ids, vec!["2401.00001", "2401.00002"]);
    }

    #[test]
    fn normalizes_title_and_abstract() {
        let papers = parse_feed(SAMPLE_RSS.as_bytes()).expect("parse");
        assert_eq!(papers[0].title, "Thinking Slowly, Answering Quickly");
        assert_eq!(papers[0].abstract_text, "We propose a method for deliberate reasoning.");
        assert_eq!(papers[0].link, "https://arxiv.org/abs/2401.00001");
    }

    #[test]
    fn strips_identifier_prefix_from_title() {
        let papers = parse_feed(SAMPLE_RSS.as_bytes()).expect("parse");
        assert_eq!(papers[1].title, "Tokenizers Revisited");
    }

    #[test]
    fn splits_comma_separated_creators() {
        let papers = parse_feed(SAMPLE_RSS.as_bytes()).expect("parse");
        assert_eq!(papers[0].authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(papers[1].authors, vec!["Grace Hopper"]);
    }

    #[test]
    fn rejects_non_feed_input() {
        let err = parse_feed(b"<html><body>maintenance</body></html>").unwrap_err();
        assert!(matches!(err, PreprintError::Parse { .. }));
    }
}
