//! Parsing a stored report into the fields the pages display.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::render::{markdown_to_html, markdown_to_html_without_heading, truncate_chars};

/// Maximum excerpt length before `...` is appended.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Shown when a file name carries no date.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Opening phrases of model chatter that never make a useful excerpt.
const PREAMBLE_PHRASES: &[&str] = &["here's my", "here is my", "here\u{2019}s my"];

/// Marks a paper link in report markdown.
const PAPER_LINK_MARKER: &str = "arxiv.org/abs/";

/// Title fragment of a "nothing today" report.
const EMPTY_REPORT_MARKER: &str = "no interesting papers";

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"));

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+\s+(.+)$").expect("valid heading regex"));

static BOLD_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*(.+?)\*\*$").expect("valid bold regex"));

/// Display fields of one report, recomputed on every build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    /// `YYYY-MM-DD` from the file name, or [`UNKNOWN_DATE`].
    pub date_str: String,
    /// e.g. `January 15, 2026`; the raw `date_str` when it is not a real date.
    pub date_display: String,
    pub title: String,
    /// Whether `title` came from a markdown heading (and so appears in `html`).
    pub title_from_heading: bool,
    pub excerpt: String,
    pub html: String,
    /// `html` without the title heading, for the article body.
    pub body_html: String,
    pub slug: String,
    pub paper_count: usize,
    pub is_empty: bool,
}

/// Parse report markdown. `file_name` supplies the date and slug.
pub fn parse_report(file_name: &str, text: &str) -> ParsedReport {
    let slug = file_name
        .strip_suffix(".md")
        .unwrap_or(file_name)
        .to_string();

    let date_str = DATE_RE
        .find(file_name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    let date_display = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| date_str.clone());

    let (title, heading_offset) = extract_title(text, &date_str);
    let html = markdown_to_html(text);
    let body_html = match heading_offset {
        Some(offset) => markdown_to_html_without_heading(text, offset),
        None => html.trim().to_string(),
    };
    let excerpt = extract_excerpt(text);
    let paper_count = text.matches(PAPER_LINK_MARKER).count();
    let is_empty = title.to_lowercase().contains(EMPTY_REPORT_MARKER);

    ParsedReport {
        date_str,
        date_display,
        title,
        title_from_heading: heading_offset.is_some(),
        excerpt,
        html,
        body_html,
        slug,
        paper_count,
        is_empty,
    }
}

/// Title plus the byte offset of its heading line, when it came from one.
fn extract_title(text: &str, date_str: &str) -> (String, Option<usize>) {
    if let Some(c) = HEADING_RE.captures(text) {
        let offset = c.get(0).map_or(0, |m| m.start());
        return (c[1].trim().to_string(), Some(offset));
    }
    if let Some(c) = BOLD_LINE_RE.captures(text) {
        return (c[1].trim().to_string(), None);
    }
    (format!("Report {date_str}"), None)
}

fn extract_excerpt(text: &str) -> String {
    let Some(line) = text.lines().map(str::trim).find(|l| is_excerpt_candidate(l)) else {
        return String::new();
    };

    if line.chars().count() > EXCERPT_MAX_CHARS {
        format!("{}...", truncate_chars(line, EXCERPT_MAX_CHARS))
    } else {
        line.to_string()
    }
}

fn is_excerpt_candidate(line: &str) -> bool {
    if line.is_empty() || line.starts_with('#') || line.starts_with("**") {
        return false;
    }
    let lower = line.to_lowercase();
    !PREAMBLE_PHRASES.iter().any(|p| lower.starts_with(p))
}
