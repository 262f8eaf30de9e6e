//! Heuristic location of a paper's methodology section.

use std::sync::LazyLock;

use regex::Regex;

/// Section names tried in priority order.
const METHOD_MARKERS: &[&str] = &[
    "methodology",
    "methods",
    "method",
    "approach",
    "our approach",
    "proposed method",
    "model",
    "architecture",
];

/// Characters kept from the start of a located section.
pub const SECTION_WINDOW_CHARS: usize = 15_000;

/// Characters kept when no section is found.
pub const FALLBACK_CHARS: usize = 20_000;

/// One pattern per marker: the marker at the start of a line, optionally
/// preceded by a section number such as `3`, `3.1` or `3.`.
static MARKER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    METHOD_MARKERS
        .iter()
        .map(|marker| {
            Regex::new(&format!(
                r"(?im)^[ \t]*(?:\d+(?:\.\d+)*\.?[ \t]+)?{}\b",
                regex::escape(marker)
            ))
            .expect("valid marker regex")
        })
        .collect()
});

/// Return the text from the first methodology-like heading onward.
///
/// A heading only counts at the start of a line, so "we compare our method
/// to…" mid-sentence is ignored. With no heading, the head of the content is
/// returned instead.
pub fn extract_methodology_section(content: &str) -> String {
    for re in MARKER_RES.iter() {
        if let Some(m) = re.find(content) {
            return take_chars(&content[m.start()..], SECTION_WINDOW_CHARS);
        }
    }

    take_chars(content, FALLBACK_CHARS)
}

fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
