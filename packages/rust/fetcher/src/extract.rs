//! Plain-text extraction from arXiv's LaTeXML HTML rendering.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never counts as paper content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Content roots, tried in order.
static ROOT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "main", "body"]
        .iter()
        .map(|s| Selector::parse(s).expect("valid root selector"))
        .collect()
});

/// Abstract and top-level sections of a LaTeXML document.
static SECTION_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.ltx_abstract, section.ltx_section").expect("valid section selector")
});

/// Any LaTeXML block, used when the document has no `ltx_section`s.
static LTX_BLOCK_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section[class*="ltx_"], div[class*="ltx_"]"#).expect("valid block selector")
});

/// Extract readable text from a paper's HTML page.
///
/// Section texts are joined with blank lines. Returns `None` when the
/// document has no content root or no text at all.
pub fn extract_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    let root = ROOT_SELECTORS
        .iter()
        .find_map(|sel| doc.select(sel).next())?;

    let mut sections: Vec<String> = root
        .select(&SECTION_SEL)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect();

    if sections.is_empty() {
        sections = root
            .select(&LTX_BLOCK_SEL)
            .filter(|el| !has_ltx_block_ancestor(el, &root))
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect();
    }

    if !sections.is_empty() {
        return Some(sections.join("\n\n"));
    }

    let text = text_of(root);
    (!text.is_empty()).then_some(text)
}

/// Collect the text under `el`, skipping chrome elements, with whitespace collapsed.
fn text_of(el: ElementRef<'_>) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in el.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let skipped = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_TAGS.contains(&e.name()))
        });
        if skipped {
            continue;
        }

        pieces.extend(text.split_whitespace());
    }

    pieces.join(" ")
}

/// True if some ancestor of `el` below `root` is itself a LaTeXML block.
fn has_ltx_block_ancestor(el: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|a| a.id() != root.id())
        .filter_map(|a| a.value().as_element())
        .any(|e| {
            matches!(e.name(), "section" | "div") && e.classes().any(|c| c.starts_with("ltx_"))
        })
}
