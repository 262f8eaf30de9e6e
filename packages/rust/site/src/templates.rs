//! HTML page templates.
//!
//! Every page shares [`page_shell`]: inline stylesheet, emoji favicon, a
//! header with the site title and a GitHub link, and a footer. Nothing here
//! depends on the clock, so identical reports always render identical bytes.

use std::fmt::Write as _;

use preprint_shared::SiteConfig;

use crate::render::{escape_html, truncate_chars};
use crate::report::ParsedReport;

/// Neighbor titles in article navigation are cut to this many characters.
pub const NAV_TITLE_MAX_CHARS: usize = 50;

const FAVICON: &str = concat!(
    r#"<link rel="icon" href="data:image/svg+xml,"#,
    "%3Csvg%20xmlns=%22http://www.w3.org/2000/svg%22%20viewBox=%220%200%20100%20100%22%3E",
    "%3Ctext%20y=%22.9em%22%20font-size=%2290%22%3E",
    "%F0%9F%93%84",
    "%3C/text%3E%3C/svg%3E",
    r#"">"#,
);

const CSS: &str = r#"
*,
*::before,
*::after {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

:root {
    --text: #353740;
    --text-secondary: #6e6e80;
    --bg: #fafaf9;
    --bg-secondary: #f3f3f0;
    --border: #e5e5e6;
    --accent: #10a37f;
    --link: #10a37f;
}

@media (prefers-color-scheme: dark) {
    :root {
        --text: #d1d5db;
        --text-secondary: #9ca3af;
        --bg: #111111;
        --bg-secondary: #1a1a1a;
        --border: #2a2a2a;
        --accent: #34d399;
        --link: #34d399;
    }
}

body {
    font-family: 'Söhne', -apple-system, BlinkMacSystemFont, 'Helvetica Neue', sans-serif;
    color: var(--text);
    background: var(--bg);
    line-height: 1.8;
    font-size: 17px;
    -webkit-font-smoothing: antialiased;
    min-height: 100vh;
    display: flex;
    flex-direction: column;
}

main {
    flex: 1;
}

.site-header {
    border-bottom: 1px solid var(--border);
    padding: 20px 0;
    margin-bottom: 48px;
}

.site-header .container {
    display: flex;
    align-items: center;
    justify-content: space-between;
}

.site-header a {
    text-decoration: none;
    color: var(--text);
}

.site-title {
    font-size: 18px;
    font-weight: 600;
    letter-spacing: -0.01em;
}

.site-nav a {
    color: var(--text-secondary);
    text-decoration: none;
    font-size: 15px;
    transition: color 0.15s;
}

.site-nav a:hover {
    color: var(--accent);
}

.container {
    max-width: 680px;
    margin: 0 auto;
    padding: 0 24px;
}

.index-tagline {
    color: var(--text-secondary);
    font-size: 16px;
    padding-bottom: 32px;
}

.report-list {
    list-style: none;
    padding: 0;
}

.report-item {
    border-top: 1px solid var(--border);
    padding: 28px 0;
    transition: background 0.15s;
}

.report-item:last-child {
    border-bottom: 1px solid var(--border);
}

.report-item:hover {
    background: var(--bg-secondary);
    margin: 0 -24px;
    padding-left: 24px;
    padding-right: 24px;
}

.report-date {
    font-size: 14px;
    color: var(--text-secondary);
    text-transform: uppercase;
    letter-spacing: 0.05em;
    margin-bottom: 6px;
}

.report-badge {
    display: inline-block;
    font-size: 12px;
    color: var(--accent);
    background: color-mix(in srgb, var(--accent) 10%, transparent);
    padding: 2px 8px;
    border-radius: 10px;
    margin-left: 10px;
    letter-spacing: 0;
    text-transform: none;
    vertical-align: middle;
}

.report-item h2 {
    font-family: Georgia, 'Times New Roman', serif;
    font-size: 26px;
    font-weight: 400;
    line-height: 1.3;
    letter-spacing: -0.01em;
    margin-bottom: 8px;
}

.report-item h2 a {
    color: var(--text);
    text-decoration: none;
    transition: color 0.15s;
}

.report-item h2 a:hover {
    color: var(--accent);
}

.report-excerpt {
    color: var(--text-secondary);
    font-size: 16px;
    line-height: 1.6;
}

.report-item-empty {
    opacity: 0.55;
}

.report-item-empty:hover {
    background: transparent;
    margin: 0;
    padding-left: 0;
    padding-right: 0;
}

.report-item-empty h2 {
    font-size: 18px;
    font-family: inherit;
}

.article-header {
    padding: 80px 0 40px;
    text-align: center;
}

.article-date {
    font-size: 14px;
    color: var(--text-secondary);
    text-transform: uppercase;
    letter-spacing: 0.05em;
    margin-bottom: 16px;
}

.article-header h1 {
    font-family: Georgia, 'Times New Roman', serif;
    font-size: 40px;
    font-weight: 400;
    line-height: 1.2;
    letter-spacing: -0.02em;
}

.article-body {
    padding-bottom: 80px;
}

.article-body h2,
.article-body h3 {
    font-family: Georgia, 'Times New Roman', serif;
    font-weight: 400;
    letter-spacing: -0.01em;
    margin-top: 48px;
    margin-bottom: 16px;
}

.article-body h2 {
    font-size: 30px;
    line-height: 1.25;
}

.article-body h3 {
    font-size: 24px;
    line-height: 1.3;
}

.article-body p {
    margin-bottom: 24px;
}

.article-body a {
    color: var(--link);
    text-decoration: underline;
    text-underline-offset: 2px;
    text-decoration-thickness: 1px;
    transition: text-decoration-thickness 0.15s;
}

.article-body a:hover {
    text-decoration-thickness: 2px;
}

.article-body strong {
    font-weight: 600;
}

.article-body em {
    font-style: italic;
}

.article-body blockquote {
    border-left: 3px solid var(--border);
    padding-left: 20px;
    margin: 32px 0;
    color: var(--text-secondary);
    font-style: italic;
}

.article-body code {
    font-family: 'Söhne Mono', 'Menlo', monospace;
    font-size: 0.9em;
    background: var(--bg-secondary);
    padding: 2px 6px;
    border-radius: 4px;
}

.article-body table {
    border-collapse: collapse;
    margin-bottom: 24px;
}

.article-body th,
.article-body td {
    border: 1px solid var(--border);
    padding: 4px 10px;
}

.article-body ul,
.article-body ol {
    margin-bottom: 24px;
    padding-left: 24px;
}

.article-body li {
    margin-bottom: 8px;
}

.back-link {
    display: inline-block;
    color: var(--text-secondary);
    text-decoration: none;
    font-size: 15px;
    padding: 40px 0 0;
    transition: color 0.15s;
}

.back-link:hover {
    color: var(--accent);
}

.article-nav {
    display: flex;
    justify-content: space-between;
    padding: 32px 0 0;
    gap: 24px;
}

.article-nav a {
    color: var(--text-secondary);
    text-decoration: none;
    font-size: 15px;
    max-width: 45%;
    transition: color 0.15s;
}

.article-nav a:hover {
    color: var(--accent);
}

.nav-newer {
    margin-left: auto;
    text-align: right;
}

footer {
    border-top: 1px solid var(--border);
    padding: 32px 0;
    margin-top: 48px;
    text-align: center;
    font-size: 14px;
    color: var(--text-secondary);
}

footer a {
    color: var(--text-secondary);
    text-decoration: underline;
    text-underline-offset: 2px;
    text-decoration-thickness: 1px;
    transition: color 0.15s;
}

footer a:hover {
    color: var(--accent);
}
"#;

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

/// Wrap `body` in the full HTML document. `title` is escaped here; `body` is
/// inserted as-is. A non-empty `description` adds Open Graph tags.
pub fn page_shell(site: &SiteConfig, title: &str, body: &str, description: &str) -> String {
    let title = escape_html(title);
    let github = escape_html(&site.github_url);
    let site_title = escape_html(&site.title);

    let og_tags = if description.is_empty() {
        String::new()
    } else {
        format!(
            "\n    <meta property=\"og:title\" content=\"{title}\">\
             \n    <meta property=\"og:description\" content=\"{}\">\
             \n    <meta property=\"og:type\" content=\"article\">",
            escape_html(description)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>{og_tags}
    {FAVICON}
    <style>{CSS}</style>
</head>
<body>
    <header class="site-header">
        <div class="container">
            <a href="index.html" class="site-title">{site_title}</a>
            <nav class="site-nav">
                <a href="{github}">GitHub</a>
            </nav>
        </div>
    </header>
    {body}
    <footer>
        <div class="container">Built with <a href="{github}">Preprint Alert Agent</a></div>
    </footer>
</body>
</html>
"#
    )
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Article page for `report`. `older` and `newer` are its neighbors in the
/// archive, if any.
pub fn article_page(
    site: &SiteConfig,
    report: &ParsedReport,
    older: Option<&ParsedReport>,
    newer: Option<&ParsedReport>,
) -> String {
    let mut nav = String::from(r#"<div class="article-nav">"#);
    if let Some(o) = older {
        let _ = write!(
            nav,
            r#"<a class="nav-older" href="{}.html">&larr; {}</a>"#,
            escape_html(&o.slug),
            escape_html(&truncate_chars(&o.title, NAV_TITLE_MAX_CHARS))
        );
    }
    if let Some(n) = newer {
        let _ = write!(
            nav,
            r#"<a class="nav-newer" href="{}.html">{} &rarr;</a>"#,
            escape_html(&n.slug),
            escape_html(&truncate_chars(&n.title, NAV_TITLE_MAX_CHARS))
        );
    }
    nav.push_str("</div>");

    let article = format!(
        r#"
    <main class="container">
        <div class="article-header">
            <div class="article-date">{date}</div>
            <h1>{title}</h1>
        </div>
        <div class="article-body">
            {body}
        </div>
        <a href="index.html" class="back-link">&larr; All reports</a>
        {nav}
    </main>"#,
        date = escape_html(&report.date_display),
        title = escape_html(&report.title),
        body = report.body_html,
    );

    page_shell(site, &report.title, &article, &report.excerpt)
}

/// Index page listing `reports` in the given order.
pub fn index_page(site: &SiteConfig, reports: &[ParsedReport]) -> String {
    let mut items = String::new();

    for report in reports {
        let date = escape_html(&report.date_display);
        let slug = escape_html(&report.slug);

        if report.is_empty {
            let _ = write!(
                items,
                r#"
        <li class="report-item report-item-empty">
            <div class="report-date">{date}</div>
            <h2><a href="{slug}.html">No interesting papers today</a></h2>
        </li>"#
            );
            continue;
        }

        let badge = match report.paper_count {
            0 => String::new(),
            1 => r#"<span class="report-badge">1 paper</span>"#.to_string(),
            n => format!(r#"<span class="report-badge">{n} papers</span>"#),
        };

        let _ = write!(
            items,
            r#"
        <li class="report-item">
            <div class="report-date">{date}{badge}</div>
            <h2><a href="{slug}.html">{title}</a></h2>
            <p class="report-excerpt">{excerpt}</p>
        </li>"#,
            title = escape_html(&report.title),
            excerpt = escape_html(&report.excerpt),
        );
    }

    let body = format!(
        r#"
    <main class="container">
        <p class="index-tagline">{tagline}</p>
        <ul class="report-list">
            {items}
        </ul>
    </main>"#,
        tagline = escape_html(&site.tagline),
    );

    page_shell(site, &site.title, &body, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_report;

    #[test]
    fn shell_escapes_title_and_adds_og_tags() {
        let page = page_shell(&SiteConfig::default(), "A <b> & B", "<p>x</p>", "desc \"q\"");
        assert!(page.contains("<title>A &lt;b&gt; &amp; B</title>"));
        assert!(page.contains(r#"<meta property="og:description" content="desc &quot;q&quot;">"#));
        assert!(page.contains("<p>x</p>"));
    }

    #[test]
    fn shell_without_description_has_no_og_tags() {
        let page = page_shell(&SiteConfig::default(), "Index", "", "");
        assert!(!page.contains("og:title"));
    }

    #[test]
    fn article_strips_heading_only_when_title_came_from_it() {
        let site = SiteConfig::default();

        let heading = parse_report("report-2026-01-15.md", "# Big Day\n\nBody.");
        let page = article_page(&site, &heading, None, None);
        assert_eq!(page.matches("Big Day</h1>").count(), 1);

        let bold = parse_report("report-2026-01-15.md", "**Bold**\n\nBody.\n\nMore.");
        let page = article_page(&site, &bold, None, None);
        assert!(page.contains("<h1>Bold</h1>"));
        assert!(page.contains("<p><strong>Bold</strong></p>"));
        assert!(page.contains("<p>More.</p>"));
    }

    #[test]
    fn later_heading_beats_earlier_bold_line() {
        let site = SiteConfig::default();
        let report = parse_report("report-2026-01-15.md", "**Bold**\n\nBody.\n\n## Section");
        assert_eq!(report.title, "Section");
        assert!(report.title_from_heading);

        let page = article_page(&site, &report, None, None);
        assert!(page.contains("<h1>Section</h1>"));
        assert!(!page.contains("<h2>Section</h2>"));
        assert!(page.contains("<strong>Bold</strong>"));
    }

    #[test]
    fn nav_titles_are_truncated() {
        let site = SiteConfig::default();
        let current = parse_report("report-2026-01-15.md", "# Current");
        let older = parse_report("report-2026-01-14.md", &format!("# {}", "x".repeat(80)));

        let page = article_page(&site, &current, Some(&older), None);
        assert!(page.contains(&format!(
            r#"<a class="nav-older" href="report-2026-01-14.html">&larr; {}</a>"#,
            "x".repeat(50)
        )));
        assert!(!page.contains(r#"class="nav-newer""#));
    }

    #[test]
    fn index_badges_and_empty_items() {
        let site = SiteConfig::default();
        let reports = vec![
            parse_report(
                "report-2026-01-16.md",
                "# Two\n\n[a](https://arxiv.org/abs/1) [b](https://arxiv.org/abs/2)",
            ),
            parse_report("report-2026-01-15.md", "# One\n\n[a](https://arxiv.org/abs/1)"),
            parse_report("report-2026-01-14.md", "# No interesting papers found today"),
        ];

        let page = index_page(&site, &reports);
        assert!(page.contains(">2 papers</span>"));
        assert!(page.contains(">1 paper</span>"));
        assert!(page.contains(r#"<li class="report-item report-item-empty">"#));
        assert!(page.contains(
            r#"<h2><a href="report-2026-01-14.html">No interesting papers today</a></h2>"#
        ));
        assert_eq!(page.matches(r#"class="report-badge""#).count(), 2);
        assert_eq!(page.matches(r#"class="report-excerpt""#).count(), 2);
        assert!(page.contains(&site.tagline));
    }

    #[test]
    fn slugs_are_escaped_in_links() {
        let site = SiteConfig::default();
        let odd = parse_report(r#"report-2026-01-14 "x".md"#, "# Odd");
        let current = parse_report("report-2026-01-15.md", "# Current");

        let page = article_page(&site, &current, Some(&odd), None);
        assert!(page.contains(r#"href="report-2026-01-14 &quot;x&quot;.html""#));

        let index = index_page(&site, &[odd]);
        assert!(index.contains(r#"<a href="report-2026-01-14 &quot;x&quot;.html">Odd</a>"#));
    }
}
