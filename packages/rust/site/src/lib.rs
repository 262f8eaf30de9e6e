//! Static archive generation from stored reports.
//!
//! This crate provides:
//! - [`parse_report`]: pure extraction of title, excerpt, date and counts
//! - [`templates`]: page shell, article and index pages
//! - [`build_site`]: renders `<slug>.html` per report plus `index.html`

mod render;
pub mod report;
pub mod templates;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use preprint_reports::ReportStore;
use preprint_shared::{PreprintError, Result, SiteConfig};
use tracing::{debug, info, instrument, warn};

pub use render::{escape_html, markdown_to_html, markdown_to_html_without_heading};
pub use report::{ParsedReport, parse_report};

/// Outcome of a site build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    /// Article pages written (the index is not counted).
    pub pages: usize,
    pub site_dir: PathBuf,
}

/// Render every report in `reports_dir` into `site_dir`.
///
/// Reports are ordered newest first; each article links to its older and
/// newer neighbor. With no reports nothing is written.
#[instrument(skip_all, fields(reports_dir = %reports_dir.display(), site_dir = %site_dir.display()))]
pub fn build_site(reports_dir: &Path, site_dir: &Path, site: &SiteConfig) -> Result<SiteSummary> {
    let store = ReportStore::new(reports_dir);
    let entries = store.list()?;

    if entries.is_empty() {
        warn!("no reports found to build site from");
        return Ok(SiteSummary {
            pages: 0,
            site_dir: site_dir.to_path_buf(),
        });
    }

    let mut reports = Vec::with_capacity(entries.len());
    for entry in &entries {
        let text = store.read(entry)?;
        reports.push(parse_report(&entry.file_name(), &text));
    }

    std::fs::create_dir_all(site_dir).map_err(|e| PreprintError::io(site_dir, e))?;
    remove_stale_pages(site_dir, &reports)?;

    for (i, report) in reports.iter().enumerate() {
        let older = reports.get(i + 1);
        let newer = i.checked_sub(1).and_then(|j| reports.get(j));

        let page = templates::article_page(site, report, older, newer);
        let path = site_dir.join(format!("{}.html", report.slug));
        std::fs::write(&path, page).map_err(|e| PreprintError::io(&path, e))?;
        debug!(slug = %report.slug, "wrote article page");
    }

    let index_path = site_dir.join("index.html");
    std::fs::write(&index_path, templates::index_page(site, &reports))
        .map_err(|e| PreprintError::io(&index_path, e))?;

    info!(pages = reports.len(), "site built");

    Ok(SiteSummary {
        pages: reports.len(),
        site_dir: site_dir.to_path_buf(),
    })
}

/// Delete `report-*.html` pages whose report no longer exists.
fn remove_stale_pages(site_dir: &Path, reports: &[ParsedReport]) -> Result<()> {
    let current: HashSet<String> = reports.iter().map(|r| format!("{}.html", r.slug)).collect();

    let entries = std::fs::read_dir(site_dir).map_err(|e| PreprintError::io(site_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PreprintError::io(site_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with("report-") || !name.ends_with(".html") || current.contains(&name) {
            continue;
        }

        let path = entry.path();
        std::fs::remove_file(&path).map_err(|e| PreprintError::io(&path, e))?;
        debug!(page = %name, "removed stale page");
    }
    Ok(())
}
