//! Dated report storage.
//!
//! One markdown file per day, named `report-YYYY-MM-DD.md`. Writes are atomic
//! (temp file, then rename) so a concurrent site build never sees a partial
//! report. Re-running on the same day overwrites that day's report.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use preprint_shared::{PreprintError, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

/// File name prefix shared by every report.
pub const REPORT_PREFIX: &str = "report-";

/// Extension of report files.
pub const REPORT_EXTENSION: &str = "md";

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Result of writing a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// A report file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub path: PathBuf,
    /// File name without extension; addresses the report's page.
    pub slug: String,
    /// The `YYYY-MM-DD` text found in the file name, if any.
    pub date_str: Option<String>,
    /// `date_str` parsed as a calendar date.
    pub date: Option<NaiveDate>,
}

impl ReportEntry {
    /// Build an entry from a path, extracting the date from its file name.
    pub fn from_path(path: PathBuf) -> Self {
        let slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let date_str = DATE_RE.find(&slug).map(|m| m.as_str().to_string());
        let date = date_str
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        Self {
            path,
            slug,
            date_str,
            date,
        }
    }

    /// File name of the entry, as seen by the site builder.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Newest first. Undated entries sort after every dated one; ties fall back
/// to slug, descending.
pub fn newest_first(a: &ReportEntry, b: &ReportEntry) -> Ordering {
    match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.slug.cmp(&a.slug))
}

// ---------------------------------------------------------------------------
// ReportStore
// ---------------------------------------------------------------------------

/// A directory of dated reports.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report for `date`.
    pub fn report_path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{REPORT_PREFIX}{}.{REPORT_EXTENSION}",
            date.format("%Y-%m-%d")
        ))
    }

    /// Write the report for `date`, replacing any earlier one.
    pub fn save(&self, date: NaiveDate, text: &str) -> Result<SavedReport> {
        save_to(&self.report_path_for(date), text)
    }

    /// All report files in the directory, newest first.
    ///
    /// A missing directory yields an empty list.
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<ReportEntry>> {
        if !self.dir.exists() {
            debug!("reports directory does not exist");
            return Ok(Vec::new());
        }

        let read_dir = std::fs::read_dir(&self.dir).map_err(|e| PreprintError::io(&self.dir, e))?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| PreprintError::io(&self.dir, e))?;
            let path = item.path();
            if !path.is_file() || !is_report_file(&path) {
                continue;
            }
            entries.push(ReportEntry::from_path(path));
        }

        entries.sort_by(newest_first);
        debug!(count = entries.len(), "listed reports");
        Ok(entries)
    }

    /// Read a report's markdown text.
    pub fn read(&self, entry: &ReportEntry) -> Result<String> {
        std::fs::read_to_string(&entry.path).map_err(|e| PreprintError::io(&entry.path, e))
    }
}

fn is_report_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(REPORT_PREFIX) && name.ends_with(&format!(".{REPORT_EXTENSION}"))
}

/// Write `text` to `path` atomically, creating parent directories.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn save_to(path: &Path, text: &str) -> Result<SavedReport> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PreprintError::validation(format!("invalid report path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| PreprintError::io(&dir, e))?;

    let temp = dir.join(format!(".{file_name}.tmp"));
    std::fs::write(&temp, text).map_err(|e| PreprintError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| PreprintError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    info!(size = text.len(), "report saved");

    Ok(SavedReport {
        path: path.to_path_buf(),
        sha256,
        size_bytes: text.len(),
    })
}
