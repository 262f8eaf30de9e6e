//! End-to-end daily run: feed → selection → analysis → synthesis → report → site.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use preprint_feed::ArxivFeed;
use preprint_fetcher::PaperFetcher;
use preprint_llm::{ChatModel, OpenRouterClient};
use preprint_reports::{ReportStore, SavedReport};
use preprint_shared::{AppConfig, Result, RunId, SiteConfig};

use crate::sources::{ContentSource, PaperSource};
use crate::state::{PipelineState, Stage, StageFailure};
use crate::{analysis, selection, synthesis};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn phase(&self, stage: Stage);
    /// Called as each paper's analysis resolves, successfully or not.
    fn paper_analyzed(&self, title: &str, current: usize, total: usize);
    /// Called when a daily run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _stage: Stage) {}
    fn paper_analyzed(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &RunSummary) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The three-stage pipeline and its collaborators.
pub struct Pipeline {
    papers: Arc<dyn PaperSource>,
    content: Arc<dyn ContentSource>,
    llm: Arc<dyn ChatModel>,
    research_interests: String,
}

impl Pipeline {
    pub fn new(
        papers: Arc<dyn PaperSource>,
        content: Arc<dyn ContentSource>,
        llm: Arc<dyn ChatModel>,
        research_interests: impl Into<String>,
    ) -> Self {
        Self {
            papers,
            content,
            llm,
            research_interests: research_interests.into(),
        }
    }

    /// Wire the production collaborators from config.
    pub fn from_config(config: &AppConfig, api_key: &str) -> Result<Self> {
        let feed = ArxivFeed::new(&config.feed)?;
        let fetcher = PaperFetcher::new(&config.fetcher)?;
        let llm = OpenRouterClient::new(api_key, &config.openrouter)?;

        Ok(Self::new(
            Arc::new(feed),
            Arc::new(fetcher),
            Arc::new(llm),
            config.research_interests.clone(),
        ))
    }

    /// Run `Selecting → Analyzing → Synthesizing`.
    ///
    /// Never fails: every stage degrades instead, and the returned state always
    /// carries an article in `final_report`.
    #[instrument(skip_all, fields(run_id = %run_id))]
    pub async fn run(&self, run_id: &RunId, progress: &dyn ProgressReporter) -> PipelineState {
        let mut state = PipelineState::new();

        progress.phase(Stage::Selecting);
        state.papers = match self.papers.fetch_papers().await {
            Ok(papers) => papers,
            Err(e) => {
                warn!(error = %e, "feed unavailable, treating as no papers");
                state
                    .failures
                    .push(StageFailure::new(Stage::Selecting, e.to_string()));
                Vec::new()
            }
        };
        info!(count = state.papers.len(), "papers fetched");
        let state = selection::run(state, self.llm.as_ref(), &self.research_interests).await;

        progress.phase(Stage::Analyzing);
        let state = analysis::run(
            state,
            Arc::clone(&self.llm),
            Arc::clone(&self.content),
            progress,
        )
        .await;

        progress.phase(Stage::Synthesizing);
        let state = synthesis::run(state, self.llm.as_ref(), &self.research_interests).await;

        progress.phase(Stage::Done);
        state
    }
}

// ---------------------------------------------------------------------------
// Daily run
// ---------------------------------------------------------------------------

/// Where a daily run writes its output.
#[derive(Debug, Clone)]
pub struct DailyRunOptions {
    pub reports_dir: PathBuf,
    pub site_dir: PathBuf,
    /// Write the report here instead of the dated path in `reports_dir`.
    pub output: Option<PathBuf>,
    pub build_site: bool,
    pub site: SiteConfig,
    /// Date the report is filed under.
    pub date: NaiveDate,
}

impl DailyRunOptions {
    /// Options from config, filed under today's local date.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            reports_dir: PathBuf::from(&config.paths.reports_dir),
            site_dir: PathBuf::from(&config.paths.site_dir),
            output: None,
            build_site: true,
            site: config.site.clone(),
            date: chrono::Local::now().date_naive(),
        }
    }
}

/// Outcome of a daily run.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: RunId,
    pub papers: usize,
    pub selected: usize,
    pub analyses: usize,
    pub failures: Vec<StageFailure>,
    pub report: SavedReport,
    /// Article pages built, or `None` when the site build was skipped.
    pub site_pages: Option<usize>,
    pub elapsed: Duration,
}

/// Run the pipeline, store the article and rebuild the site.
///
/// Only storage and site errors are returned; the pipeline itself degrades.
#[instrument(skip_all, fields(date = %options.date))]
pub async fn run_daily(
    pipeline: &Pipeline,
    options: &DailyRunOptions,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let start = Instant::now();
    let run_id = RunId::new();

    info!(%run_id, "starting daily run");

    let state = pipeline.run(&run_id, progress).await;

    let store = ReportStore::new(&options.reports_dir);
    let report = match &options.output {
        Some(path) => preprint_reports::save_to(path, &state.final_report)?,
        None => store.save(options.date, &state.final_report)?,
    };

    let site_pages = if options.build_site {
        let summary =
            preprint_site::build_site(&options.reports_dir, &options.site_dir, &options.site)?;
        Some(summary.pages)
    } else {
        None
    };

    let summary = RunSummary {
        run_id,
        papers: state.papers.len(),
        selected: state.interesting_ids.len(),
        analyses: state.analyses.len(),
        failures: state.failures,
        report,
        site_pages,
        elapsed: start.elapsed(),
    };

    progress.done(&summary);

    info!(
        run_id = %summary.run_id,
        papers = summary.papers,
        selected = summary.selected,
        analyses = summary.analyses,
        failures = summary.failures.len(),
        report = %summary.report.path.display(),
        elapsed_ms = summary.elapsed.as_millis(),
        "daily run complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use preprint_shared::PreprintError;

    use crate::test_support::{FnModel, MapContent, StaticPapers, paper};

    /// Records every stage it is told about.
    #[derive(Default)]
    struct RecordingProgress {
        stages: Mutex<Vec<Stage>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }
        fn paper_analyzed(&self, _title: &str, _current: usize, _total: usize) {}
        fn done(&self, _summary: &RunSummary) {}
    }

    /// Routes each call by its user message to the matching stage's reply.
    fn scripted_model() -> FnModel<impl Fn(&str) -> preprint_shared::Result<String> + Send + Sync> {
        FnModel::new(|user: &str| {
            if user.starts_with("Here are today's papers") {
                Ok("2401.00001\n2401.00002\nmade.up".to_string())
            } else if user.starts_with("Here are the papers I analyzed") {
                Ok("# Reasoning Day\n\nTwo papers on [One](https://arxiv.org/abs/2401.00001).".into())
            } else if user.contains("Title: Two") {
                Err(PreprintError::Llm("timeout".into()))
            } else {
                Ok("Deep insight.".to_string())
            }
        })
    }

    fn pipeline(papers: StaticPapers) -> Pipeline {
        let content = MapContent {
            texts: HashMap::from([("2401.00001".to_string(), "2 Methods\nWe train.".to_string())]),
            ..MapContent::default()
        };
        Pipeline::new(
            Arc::new(papers),
            Arc::new(content),
            Arc::new(scripted_model()),
            "interests",
        )
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pa-core-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn stages_run_in_order_and_degrade() {
        let pipeline = pipeline(StaticPapers(Ok(vec![
            paper("2401.00001", "One"),
            paper("2401.00002", "Two"),
            paper("2401.00003", "Three"),
        ])));
        let progress = RecordingProgress::default();

        let state = pipeline.run(&RunId::new(), &progress).await;

        assert_eq!(
            *progress.stages.lock().unwrap(),
            vec![Stage::Selecting, Stage::Analyzing, Stage::Synthesizing, Stage::Done]
        );
        assert_eq!(state.papers.len(), 3);
        assert_eq!(state.interesting_ids, vec!["2401.00001", "2401.00002"]);
        assert_eq!(state.analyses.len(), 1);
        assert_eq!(state.analyses[0].paper.arxiv_id, "2401.00001");
        assert_eq!(state.failures.len(), 1);
        assert_eq!(state.failures[0].subject.as_deref(), Some("Two"));
        assert!(state.final_report.starts_with("# Reasoning Day"));
    }

    #[tokio::test]
    async fn feed_failure_yields_placeholder() {
        let pipeline = pipeline(StaticPapers(Err(PreprintError::Network("down".into()))));

        let state = pipeline.run(&RunId::new(), &SilentProgress).await;

        assert!(state.papers.is_empty());
        assert_eq!(state.final_report, synthesis::EMPTY_REPORT);
        assert_eq!(state.failures.len(), 1);
        assert_eq!(state.failures[0].stage, Stage::Selecting);
    }

    #[tokio::test]
    async fn daily_run_saves_report_and_builds_site() {
        let tmp = temp_dir();
        let pipeline = pipeline(StaticPapers(Ok(vec![paper("2401.00001", "One")])));
        let options = DailyRunOptions {
            reports_dir: tmp.join("reports"),
            site_dir: tmp.join("site"),
            output: None,
            build_site: true,
            site: SiteConfig::default(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };

        let summary = run_daily(&pipeline, &options, &SilentProgress).await.unwrap();

        assert_eq!(summary.papers, 1);
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.analyses, 1);
        assert_eq!(summary.site_pages, Some(1));
        assert_eq!(
            summary.report.path,
            tmp.join("reports").join("report-2026-01-15.md")
        );
        assert!(tmp.join("site").join("report-2026-01-15.html").exists());
        assert!(tmp.join("site").join("index.html").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn daily_run_honors_output_override_and_skip_site() {
        let tmp = temp_dir();
        let pipeline = pipeline(StaticPapers(Ok(Vec::new())));
        let output = tmp.join("custom").join("today.md");
        let options = DailyRunOptions {
            reports_dir: tmp.join("reports"),
            site_dir: tmp.join("site"),
            output: Some(output.clone()),
            build_site: false,
            site: SiteConfig::default(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };

        let summary = run_daily(&pipeline, &options, &SilentProgress).await.unwrap();

        assert_eq!(summary.report.path, output);
        assert_eq!(summary.site_pages, None);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            synthesis::EMPTY_REPORT
        );
        assert!(!tmp.join("site").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
