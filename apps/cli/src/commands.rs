//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use preprint_core::{DailyRunOptions, Pipeline, ProgressReporter, RunSummary, Stage, run_daily};
use preprint_shared::{
    AppConfig, config_file_path, init_config_at, load_config, load_config_from, resolve_api_key,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Preprint Alert: daily AI-curated highlights from arXiv.
#[derive(Parser)]
#[command(
    name = "preprint-alert",
    version,
    about = "Analyze today's arXiv papers, write a report and publish a static archive.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.preprint-alert/preprint-alert.toml).
    #[arg(long, global = true, env = "PREPRINT_ALERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run today's pipeline, save the report and rebuild the site.
    Run {
        /// Output path for the report (default: <reports>/report-YYYY-MM-DD.md).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip rebuilding the static site.
        #[arg(long)]
        no_site: bool,

        /// Reports directory (overrides config).
        #[arg(long)]
        reports: Option<PathBuf>,

        /// Site output directory (overrides config).
        #[arg(long)]
        site: Option<PathBuf>,
    },

    /// Rebuild the static site from stored reports.
    Site {
        /// Reports directory (overrides config).
        #[arg(long)]
        reports: Option<PathBuf>,

        /// Site output directory (overrides config).
        #[arg(long)]
        site: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "preprint=info",
        1 => "preprint=debug",
        _ => "preprint=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;

    match cli.command {
        Command::Run {
            output,
            no_site,
            reports,
            site,
        } => {
            let config = load(config_path.as_deref())?;
            cmd_run(&config, output, !no_site, reports, site).await
        }
        Command::Site { reports, site } => {
            let config = load(config_path.as_deref())?;
            cmd_site(&config, reports, site)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path.as_deref()),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn load(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(
    config: &AppConfig,
    output: Option<PathBuf>,
    build_site: bool,
    reports: Option<PathBuf>,
    site: Option<PathBuf>,
) -> Result<()> {
    // Missing credentials fail before any network call
    let api_key = resolve_api_key(config)?;

    let mut options = DailyRunOptions::from_config(config);
    options.output = output;
    options.build_site = build_site;
    if let Some(dir) = reports {
        options.reports_dir = dir;
    }
    if let Some(dir) = site {
        options.site_dir = dir;
    }

    info!(
        feed = %config.feed.url,
        model = %config.openrouter.model,
        reports_dir = %options.reports_dir.display(),
        "starting preprint alert"
    );

    let pipeline = Pipeline::from_config(config, &api_key)?;
    let reporter = CliProgress::new();

    let summary = run_daily(&pipeline, &options, &reporter).await?;

    println!();
    println!("  Report saved: {}", summary.report.path.display());
    println!("  Run:          {}", summary.run_id);
    println!("  Papers:       {}", summary.papers);
    println!("  Selected:     {}", summary.selected);
    println!("  Analyzed:     {}", summary.analyses);
    match summary.site_pages {
        Some(pages) => println!(
            "  Site:         {pages} page(s) in {}",
            options.site_dir.display()
        ),
        None => println!("  Site:         skipped"),
    }
    println!("  Time:         {:.1}s", summary.elapsed.as_secs_f64());

    if !summary.failures.is_empty() {
        println!();
        println!("  Degraded steps:");
        for failure in &summary.failures {
            match &failure.subject {
                Some(subject) => {
                    println!("    [{}] {subject}: {}", failure.stage, failure.reason)
                }
                None => println!("    [{}] {}", failure.stage, failure.reason),
            }
        }
    }
    println!();

    Ok(())
}

fn cmd_site(config: &AppConfig, reports: Option<PathBuf>, site: Option<PathBuf>) -> Result<()> {
    let reports_dir = reports.unwrap_or_else(|| PathBuf::from(&config.paths.reports_dir));
    let site_dir = site.unwrap_or_else(|| PathBuf::from(&config.paths.site_dir));

    let summary = preprint_site::build_site(&reports_dir, &site_dir, &config.site)?;

    if summary.pages == 0 {
        println!("No reports found in {}", reports_dir.display());
    } else {
        println!(
            "Built {} report page(s) + index in {}",
            summary.pages,
            summary.site_dir.display()
        );
    }
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };
    if path.exists() {
        return Err(eyre!("config already exists at {}", path.display()));
    }

    init_config_at(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = load(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, stage: Stage) {
        let msg = match stage {
            Stage::Selecting => "Fetching papers and picking the interesting ones",
            Stage::Analyzing => "Analyzing selected papers",
            Stage::Synthesizing => "Writing the article",
            Stage::Done => "Saving report",
        };
        self.spinner.set_message(msg);
    }

    fn paper_analyzed(&self, title: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Analyzing [{current}/{total}] {title}"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}
