//! Application configuration for Preprint Alert.
//!
//! User config lives at `~/.preprint-alert/preprint-alert.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PreprintError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "preprint-alert.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".preprint-alert";

// ---------------------------------------------------------------------------
// Config structs (matching preprint-alert.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Free-form description of what the reader cares about. Embedded into
    /// the selection and synthesis prompts.
    #[serde(default = "default_research_interests")]
    pub research_interests: String,

    /// OpenRouter settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Paper HTML fetcher settings.
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Where reports and the rendered site live.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Static site presentation.
    #[serde(default)]
    pub site: SiteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            research_interests: default_research_interests(),
            openrouter: OpenRouterConfig::default(),
            feed: FeedConfig::default(),
            fetcher: FetcherConfig::default(),
            paths: PathsConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

fn default_research_interests() -> String {
    "I'm interested in:\n\
     - Reasoning/thinking\n\
     \n\
     I'm less interested in:\n\
     - Incremental improvements on existing benchmarks\n\
     - Pure dataset papers without methodological novelty\n\
     - Papers focused solely on non-English languages (unless methodology is novel)\n"
        .into()
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for all three stages.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (overridable for proxies and tests).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Sent as `X-Title`.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Sent as `HTTP-Referer`.
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_llm_timeout(),
            app_name: default_app_name(),
            site_url: default_site_url(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "anthropic/claude-3.5-sonnet".into()
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_llm_timeout() -> u64 {
    180
}
fn default_app_name() -> String {
    "Preprint Alert Agent".into()
}
fn default_site_url() -> String {
    "https://github.com/preprint-alert-agent".into()
}

/// `[feed]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// RSS feed announcing the day's papers.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Timeout for the feed request.
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_feed_timeout(),
        }
    }
}

fn default_feed_url() -> String {
    "https://rss.arxiv.org/rss/cs.CL".into()
}
fn default_feed_timeout() -> u64 {
    30
}

/// `[fetcher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Timeout for a single paper HTML request.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    60
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `report-YYYY-MM-DD.md` files.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,

    /// Output directory for the rendered site.
    #[serde(default = "default_site_dir")]
    pub site_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            site_dir: default_site_dir(),
        }
    }
}

fn default_reports_dir() -> String {
    "reports".into()
}
fn default_site_dir() -> String {
    "site".into()
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Shown in the header and as the index page title.
    #[serde(default = "default_site_title")]
    pub title: String,

    /// Shown above the report list on the index page.
    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Linked from the header and footer.
    #[serde(default = "default_github_url")]
    pub github_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            tagline: default_tagline(),
            github_url: default_github_url(),
        }
    }
}

fn default_site_title() -> String {
    "Preprint Alert".into()
}
fn default_tagline() -> String {
    "AI-curated daily highlights from arXiv cs.CL".into()
}
fn default_github_url() -> String {
    "https://github.com/max-fofanov/preprint-alert-agent".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.preprint-alert/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| PreprintError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.preprint-alert/preprint-alert.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PreprintError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PreprintError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| PreprintError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| PreprintError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| PreprintError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

/// Read the OpenRouter API key from the configured env var.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.openrouter.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(PreprintError::config(format!(
            "OpenRouter API key not found. Set the {var_name} environment variable.\n\
             Get a key at https://openrouter.ai/keys"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("reports_dir"));
        assert!(toml_str.contains("OPENROUTER_API_KEY"));
        assert!(toml_str.contains("rss.arxiv.org"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.feed.timeout_secs, 30);
        assert_eq!(parsed.fetcher.timeout_secs, 60);
        assert_eq!(parsed.openrouter.api_key_env, "OPENROUTER_API_KEY");
        assert!(parsed.research_interests.contains("Reasoning"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
research_interests = "Only retrieval papers."

[paths]
reports_dir = "/tmp/reports"

[openrouter]
model = "openai/gpt-4o-mini"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.research_interests, "Only retrieval papers.");
        assert_eq!(config.paths.reports_dir, "/tmp/reports");
        assert_eq!(config.paths.site_dir, "site");
        assert_eq!(config.openrouter.model, "openai/gpt-4o-mini");
        assert_eq!(config.openrouter.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.site.title, "Preprint Alert");
    }

    #[test]
    fn init_and_load_at_custom_path() {
        let dir = std::env::temp_dir().join(format!("pa-config-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join("nested").join(CONFIG_FILE_NAME);

        init_config_at(&path).expect("init config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.feed.url, "https://rss.arxiv.org/rss/cs.CL");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_config_is_config_error() {
        let dir = std::env::temp_dir().join(format!("pa-config-bad-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[feed\nurl = ").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, PreprintError::Config { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openrouter.api_key_env = "PA_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
