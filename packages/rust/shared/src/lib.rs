//! Shared types, error model, and configuration for Preprint Alert.
//!
//! This crate is the foundation depended on by all other Preprint Alert crates.
//! It provides:
//! - [`PreprintError`]: the unified error type
//! - Domain types ([`Paper`], [`PaperAnalysis`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading, credential checks)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FeedConfig, FetcherConfig, OpenRouterConfig, PathsConfig, SiteConfig, config_dir,
    config_file_path, init_config_at, load_config, load_config_from, resolve_api_key,
};
pub use error::{PreprintError, Result};
pub use types::{Paper, PaperAnalysis, RunId};
