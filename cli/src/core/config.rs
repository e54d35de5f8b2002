//! # CorpusRS Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, expands and validates the configuration for a
//! CorpusRS run: which mirrors to use, how patiently to retry them, where the
//! work and output directories live, and whether `.proto` files survive the
//! filter.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (`--mirror`, `--output-dir`, `--work-dir`, `--protobuf`)
//! 2. A file passed with `--config <path>`
//! 3. The user file `<config dir>/corpusrs/config.toml`
//! 4. Default values defined in the code
//!
//! An explicit `--config` file replaces the user file rather than merging with
//! it. Paths are tilde-expanded after merging, then the result is validated.
//!
//! ## Examples
//!
//! ```toml
//! [mirrors]
//! urls = ["https://ftp.se.debian.org/debian/"]
//!
//! [retry]
//! max_attempts = 5
//! delay_secs = 10
//!
//! [filter]
//! include_schema_files = true
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None, &Overrides::default())?;
//! let fetcher = MirrorFetcher::new(transport, cfg.retry_policy());
//! ```
//!
use crate::common::fs::io::{read_file_to_string, resolve_path};
use crate::common::fs::workspace::CleanupPolicy;
use crate::common::network::fetch::RetryPolicy;
use crate::core::error::{CorpusError, Result};
use crate::corpus::filter::FilterConfig;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub mirrors: MirrorsConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

/// Debian mirrors to download from, tried in order.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MirrorsConfig {
    #[serde(default = "default_mirrors")]
    pub urls: Vec<String>,
}

/// Retry behaviour for mirror downloads.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Rounds over the whole mirror list.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause after a round in which every mirror failed.
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,
    /// Connect timeout, and the longest a download may stall without data.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output and work directories (can use ~). Will be expanded.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
}

/// Source filter options.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilterSettings {
    /// Keep `.proto` schema definitions alongside C/C++ sources.
    #[serde(default)]
    pub include_schema_files: bool,
}

/// Retry behaviour for emptying the work directory.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CleanupConfig {
    #[serde(default = "default_cleanup_attempts")]
    pub attempts: u32,
    #[serde(default = "default_cleanup_delay_secs")]
    pub delay_secs: u64,
}

fn default_mirrors() -> Vec<String> {
    vec![
        "https://ftp.se.debian.org/debian/".to_string(),
        "https://deb.debian.org/debian/".to_string(),
    ]
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_delay_secs() -> u64 {
    10
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_output_dir() -> String {
    "~/daca2-packages".to_string()
}
fn default_work_dir() -> String {
    "~/daca2-packages/tmp".to_string()
}
fn default_cleanup_attempts() -> u32 {
    5
}
fn default_cleanup_delay_secs() -> u64 {
    30
}

impl Default for MirrorsConfig {
    fn default() -> Self {
        Self {
            urls: default_mirrors(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_retry_delay_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            work_dir: default_work_dir(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            attempts: default_cleanup_attempts(),
            delay_secs: default_cleanup_delay_secs(),
        }
    }
}

impl Config {
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.output_dir)
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.work_dir)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            mirrors: self.mirrors.urls.clone(),
            max_attempts: self.retry.max_attempts,
            delay: Duration::from_secs(self.retry.delay_secs),
            timeout: Duration::from_secs(self.retry.timeout_secs),
        }
    }

    pub fn cleanup_policy(&self) -> CleanupPolicy {
        CleanupPolicy {
            attempts: self.cleanup.attempts,
            delay: Duration::from_secs(self.cleanup.delay_secs),
        }
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            include_schema_files: self.filter.include_schema_files,
        }
    }
}

/// Values supplied on the command line, applied over the loaded files.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Replaces the configured mirror list when non-empty.
    pub mirrors: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    /// `--protobuf`; can only switch schema inclusion on.
    pub include_schema_files: bool,
}

/// Loads the effective configuration for a command.
pub fn load_config(explicit: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let base = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => load_user_config()?.unwrap_or_default(),
    };
    let mut merged = apply_overrides(base, overrides);
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "CorpusRS", "corpusrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = read_file_to_string(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn apply_overrides(mut config: Config, overrides: &Overrides) -> Config {
    if !overrides.mirrors.is_empty() {
        config.mirrors.urls = overrides.mirrors.clone();
    }
    if let Some(dir) = &overrides.output_dir {
        config.paths.output_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(dir) = &overrides.work_dir {
        config.paths.work_dir = dir.to_string_lossy().into_owned();
    }
    if overrides.include_schema_files {
        config.filter.include_schema_files = true;
    }
    config
}

fn expand_config_paths(config: &mut Config) {
    config.paths.output_dir = shellexpand::tilde(&config.paths.output_dir).into_owned();
    config.paths.work_dir = shellexpand::tilde(&config.paths.work_dir).into_owned();
    debug!(
        "Expanded paths: output={}, work={}",
        config.paths.output_dir, config.paths.work_dir
    );
}

fn validate_config(config: &Config) -> Result<()> {
    if config.mirrors.urls.is_empty() {
        return Err(anyhow!(CorpusError::Config(
            "At least one mirror URL must be configured.".to_string()
        )));
    }
    for url in &config.mirrors.urls {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(CorpusError::Config(format!(
                "Mirror '{}' must start with http:// or https://.",
                url
            ))));
        }
    }
    if config.retry.max_attempts == 0 {
        return Err(anyhow!(CorpusError::Config(
            "retry.max_attempts must be at least 1.".to_string()
        )));
    }
    if config.cleanup.attempts == 0 {
        return Err(anyhow!(CorpusError::Config(
            "cleanup.attempts must be at least 1.".to_string()
        )));
    }

    let output = config.output_dir();
    let work = config.work_dir();
    for (label, dir) in [("Output", &output), ("Work", &work)] {
        if dir.exists() && !dir.is_dir() {
            return Err(anyhow!(CorpusError::Config(format!(
                "{} path '{}' exists but is not a directory.",
                label,
                dir.display()
            ))));
        }
    }
    // The work directory is wiped wholesale; it must never contain the output.
    let resolved_output = resolve_path(&output)?;
    let resolved_work = resolve_path(&work)?;
    if resolved_output == resolved_work {
        return Err(anyhow!(CorpusError::Config(format!(
            "Output directory '{}' and work directory '{}' must differ.",
            output.display(),
            work.display()
        ))));
    }
    if resolved_output.starts_with(&resolved_work) {
        return Err(anyhow!(CorpusError::Config(format!(
            "Output directory '{}' must not be inside the work directory '{}'.",
            output.display(),
            work.display()
        ))));
    }
    Ok(())
}
