//! # CorpusRS Filter Command
//!
//! File: cli/src/commands/filter.rs
//!
//! ## Overview
//!
//! Implements `corpusrs filter <DIR>`: apply the corpus source filter to an
//! already extracted tree in place. Every regular file larger than 100,000
//! bytes, or without a C/C++ extension (plus `.proto` with `--protobuf`), is
//! deleted. Directories and symbolic links are left alone.
//!
//! **Deletion is irreversible; there is no dry run.**
//!
//! ## Usage
//!
//! ```bash
//! corpusrs filter ./acme-1.3
//! corpusrs filter --protobuf ./grpc-1.60.0
//! ```
//!
use crate::core::config::{self, Overrides};
use crate::core::error::{CorpusError, Result};
use crate::corpus::filter::{filter_tree, FilterReport};
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for `corpusrs filter`.
#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Directory to filter in place.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Keep `.proto` schema files alongside C/C++ sources.
    #[arg(long)]
    pub protobuf: bool,
}

/// Handles `corpusrs filter`.
pub async fn handle_filter(args: FilterArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling filter command for {}", args.dir.display());

    let overrides = Overrides {
        include_schema_files: args.protobuf,
        ..Overrides::default()
    };
    let cfg = config::load_config(config_path, &overrides)
        .context("Failed to load CorpusRS configuration")?;

    if !args.dir.is_dir() {
        return Err(CorpusError::FileSystem(format!(
            "'{}' is not a directory",
            args.dir.display()
        ))
        .into());
    }

    let report = filter_tree(&args.dir, &cfg.filter_config());
    print_report(&report, &args.dir);
    Ok(())
}

fn print_report(report: &FilterReport, dir: &Path) {
    println!("Filtered '{}':", dir.display());
    println!("  {:<22}{}", "kept:", report.kept);
    println!("  {:<22}{}", "removed (too large):", report.removed_large);
    println!("  {:<22}{}", "removed (extension):", report.removed_unrecognized);
    if !report.failures.is_empty() {
        println!("  {:<22}{}", "failures:", report.failures.len());
        for failure in &report.failures {
            println!("    {}: {}", failure.path.display(), failure.reason);
        }
    }
}
