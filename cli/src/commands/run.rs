//! # CorpusRS Run Command
//!
//! File: cli/src/commands/run.rs
//!
//! ## Overview
//!
//! Implements `corpusrs run`, the full corpus build:
//!
//! 1. Load configuration and apply command-line overrides.
//! 2. Create the output directory and acquire the work directory.
//! 3. Fetch `ls-lR.gz` from the mirrors and parse it.
//! 4. Select the newest `.orig.tar.*` of every main-pool package.
//! 5. Fetch, extract, filter and repack each one into the output directory.
//! 6. Release the work directory and print a summary.
//!
//! The run fails (non-zero exit) only when the listing cannot be fetched, is
//! malformed, lists no packages, or the work directory cannot be cleaned.
//! Individual packages that fail are reported in the summary.
//!
//! ## Usage
//!
//! ```bash
//! corpusrs run
//! corpusrs run --protobuf --limit 20 --output-dir /srv/corpus
//! corpusrs -v run --mirror https://deb.debian.org/debian/
//! ```
//!
use crate::common::fs::io::ensure_dir_exists;
use crate::common::fs::workspace::Workspace;
use crate::common::network::fetch::{HttpTransport, MirrorFetcher};
use crate::core::config::{self, Overrides};
use crate::core::error::{CorpusError, Result};
use crate::corpus::listing::parse_listing;
use crate::corpus::pipeline::{Pipeline, RunSummary};
use crate::corpus::version::usable_selections;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for `corpusrs run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Keep `.proto` schema files alongside C/C++ sources.
    #[arg(long)]
    pub protobuf: bool,

    /// Mirror base URL; repeat to try several in order. Replaces configured mirrors.
    #[arg(long = "mirror", value_name = "URL")]
    pub mirrors: Vec<String>,

    /// Where the repacked `.xz` archives are written.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Scratch directory for downloads and extraction. Emptied before and after use.
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Only process the first N selected archives.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Handles `corpusrs run`.
pub async fn handle_run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling run command...");

    let overrides = Overrides {
        mirrors: args.mirrors,
        output_dir: args.output_dir,
        work_dir: args.work_dir,
        include_schema_files: args.protobuf,
    };
    let cfg = config::load_config(config_path, &overrides)
        .context("Failed to load CorpusRS configuration")?;

    let output_dir = cfg.output_dir();
    ensure_dir_exists(&output_dir)?;
    let mut workspace = Workspace::acquire(&cfg.work_dir(), cfg.cleanup_policy()).await?;

    let policy = cfg.retry_policy();
    let transport = HttpTransport::new(policy.timeout)?;
    let fetcher = MirrorFetcher::new(transport, policy);
    let pipeline = Pipeline::new(&fetcher, cfg.filter_config(), output_dir.clone());

    let listing = pipeline.fetch_listing(&workspace).await?;
    let groups = parse_listing(&listing).context("Mirror listing is malformed")?;
    if groups.is_empty() {
        return Err(CorpusError::EmptyListing.into());
    }

    let mut archives = usable_selections(&groups);
    if let Some(limit) = args.limit {
        archives.truncate(limit);
    }
    println!(
        "Processing {} package(s) from {} listed group(s)...",
        archives.len(),
        groups.len()
    );

    let summary = pipeline.run(&mut workspace, &archives).await?;
    workspace.release().await?;

    print_summary(&summary, &output_dir);
    Ok(())
}

fn print_summary(summary: &RunSummary, output_dir: &Path) {
    println!(
        "\nPacked {} archive(s) into '{}'.",
        summary.packed.len(),
        output_dir.display()
    );
    println!(
        "Source files kept: {}, removed: {}.",
        summary.files_kept, summary.files_removed
    );
    if summary.filter_failures > 0 {
        println!(
            "{} file(s) could not be filtered; see the log for details.",
            summary.filter_failures
        );
    }
    if !summary.skipped.is_empty() {
        println!("Skipped {} package(s):", summary.skipped.len());
        for (path, reason) in &summary.skipped {
            println!("  {}: {}", path, reason);
        }
    }
}
