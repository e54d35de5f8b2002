//! # CorpusRS List Command
//!
//! File: cli/src/commands/list.rs
//!
//! ## Overview
//!
//! Implements `corpusrs list`: parse a mirror listing, select the newest
//! original tarball of every main-pool package, and print the mirror-relative
//! paths a `run` would fetch, one per line. Nothing beyond the listing is
//! downloaded.
//!
//! With `--listing FILE` a local copy of `ls-lR` (plain or `.gz`/`.xz`/`.bz2`)
//! is used instead of fetching one from the mirrors.
//!
//! Groups whose candidates have no usable version are logged and left out.
//!
//! ## Usage
//!
//! ```bash
//! corpusrs list --listing ./ls-lR.gz > archives.txt
//! corpusrs list --mirror https://deb.debian.org/debian/ | wc -l
//! ```
//!
use crate::common::archive::compression::read_text_file;
use crate::common::fs::workspace::Workspace;
use crate::common::network::fetch::{HttpTransport, MirrorFetcher};
use crate::core::config::{self, Config, Overrides};
use crate::core::error::{CorpusError, Result};
use crate::corpus::listing::parse_listing;
use crate::corpus::pipeline::Pipeline;
use crate::corpus::version::usable_selections;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments for `corpusrs list`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Read this local listing instead of downloading `ls-lR.gz`.
    #[arg(long, value_name = "FILE")]
    pub listing: Option<PathBuf>,

    /// Mirror base URL; repeat to try several in order. Replaces configured mirrors.
    #[arg(long = "mirror", value_name = "URL")]
    pub mirrors: Vec<String>,
}

/// Handles `corpusrs list`.
pub async fn handle_list(args: ListArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling list command...");

    let overrides = Overrides {
        mirrors: args.mirrors,
        ..Overrides::default()
    };
    let cfg = config::load_config(config_path, &overrides)
        .context("Failed to load CorpusRS configuration")?;

    let text = match &args.listing {
        Some(path) => {
            debug!("Reading listing from {}", path.display());
            read_text_file(path).map_err(|e| CorpusError::ListingUnavailable {
                reason: format!("{:#}", e),
            })?
        }
        None => download_listing(&cfg).await?,
    };

    let groups = parse_listing(&text).context("Mirror listing is malformed")?;
    if groups.is_empty() {
        return Err(CorpusError::EmptyListing.into());
    }

    let archives = usable_selections(&groups);
    let mut out = std::io::stdout().lock();
    for archive in &archives {
        writeln!(out, "{}", archive.fetch_path())?;
    }
    out.flush()?;
    info!(
        "Listed {} archive(s) from {} group(s)",
        archives.len(),
        groups.len()
    );
    Ok(())
}

async fn download_listing(cfg: &Config) -> Result<String> {
    let workspace = Workspace::acquire(&cfg.work_dir(), cfg.cleanup_policy()).await?;
    let policy = cfg.retry_policy();
    let fetcher = MirrorFetcher::new(HttpTransport::new(policy.timeout)?, policy);
    let pipeline = Pipeline::new(&fetcher, cfg.filter_config(), cfg.output_dir());

    let text = pipeline.fetch_listing(&workspace).await?;
    workspace.release().await?;
    Ok(text)
}
