//! # CorpusRS Package Pipeline (`corpus::pipeline`)
//!
//! File: cli/src/corpus/pipeline.rs
//!
//! ## Overview
//!
//! Drives the per-package work of a corpus run. For every selected archive,
//! strictly one after another:
//!
//! 1. Empty the workspace.
//! 2. Fetch `dir/filename` from the mirrors into the workspace.
//! 3. Pick a decoder from the filename suffix (`.gz`, `.xz`, `.bz2`).
//! 4. Extract into `<workspace>/extract/`.
//! 5. Make the extracted directories writable and run the source filter.
//! 6. Locate the first top-level directory the tarball produced.
//! 7. Pack that directory into `<output_dir>/<filename minus last extension>.xz`,
//!    leaving out any file the filter failed to delete.
//!
//! Anything that goes wrong with a single package (download exhausted, unknown
//! compression, corrupt archive, nothing extracted) is logged and recorded as
//! `PackageOutcome::Skipped`; the run carries on. Only workspace cleanup
//! failures stop the run, since every later package would reuse the same
//! directory.
//!
//! The pipeline also fetches the `ls-lR.gz` listing that seeds a run.
//!
//! ## Usage
//!
//! ```rust
//! let pipeline = Pipeline::new(&fetcher, cfg.filter_config(), cfg.output_dir());
//! let text = pipeline.fetch_listing(&workspace).await?;
//! // ... parse and select ...
//! let summary = pipeline.run(&mut workspace, &archives).await?;
//! workspace.release().await?;
//! ```
//!
use crate::common::archive::compression::{read_text_file, Compression};
use crate::common::archive::tar::{extract_archive, first_top_level_dir, pack_directory_xz};
use crate::common::fs::io::make_tree_writable;
use crate::common::fs::workspace::Workspace;
use crate::common::network::fetch::{MirrorFetcher, Transport};
use crate::core::error::{CorpusError, Result};
use crate::corpus::filter::{filter_tree, FilterConfig, FilterReport};
use crate::corpus::version::SelectedArchive;
use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Mirror-relative path of the recursive directory listing.
pub const LISTING_PATH: &str = "ls-lR.gz";

/// Subdirectory of the workspace that archives are extracted into.
const EXTRACT_DIR: &str = "extract";

/// What happened to one selected archive.
#[derive(Debug)]
pub enum PackageOutcome {
    Packed {
        output: PathBuf,
        report: FilterReport,
    },
    Skipped {
        reason: String,
        /// Present when the filter ran before the package was given up on.
        report: Option<FilterReport>,
    },
}

/// Tally of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Archives written to the output directory.
    pub packed: Vec<PathBuf>,
    /// Fetch path and reason of every skipped package.
    pub skipped: Vec<(String, String)>,
    pub files_kept: usize,
    pub files_removed: usize,
    pub filter_failures: usize,
}

impl RunSummary {
    fn record(&mut self, archive: &SelectedArchive, outcome: PackageOutcome) {
        let report = match outcome {
            PackageOutcome::Packed { output, report } => {
                self.packed.push(output);
                Some(report)
            }
            PackageOutcome::Skipped { reason, report } => {
                self.skipped.push((archive.fetch_path(), reason));
                report
            }
        };
        if let Some(report) = report {
            self.files_kept += report.kept;
            self.files_removed += report.removed();
            self.filter_failures += report.failures.len();
        }
    }
}

/// Name of the repacked archive: everything up to the last `.`, plus `.xz`.
///
/// `acme_1.3.orig.tar.gz` → `acme_1.3.orig.tar.xz`.
pub fn output_file_name(filename: &str) -> String {
    let stem = filename.rfind('.').map_or(filename, |idx| &filename[..idx]);
    format!("{}.xz", stem)
}

/// Sequential fetch → extract → filter → repack driver.
pub struct Pipeline<'a, T> {
    fetcher: &'a MirrorFetcher<T>,
    filter: FilterConfig,
    output_dir: PathBuf,
}

impl<'a, T: Transport> Pipeline<'a, T> {
    pub fn new(fetcher: &'a MirrorFetcher<T>, filter: FilterConfig, output_dir: PathBuf) -> Self {
        Self {
            fetcher,
            filter,
            output_dir,
        }
    }

    /// Downloads and decompresses the mirror listing.
    ///
    /// # Errors
    ///
    /// `CorpusError::ListingUnavailable` when every mirror fails, or an I/O
    /// error if the downloaded file cannot be decoded.
    pub async fn fetch_listing(&self, workspace: &Workspace) -> Result<String> {
        let dest = workspace.path().join(LISTING_PATH);
        let mirror = self
            .fetcher
            .fetch(LISTING_PATH, &dest)
            .await
            .map_err(|e| CorpusError::ListingUnavailable {
                reason: e.to_string(),
            })?;
        info!("Listing retrieved from {}", mirror);

        let text = read_text_file(&dest)?;
        if let Err(e) = fs::remove_file(&dest) {
            warn!("Could not remove temporary listing {:?}: {}", dest, e);
        }
        Ok(text)
    }

    /// Processes every archive in order and tallies the outcomes.
    ///
    /// # Errors
    ///
    /// Only when the workspace cannot be emptied; package failures are skips.
    pub async fn run(
        &self,
        workspace: &mut Workspace,
        archives: &[SelectedArchive],
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let total = archives.len();

        for (index, archive) in archives.iter().enumerate() {
            info!("[{}/{}] {}", index + 1, total, archive.fetch_path());
            let outcome = self.process_package(workspace, archive).await?;
            if let PackageOutcome::Skipped { reason, .. } = &outcome {
                warn!("Skipped {}: {}", archive.fetch_path(), reason);
            }
            summary.record(archive, outcome);
        }
        Ok(summary)
    }

    /// Runs the full sequence for a single archive.
    pub async fn process_package(
        &self,
        workspace: &mut Workspace,
        archive: &SelectedArchive,
    ) -> Result<PackageOutcome> {
        workspace.reset().await?;

        let download = workspace.path().join(&archive.filename);
        if let Err(e) = self.fetcher.fetch(&archive.fetch_path(), &download).await {
            return Ok(PackageOutcome::Skipped {
                reason: format!("download failed: {}", e),
                report: None,
            });
        }

        let Some(compression) = Compression::from_file_name(&archive.filename) else {
            warn!(
                "No decoder for '{}'; only .gz, .xz and .bz2 tarballs are handled",
                archive.filename
            );
            return Ok(PackageOutcome::Skipped {
                reason: "unrecognized compression suffix".to_string(),
                report: None,
            });
        };

        let extract_dir = workspace.path().join(EXTRACT_DIR);
        let output = self.output_dir.join(output_file_name(&archive.filename));
        let filter = self.filter;

        // Extraction, filtering and xz encoding are blocking work.
        tokio::task::spawn_blocking(move || {
            unpack_filter_pack(&download, compression, &extract_dir, &output, &filter)
        })
        .await
        .context("Package processing task failed to complete")
    }
}

/// Synchronous tail of `process_package`, from extraction to the output archive.
fn unpack_filter_pack(
    download: &Path,
    compression: Compression,
    extract_dir: &Path,
    output: &Path,
    filter: &FilterConfig,
) -> PackageOutcome {
    if let Err(e) = extract_archive(download, compression, extract_dir) {
        error!("Extraction of {:?} failed: {:#}", download, e);
        return PackageOutcome::Skipped {
            reason: format!("extraction failed: {:#}", e),
            report: None,
        };
    }
    if let Err(e) = fs::remove_file(download) {
        debug!("Could not remove {:?}: {}", download, e);
    }

    // Upstream tarballs ship read-only directories; rejects inside them must still go.
    make_tree_writable(extract_dir);
    let report = filter_tree(extract_dir, filter);
    let undeleted: HashSet<PathBuf> = report.failures.iter().map(|f| f.path.clone()).collect();

    let top = match first_top_level_dir(extract_dir) {
        Ok(Some(top)) => top,
        Ok(None) => {
            return PackageOutcome::Skipped {
                reason: "archive produced no top-level directory".to_string(),
                report: Some(report),
            }
        }
        Err(e) => {
            return PackageOutcome::Skipped {
                reason: format!("cannot inspect extracted tree: {:#}", e),
                report: Some(report),
            }
        }
    };

    if let Err(e) = pack_directory_xz(&top, output, &undeleted) {
        error!("Packing {:?} into {:?} failed: {:#}", top, output, e);
        if output.exists() {
            if let Err(e) = fs::remove_file(output) {
                debug!("Could not remove partial {:?}: {}", output, e);
            }
        }
        return PackageOutcome::Skipped {
            reason: format!("packing failed: {:#}", e),
            report: Some(report),
        };
    }

    info!(
        "Packed {:?} (kept {}, removed {})",
        output,
        report.kept,
        report.removed()
    );
    PackageOutcome::Packed {
        output: output.to_path_buf(),
        report,
    }
}
