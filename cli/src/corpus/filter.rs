//! # CorpusRS Source File Filter (`corpus::filter`)
//!
//! File: cli/src/corpus/filter.rs
//!
//! ## Overview
//!
//! Strips an extracted upstream source tree down to the files worth feeding a
//! C/C++ static analyser. Every regular file below the root is checked against
//! two predicates, in order:
//!
//! 1. **Size**: anything larger than [`MAX_SOURCE_FILE_SIZE`] bytes is deleted,
//!    whatever its name.
//! 2. **Extension**: the text from the last `.` of the file name must be one of
//!    [`SOURCE_EXTENSIONS`] (or `.proto` when schema files are enabled).
//!    Names without a `.` never match.
//!
//! Symbolic links are neither followed nor deleted. Directories are never
//! removed, even once empty; the packer takes whatever is left.
//!
//! ## Failure Handling
//!
//! Deletion is best-effort. A file that cannot be removed stays in place, is
//! logged at `warn`, and is recorded in [`FilterReport::failures`] so callers
//! and tests can see exactly what went wrong.
//!
//! ## Usage
//!
//! ```rust
//! use crate::corpus::filter::{filter_tree, FilterConfig};
//!
//! let report = filter_tree(Path::new("extract"), &FilterConfig::default());
//! println!("kept {} files", report.kept);
//! ```
//!
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Files strictly larger than this many bytes are always removed.
pub const MAX_SOURCE_FILE_SIZE: u64 = 100_000;

/// Accepted C and C++ source/header extensions (case-sensitive).
pub const SOURCE_EXTENSIONS: [&str; 11] = [
    ".C", ".c", ".H", ".h", ".cc", ".cpp", ".cxx", ".c++", ".hpp", ".tpp", ".t++",
];

/// Extension of protocol buffer schema files.
pub const SCHEMA_EXTENSION: &str = ".proto";

/// Options for a filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Also keep `.proto` schema definitions.
    pub include_schema_files: bool,
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Keep,
    RemoveTooLarge,
    RemoveUnrecognized,
}

/// A file the pass wanted to delete (or inspect) but could not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Tally of a filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub kept: usize,
    pub removed_large: usize,
    pub removed_unrecognized: usize,
    pub failures: Vec<FilterFailure>,
}

impl FilterReport {
    /// Number of files actually deleted.
    pub fn removed(&self) -> usize {
        self.removed_large + self.removed_unrecognized
    }
}

/// Returns `true` if `file_name` carries an accepted extension.
pub fn accepts_file_name(file_name: &str, config: &FilterConfig) -> bool {
    let Some(dot) = file_name.rfind('.') else {
        return false;
    };
    let ext = &file_name[dot..];
    if config.include_schema_files && ext == SCHEMA_EXTENSION {
        return true;
    }
    SOURCE_EXTENSIONS.contains(&ext)
}

/// Decides the fate of one regular file from its name and size.
pub fn decide(file_name: &str, size: u64, config: &FilterConfig) -> FilterDecision {
    if size > MAX_SOURCE_FILE_SIZE {
        FilterDecision::RemoveTooLarge
    } else if accepts_file_name(file_name, config) {
        FilterDecision::Keep
    } else {
        FilterDecision::RemoveUnrecognized
    }
}

/// Runs the filter over every regular file below `root`, deleting rejects.
///
/// Within each directory, subdirectories are visited before the directory's
/// own files. Errors never abort the pass; they end up in the report.
pub fn filter_tree(root: &Path, config: &FilterConfig) -> FilterReport {
    filter_tree_with(root, config, |path| fs::remove_file(path))
}

/// `filter_tree` with the deletion step supplied by the caller.
fn filter_tree_with<F>(root: &Path, config: &FilterConfig, mut remove: F) -> FilterReport
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut report = FilterReport::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            // Directories first, then by name, so descent precedes local files.
            let a_dir = a.file_type().is_dir();
            let b_dir = b.file_type().is_dir();
            b_dir
                .cmp(&a_dir)
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!("Cannot inspect {:?}: {}", path, e);
                report.failures.push(FilterFailure {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // Only regular files are candidates; symlinks report as symlinks here.
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Cannot stat {:?}: {}", path, e);
                report.failures.push(FilterFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let file_name = entry.file_name().to_string_lossy();

        match decide(&file_name, size, config) {
            FilterDecision::Keep => {
                trace!("Keeping {:?}", path);
                report.kept += 1;
            }
            decision => match remove(path) {
                Ok(()) => {
                    trace!("Removed {:?} ({:?})", path, decision);
                    if decision == FilterDecision::RemoveTooLarge {
                        report.removed_large += 1;
                    } else {
                        report.removed_unrecognized += 1;
                    }
                }
                Err(e) => {
                    warn!("Failed to remove {:?}: {}", path, e);
                    report.failures.push(FilterFailure {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    debug!(
        "Filtered {:?}: kept {}, removed {} large, {} unrecognized, {} failures",
        root,
        report.kept,
        report.removed_large,
        report.removed_unrecognized,
        report.failures.len()
    );
    report
}
