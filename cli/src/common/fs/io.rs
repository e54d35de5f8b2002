//! # CorpusRS Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes small filesystem helpers shared across CorpusRS:
//! - **`ensure_dir_exists`**: creates a directory (and parents) if missing and
//!   rejects paths that exist but are not directories. Used for the output and
//!   work directories.
//! - **`read_file_to_string`**: `fs::read_to_string` with the failing path in
//!   the error context. Used by configuration loading.
//! - **`resolve_path`**: an absolute, `.`/`..`-free form of a path with
//!   symlinks resolved as far as the path exists. Used to compare configured
//!   directories.
//! - **`make_tree_writable`**: clears the read-only flag on every directory of
//!   a tree so its entries can be deleted.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! # fn run_example() -> Result<()> {
//! io::ensure_dir_exists(Path::new("/home/me/daca2-packages"))?;
//! let text = io::read_file_to_string(Path::new("config.toml"))?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{CorpusError, Result}; // Use standard Result and custom Error types
use anyhow::Context; // For adding context to errors
use std::ffi::OsString;
use std::fs; // Standard filesystem module
use std::path::{Component, Path, PathBuf}; // Filesystem path types
use tracing::{debug, info, warn}; // Logging utilities
use walkdir::WalkDir;

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function creates it, including any
/// necessary parent directories (similar to `mkdir -p`). If the path already
/// exists but is not a directory, `CorpusError::FileSystem` is returned.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(CorpusError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be found, opened, or read, with context
/// indicating which file failed.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Resolves `path` to a comparable form without requiring it to exist.
///
/// The path is made absolute against the current directory, `.` and `..`
/// components are folded lexically, and the longest existing prefix is
/// canonicalized so symlinked spellings of one directory compare equal.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to make {:?} absolute", path))?;

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other.as_os_str()),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing: Vec<OsString> = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(existing) {
            let mut resolved = real;
            for part in missing.iter().rev() {
                resolved.push(part);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(lexical),
        }
    }
}

/// Clears the read-only flag on every directory below (and including) `root`.
///
/// Symlinks are not followed. Failures are logged and skipped; a later
/// deletion inside such a directory reports its own error.
#[allow(clippy::permissions_set_readonly_false)]
pub fn make_tree_writable(root: &Path) {
    for entry in WalkDir::new(root).follow_links(false).into_iter().flatten() {
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            let mut perms = meta.permissions();
            if perms.readonly() {
                perms.set_readonly(false);
                if let Err(e) = fs::set_permissions(entry.path(), perms) {
                    warn!("Could not make {:?} writable: {}", entry.path(), e);
                }
            }
        }
    }
}
