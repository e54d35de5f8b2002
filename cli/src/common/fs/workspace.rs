//! # CorpusRS Scoped Working Directory (`common::fs::workspace`)
//!
//! File: cli/src/common/fs/workspace.rs
//!
//! ## Overview
//!
//! Every package is downloaded, extracted and filtered inside one shared work
//! directory. `Workspace` owns that directory for the duration of a run:
//!
//! - **`acquire`** creates the directory if needed and removes whatever a
//!   previous (possibly interrupted) run left behind.
//! - **`reset`** empties it between packages.
//! - **`release`** empties it one last time and consumes the handle.
//! - **`Drop`** makes a single best-effort attempt to empty it when the handle
//!   goes away without `release`, e.g. on an early `?` return.
//!
//! Clearing is retried according to a `CleanupPolicy`. Entries that refuse to
//! go because they are read-only (upstream tarballs regularly ship `0555`
//! directories) are made writable and removed again in the same attempt.
//! When every attempt fails the caller receives `CorpusError::CleanupFailed`
//! and the run stops.
//!
use crate::common::fs::io::{ensure_dir_exists, make_tree_writable};
use crate::core::error::{CorpusError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// How hard to try when emptying the work directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

/// Exclusive handle on the work directory.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    policy: CleanupPolicy,
    released: bool,
}

impl Workspace {
    /// Takes ownership of `root`, creating it and clearing any leftovers.
    pub async fn acquire(root: &Path, policy: CleanupPolicy) -> Result<Self> {
        ensure_dir_exists(root)?;
        let workspace = Self {
            root: root.to_path_buf(),
            policy,
            released: false,
        };
        workspace.clear().await?;
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Empties the directory so the next package starts from nothing.
    pub async fn reset(&mut self) -> Result<()> {
        self.clear().await
    }

    /// Empties the directory and gives up ownership.
    pub async fn release(mut self) -> Result<()> {
        let result = self.clear().await;
        self.released = true;
        result
    }

    async fn clear(&self) -> Result<()> {
        let attempts = self.policy.attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match clear_dir_contents(&self.root) {
                Ok(()) => {
                    debug!("Cleared work directory {:?}", self.root);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Cleanup of {:?} failed (attempt {}/{}): {}",
                        self.root, attempt, attempts, e
                    );
                    last_error = Some(e);
                }
            }
            if attempt < attempts && !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        Err(CorpusError::CleanupFailed {
            path: self.root.display().to_string(),
            attempts,
            reason: last_error.map(|e| e.to_string()).unwrap_or_default(),
        }
        .into())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = clear_dir_contents(&self.root) {
            warn!("Work directory {:?} left dirty: {}", self.root, e);
        }
    }
}

/// Removes everything inside `root`, leaving `root` itself in place.
///
/// Symlinks are removed as links; their targets are never touched.
pub fn clear_dir_contents(root: &Path) -> io::Result<()> {
    match remove_children(root) {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            make_tree_writable(root);
            remove_children(root)
        }
        other => other,
    }
}

fn remove_children(root: &Path) -> io::Result<()> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
