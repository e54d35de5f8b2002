//! # CorpusRS Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module groups the filesystem helpers used by the pipeline and the
//! command handlers.
//!
//! ## Architecture
//!
//! - **`io`**: Basic operations such as ensuring a directory exists and reading
//!   a file to a string with contextual errors.
//! - **`workspace`**: The scoped work directory (`Workspace`) that is cleared on
//!   acquisition, between packages, and on release, with bounded retries.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::{io, workspace::{CleanupPolicy, Workspace}};
//!
//! # async fn run_example(policy: CleanupPolicy) -> Result<()> {
//! io::ensure_dir_exists(Path::new("/home/me/daca2-packages"))?;
//! let workspace = Workspace::acquire(Path::new("/home/me/daca2-packages/tmp"), policy).await?;
//! // ... download and extract into workspace.path() ...
//! workspace.release().await?;
//! # Ok(())
//! # }
//! ```
//!

/// Contains basic file I/O operations (e.g., `ensure_dir_exists`, `read_file_to_string`).
pub mod io;
/// Contains the scoped work directory used while processing packages.
pub mod workspace;
