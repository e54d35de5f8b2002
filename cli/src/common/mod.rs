//! # CorpusRS Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! This module is the root for the shared utility modules that the corpus
//! pipeline leans on: archives, filesystem handling, and mirror downloads.
//! None of them know anything about Debian listings or source filtering; that
//! logic lives in `corpus::`.
//!
//! ## Architecture
//!
//! - **`archive`**: Compression detection and decoding, tarball extraction,
//!   and `.xz` archive creation.
//! - **`fs`**: Directory helpers and the scoped `Workspace`.
//! - **`network`**: The `Transport` abstraction, HTTP downloads, and the
//!   retrying `MirrorFetcher`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{archive, fs, network};
//! ```
//!

/// Utilities for handling compressed tarballs.
pub mod archive;
/// Utilities for filesystem operations and the work directory.
pub mod fs;
/// Mirror downloads with retry policy.
pub mod network;
