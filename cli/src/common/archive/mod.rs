//! # CorpusRS Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module serves as the main interface for archive-related utilities
//! within CorpusRS: reading compressed upstream tarballs and mirror listings,
//! and writing the repacked corpus archives.
//!
//! ## Architecture
//!
//! - **`compression`**: Suffix-based format detection (`.gz`, `.xz`, `.bz2`),
//!   streaming decoders, and reading compressed text files such as `ls-lR.gz`.
//! - **`tar`**: Extraction of tarballs into a directory and creation of the
//!   `.xz` output archives.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{compression::Compression, tar};
//!
//! # fn run() -> anyhow::Result<()> {
//! let format = Compression::from_file_name("acme_1.3.orig.tar.bz2").unwrap();
//! tar::extract_archive(Path::new("acme_1.3.orig.tar.bz2"), format, Path::new("extract"))?;
//! # Ok(())
//! # }
//! ```
//!

pub mod compression;
pub mod tar;
