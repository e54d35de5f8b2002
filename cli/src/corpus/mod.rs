//! # CorpusRS Corpus Construction (`corpus`)
//!
//! File: cli/src/corpus/mod.rs
//!
//! ## Overview
//!
//! The domain half of CorpusRS: everything that knows about Debian mirror
//! listings, upstream tarball names, and which source files belong in the
//! static-analysis corpus.
//!
//! ## Architecture
//!
//! Data flows one way through the submodules:
//!
//! ```text
//! ls-lR text ─▶ listing ─▶ version ─▶ pipeline ─▶ filter ─▶ <output_dir>/*.xz
//! ```
//!
//! - **`listing`**: Parses the mirror listing into `PackageGroup`s.
//! - **`version`**: Picks the newest `.orig.tar.*` of each group.
//! - **`filter`**: Deletes oversized and non-C/C++ files from an extracted tree.
//! - **`pipeline`**: Fetches, extracts, filters and repacks each selection.
//!

pub mod filter;
pub mod listing;
pub mod pipeline;
pub mod version;
