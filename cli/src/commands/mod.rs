//! # CorpusRS Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level subcommands of the CorpusRS CLI and
//! makes them accessible to the main application entry point (`main.rs`).
//!
//! ## Commands
//!
//! - `run`: Download, filter and repack the newest upstream tarball of every
//!   main-pool package.
//! - `list`: Print which archives a run would fetch, without downloading them.
//! - `filter`: Apply the source filter to a local directory tree.
//!
//! Each command defines its own `clap` arguments structure and an async
//! handler. Handlers receive the global `--config` path alongside their args.
//!

/// Handler and arguments for `corpusrs filter`.
pub mod filter;
/// Handler and arguments for `corpusrs list`.
pub mod list;
/// Handler and arguments for `corpusrs run`.
pub mod run;
