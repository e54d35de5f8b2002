//! # CorpusRS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Every test
//! runs the real `corpusrs` binary with an explicit `--config` file whose
//! directories live in a temporary directory, so the user's own
//! configuration and `~/daca2-packages` are never touched.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns a `Command` for the compiled `corpusrs` binary.
pub fn corpusrs_cmd() -> Command {
    Command::cargo_bin("corpusrs").expect("Failed to find corpusrs binary for testing")
}

/// Writes a config file under `base` pointing output and work dirs into `base`.
///
/// `extra` is appended verbatim, e.g. a `[mirrors]` or `[retry]` table.
pub fn write_config(base: &Path, extra: &str) -> PathBuf {
    let path = base.join("corpusrs.toml");
    let contents = format!(
        "[paths]\noutput_dir = {:?}\nwork_dir = {:?}\n\n[cleanup]\nattempts = 1\ndelay_secs = 0\n\n{}",
        base.join("out").to_string_lossy(),
        base.join("work").to_string_lossy(),
        extra
    );
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

/// A small `ls-lR` excerpt with two main-pool packages and one contrib package.
pub const SAMPLE_LISTING: &str = "\
./pool/main/a/acme:
total 1204
-rw-r--r-- 1 ftp ftp   1942 Jan  2  2020 acme_1.2-1.debian.tar.xz
-rw-r--r-- 1 ftp ftp 601321 Jan  2  2020 acme_1.2.orig.tar.gz
-rw-r--r-- 1 ftp ftp 611002 Mar  9  2021 acme_1.10.orig.tar.xz

./pool/contrib/n/nonfree:
-rw-r--r-- 1 ftp ftp 1000 Jan  2  2020 nonfree_3.0.orig.tar.gz

./pool/main/z/zed:
-rw-r--r-- 1 ftp ftp 2000 Jan  2  2020 zed_0.9.orig.tar.bz2
";
