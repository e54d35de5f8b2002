//! # CorpusRS List Command Integration Tests
//!
//! File: cli/tests/list.rs
//!
//! ## Overview
//!
//! Drives `corpusrs list --listing <file>` against local listings; no network.
//!

mod common;
use common::{corpusrs_cmd, write_config, SAMPLE_LISTING};
use flate2::write::GzEncoder;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_list_prints_latest_archive_per_package() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let listing = tmp.path().join("ls-lR");
    fs::write(&listing, SAMPLE_LISTING).unwrap();

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--listing")
        .arg(&listing)
        .assert()
        .success()
        .stdout(
            "pool/main/a/acme/acme_1.10.orig.tar.xz\n\
             pool/main/z/zed/zed_0.9.orig.tar.bz2\n",
        );
}

#[test]
fn test_list_reads_gzipped_listing() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let listing = tmp.path().join("ls-lR.gz");
    let mut enc = GzEncoder::new(File::create(&listing).unwrap(), flate2::Compression::default());
    enc.write_all(SAMPLE_LISTING.as_bytes()).unwrap();
    enc.finish().unwrap();

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--listing"])
        .arg(&listing)
        .assert()
        .success()
        .stdout(predicate::str::contains("pool/main/a/acme/acme_1.10.orig.tar.xz"))
        .stdout(predicate::str::contains("nonfree").not());
}

#[test]
fn test_list_skips_groups_without_version() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let listing = tmp.path().join("ls-lR");
    fs::write(
        &listing,
        "./pool/main/b/broken:\n-rw-r--r-- 1 ftp ftp 10 Jan 1 2020 broken.orig.tar.gz\n\n\
         ./pool/main/z/zed:\n-rw-r--r-- 1 ftp ftp 10 Jan 1 2020 zed_0.9.orig.tar.gz\n",
    )
    .unwrap();

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--listing"])
        .arg(&listing)
        .assert()
        .success()
        .stdout("pool/main/z/zed/zed_0.9.orig.tar.gz\n");
}

#[test]
fn test_list_rejects_candidates_without_header() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let listing = tmp.path().join("ls-lR");
    fs::write(
        &listing,
        "-rw-r--r-- 1 ftp ftp 10 Jan 1 2020 orphan_1.0.orig.tar.gz\n",
    )
    .unwrap();

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--listing"])
        .arg(&listing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mirror listing is malformed"));
}

#[test]
fn test_list_empty_listing_fails() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let listing = tmp.path().join("ls-lR");
    fs::write(&listing, "./pool/contrib/x/xyz:\ntotal 0\n").unwrap();

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--listing"])
        .arg(&listing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no main-pool source packages"));
}

#[test]
fn test_list_missing_listing_file() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--listing"])
        .arg(tmp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load package listing"));
}
