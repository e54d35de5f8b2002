//! # CorpusRS Filter Command Integration Tests
//!
//! File: cli/tests/filter.rs
//!
//! ## Overview
//!
//! Runs `corpusrs filter` over temporary source trees and checks what survives.
//!

mod common;
use common::{corpusrs_cmd, write_config};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn make_tree(root: &Path) {
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("proto")).unwrap();
    fs::write(root.join("src/main.cpp"), vec![b'x'; 500]).unwrap();
    fs::write(root.join("src/lib.hpp"), vec![b'x'; 500]).unwrap();
    fs::write(root.join("src/generated.cpp"), vec![b'x'; 200_000]).unwrap();
    fs::write(root.join("README.md"), vec![b'x'; 500]).unwrap();
    fs::write(root.join("Makefile"), vec![b'x'; 500]).unwrap();
    fs::write(root.join("proto/service.proto"), vec![b'x'; 500]).unwrap();
}

#[test]
fn test_filter_keeps_only_small_sources() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let tree = tmp.path().join("acme-1.0");
    make_tree(&tree);

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&tree)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"kept:\s+2").unwrap())
        .stdout(predicate::str::is_match(r"removed \(too large\):\s+1").unwrap())
        .stdout(predicate::str::is_match(r"removed \(extension\):\s+3").unwrap());

    assert!(tree.join("src/main.cpp").exists());
    assert!(tree.join("src/lib.hpp").exists());
    assert!(!tree.join("src/generated.cpp").exists());
    assert!(!tree.join("README.md").exists());
    assert!(!tree.join("Makefile").exists());
    assert!(!tree.join("proto/service.proto").exists());
    // Directories survive even when emptied.
    assert!(tree.join("proto").is_dir());
}

#[test]
fn test_filter_protobuf_flag() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let tree = tmp.path().join("grpc-1.0");
    make_tree(&tree);

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .args(["filter", "--protobuf"])
        .arg(&tree)
        .assert()
        .success();
    assert!(tree.join("proto/service.proto").exists());
}

#[test]
fn test_filter_schema_files_from_config() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "[filter]\ninclude_schema_files = true\n");
    let tree = tmp.path().join("grpc-1.0");
    make_tree(&tree);

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&tree)
        .assert()
        .success();
    assert!(tree.join("proto/service.proto").exists());
}

#[test]
fn test_filter_second_pass_removes_nothing() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let tree = tmp.path().join("acme-1.0");
    make_tree(&tree);

    for _ in 0..2 {
        corpusrs_cmd()
            .arg("--config")
            .arg(&config)
            .arg("filter")
            .arg(&tree)
            .assert()
            .success();
    }
    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&tree)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"removed \(too large\):\s+0").unwrap())
        .stdout(predicate::str::is_match(r"removed \(extension\):\s+0").unwrap());
}

#[test]
fn test_filter_rejects_non_directory() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let file = tmp.path().join("main.c");
    fs::write(&file, "int main(){}").unwrap();

    corpusrs_cmd()
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
    assert!(file.exists());
}
