//! # CorpusRS Mirror Listing Parser (`corpus::listing`)
//!
//! File: cli/src/corpus/listing.rs
//!
//! ## Overview
//!
//! Turns the text of a Debian mirror `ls-lR` dump into an ordered list of
//! [`PackageGroup`]s: one per `pool/main` directory that holds at least one
//! original upstream tarball (`*.orig.tar.*`).
//!
//! ## Listing Format
//!
//! The dump is a sequence of blocks separated by (near-)blank lines:
//!
//! ```text
//! ./pool/main/a/acme:
//! total 1204
//! -rw-r--r-- 1 ftp ftp   1942 Jan  2  2020 acme_1.2-1.debian.tar.xz
//! -rw-r--r-- 1 ftp ftp 601321 Jan  2  2020 acme_1.2.orig.tar.gz
//!
//! ./pool/main/a/acorn:
//! ...
//! ```
//!
//! - Lines are trimmed; anything shorter than 4 characters closes the block.
//! - A block's first line ending in `:` is its header. Only headers under
//!   `./pool/main/` activate the block.
//! - Inside an active block, lines containing `.orig.tar.` are candidates; the
//!   filename is the text after the last space.
//! - Candidate lines in a block with no header at all are a format error.
//!   The parser refuses to guess which directory they belong to.
//!
use thiserror::Error;
use tracing::{debug, trace};

/// Header prefix marking the main section of the pool.
pub const MAIN_POOL_PREFIX: &str = "./pool/main/";

/// Substring identifying an original upstream source tarball.
pub const ORIG_TARBALL_MARKER: &str = ".orig.tar.";

/// Lines shorter than this (after trimming) separate blocks.
const MIN_BLOCK_LINE_LEN: usize = 4;

/// A `pool/main` directory and the original tarballs listed directly beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup {
    /// Mirror-relative directory, e.g. `pool/main/a/acme`.
    pub path: String,
    /// Candidate filenames in listing order.
    pub candidates: Vec<String>,
}

/// Malformed listing input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListingError {
    #[error("line {line}: original tarball '{filename}' appears in a block without a directory header")]
    CandidatesWithoutHeader { line: usize, filename: String },
}

/// Which kind of block the parser is currently inside.
#[derive(Debug)]
enum Block {
    /// No line seen yet since the last separator.
    Fresh,
    /// Header under `./pool/main/`; collecting candidates for `path`.
    Main { path: String, candidates: Vec<String> },
    /// Header for some other directory; contents are ignored.
    Foreign,
    /// First line was not a header.
    Headerless,
}

/// Parses a full listing into package groups.
///
/// Groups are returned in the order their blocks appear. End of input closes
/// the last block the same way a blank line would.
///
/// # Errors
///
/// Returns [`ListingError::CandidatesWithoutHeader`] as soon as an original
/// tarball line is found in a block that never had a header line.
pub fn parse_listing(text: &str) -> Result<Vec<PackageGroup>, ListingError> {
    let mut groups = Vec::new();
    let mut block = Block::Fresh;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();

        if line.len() < MIN_BLOCK_LINE_LEN {
            close_block(std::mem::replace(&mut block, Block::Fresh), &mut groups);
            continue;
        }

        block = match block {
            Block::Fresh => open_block(line),
            Block::Main {
                path,
                mut candidates,
            } => {
                if let Some(filename) = candidate_filename(line) {
                    trace!("Candidate '{}' under '{}'", filename, path);
                    candidates.push(filename.to_string());
                }
                Block::Main { path, candidates }
            }
            Block::Foreign => Block::Foreign,
            Block::Headerless => Block::Headerless,
        };

        // A headerless block may only carry non-candidate lines.
        if matches!(block, Block::Headerless) {
            if let Some(filename) = candidate_filename(line) {
                return Err(ListingError::CandidatesWithoutHeader {
                    line: index + 1,
                    filename: filename.to_string(),
                });
            }
        }
    }
    close_block(block, &mut groups);

    debug!("Parsed {} package groups from listing", groups.len());
    Ok(groups)
}

/// Classifies the first line of a block.
fn open_block(line: &str) -> Block {
    let Some(header) = line.strip_suffix(':') else {
        return Block::Headerless;
    };
    match header.strip_prefix("./") {
        Some(path) if header.starts_with(MAIN_POOL_PREFIX) => Block::Main {
            path: path.trim_end_matches('/').to_string(),
            candidates: Vec::new(),
        },
        _ => Block::Foreign,
    }
}

/// Emits the group for a finished block when it collected anything.
fn close_block(block: Block, groups: &mut Vec<PackageGroup>) {
    if let Block::Main { path, candidates } = block {
        if candidates.is_empty() {
            trace!("Dropping '{}': no original tarballs", path);
        } else {
            groups.push(PackageGroup { path, candidates });
        }
    }
}

/// Returns the filename of an original-tarball line, if the line is one.
fn candidate_filename(line: &str) -> Option<&str> {
    if !line.contains(ORIG_TARBALL_MARKER) {
        return None;
    }
    Some(match line.rfind(' ') {
        Some(pos) => &line[pos + 1..],
        None => line,
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
.:
total 12
drwxr-xr-x 2 ftp ftp 4096 Jan  1  2020 pool
-rw-r--r-- 1 ftp ftp  123 Jan  1  2020 README.orig.tar.gz

./pool/main/a/acme:
total 1204
-rw-r--r-- 1 ftp ftp   1942 Jan  2  2020 acme_1.2-1.debian.tar.xz
-rw-r--r-- 1 ftp ftp   1201 Jan  2  2020 acme_1.2-1.dsc
-rw-r--r-- 1 ftp ftp 601321 Jan  2  2020 acme_1.2.orig.tar.gz
-rw-r--r-- 1 ftp ftp 611321 Jan  2  2021 acme_1.3.orig.tar.xz

./pool/main/a/abandoned:
total 8
-rw-r--r-- 1 ftp ftp   1201 Jan  2  2020 abandoned_0.1-1.dsc

./pool/contrib/b/blob:
total 8
-rw-r--r-- 1 ftp ftp   1201 Jan  2  2020 blob_2.0.orig.tar.gz

./pool/main/z/zed/:
-rw-r--r-- 1 ftp ftp   1201 Jan  2  2020 zed_0.9.orig.tar.bz2
";

    #[test]
    fn test_parse_listing_groups_main_pool_blocks() {
        let groups = parse_listing(LISTING).unwrap();
        assert_eq!(
            groups,
            vec![
                PackageGroup {
                    path: "pool/main/a/acme".into(),
                    candidates: vec![
                        "acme_1.2.orig.tar.gz".into(),
                        "acme_1.3.orig.tar.xz".into()
                    ],
                },
                PackageGroup {
                    path: "pool/main/z/zed".into(),
                    candidates: vec!["zed_0.9.orig.tar.bz2".into()],
                },
            ]
        );
    }

    #[test]
    fn test_block_without_candidates_is_dropped() {
        let text = "./pool/main/a/abandoned:\ntotal 8\n-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 abandoned_0.1-1.dsc\n\n";
        assert!(parse_listing(text).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_sections_are_ignored() {
        let text = "./pool/non-free/n/nf:\n-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 nf_1.0.orig.tar.gz\n";
        assert!(parse_listing(text).unwrap().is_empty());
    }

    #[test]
    fn test_last_block_closed_at_end_of_input() {
        let text = "./pool/main/q/quux:\n-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 quux_3.orig.tar.gz";
        let groups = parse_listing(text).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].candidates, vec!["quux_3.orig.tar.gz"]);
    }

    #[test]
    fn test_short_lines_separate_blocks() {
        // "ab" is under four characters and must close the first block.
        let text = "\
./pool/main/a/one:
-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 one_1.orig.tar.gz
ab
./pool/main/t/two:
-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 two_1.orig.tar.gz
";
        let groups = parse_listing(text).unwrap();
        let paths: Vec<_> = groups.iter().map(|g| g.path.as_str()).collect();
        assert_eq!(paths, vec!["pool/main/a/one", "pool/main/t/two"]);
    }

    #[test]
    fn test_candidates_without_header_are_rejected() {
        let text = "\
./pool/main/a/one:
-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 one_1.orig.tar.gz

total 8
-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 stray_1.orig.tar.gz
";
        let err = parse_listing(text).unwrap_err();
        assert_eq!(
            err,
            ListingError::CandidatesWithoutHeader {
                line: 5,
                filename: "stray_1.orig.tar.gz".into()
            }
        );
    }

    #[test]
    fn test_group_count_matches_blocks_with_candidates() {
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!("./pool/main/p/pkg{i}:\ntotal 1\n"));
            if i % 3 != 0 {
                text.push_str(&format!(
                    "-rw-r--r-- 1 ftp ftp 1 Jan 2 2020 pkg{i}_1.0.orig.tar.gz\n"
                ));
            }
            text.push('\n');
        }
        // Blocks 0, 3, 6 and 9 have no candidates.
        assert_eq!(parse_listing(&text).unwrap().len(), 6);
    }
}
