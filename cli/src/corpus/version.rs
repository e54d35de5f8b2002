//! # CorpusRS Latest Version Selection (`corpus::version`)
//!
//! File: cli/src/corpus/version.rs
//!
//! ## Overview
//!
//! Picks the newest original tarball out of each [`PackageGroup`].
//!
//! The version key of `acme_1.10+dfsg.orig.tar.gz` is `1.10+dfsg`: the text
//! between the first `_` and the first `.orig.tar`. Keys are compared with a
//! natural ordering, so `1.10` sorts after `1.9`. The key is never validated as
//! a Debian version; it is only a sort key.
//!
//! ## Natural Ordering
//!
//! A key is split into alternating runs of ASCII digits and non-digits:
//! `1.10+dfsg` → `[1] [.] [10] [+dfsg]`. Runs are compared pairwise:
//! - digit vs digit: by numeric value (leading zeros ignored, any length)
//! - text vs text: bytewise
//! - digit vs text: the digit run sorts first
//!
//! When every shared run is equal, the key with fewer runs sorts first.
//!
use crate::corpus::listing::PackageGroup;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};

/// Marks the end of the version key inside a candidate filename.
const VERSION_KEY_END: &str = ".orig.tar";

/// Reasons a group cannot yield a selection.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no candidate tarballs to select from")]
    Empty,

    #[error("cannot derive a version from '{filename}': expected '<package>_<version>.orig.tar.*'")]
    MissingDelimiter { filename: String },
}

/// The tarball chosen for one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedArchive {
    /// Mirror-relative directory, e.g. `pool/main/a/acme`.
    pub dir: String,
    /// Chosen filename, e.g. `acme_1.3.orig.tar.xz`.
    pub filename: String,
}

impl SelectedArchive {
    /// Mirror-relative path used to fetch the archive.
    pub fn fetch_path(&self) -> String {
        format!("{}/{}", self.dir, self.filename)
    }
}

/// One run of a version key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Digits(&'a str),
    Text(&'a str),
}

/// Extracts the version key from a candidate filename.
///
/// # Errors
///
/// [`SelectionError::MissingDelimiter`] when `_` or `.orig.tar` is absent, or
/// when the first `_` comes after `.orig.tar`.
pub fn version_key(filename: &str) -> Result<&str, SelectionError> {
    let missing = || SelectionError::MissingDelimiter {
        filename: filename.to_string(),
    };
    let start = filename.find('_').ok_or_else(missing)? + 1;
    let end = filename.find(VERSION_KEY_END).ok_or_else(missing)?;
    filename.get(start..end).ok_or_else(missing)
}

/// Splits a key into alternating digit and non-digit runs.
fn tokenize(key: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (pos, ch) in key.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                tokens.push(make_token(&key[start..pos], prev));
                start = pos;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        tokens.push(make_token(&key[start..], prev));
    }
    tokens
}

fn make_token(run: &str, digits: bool) -> Token<'_> {
    if digits {
        Token::Digits(run)
    } else {
        Token::Text(run)
    }
}

/// Compares two digit runs by value without parsing into a fixed-width integer.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_tokens(a: &Token<'_>, b: &Token<'_>) -> Ordering {
    match (a, b) {
        (Token::Digits(x), Token::Digits(y)) => compare_digits(x, y),
        (Token::Text(x), Token::Text(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Token::Digits(_), Token::Text(_)) => Ordering::Less,
        (Token::Text(_), Token::Digits(_)) => Ordering::Greater,
    }
}

/// Natural ("human") ordering of two strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = tokenize(a);
    let right = tokenize(b);
    for (x, y) in left.iter().zip(right.iter()) {
        let ord = compare_tokens(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

/// Returns the candidate with the greatest version key.
///
/// Among candidates with equal keys, the one appearing last wins.
///
/// # Errors
///
/// [`SelectionError::Empty`] for an empty slice, or
/// [`SelectionError::MissingDelimiter`] if *any* candidate has no usable key.
/// A malformed candidate fails the whole group instead of being skipped, so a
/// bad name can never silently change which tarball is picked.
pub fn select_latest(candidates: &[String]) -> Result<&str, SelectionError> {
    let mut best: Option<(&str, &str)> = None;
    for candidate in candidates {
        let key = version_key(candidate)?;
        best = match best {
            Some((best_key, best_name)) if natural_cmp(key, best_key) == Ordering::Less => {
                Some((best_key, best_name))
            }
            _ => Some((key, candidate.as_str())),
        };
    }
    best.map(|(_, name)| name).ok_or(SelectionError::Empty)
}

/// Selects the latest tarball of every group, keeping per-group failures.
pub fn select_archives(
    groups: &[PackageGroup],
) -> Vec<(&PackageGroup, Result<SelectedArchive, SelectionError>)> {
    groups
        .iter()
        .map(|group| {
            let selection = select_latest(&group.candidates).map(|filename| SelectedArchive {
                dir: group.path.clone(),
                filename: filename.to_string(),
            });
            (group, selection)
        })
        .collect()
}

/// Selections that succeeded, in listing order. Failed groups are logged and dropped.
pub fn usable_selections(groups: &[PackageGroup]) -> Vec<SelectedArchive> {
    let mut selected = Vec::with_capacity(groups.len());
    for (group, selection) in select_archives(groups) {
        match selection {
            Ok(archive) => selected.push(archive),
            Err(e) => warn!("Skipping {}: {}", group.path, e),
        }
    }
    debug!(
        "Selected {} archive(s) from {} group(s)",
        selected.len(),
        groups.len()
    );
    selected
}
