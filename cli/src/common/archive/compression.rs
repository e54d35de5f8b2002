//! # CorpusRS Compression Utilities (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! ## Overview
//!
//! Maps file suffixes to the compression formats CorpusRS can read and wraps
//! readers with the matching decoder. Upstream tarballs on Debian mirrors come
//! as `.orig.tar.gz`, `.orig.tar.xz` or `.orig.tar.bz2`; the mirror listing
//! itself is `ls-lR.gz`.
//!
//! ## Architecture
//!
//! - **`Compression`**: the supported formats, detected by [`Compression::from_file_name`].
//! - **`Compression::decoder`**: boxes a `flate2`, `xz2` or `bzip2` decoder
//!   around any reader.
//! - **`read_text_file`**: reads a possibly compressed text file into a
//!   `String`, decoding invalid UTF-8 lossily.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Compression formats recognized by suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Xz,
    Bzip2,
}

impl Compression {
    /// Detects the format from the last suffix of `name`.
    ///
    /// Returns `None` for anything that is not `.gz`, `.xz` or `.bz2`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".gz") {
            Some(Self::Gzip)
        } else if name.ends_with(".xz") {
            Some(Self::Xz)
        } else if name.ends_with(".bz2") {
            Some(Self::Bzip2)
        } else {
            None
        }
    }

    /// Wraps `reader` in a streaming decoder for this format.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Self::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        }
    }
}

/// Reads a text file, decompressing it first when its name says it is compressed.
///
/// Mirror listings occasionally contain filenames that are not valid UTF-8;
/// those bytes are replaced rather than failing the whole read.
pub fn read_text_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut reader: Box<dyn Read> = match Compression::from_file_name(&name) {
        Some(format) => format.decoder(BufReader::new(file)),
        None => Box::new(BufReader::new(file)),
    };

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
