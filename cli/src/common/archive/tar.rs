//! # CorpusRS TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module unpacks upstream source tarballs and writes the repacked corpus
//! archives.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for the archive structure, combined with
//! the decoders from `common::archive::compression` for reading and `xz2` for
//! writing.
//!
//! - **`extract_archive`** streams a compressed tarball into a destination
//!   directory. The `tar` crate refuses to place entries outside that
//!   directory (`..` components are skipped, leading `/` is dropped).
//! - **`first_top_level_dir`** finds the directory an upstream tarball
//!   conventionally unpacks into (`acme-1.3/`).
//! - **`pack_directory_xz`** archives one directory, entries prefixed by the
//!   directory's own name, into an xz-compressed tar file. Paths in the
//!   exclusion set (with everything beneath them) are left out.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{compression::Compression, tar};
//!
//! # fn main() -> Result<()> {
//! tar::extract_archive(Path::new("acme_1.3.orig.tar.gz"), Compression::Gzip, Path::new("extract"))?;
//! if let Some(top) = tar::first_top_level_dir(Path::new("extract"))? {
//!     tar::pack_directory_xz(&top, Path::new("out/acme_1.3.orig.tar.xz"), &HashSet::new())?;
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::common::archive::compression::Compression; // Decoder selection by suffix
use crate::core::error::Result; // Use the standard Result type from the core module
use anyhow::{anyhow, Context}; // For adding contextual information to errors
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf}; // Filesystem path types
use tracing::debug;
use walkdir::WalkDir;

/// xz preset used for the output archives.
const XZ_LEVEL: u32 = 6;

/// Unpacks `archive_path` (compressed with `compression`) into `dest_dir`.
///
/// `dest_dir` is created if it does not exist.
///
/// ## Errors
///
/// Returns an `Err` if the archive cannot be opened, is not a valid compressed
/// tarball, or an entry cannot be written.
pub fn extract_archive(archive_path: &Path, compression: Compression, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create extraction directory {:?}", dest_dir))?;

    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive {:?}", archive_path))?;
    let decoder = compression.decoder(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    archive
        .unpack(dest_dir)
        .with_context(|| format!("Failed to extract {:?} into {:?}", archive_path, dest_dir))?;

    debug!("Extracted {:?} into {:?}", archive_path, dest_dir);
    Ok(())
}

/// Returns the first directory (by name) directly inside `root`, if any.
///
/// Symbolic links to directories are not considered.
pub fn first_top_level_dir(root: &Path) -> Result<Option<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to read {:?}", root))? {
        let entry = entry.with_context(|| format!("Failed to read entry in {:?}", root))?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs.into_iter().next())
}

/// # Pack Directory as `.xz` Tarball (`pack_directory_xz`)
///
/// Writes an xz-compressed tar archive of `dir` to `output`. Entries inside the
/// archive are prefixed with the directory's own name, so unpacking the result
/// recreates `dir` as a single top-level folder. Any path contained in
/// `exclude` is skipped together with its descendants. Entries are added in
/// file-name order and symlinks are stored as links. An existing `output` is
/// overwritten.
///
/// ## Errors
///
/// Returns an `Err` if `dir` has no usable name, the output file cannot be
/// created, the tree cannot be walked, any entry cannot be appended, or
/// finishing either the tar or the xz stream fails.
pub fn pack_directory_xz(dir: &Path, output: &Path, exclude: &HashSet<PathBuf>) -> Result<()> {
    let name = dir
        .file_name()
        .map(Path::new)
        .ok_or_else(|| anyhow!("Cannot archive {:?}: path has no directory name", dir))?;

    let out_file =
        File::create(output).with_context(|| format!("Failed to create {:?}", output))?;
    let encoder = xz2::write::XzEncoder::new(out_file, XZ_LEVEL);
    let mut tar_builder = tar::Builder::new(encoder);
    tar_builder.follow_symlinks(false);

    let mut walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", dir))?;
        let path = entry.path();
        if exclude.contains(path) {
            debug!("Leaving {:?} out of {:?}", path, output);
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }
        let relative = path.strip_prefix(dir).unwrap_or(Path::new(""));
        tar_builder
            .append_path_with_name(path, name.join(relative))
            .with_context(|| format!("Failed to add {:?} to the tar archive", path))?;
    }

    // Finalize the TAR archive structure, then flush the xz stream footer.
    let encoder = tar_builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    encoder
        .finish()
        .context("Failed to finish xz compression stream")?;

    debug!("Packed {:?} into {:?}", dir, output);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    /// Builds a gzipped tarball containing `files` (path, contents).
    fn make_tar_gz(path: &Path, files: &[(&str, &str)]) -> Result<()> {
        let enc = flate2::write::GzEncoder::new(File::create(path)?, flate2::Compression::default());
        let mut builder = tar::Builder::new(enc);
        for (name, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, contents.as_bytes())?;
        }
        builder.into_inner()?.finish()?;
        Ok(())
    }

    fn xz_entries(path: &Path) -> Result<BTreeSet<String>> {
        let decoder = Compression::Xz.decoder(File::open(path)?);
        let mut archive = tar::Archive::new(decoder);
        let mut names = BTreeSet::new();
        for entry in archive.entries()? {
            let entry = entry?;
            names.insert(entry.path()?.to_string_lossy().replace('\\', "/"));
        }
        Ok(names)
    }

    #[test]
    fn test_extract_then_locate_top_level_dir() -> Result<()> {
        let tmp = tempdir()?;
        let archive = tmp.path().join("acme_1.0.orig.tar.gz");
        make_tar_gz(
            &archive,
            &[("acme-1.0/src/main.c", "int main(){}"), ("acme-1.0/README", "hi")],
        )?;

        let dest = tmp.path().join("extract");
        extract_archive(&archive, Compression::Gzip, &dest)?;

        assert!(dest.join("acme-1.0/src/main.c").is_file());
        assert_eq!(first_top_level_dir(&dest)?, Some(dest.join("acme-1.0")));
        Ok(())
    }

    #[test]
    fn test_first_top_level_dir_ignores_files_and_sorts() -> Result<()> {
        let tmp = tempdir()?;
        fs::write(tmp.path().join("aaa.txt"), "x")?;
        fs::create_dir(tmp.path().join("zeta"))?;
        fs::create_dir(tmp.path().join("beta"))?;
        assert_eq!(first_top_level_dir(tmp.path())?, Some(tmp.path().join("beta")));

        let empty = tempdir()?;
        assert_eq!(first_top_level_dir(empty.path())?, None);
        Ok(())
    }

    #[test]
    fn test_extract_rejects_garbage() -> Result<()> {
        let tmp = tempdir()?;
        let bogus = tmp.path().join("bogus.orig.tar.xz");
        fs::write(&bogus, "definitely not xz")?;
        assert!(extract_archive(&bogus, Compression::Xz, &tmp.path().join("out")).is_err());
        Ok(())
    }

    #[test]
    fn test_pack_directory_xz_prefixes_entries() -> Result<()> {
        let tmp = tempdir()?;
        let dir = tmp.path().join("acme-1.0");
        fs::create_dir_all(dir.join("src"))?;
        fs::write(dir.join("src/main.c"), "int main(){}")?;
        fs::write(dir.join("acme.h"), "#pragma once")?;

        let output = tmp.path().join("acme_1.0.orig.tar.xz");
        pack_directory_xz(&dir, &output, &HashSet::new())?;

        let names = xz_entries(&output)?;
        assert!(names.contains("acme-1.0/src/main.c"));
        assert!(names.contains("acme-1.0/acme.h"));
        assert!(names.iter().all(|n| n.starts_with("acme-1.0")));
        Ok(())
    }

    #[test]
    fn test_pack_directory_xz_leaves_out_excluded_paths() -> Result<()> {
        let tmp = tempdir()?;
        let dir = tmp.path().join("acme-1.0");
        fs::create_dir_all(dir.join("docs/api"))?;
        fs::write(dir.join("main.c"), "int main(){}")?;
        fs::write(dir.join("docs/README.md"), "stuck")?;
        fs::write(dir.join("docs/api/index.html"), "stuck")?;
        fs::write(dir.join("docs/keep.h"), "#pragma once")?;

        let exclude: HashSet<PathBuf> = [dir.join("docs/README.md"), dir.join("docs/api")]
            .into_iter()
            .collect();
        let output = tmp.path().join("acme_1.0.orig.tar.xz");
        pack_directory_xz(&dir, &output, &exclude)?;

        let names = xz_entries(&output)?;
        assert!(names.contains("acme-1.0/main.c"));
        assert!(names.contains("acme-1.0/docs/keep.h"));
        assert!(names.iter().all(|n| !n.contains("README.md")));
        assert!(names.iter().all(|n| !n.contains("docs/api")));
        Ok(())
    }
}
