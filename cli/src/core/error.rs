//! # CorpusRS Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the application-level error type used throughout
//! CorpusRS. Domain layers with richer failure modes (listing parsing,
//! version selection, mirror retrieval) define their own
//! `thiserror` enums next to the code that raises them; everything meets at
//! the command handlers as an `anyhow::Error`.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `CorpusError`: A custom error enum using `thiserror` for run-level failures
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors
//! - Filesystem errors (including exhausted workspace cleanup)
//! - A listing that could not be obtained or contained no packages
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if cfg.mirrors.urls.is_empty() {
//!     return Err(CorpusError::Config("no mirrors configured".into()))?;
//! }
//!
//! // Add context to errors using anyhow
//! let text = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read listing: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the CorpusRS application.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Failed to load package listing: {reason}")]
    ListingUnavailable { reason: String },

    #[error("Package listing contained no main-pool source packages.")]
    EmptyListing,

    #[error("Failed to clean up '{path}' after {attempts} attempts: {reason}")]
    CleanupFailed {
        path: String,
        attempts: u32,
        reason: String,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
