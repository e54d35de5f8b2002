//! # CorpusRS Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components used by every
//! command handler: configuration and error management.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, path expansion, and validation
//! - `error`: The application error type and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::{self, Overrides}; // For loading configuration
//! use crate::core::error::{CorpusError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
