//! # CorpusRS Network Utilities Module (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! Groups the network-facing code of CorpusRS. The only network activity is
//! downloading files from Debian mirrors, so the module currently holds a
//! single submodule:
//!
//! - **`fetch`**: the `Transport` trait, the `reqwest`-based `HttpTransport`,
//!   the `RetryPolicy` and the `MirrorFetcher` that walks the mirror list.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::network::fetch::{HttpTransport, MirrorFetcher};
//!
//! # async fn run(policy: RetryPolicy, dest: &Path) -> anyhow::Result<()> {
//! let transport = HttpTransport::new(policy.timeout)?;
//! let fetcher = MirrorFetcher::new(transport, policy);
//! fetcher.fetch("ls-lR.gz", dest).await?;
//! # Ok(())
//! # }
//! ```
//!

/// Mirror downloads with bounded retries.
pub mod fetch;
