//! # CorpusRS Mirror Retrieval (`common::network::fetch`)
//!
//! File: cli/src/common/network/fetch.rs
//!
//! ## Overview
//!
//! Downloads mirror-relative paths (`ls-lR.gz`, `pool/main/a/acme/acme_1.3.orig.tar.xz`)
//! to local files, trying a list of Debian mirrors under a bounded retry policy.
//!
//! ## Architecture
//!
//! - **`Transport`**: a single download attempt of one absolute URL to a file.
//!   `HttpTransport` implements it with `reqwest`; tests substitute in-memory fakes.
//! - **`RetryPolicy`**: mirror list, number of rounds, fixed delay between
//!   rounds, and the per-attempt connect/idle timeout. A transfer that keeps
//!   receiving data is never cut off, however long the tarball takes.
//! - **`MirrorFetcher`**: runs the policy. Each round tries every mirror in
//!   order and stops at the first success. A round where every mirror failed
//!   is followed by the fixed delay, unless it was the last round.
//!
//! ```text
//! round 1: mirror A ✗ → mirror B ✗ → sleep(delay)
//! round 2: mirror A ✗ → mirror B ✓ → done
//! ```
//!
use futures_util::StreamExt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Errors raised while retrieving files from mirrors.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),

    #[error("no mirrors configured")]
    NoMirrors,

    #[error("'{path}' could not be fetched from {mirrors} mirror(s) in {attempts} round(s); last error: {last}")]
    Exhausted {
        path: String,
        mirrors: usize,
        attempts: u32,
        last: String,
    },
}

/// Bounded retry behaviour for mirror downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Mirror base URLs, tried in order within each round.
    pub mirrors: Vec<String>,
    /// Number of rounds over the whole mirror list.
    pub max_attempts: u32,
    /// Pause after a round in which every mirror failed.
    pub delay: Duration,
    /// Connect timeout, and the longest a download may go without receiving data.
    pub timeout: Duration,
}

/// A single download attempt.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Downloads `url` into `dest`, replacing any existing file.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// `reqwest`-backed transport streaming response bodies straight to disk.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a client that gives up when connecting, or any single read,
    /// takes longer than `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(concat!("corpusrs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let http_err = |e: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(http_err)?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

impl Transport for HttpTransport {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        match self.stream_to_file(url, dest).await {
            Ok(bytes) => {
                debug!("Downloaded {} bytes from {}", bytes, url);
                Ok(())
            }
            Err(e) => {
                // Never leave a truncated file behind for the next step to pick up.
                if dest.exists() {
                    let _ = tokio::fs::remove_file(dest).await;
                }
                Err(e)
            }
        }
    }
}

/// Joins a mirror base URL and a mirror-relative path with exactly one `/`.
pub fn mirror_url(base: &str, relative_path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

/// Applies a [`RetryPolicy`] on top of a [`Transport`].
pub struct MirrorFetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> MirrorFetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetches `relative_path` into `dest`, returning the mirror that served it.
    ///
    /// # Errors
    ///
    /// [`FetchError::NoMirrors`] for an empty mirror list, otherwise
    /// [`FetchError::Exhausted`] once every round has failed.
    pub async fn fetch(&self, relative_path: &str, dest: &Path) -> Result<String, FetchError> {
        if self.policy.mirrors.is_empty() {
            return Err(FetchError::NoMirrors);
        }
        let rounds = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for round in 1..=rounds {
            for mirror in &self.policy.mirrors {
                let url = mirror_url(mirror, relative_path);
                debug!("Fetching {} (round {}/{})", url, round, rounds);
                match self.transport.download(&url, dest).await {
                    Ok(()) => {
                        info!("Fetched {}", url);
                        return Ok(mirror.clone());
                    }
                    Err(e) => {
                        warn!("Download of {} failed: {}", url, e);
                        last_error = e.to_string();
                    }
                }
            }
            if round < rounds && !self.policy.delay.is_zero() {
                info!(
                    "All mirrors failed for '{}'; retrying in {}s",
                    relative_path,
                    self.policy.delay.as_secs()
                );
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        Err(FetchError::Exhausted {
            path: relative_path.to_string(),
            mirrors: self.policy.mirrors.len(),
            attempts: rounds,
            last: last_error,
        })
    }
}
