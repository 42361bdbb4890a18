//! Error taxonomy for the fetch-and-cache pipeline.
//!
//! Dependency failures inside a stylesheet crawl never reach this type; they
//! are logged and swallowed by [`crate::css`].

use std::io;
use std::path::PathBuf;

/// Errors surfaced by [`crate::store::FetchStore::store`] and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The remote URL could not be parsed or mapped to a storage path.
    #[error("cannot resolve {url}: {reason}")]
    Resolution { url: String, reason: String },

    /// Transport failure (DNS, connect, timeout, TLS, ...).
    #[error("fetch {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// Another store of the same target is in flight in this process.
    #[error("{} is already being fetched", path.display())]
    Busy { path: PathBuf },

    /// Creating a directory or writing a file under a cache root failed.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    pub(crate) fn resolution(url: &str, reason: impl Into<String>) -> Self {
        CacheError::Resolution {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CacheError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Short label for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Resolution { .. } => "resolution",
            CacheError::Fetch { .. } | CacheError::HttpStatus { .. } => "fetch",
            CacheError::Busy { .. } => "busy",
            CacheError::Storage { .. } => "storage",
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
