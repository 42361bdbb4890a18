//! Batch seeding from a newline-delimited URL list.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{CacheError, Result};
use crate::fetch::Fetch;
use crate::store::FetchStore;
use crate::url_model::AssetCategory;

/// URLs of a seed file: trimmed, with blank and `#` comment lines removed.
pub fn parse_seed_text(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect()
}

/// Outcome of one seed URL. Failures carry `error` and zero size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedResult {
    pub remote_url: String,
    pub saved_filename: String,
    /// Public path of the stored file; empty on failure.
    pub public_path: String,
    pub size_bytes: u64,
    pub category: AssetCategory,
    pub was_skipped: bool,
    pub error: Option<String>,
}

impl SeedResult {
    fn failed(url: &str, err: &CacheError) -> Self {
        Self {
            remote_url: url.to_string(),
            saved_filename: String::new(),
            public_path: String::new(),
            size_bytes: 0,
            category: AssetCategory::Script,
            was_skipped: false,
            error: Some(err.to_string()),
        }
    }
}

pub struct SeedRunner<'a, F> {
    store: &'a FetchStore<F>,
}

impl<'a, F: Fetch + Clone> SeedRunner<'a, F> {
    pub fn new(store: &'a FetchStore<F>) -> Self {
        Self { store }
    }

    /// Stores every URL of `text` in order. One result per URL; a failing
    /// URL never stops the batch.
    pub fn run(&self, text: &str) -> Vec<SeedResult> {
        let urls = parse_seed_text(text);
        tracing::info!(count = urls.len(), "seeding");
        urls.into_iter().map(|url| self.run_one(url)).collect()
    }

    /// Like [`run`](Self::run) over the contents of `path`. A missing file
    /// is an empty batch.
    pub fn run_file(&self, path: &Path) -> Result<Vec<SeedResult>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(self.run(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no seed file");
                Ok(Vec::new())
            }
            Err(e) => Err(CacheError::storage(path, e)),
        }
    }

    fn run_one(&self, url: &str) -> SeedResult {
        match self.store.store(url) {
            Ok(outcome) => SeedResult {
                remote_url: url.to_string(),
                saved_filename: outcome.record.filename,
                public_path: outcome.record.public_path,
                size_bytes: outcome.record.size_bytes,
                category: outcome.record.category,
                was_skipped: outcome.skipped,
                error: None,
            },
            Err(e) => {
                tracing::warn!(url, kind = e.kind(), error = %e, "seed item failed");
                SeedResult::failed(url, &e)
            }
        }
    }
}

/// `{ count, results }` as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedResponse {
    pub count: usize,
    pub results: Vec<SeedResultView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResultView {
    pub url: String,
    pub saved: String,
    pub access_url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub category: AssetCategory,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub filename: String,
}

impl SeedResponse {
    pub fn new(results: Vec<SeedResult>, public_base_url: &str) -> Self {
        let base = public_base_url.trim_end_matches('/');
        let results: Vec<SeedResultView> = results
            .into_iter()
            .map(|r| SeedResultView {
                access_url: if r.public_path.is_empty() {
                    String::new()
                } else {
                    format!("{base}{}", r.public_path)
                },
                url: r.remote_url,
                saved: r.public_path,
                size: r.size_bytes,
                category: r.category,
                skipped: r.was_skipped,
                error: r.error,
                filename: r.saved_filename,
            })
            .collect();
        Self {
            count: results.len(),
            results,
        }
    }
}
