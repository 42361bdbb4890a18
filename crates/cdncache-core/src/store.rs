//! Fetch-and-store with write-once deduplication.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::css::{CrawlReport, CssDependencyCrawler, SourceStrategy};
use crate::error::{CacheError, Result};
use crate::fetch::Fetch;
use crate::storage::{write_once, CacheRoots, PathClaims};
use crate::url_model::{AssetCategory, PathResolver, Resolution};

/// A file in the cache and the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub remote_url: String,
    pub category: AssetCategory,
    pub storage_path: PathBuf,
    pub public_path: String,
    pub filename: String,
    pub size_bytes: u64,
    #[serde(serialize_with = "serialize_millis")]
    pub fetched_at: SystemTime,
}

fn serialize_millis<S: serde::Serializer>(
    t: &SystemTime,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(crate::catalog::millis_since_epoch(*t))
}

/// Result of [`FetchStore::store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome {
    #[serde(flatten)]
    pub record: AssetRecord,
    /// True on a cache hit: nothing was downloaded for the URL itself.
    pub skipped: bool,
}

pub struct FetchStore<F> {
    resolver: PathResolver,
    fetcher: F,
    crawler: CssDependencyCrawler<F>,
    claims: PathClaims,
}

impl<F: Fetch + Clone> FetchStore<F> {
    pub fn new(roots: CacheRoots, fetcher: F) -> Self {
        let claims = PathClaims::new();
        Self {
            resolver: PathResolver::new(roots.clone()),
            crawler: CssDependencyCrawler::new(roots, fetcher.clone()).with_claims(claims.clone()),
            fetcher,
            claims,
        }
    }

    /// Replace the fallback strategy used for stylesheet dependencies.
    pub fn with_sources(mut self, sources: impl SourceStrategy + Send + Sync + 'static) -> Self {
        self.crawler = self.crawler.with_sources(sources);
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Stores `url` unless it is already cached. Stylesheets get their
    /// dependencies crawled in both cases, so dependencies missing from an
    /// earlier run are picked up without refetching the stylesheet.
    pub fn store(&self, url: &str) -> Result<StoreOutcome> {
        let url = url.trim();
        let candidates = self.resolver.candidates(url)?;
        for candidate in &candidates {
            if candidate.storage_path.is_file() {
                tracing::debug!(url, path = %candidate.storage_path.display(), "cache hit");
                let record = record_for(url, candidate)?;
                if candidate.category == AssetCategory::Style {
                    let bytes = fs::read(&candidate.storage_path)
                        .map_err(|e| CacheError::storage(&candidate.storage_path, e))?;
                    self.crawl(url, &bytes);
                }
                return Ok(StoreOutcome {
                    record,
                    skipped: true,
                });
            }
        }

        let Some(_claim) = self.claims.claim(&candidates[0].storage_path) else {
            return Err(CacheError::Busy {
                path: candidates[0].storage_path.clone(),
            });
        };
        let asset = self.fetcher.fetch(url)?;
        let target = self.resolver.resolve(url, asset.content_type.as_deref())?;
        write_once(&target.storage_path, &asset.body)?;
        let record = record_for(url, &target)?;
        tracing::info!(
            url,
            path = %record.public_path,
            size = record.size_bytes,
            "stored asset"
        );

        if target.category == AssetCategory::Style {
            self.crawl(url, &asset.body);
        }
        Ok(StoreOutcome {
            record,
            skipped: false,
        })
    }

    fn crawl(&self, url: &str, css: &[u8]) -> CrawlReport {
        let report = self.crawler.crawl(url, css);
        if !report.fetched.is_empty() || !report.failed.is_empty() {
            tracing::info!(
                url,
                found = report.found,
                fetched = report.fetched.len(),
                failed = report.failed.len(),
                "crawled stylesheet dependencies"
            );
        }
        report
    }
}

fn record_for(url: &str, r: &Resolution) -> Result<AssetRecord> {
    let meta = stat(&r.storage_path)?;
    Ok(AssetRecord {
        remote_url: url.to_string(),
        category: r.category,
        storage_path: r.storage_path.clone(),
        public_path: r.public_path(),
        filename: r.filename.clone(),
        size_bytes: meta.len(),
        fetched_at: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
    })
}

fn stat(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|e| CacheError::storage(path, e))
}
