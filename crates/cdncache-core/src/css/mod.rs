//! Stylesheet dependency crawling.
//!
//! Every `url(...)` of a stored stylesheet is fetched once and stored beside
//! the stylesheet, following the same relative layout. Crawling is
//! best-effort: a dependency that cannot be fetched from any source is logged
//! and skipped, it never fails the stylesheet itself.

mod mirrors;
mod refs;

use std::fs;
use std::path::PathBuf;

use crate::fetch::Fetch;
use crate::storage::{is_within, write_once, CacheRoots, PathClaims, WriteOutcome};
use crate::url_model::{parse_remote_url, subdir_segments};

pub use mirrors::{MirrorTemplates, PackagePath, PrimaryOnly, SourceStrategy};
pub use refs::{extract_urls, parse_references, CssReference};

/// What one crawl did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Distinct fetchable references found.
    pub found: usize,
    /// Newly written files.
    pub fetched: Vec<PathBuf>,
    /// References already present on disk.
    pub existing: usize,
    /// References no source could provide, or that could not be written.
    pub failed: Vec<String>,
}

pub struct CssDependencyCrawler<F> {
    roots: CacheRoots,
    fetcher: F,
    sources: Box<dyn SourceStrategy + Send + Sync>,
    claims: PathClaims,
}

impl<F: Fetch> CssDependencyCrawler<F> {
    pub fn new(roots: CacheRoots, fetcher: F) -> Self {
        Self {
            roots,
            fetcher,
            sources: Box::new(MirrorTemplates::default()),
            claims: PathClaims::new(),
        }
    }

    /// Replace the fallback source strategy.
    pub fn with_sources(mut self, sources: impl SourceStrategy + Send + Sync + 'static) -> Self {
        self.sources = Box::new(sources);
        self
    }

    /// Share in-progress claims with other writers.
    pub fn with_claims(mut self, claims: PathClaims) -> Self {
        self.claims = claims;
        self
    }

    /// Fetches every missing dependency of the stylesheet `css` served from `base_url`.
    pub fn crawl(&self, base_url: &str, css: &[u8]) -> CrawlReport {
        let mut report = CrawlReport::default();
        let base = match parse_remote_url(base_url) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!(error = %e, "skipping crawl of unresolvable stylesheet");
                return report;
            }
        };

        let text = String::from_utf8_lossy(css);
        let references = parse_references(&base, &text);
        report.found = references.len();
        if references.is_empty() {
            return report;
        }

        let root = self.roots.css();
        let dir = subdir_segments(&base)
            .iter()
            .fold(root.to_path_buf(), |p, s| p.join(s));
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot create stylesheet directory");
            report.failed = references.into_iter().map(|r| r.raw_href).collect();
            return report;
        }

        for reference in references {
            let dest = reference
                .local_segments
                .iter()
                .fold(dir.clone(), |p, s| p.join(s));
            if !is_within(root, &dest) {
                tracing::warn!(
                    href = %reference.raw_href,
                    "dependency escapes the style root, skipped"
                );
                report.failed.push(reference.raw_href);
                continue;
            }
            if dest.exists() {
                report.existing += 1;
                continue;
            }
            let Some(_claim) = self.claims.claim(&dest) else {
                tracing::debug!(path = %dest.display(), "dependency already being fetched");
                continue;
            };

            match self.fetch_first(&reference) {
                Some((source, bytes)) => match write_once(&dest, &bytes) {
                    Ok(WriteOutcome::Written) => {
                        tracing::debug!(%source, path = %dest.display(), "stored css dependency");
                        report.fetched.push(dest);
                    }
                    Ok(WriteOutcome::AlreadyPresent) => report.existing += 1,
                    Err(e) => {
                        tracing::debug!(error = %e, "css dependency write failed");
                        report.failed.push(reference.raw_href);
                    }
                },
                None => report.failed.push(reference.raw_href),
            }
        }

        if !report.failed.is_empty() {
            tracing::debug!(
                stylesheet = %base,
                failed = report.failed.len(),
                "some css dependencies could not be fetched"
            );
        }
        report
    }

    /// First candidate source that answers successfully.
    fn fetch_first(&self, reference: &CssReference) -> Option<(String, Vec<u8>)> {
        for candidate in self.sources.candidates(&reference.resolved_url) {
            match self.fetcher.fetch(&candidate) {
                Ok(asset) => return Some((candidate, asset.body)),
                Err(e) => tracing::debug!(%candidate, error = %e, "dependency source failed"),
            }
        }
        None
    }
}
