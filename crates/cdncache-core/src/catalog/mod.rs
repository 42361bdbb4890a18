//! Read-only catalog of what is in the cache.
//!
//! The catalog is rebuilt from the filesystem on every query; nothing is
//! indexed or persisted. Both roots are walked, css first.

mod meta;
mod query;
mod walk;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::storage::CacheRoots;
use crate::url_model::AssetCategory;

pub use meta::{extract_metadata, LibraryMeta};
pub use query::{CatalogParams, SortBy, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use walk::{walk, FileRecord};

/// Milliseconds since the Unix epoch; times before the epoch map to 0.
pub fn millis_since_epoch(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One cached file as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Which root the file lives under.
    #[serde(rename = "type")]
    pub root: AssetCategory,
    #[serde(skip)]
    pub relative_path: String,
    #[serde(rename = "path")]
    pub public_path: String,
    #[serde(rename = "url")]
    pub public_url: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Epoch milliseconds.
    pub mtime: u64,
    pub name: String,
    pub version: String,
    pub ext: String,
    pub category: String,
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    /// Items on this page.
    pub count: usize,
    /// Matches before pagination.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub items: Vec<CatalogEntry>,
}

pub struct Catalog {
    roots: CacheRoots,
    public_base_url: String,
}

impl Catalog {
    pub fn new(roots: CacheRoots, public_base_url: impl Into<String>) -> Self {
        Self {
            roots,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Every file under both roots, css root first, in walk order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut out = Vec::new();
        for (root, dir) in self.roots.all() {
            for file in walk(dir) {
                let meta = extract_metadata(&file.relative_path);
                let public_path = format!("/{}/{}", root.as_str(), file.relative_path);
                out.push(CatalogEntry {
                    root,
                    public_url: format!("{}{}", self.public_base_url, public_path),
                    public_path,
                    relative_path: file.relative_path,
                    size_bytes: file.size_bytes,
                    mtime: file.mtime_millis,
                    name: meta.name,
                    version: meta.version,
                    ext: meta.ext,
                    category: meta.category,
                });
            }
        }
        out
    }

    /// Filter, sort and paginate the current cache contents.
    pub fn query(&self, params: &CatalogParams) -> CatalogPage {
        let mut matched: Vec<CatalogEntry> = self
            .entries()
            .into_iter()
            .filter(|e| params.matches(e))
            .collect();
        params.sort(&mut matched);

        let total = matched.len();
        let page = params.effective_page();
        let page_size = params.effective_page_size();
        let start = (page - 1).saturating_mul(page_size);
        let items: Vec<CatalogEntry> = matched.into_iter().skip(start).take(page_size).collect();

        tracing::debug!(total, page, page_size, "catalog query");
        CatalogPage {
            count: items.len(),
            total,
            page,
            page_size,
            has_more: start.saturating_add(page_size) < total,
            items,
        }
    }
}
