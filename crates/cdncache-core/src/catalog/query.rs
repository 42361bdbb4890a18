//! Catalog query parameters: filters, sort and pagination.

use serde::{Deserialize, Serialize};

use super::CatalogEntry;

pub const DEFAULT_PAGE_SIZE: i64 = 30;
pub const MIN_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Mtime,
    Name,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mtime" => Ok(SortBy::Mtime),
            "name" => Ok(SortBy::Name),
            "size" => Ok(SortBy::Size),
            other => Err(format!("unknown sort key {other:?} (expected mtime, name or size)")),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown order {other:?} (expected asc or desc)")),
        }
    }
}

/// Query parameters as accepted from clients (`type`, `q`, `name`,
/// `updatedFrom`, `updatedTo`, `sortBy`, `order`, `page`, `pageSize`).
/// Every filter is optional; out-of-range paging values are clamped, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogParams {
    /// Matches the entry's `category` label (`css`, `js`, `font`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Substring of the public path.
    pub q: Option<String>,
    /// Case-insensitive substring of the library name.
    pub name: Option<String>,
    /// Inclusive lower bound on mtime, epoch milliseconds.
    pub updated_from: Option<u64>,
    /// Inclusive upper bound on mtime, epoch milliseconds.
    pub updated_to: Option<u64>,
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl CatalogParams {
    /// Page size clamped to `[20, 50]`, default 30.
    pub fn effective_page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE) as usize
    }

    /// 1-based page, at least 1.
    pub fn effective_page(&self) -> usize {
        self.page.unwrap_or(1).max(1) as usize
    }

    /// True when `entry` passes every filter that is set.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let non_empty = |o: &Option<String>| {
            o.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if let Some(kind) = non_empty(&self.kind) {
            if entry.category != kind {
                return false;
            }
        }
        if let Some(q) = non_empty(&self.q) {
            if !entry.public_path.contains(&q) {
                return false;
            }
        }
        if let Some(name) = non_empty(&self.name) {
            if !entry.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(from) = self.updated_from {
            if entry.mtime < from {
                return false;
            }
        }
        if let Some(to) = self.updated_to {
            if entry.mtime > to {
                return false;
            }
        }
        true
    }

    /// Stable sort by the chosen key. Descending is the exact reverse of
    /// ascending, so ties keep a mirrored traversal order.
    pub fn sort(&self, entries: &mut [CatalogEntry]) {
        match self.sort_by {
            SortBy::Mtime => entries.sort_by_key(|e| e.mtime),
            SortBy::Size => entries.sort_by_key(|e| e.size_bytes),
            SortBy::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        if self.order == SortOrder::Desc {
            entries.reverse();
        }
    }
}
