//! `cdncache list` – query the catalog.

use anyhow::Result;
use cdncache_core::catalog::{Catalog, CatalogParams};
use cdncache_core::config::CacheConfig;

use super::print_json;
use crate::cli::ListArgs;

impl From<ListArgs> for CatalogParams {
    fn from(a: ListArgs) -> Self {
        CatalogParams {
            kind: a.kind,
            q: a.q,
            name: a.name,
            updated_from: a.updated_from,
            updated_to: a.updated_to,
            sort_by: a.sort_by,
            order: a.order,
            page: a.page,
            page_size: a.page_size,
        }
    }
}

pub fn run_list(cfg: &CacheConfig, args: ListArgs) -> Result<()> {
    let catalog = Catalog::new(cfg.roots()?, cfg.public_base_url.clone());
    let page = catalog.query(&CatalogParams::from(args));
    print_json(&page)
}
