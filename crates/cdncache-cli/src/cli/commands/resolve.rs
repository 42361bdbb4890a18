//! `cdncache resolve` – dry-run path resolution.

use anyhow::Result;
use cdncache_core::config::CacheConfig;
use cdncache_core::storage::IMMUTABLE_CACHE_CONTROL;
use cdncache_core::url_model::PathResolver;
use serde_json::json;

use super::print_json;

pub fn run_resolve(cfg: &CacheConfig, url: &str, content_type: Option<&str>) -> Result<()> {
    let resolver = PathResolver::new(cfg.roots()?);
    let r = resolver.resolve(url, content_type)?;
    let public_path = r.public_path();
    let access_url = format!("{}{}", cfg.public_base_url.trim_end_matches('/'), public_path);
    let exists = r.storage_path.is_file();
    print_json(&json!({
        "url": url,
        "category": r.category,
        "filename": r.filename,
        "storagePath": r.storage_path,
        "publicPath": public_path,
        "accessUrl": access_url,
        "exists": exists,
        "cacheControl": IMMUTABLE_CACHE_CONTROL,
    }))
}
