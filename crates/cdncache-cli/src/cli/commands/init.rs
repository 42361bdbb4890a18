//! `cdncache init` – create the cache roots.

use anyhow::{Context, Result};
use cdncache_core::config::CacheConfig;

pub fn run_init(cfg: &CacheConfig) -> Result<()> {
    let roots = cfg.roots()?;
    roots
        .ensure()
        .with_context(|| format!("create {}", roots.dir().display()))?;
    println!("css: {}", roots.css().display());
    println!("js:  {}", roots.js().display());
    Ok(())
}
