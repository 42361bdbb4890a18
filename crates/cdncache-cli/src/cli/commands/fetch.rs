//! `cdncache fetch` – store one URL.

use anyhow::{Context, Result};
use cdncache_core::config::CacheConfig;

use super::{open_store, print_json};

pub fn run_fetch(cfg: &CacheConfig, url: &str) -> Result<()> {
    let store = open_store(cfg)?;
    let outcome = store.store(url).with_context(|| format!("store {url}"))?;
    print_json(&outcome)
}
