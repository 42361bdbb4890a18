//! `cdncache seed` – fetch every URL of a seed file.

use anyhow::Result;
use cdncache_core::config::CacheConfig;
use cdncache_core::seed::{SeedResponse, SeedRunner};
use std::path::Path;

use super::{open_store, print_json};

pub fn run_seed(cfg: &CacheConfig, file: Option<&Path>) -> Result<()> {
    let path = match file {
        Some(p) => p.to_path_buf(),
        None => cfg.seed_file()?,
    };
    let store = open_store(cfg)?;
    let results = SeedRunner::new(&store).run_file(&path)?;
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(path = %path.display(), count = results.len(), failed, "seed finished");
    print_json(&SeedResponse::new(results, &cfg.public_base_url))
}
