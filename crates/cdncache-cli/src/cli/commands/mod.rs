//! CLI command handlers. Each command is in its own file.

mod fetch;
mod init;
mod list;
mod resolve;
mod seed;

use anyhow::Result;
use cdncache_core::config::CacheConfig;
use cdncache_core::css::MirrorTemplates;
use cdncache_core::fetch::CurlFetcher;
use cdncache_core::store::FetchStore;
use serde::Serialize;

pub use fetch::run_fetch;
pub use init::run_init;
pub use list::run_list;
pub use resolve::run_resolve;
pub use seed::run_seed;

/// Store wired from config: curl fetcher, configured mirrors, roots created.
pub(crate) fn open_store(cfg: &CacheConfig) -> Result<FetchStore<CurlFetcher>> {
    let roots = cfg.roots()?;
    roots.ensure()?;
    let fetcher = CurlFetcher::new(cfg.fetch.clone());
    Ok(FetchStore::new(roots, fetcher).with_sources(MirrorTemplates::new(cfg.mirrors.clone())))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
