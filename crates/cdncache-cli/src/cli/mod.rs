//! CLI for the cdncache CDN asset mirror.

mod commands;

use anyhow::Result;
use cdncache_core::catalog::{SortBy, SortOrder};
use cdncache_core::config::{self, CacheConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_fetch, run_init, run_list, run_resolve, run_seed};

/// Top-level CLI for the cdncache CDN asset mirror.
#[derive(Debug, Parser)]
#[command(name = "cdncache")]
#[command(
    about = "cdncache: local write-once mirror of CDN stylesheets and scripts",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/cdncache/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the cache directory from the config file.
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every URL of the seed file and print a report.
    Seed {
        /// Seed file (one URL per line, `#` comments). Defaults to the configured seed file.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Fetch and store a single URL.
    Fetch {
        /// Absolute HTTP/HTTPS URL of a stylesheet or script.
        url: String,
    },

    /// Query the catalog of cached files.
    List(ListArgs),

    /// Show where a URL would be stored, without fetching it.
    Resolve {
        /// Absolute HTTP/HTTPS URL.
        url: String,
        /// Content-Type to assume for extensionless URLs.
        #[arg(long, value_name = "CT")]
        content_type: Option<String>,
    },

    /// Create the cache directories.
    Init,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Category label: css, js, font, image or other.
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
    /// Substring of the public path.
    #[arg(long)]
    pub q: Option<String>,
    /// Library name (case-insensitive substring).
    #[arg(long)]
    pub name: Option<String>,
    /// Only files modified at or after this time (epoch milliseconds).
    #[arg(long, value_name = "MS")]
    pub updated_from: Option<u64>,
    /// Only files modified at or before this time (epoch milliseconds).
    #[arg(long, value_name = "MS")]
    pub updated_to: Option<u64>,
    /// mtime, name or size.
    #[arg(long, default_value = "mtime")]
    pub sort_by: SortBy,
    /// asc or desc.
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub page: Option<i64>,
    /// Clamped to 20..=50.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub page_size: Option<i64>,
}

impl Cli {
    /// Config file plus command-line overrides.
    fn load_config(&self) -> Result<CacheConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        if let Some(dir) = &self.cache_dir {
            cfg.cache_dir = Some(dir.clone());
        }
        Ok(cfg)
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Seed { file } => run_seed(&cfg, file.as_deref())?,
            CliCommand::Fetch { url } => run_fetch(&cfg, &url)?,
            CliCommand::List(args) => run_list(&cfg, args)?,
            CliCommand::Resolve { url, content_type } => {
                run_resolve(&cfg, &url, content_type.as_deref())?
            }
            CliCommand::Init => run_init(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
