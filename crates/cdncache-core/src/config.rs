use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::CacheRoots;

/// Default fallback mirrors tried after the primary URL of a CSS dependency.
pub const DEFAULT_MIRRORS: [&str; 2] = [
    "https://cdn.jsdelivr.net/npm/{package}@{version}/{path}",
    "https://unpkg.com/{package}@{version}/{path}",
];

/// HTTP fetch parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Whole-request timeout in seconds, applied to every fetch independently.
    pub timeout_secs: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "AssetCache/1.0".to_string(),
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/cdncache/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the `css/` and `js/` roots. Defaults to `$XDG_DATA_HOME/cdncache/cache`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Newline-delimited URL list used by `cdncache seed`. Defaults to
    /// `seed.txt` beside config.toml.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    /// Origin the cached files are served from; prefixed to public paths in reports.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Fallback templates for CSS dependencies hosted as `name@version` packages.
    /// Placeholders: `{package}`, `{version}`, `{path}`.
    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<String>,
    #[serde(default)]
    pub fetch: FetchSettings,
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_mirrors() -> Vec<String> {
    DEFAULT_MIRRORS.iter().map(|s| s.to_string()).collect()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            seed_file: None,
            public_base_url: default_public_base_url(),
            mirrors: default_mirrors(),
            fetch: FetchSettings::default(),
        }
    }
}

impl CacheConfig {
    /// Cache directory, falling back to the XDG data dir.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("cdncache")?;
        Ok(xdg_dirs.get_data_home().join("cdncache").join("cache"))
    }

    /// Seed file, falling back to `seed.txt` in the XDG config dir.
    pub fn seed_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.seed_file {
            return Ok(path.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("cdncache")?;
        Ok(xdg_dirs.get_config_home().join("cdncache").join("seed.txt"))
    }

    pub fn roots(&self) -> Result<CacheRoots> {
        Ok(CacheRoots::new(self.cache_dir()?))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cdncache")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CacheConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path (`--config`).
pub fn load_or_init_at(path: &Path) -> Result<CacheConfig> {
    if !path.exists() {
        let default_cfg = CacheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CacheConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = CacheConfig::default();
        assert_eq!(cfg.fetch.timeout_secs, 20);
        assert_eq!(cfg.fetch.timeout(), Duration::from_secs(20));
        assert_eq!(cfg.fetch.user_agent, "AssetCache/1.0");
        assert_eq!(cfg.public_base_url, "http://localhost:3000");
        assert_eq!(cfg.mirrors.len(), 2);
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CacheConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CacheConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.public_base_url, cfg.public_base_url);
        assert_eq!(parsed.mirrors, cfg.mirrors);
        assert_eq!(parsed.fetch.timeout_secs, cfg.fetch.timeout_secs);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            cache_dir = "/srv/assets"
            public_base_url = "https://assets.internal"
            mirrors = ["https://mirror.example/{package}/{version}/{path}"]

            [fetch]
            timeout_secs = 5
            user_agent = "mirror-bot/2"
        "#;
        let cfg: CacheConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.cache_dir.as_deref(), Some(Path::new("/srv/assets")));
        assert_eq!(cfg.fetch.timeout_secs, 5);
        assert_eq!(cfg.fetch.user_agent, "mirror-bot/2");
        assert_eq!(cfg.mirrors.len(), 1);
        let roots = cfg.roots().unwrap();
        assert_eq!(roots.css(), Path::new("/srv/assets/css"));
        assert_eq!(roots.js(), Path::new("/srv/assets/js"));
    }

    #[test]
    fn config_toml_minimal_uses_defaults() {
        let cfg: CacheConfig = toml::from_str(r#"public_base_url = "http://h""#).unwrap();
        assert_eq!(cfg.fetch.timeout_secs, 20);
        assert_eq!(cfg.mirrors, default_mirrors());
        assert!(cfg.seed_file.is_none());
    }

    #[test]
    fn load_or_init_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.public_base_url, "http://localhost:3000");

        fs::write(&path, "public_base_url = \"http://cdn.local:8080\"\n").unwrap();
        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg.public_base_url, "http://cdn.local:8080");
    }
}
