//! The two cache roots and the containment check every write goes through.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::url_model::AssetCategory;

/// Immutable description of where cached files live: `<dir>/css` and `<dir>/js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRoots {
    dir: PathBuf,
    css: PathBuf,
    js: PathBuf,
}

impl CacheRoots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            css: dir.join("css"),
            js: dir.join("js"),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn css(&self) -> &Path {
        &self.css
    }

    pub fn js(&self) -> &Path {
        &self.js
    }

    pub fn root_for(&self, category: AssetCategory) -> &Path {
        match category {
            AssetCategory::Style => &self.css,
            AssetCategory::Script => &self.js,
        }
    }

    /// Both roots, style first. Catalog traversal relies on this order.
    pub fn all(&self) -> [(AssetCategory, &Path); 2] {
        [
            (AssetCategory::Style, &self.css),
            (AssetCategory::Script, &self.js),
        ]
    }

    /// Create the cache directory and both roots if missing.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.css)?;
        fs::create_dir_all(&self.js)?;
        Ok(())
    }
}

/// Makes `path` absolute and resolves `.`/`..` lexically (no symlink lookups,
/// the target usually does not exist yet).
fn normalize_lexically(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when `path` is strictly below `root` after lexical normalization.
pub fn is_within(root: &Path, path: &Path) -> bool {
    let root = normalize_lexically(root);
    let path = normalize_lexically(path);
    path != root && path.starts_with(&root)
}
