//! URL modeling: remote URL → storage path, category and public path.
//!
//! Derivation is a compatibility contract: every public URL ever issued
//! depends on it, so changes here break previously served paths.

mod category;
mod path;

use std::path::PathBuf;
use url::Url;

use crate::error::{CacheError, Result};
use crate::storage::{is_within, CacheRoots};

pub use category::{
    category_from_content_type, category_from_extension, extension_label, extension_of,
    AssetCategory,
};
pub use path::{filename_from_url_path, safe_segments, subdir_segments};

/// Filename used when the URL path ends at the root.
pub const PLACEHOLDER_FILENAME: &str = "index";

/// Where a URL is (or would be) stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub storage_path: PathBuf,
    pub storage_dir: PathBuf,
    pub filename: String,
    pub category: AssetCategory,
    subdir: Vec<String>,
}

impl Resolution {
    /// `/css/<subdir>/<filename>` or `/js/<subdir>/<filename>`.
    pub fn public_path(&self) -> String {
        public_path_from_parts(self.category, &self.subdir, &self.filename)
    }
}

fn public_path_from_parts(category: AssetCategory, subdir: &[String], filename: &str) -> String {
    if subdir.is_empty() {
        format!("/{}/{}", category.as_str(), filename)
    } else {
        format!("/{}/{}/{}", category.as_str(), subdir.join("/"), filename)
    }
}

/// Parses an absolute http(s) URL.
pub fn parse_remote_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| CacheError::resolution(url, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CacheError::resolution(
            url,
            format!("unsupported scheme {other:?}"),
        )),
    }
}

/// Maps remote URLs onto the cache roots. Pure; performs no I/O.
#[derive(Debug, Clone)]
pub struct PathResolver {
    roots: CacheRoots,
}

impl PathResolver {
    pub fn new(roots: CacheRoots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &CacheRoots {
        &self.roots
    }

    /// Resolves `url` to its storage location.
    ///
    /// The extension wins over `content_type`; an extensionless filename gets
    /// the category's extension appended so later lookups without a
    /// content-type land on the same path.
    pub fn resolve(&self, url: &str, content_type: Option<&str>) -> Result<Resolution> {
        let parsed = parse_remote_url(url)?;
        let base = filename_from_url_path(&parsed)
            .unwrap_or_else(|| PLACEHOLDER_FILENAME.to_string());
        let ext = extension_of(&base);
        let content_type = content_type.map(str::trim).filter(|ct| !ct.is_empty());

        let category = ext
            .as_deref()
            .and_then(category_from_extension)
            .or_else(|| content_type.map(category_from_content_type))
            .unwrap_or(AssetCategory::Script);

        let filename = if ext.is_none() {
            format!("{}.{}", base, category.default_extension())
        } else {
            base
        };

        Ok(self.place(&parsed, category, filename))
    }

    /// Every path a previous `store` of `url` may have used, most likely first.
    ///
    /// When the extension decides the category there is exactly one. Otherwise
    /// the category came from the response Content-Type, so both roots are checked.
    pub fn candidates(&self, url: &str) -> Result<Vec<Resolution>> {
        let default = self.resolve(url, None)?;
        let decided_by_extension = {
            let parsed = parse_remote_url(url)?;
            filename_from_url_path(&parsed)
                .and_then(|f| extension_of(&f))
                .and_then(|e| category_from_extension(&e))
                .is_some()
        };
        if decided_by_extension {
            return Ok(vec![default]);
        }
        let style = self.resolve(url, Some("text/css"))?;
        Ok(vec![default, style])
    }

    /// Public path of a stored file, using the same sub-directory
    /// normalization as storage.
    pub fn public_path(
        &self,
        url: &str,
        category: AssetCategory,
        filename: &str,
    ) -> Result<String> {
        let parsed = parse_remote_url(url)?;
        Ok(public_path_from_parts(
            category,
            &subdir_segments(&parsed),
            filename,
        ))
    }

    fn place(&self, url: &Url, category: AssetCategory, filename: String) -> Resolution {
        let root = self.roots.root_for(category);
        let subdir = subdir_segments(url);
        let storage_dir = subdir.iter().fold(root.to_path_buf(), |p, s| p.join(s));
        let storage_path = storage_dir.join(&filename);

        if is_within(root, &storage_path) {
            return Resolution {
                storage_path,
                storage_dir,
                filename,
                category,
                subdir,
            };
        }
        tracing::warn!(url = %url, "resolved path escaped its root, collapsing to root");
        Resolution {
            storage_path: root.join(&filename),
            storage_dir: root.to_path_buf(),
            filename,
            category,
            subdir: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn resolver() -> PathResolver {
        PathResolver::new(CacheRoots::new("/cache"))
    }

    #[test]
    fn keeps_url_directory_structure() {
        let r = resolver()
            .resolve(
                "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css",
                None,
            )
            .unwrap();
        assert_eq!(r.category, AssetCategory::Style);
        assert_eq!(r.filename, "bootstrap.min.css");
        assert_eq!(
            r.storage_path,
            Path::new("/cache/css/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css")
        );
        assert_eq!(r.public_path(), "/css/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css");
    }

    #[test]
    fn extension_beats_content_type() {
        let r = resolver()
            .resolve("https://cdn.example.com/a/app.js", Some("text/css"))
            .unwrap();
        assert_eq!(r.category, AssetCategory::Script);
        let r = resolver()
            .resolve("https://cdn.example.com/a/font.woff2", Some("application/octet-stream"))
            .unwrap();
        assert_eq!(r.category, AssetCategory::Style);
        assert_eq!(r.storage_path, Path::new("/cache/css/a/font.woff2"));
    }

    #[test]
    fn extensionless_gets_category_extension() {
        let res = resolver();
        let css = res
            .resolve(
                "https://fonts.example.com/css2/family",
                Some("text/css; charset=utf-8"),
            )
            .unwrap();
        assert_eq!(css.filename, "family.css");
        assert_eq!(css.storage_path, Path::new("/cache/css/css2/family.css"));

        let js = res.resolve("https://fonts.example.com/css2/family", None).unwrap();
        assert_eq!(js.filename, "family.js");
        assert_eq!(js.category, AssetCategory::Script);
    }

    #[test]
    fn same_category_hints_give_same_path() {
        let res = resolver();
        let url = "https://cdn.example.com/pkg/loader";
        let a = res.resolve(url, Some("application/javascript")).unwrap();
        let b = res.resolve(url, Some("text/plain")).unwrap();
        let c = res.resolve(url, None).unwrap();
        assert_eq!(a.storage_path, b.storage_path);
        assert_eq!(a.storage_path, c.storage_path);

        let d = res.resolve(url, Some("font/woff")).unwrap();
        let e = res.resolve(url, Some("text/css")).unwrap();
        assert_eq!(d.storage_path, e.storage_path);
    }

    #[test]
    fn root_url_uses_placeholder_and_host_dir() {
        let r = resolver().resolve("https://cdn.example.com/", None).unwrap();
        assert_eq!(r.filename, "index.js");
        assert_eq!(r.storage_path, Path::new("/cache/js/cdn.example.com/index.js"));
        assert_eq!(r.public_path(), "/js/cdn.example.com/index.js");
    }

    #[test]
    fn hosts_do_not_collide_on_bare_files() {
        let res = resolver();
        let a = res.resolve("https://a.example.com/lib.js", None).unwrap();
        let b = res.resolve("https://b.example.com/lib.js", None).unwrap();
        assert_ne!(a.storage_path, b.storage_path);
        assert_eq!(
            res.public_path("https://a.example.com/lib.js", a.category, &a.filename).unwrap(),
            a.public_path()
        );
    }

    #[test]
    fn traversal_stays_inside_root() {
        let res = resolver();
        for url in [
            "https://evil.example.com/../../../etc/passwd",
            "https://evil.example.com/a/%2e%2e/%2e%2e/%2e%2e/etc/passwd",
            "https://evil.example.com/a\\..\\..\\b/x.css",
        ] {
            let r = res.resolve(url, None).unwrap();
            let root = res.roots().root_for(r.category);
            assert!(is_within(root, &r.storage_path), "{url} -> {:?}", r.storage_path);
        }
    }

    #[test]
    fn candidates_cover_both_roots_only_when_needed() {
        let res = resolver();
        assert_eq!(res.candidates("https://h.example/x/app.js").unwrap().len(), 1);
        let both = res.candidates("https://h.example/x/app").unwrap();
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].category, AssetCategory::Script);
        assert_eq!(both[1].category, AssetCategory::Style);
    }

    #[test]
    fn rejects_malformed_and_non_http() {
        let res = resolver();
        assert_eq!(res.resolve("not a url", None).unwrap_err().kind(), "resolution");
        assert_eq!(res.resolve("data:text/css,body{}", None).unwrap_err().kind(), "resolution");
    }
}
