//! Ordered source lists for CSS dependencies.
//!
//! CDNs often split a package's stylesheet and its fonts/images across hosts
//! with uneven availability, so a package-addressed dependency is also tried
//! on public npm mirrors.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::config::DEFAULT_MIRRORS;

/// `/[css/|npm/]<name>@<version>/<rest>`; `name` may be scoped (`@org/name`).
static PACKAGE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:(?:css|npm)/)?((?:@[^/@]+/)?[^/@]+)@([^/]+)/(.+)$").unwrap()
});

/// Produces the ordered list of URLs to try for one dependency.
pub trait SourceStrategy {
    /// Candidates in attempt order; the first entry is always `primary`.
    fn candidates(&self, primary: &Url) -> Vec<String>;
}

/// Package coordinates matched in a URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePath {
    pub package: String,
    pub version: String,
    pub path: String,
}

impl PackagePath {
    pub fn from_url(url: &Url) -> Option<Self> {
        let caps = PACKAGE_PATH.captures(url.path())?;
        Some(Self {
            package: caps[1].to_string(),
            version: caps[2].to_string(),
            path: caps[3].to_string(),
        })
    }

    fn fill(&self, template: &str, query: Option<&str>) -> String {
        let mut out = template
            .replace("{package}", &self.package)
            .replace("{version}", &self.version)
            .replace("{path}", &self.path);
        if let Some(q) = query {
            out.push('?');
            out.push_str(q);
        }
        out
    }
}

/// Mirrors addressed by package, version and path, e.g.
/// `https://unpkg.com/{package}@{version}/{path}`.
#[derive(Debug, Clone)]
pub struct MirrorTemplates {
    templates: Vec<String>,
}

impl MirrorTemplates {
    pub fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }
}

impl Default for MirrorTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_MIRRORS.iter().map(|s| s.to_string()).collect())
    }
}

impl SourceStrategy for MirrorTemplates {
    fn candidates(&self, primary: &Url) -> Vec<String> {
        let mut out = vec![primary.to_string()];
        let Some(pkg) = PackagePath::from_url(primary) else {
            return out;
        };
        for template in &self.templates {
            let candidate = pkg.fill(template, primary.query());
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

/// Only ever tries the primary URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryOnly;

impl SourceStrategy for PrimaryOnly {
    fn candidates(&self, primary: &Url) -> Vec<String> {
        vec![primary.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn matches_package_layouts() {
        let p = PackagePath::from_url(&u(
            "https://cdn.example.com/npm/lib@1.0.0/dist/fonts/a.woff2",
        ))
        .unwrap();
        assert_eq!(p.package, "lib");
        assert_eq!(p.version, "1.0.0");
        assert_eq!(p.path, "dist/fonts/a.woff2");

        let p = PackagePath::from_url(&u(
            "https://unpkg.com/@fortawesome/fontawesome-free@6.5.1/webfonts/fa-solid-900.woff2",
        ))
        .unwrap();
        assert_eq!(p.package, "@fortawesome/fontawesome-free");
        assert_eq!(p.version, "6.5.1");

        let p =
            PackagePath::from_url(&u("https://fonts.example.net/css/inter@4/inter.woff2")).unwrap();
        assert_eq!(p.package, "inter");
        assert_eq!(p.path, "inter.woff2");

        let cdnjs = u("https://cdnjs.cloudflare.com/ajax/libs/lib/1.0.0/a.woff");
        assert!(PackagePath::from_url(&cdnjs).is_none());
        assert!(PackagePath::from_url(&u("https://cdn.example.com/static/a.woff")).is_none());
    }

    #[test]
    fn primary_first_then_mirrors() {
        let primary = u("https://cdn.example.com/npm/lib@1.0.0/dist/fonts/a.woff2?v=2");
        let c = MirrorTemplates::default().candidates(&primary);
        assert_eq!(
            c,
            vec![
                "https://cdn.example.com/npm/lib@1.0.0/dist/fonts/a.woff2?v=2".to_string(),
                "https://cdn.jsdelivr.net/npm/lib@1.0.0/dist/fonts/a.woff2?v=2".to_string(),
                "https://unpkg.com/lib@1.0.0/dist/fonts/a.woff2?v=2".to_string(),
            ]
        );
    }

    #[test]
    fn no_duplicate_when_primary_is_a_mirror() {
        let primary = u("https://unpkg.com/lib@1.0.0/a.woff");
        let c = MirrorTemplates::default().candidates(&primary);
        assert_eq!(c.len(), 2);
        assert_eq!(c[0], "https://unpkg.com/lib@1.0.0/a.woff");
        assert_eq!(c[1], "https://cdn.jsdelivr.net/npm/lib@1.0.0/a.woff");
    }

    #[test]
    fn unmatched_primary_only() {
        let primary = u("https://static.example.com/img/bg.png");
        assert_eq!(MirrorTemplates::default().candidates(&primary).len(), 1);
        assert_eq!(PrimaryOnly.candidates(&primary).len(), 1);
    }
}
