//! Library name/version from cache-relative paths.
//!
//! CDN layouts recognized, tried in this order (the order is part of the
//! index contract and must not change):
//!
//! 1. jsDelivr/unpkg npm: `npm/<name>@<version>/...` (also `npm/@scope/<name>@<version>`)
//! 2. cdnjs: `ajax/libs/<name>/<version>/...`
//! 3. jsDelivr GitHub: `gh/<org>/<repo>@<version>/...`
//! 4. anything else: the first segment with a non-leading `@`

use serde::Serialize;

use crate::url_model::{extension_label, extension_of};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryMeta {
    pub name: String,
    pub version: String,
    /// Lowercased file extension without the dot; empty if none.
    pub ext: String,
    /// `css`, `js`, `font`, `image` or `other`.
    pub category: String,
}

/// `name@version` → (`name`, `version`); the `@` of a scope prefix is not a separator.
fn split_versioned(segment: &str) -> Option<(&str, &str)> {
    let at = segment.rfind('@').filter(|&i| i > 0)?;
    let (name, version) = (&segment[..at], &segment[at + 1..]);
    if version.is_empty() {
        return None;
    }
    Some((name, version))
}

fn npm_layout(segments: &[&str]) -> Option<(String, String)> {
    let i = segments.iter().position(|s| *s == "npm")?;
    let next = segments.get(i + 1)?;
    if next.starts_with('@') && !next[1..].contains('@') {
        let (name, version) = split_versioned(segments.get(i + 2)?)?;
        return Some((format!("{next}/{name}"), version.to_string()));
    }
    let (name, version) = split_versioned(next)?;
    Some((name.to_string(), version.to_string()))
}

fn cdnjs_layout(segments: &[&str]) -> Option<(String, String)> {
    let i = segments
        .windows(2)
        .position(|w| w[0] == "ajax" && w[1] == "libs")?;
    let name = segments.get(i + 2)?;
    let version = segments.get(i + 3)?;
    // The version directory must not be the file itself.
    if i + 4 >= segments.len() {
        return None;
    }
    Some((name.to_string(), version.to_string()))
}

fn github_layout(segments: &[&str]) -> Option<(String, String)> {
    let i = segments.iter().position(|s| *s == "gh")?;
    let org = segments.get(i + 1)?;
    if let Some((name, version)) = split_versioned(org) {
        return Some((name.to_string(), version.to_string()));
    }
    let (name, version) = split_versioned(segments.get(i + 2)?)?;
    Some((name.to_string(), version.to_string()))
}

fn any_versioned_segment(segments: &[&str]) -> Option<(String, String)> {
    segments.iter().find_map(|s| {
        let (name, version) = split_versioned(s)?;
        Some((name.to_string(), version.to_string()))
    })
}

/// Derives library metadata from a path relative to a cache root.
pub fn extract_metadata(relative_path: &str) -> LibraryMeta {
    let segments: Vec<&str> = relative_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();
    let ext = segments
        .last()
        .and_then(|f| extension_of(f))
        .unwrap_or_default();
    let category = extension_label(&ext).to_string();

    let (name, version) = npm_layout(&segments)
        .or_else(|| cdnjs_layout(&segments))
        .or_else(|| github_layout(&segments))
        .or_else(|| any_versioned_segment(&segments))
        .unwrap_or_default();

    LibraryMeta {
        name,
        version,
        ext,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nv(path: &str) -> (String, String) {
        let m = extract_metadata(path);
        (m.name, m.version)
    }

    #[test]
    fn npm_layout_wins() {
        assert_eq!(
            nv("npm/bootstrap@5.3.0/dist/css/bootstrap.min.css"),
            ("bootstrap".into(), "5.3.0".into())
        );
        assert_eq!(
            nv("npm/@fortawesome/fontawesome-free@6.5.1/css/all.min.css"),
            ("@fortawesome/fontawesome-free".into(), "6.5.1".into())
        );
        // npm takes priority over an earlier versioned segment.
        assert_eq!(nv("x@9/npm/lib@1.0.0/lib.js"), ("lib".into(), "1.0.0".into()));
    }

    #[test]
    fn cdnjs_layout() {
        assert_eq!(
            nv("ajax/libs/font-awesome/6.4.0/css/all.min.css"),
            ("font-awesome".into(), "6.4.0".into())
        );
        assert_eq!(nv("ajax/libs/jquery/3.7.1/jquery.min.js"), ("jquery".into(), "3.7.1".into()));
    }

    #[test]
    fn github_layout() {
        assert_eq!(
            nv("gh/twbs/bootstrap@v5.3.0/dist/js/bootstrap.js"),
            ("bootstrap".into(), "v5.3.0".into())
        );
        assert_eq!(nv("gh/lib@2.1/x.js"), ("lib".into(), "2.1".into()));
    }

    #[test]
    fn fallback_first_at_segment() {
        assert_eq!(
            nv("unpkg.com/vue@3.4.0/dist/vue.global.js"),
            ("vue".into(), "3.4.0".into())
        );
        assert_eq!(nv("lib@1.0.0/dist/lib.css"), ("lib".into(), "1.0.0".into()));
    }

    #[test]
    fn nothing_recognized() {
        let m = extract_metadata("cdn.example.com/site.css");
        assert_eq!(m.name, "");
        assert_eq!(m.version, "");
        assert_eq!(m.ext, "css");
        assert_eq!(m.category, "css");

        let m = extract_metadata("npm/lib@1.0.0/dist/fonts/a.woff2");
        assert_eq!(m.category, "font");
        assert_eq!(m.name, "lib");

        let m = extract_metadata("static/@scope/readme");
        assert_eq!(m.name, "");
        assert_eq!(m.ext, "");
        assert_eq!(m.category, "other");
    }
}
