//! `url(...)` discovery in stylesheet text.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::url_model::safe_segments;

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).unwrap()
});

/// One `url(...)` reference of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssReference {
    /// As written in the stylesheet.
    pub raw_href: String,
    /// Resolved against the stylesheet URL.
    pub resolved_url: Url,
    /// Segments below the stylesheet's directory where the bytes go.
    pub local_segments: Vec<String>,
}

/// Every distinct fetchable `url(...)` target in `css`, in first-seen order.
/// Inline `data:` URIs and fragment-only references (`url(#clip)`) are skipped.
pub fn extract_urls(css: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in CSS_URL.captures_iter(css) {
        let href = caps[1].trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:"))
        {
            continue;
        }
        if !out.iter().any(|seen| seen == href) {
            out.push(href.to_string());
        }
    }
    out
}

/// Percent-decodes `path` before sanitizing, so encoded and literal spellings
/// of one file share a location and `%2E%2E` cannot sneak past the `..` filter.
fn decoded_segments(path: &str) -> Vec<String> {
    safe_segments(&percent_decode_str(path).decode_utf8_lossy())
}

/// Relative location for a reference: its own path with query, fragment,
/// leading slashes and `..` stripped. Absolute and protocol-relative hrefs
/// are placed under their host so they cannot collide with local ones.
pub fn local_segments(raw_href: &str, resolved: &Url) -> Vec<String> {
    let is_absolute = raw_href.starts_with("//") || Url::parse(raw_href).is_ok();
    if is_absolute {
        let mut segments: Vec<String> =
            resolved.host_str().map(str::to_string).into_iter().collect();
        segments.extend(decoded_segments(resolved.path()));
        return segments;
    }
    let path = raw_href
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    decoded_segments(path)
}

/// Parses all references of `css` relative to `base`. Targets that do not
/// resolve to an http(s) URL, or leave no usable local path, are dropped.
pub fn parse_references(base: &Url, css: &str) -> Vec<CssReference> {
    extract_urls(css)
        .into_iter()
        .filter_map(|raw_href| {
            let mut resolved_url = base.join(&raw_href).ok()?;
            resolved_url.set_fragment(None);
            if !matches!(resolved_url.scheme(), "http" | "https") {
                return None;
            }
            let local_segments = local_segments(&raw_href, &resolved_url);
            if local_segments.is_empty() {
                return None;
            }
            Some(CssReference {
                raw_href,
                resolved_url,
                local_segments,
            })
        })
        .collect()
}
