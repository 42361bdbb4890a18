//! Filename and sub-directory extraction from URL paths.

use url::Url;

/// Splits a URL path into its directory portion and final segment, ignoring
/// trailing slashes (`/a/b/` → (`/a`, `b`)).
pub(crate) fn split_url_path(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((dir, base)) => (dir, base),
        None => ("", trimmed),
    }
}

/// Extracts the last path segment from a URL for use as a filename.
///
/// Returns `None` if the path is empty/root or the segment is `.`/`..`.
pub fn filename_from_url_path(url: &Url) -> Option<String> {
    let (_, base) = split_url_path(url.path());
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}

/// Normalizes a relative path into safe segments: leading slashes stripped,
/// backslashes treated as separators, empty, `.` and `..` segments dropped.
pub fn safe_segments(raw: &str) -> Vec<String> {
    raw.trim_start_matches(['/', '\\'])
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(str::to_string)
        .collect()
}

/// Sanitized sub-directory segments for a URL's directory portion. When the
/// path has no usable directory, the hostname becomes the only segment so that
/// bare files on different hosts never collide.
pub fn subdir_segments(url: &Url) -> Vec<String> {
    let (dir, _) = split_url_path(url.path());
    let segments = safe_segments(dir);
    if !segments.is_empty() {
        return segments;
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => vec![host.to_string()],
        _ => Vec::new(),
    }
}
