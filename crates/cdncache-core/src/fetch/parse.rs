//! Extract the interesting headers from collected response header lines.

/// Content-Type of the final response.
///
/// With redirects followed, curl reports every hop's headers; a new status
/// line resets what was seen so only the last response counts.
pub(crate) fn content_type(lines: &[String]) -> Option<String> {
    let mut content_type = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                let value = value.trim();
                if !value.is_empty() {
                    content_type = Some(value.to_string());
                }
            }
        }
    }
    content_type
}
