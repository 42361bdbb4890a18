//! Asset category inference from file extension and Content-Type.

use serde::{Deserialize, Serialize};

const FONT_EXTENSIONS: &[&str] = &["woff", "woff2", "ttf", "otf", "eot"];
const IMAGE_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "gif", "webp"];

/// Which cache root a file belongs to. Fonts and images referenced by
/// stylesheets live with the stylesheets, so they are `Style` too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "css")]
    Style,
    #[serde(rename = "js")]
    Script,
}

impl AssetCategory {
    /// Short name used in public paths and reports (`css` / `js`).
    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Style => "css",
            AssetCategory::Script => "js",
        }
    }

    /// Extension appended to extensionless filenames.
    pub fn default_extension(self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of `filename` without the dot, if any.
///
/// Dotfiles (`.htaccess`) and trailing dots have no extension.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Category implied by an extension alone; `None` when the extension is not decisive.
pub fn category_from_extension(ext: &str) -> Option<AssetCategory> {
    match ext {
        "css" => Some(AssetCategory::Style),
        "js" => Some(AssetCategory::Script),
        e if FONT_EXTENSIONS.contains(&e) || IMAGE_EXTENSIONS.contains(&e) => {
            Some(AssetCategory::Style)
        }
        _ => None,
    }
}

/// Category implied by a Content-Type header value (parameters ignored).
pub fn category_from_content_type(content_type: &str) -> AssetCategory {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if mime == "text/css" || mime.starts_with("font/") || mime.starts_with("image/") {
        AssetCategory::Style
    } else {
        AssetCategory::Script
    }
}

/// Display label for an extension: `css`, `js`, `font`, `image` or `other`.
pub fn extension_label(ext: &str) -> &'static str {
    match ext {
        "css" => "css",
        "js" | "mjs" | "cjs" => "js",
        e if FONT_EXTENSIONS.contains(&e) => "font",
        e if IMAGE_EXTENSIONS.contains(&e) => "image",
        _ => "other",
    }
}
