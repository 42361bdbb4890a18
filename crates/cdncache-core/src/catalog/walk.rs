//! Iterative directory walk over a cache root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::TEMP_SUFFIX;

use super::millis_since_epoch;

/// A regular file found under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    /// Relative to the walked root, `/`-separated.
    pub relative_path: String,
    pub size_bytes: u64,
    pub mtime_millis: u64,
}

/// Lists every regular file below `root` in a stable order: within each
/// directory, files by name, then subdirectories by name.
///
/// Depth-first with an explicit stack. A missing root yields nothing;
/// unreadable directories and in-flight `.part` files are skipped, and
/// symlinks are not followed.
pub fn walk(root: &Path) -> Vec<FileRecord> {
    let mut out = Vec::new();
    let mut stack: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), String::new())];

    while let Some((dir, prefix)) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) => {
                if dir != root {
                    tracing::debug!(
                        dir = %dir.display(),
                        error = %e,
                        "skipping unreadable directory"
                    );
                }
                continue;
            }
        };
        let mut entries: Vec<fs::DirEntry> = entries.flatten().collect();
        entries.sort_by_key(|e| e.file_name());

        // Files of a directory come before its subdirectories; subdirectories
        // are pushed in reverse so they pop in name order.
        let mut subdirs = Vec::new();
        for entry in entries {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let rel = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            if file_type.is_dir() {
                subdirs.push((entry.path(), rel));
            } else if file_type.is_file() && !name.ends_with(TEMP_SUFFIX) {
                if let Ok(meta) = entry.metadata() {
                    out.push(FileRecord {
                        absolute_path: entry.path(),
                        relative_path: rel,
                        size_bytes: meta.len(),
                        mtime_millis: meta.modified().map(millis_since_epoch).unwrap_or(0),
                    });
                }
            }
        }
        stack.extend(subdirs.into_iter().rev());
    }
    out
}
