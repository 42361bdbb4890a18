//! Whole-buffer, write-once file persistence.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, Result};

use super::TEMP_SUFFIX;

/// Outcome of [`write_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Something else put a file at the destination first; it was left untouched.
    AlreadyPresent,
}

/// Path for the temp file: appends `.part` to the final path (e.g. `a.css` → `a.css.part`).
fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `bytes` to `final_path` unless a file already exists there.
///
/// Parent directories are created. Data goes to a `.part` sibling first and is
/// renamed into place, so readers never see a half-written file.
pub fn write_once(final_path: &Path, bytes: &[u8]) -> Result<WriteOutcome> {
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent).map_err(|e| CacheError::storage(parent, e))?;
    }
    if final_path.exists() {
        return Ok(WriteOutcome::AlreadyPresent);
    }

    let tmp = temp_path(final_path);
    let written = fs::File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .map_err(|e| CacheError::storage(&tmp, e));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if final_path.exists() {
        let _ = fs::remove_file(&tmp);
        return Ok(WriteOutcome::AlreadyPresent);
    }
    fs::rename(&tmp, final_path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CacheError::storage(final_path, e)
    })?;
    Ok(WriteOutcome::Written)
}
