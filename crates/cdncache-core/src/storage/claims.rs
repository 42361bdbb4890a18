//! In-process advisory claims on storage paths.
//!
//! A writer claims its destination before fetching; a second claimant for the
//! same path gets `None` and skips, so concurrent callers converge on one fetch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct PathClaims {
    in_progress: Arc<Mutex<HashSet<PathBuf>>>,
}

impl PathClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `path`; `None` while another claim on it is alive.
    pub fn claim(&self, path: &Path) -> Option<PathClaim> {
        let mut set = self.in_progress.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(path.to_path_buf()) {
            return None;
        }
        Some(PathClaim {
            claims: Arc::clone(&self.in_progress),
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    fn is_claimed(&self, path: &Path) -> bool {
        self.in_progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }
}

/// Released on drop.
#[derive(Debug)]
pub struct PathClaim {
    claims: Arc<Mutex<HashSet<PathBuf>>>,
    path: PathBuf,
}

impl Drop for PathClaim {
    fn drop(&mut self) {
        self.claims
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let claims = PathClaims::new();
        let p = Path::new("/cache/css/a.css");
        let first = claims.claim(p).expect("first claim");
        assert!(claims.claim(p).is_none());
        assert!(claims.is_claimed(p));
        assert!(claims.claim(Path::new("/cache/css/b.css")).is_some());
        drop(first);
        assert!(!claims.is_claimed(p));
        assert!(claims.claim(p).is_some());
    }

    #[test]
    fn clones_share_state() {
        let claims = PathClaims::new();
        let other = claims.clone();
        let _held = claims.claim(Path::new("x")).unwrap();
        assert!(other.claim(Path::new("x")).is_none());
    }
}
