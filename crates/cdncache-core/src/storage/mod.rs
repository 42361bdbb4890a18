//! Cache roots and disk I/O.
//!
//! Files are written whole through a `.part` temp file and an atomic rename,
//! and an existing file is never replaced.

mod claims;
mod roots;
mod writer;

pub use claims::{PathClaim, PathClaims};
pub use roots::{is_within, CacheRoots};
pub use writer::{write_once, WriteOutcome};

/// Temporary file suffix used before atomic rename. The catalog skips these.
pub const TEMP_SUFFIX: &str = ".part";

/// Cache-Control value for serving cached files: they never change once written.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
