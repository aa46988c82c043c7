//! Content versions for campaign datasets.
//!
//! A version is a SHA-256 over the stored bytes of a dataset. Values that a
//! backend fills in while decoding never reach the hash, so reloading an
//! unchanged file always yields the same version.

use sha2::{Digest, Sha256};

/// Compute the version string (lowercase hex, unquoted) of stored content.
pub fn content_version(bytes: &[u8]) -> String {
  hex::encode(Sha256::digest(bytes))
}

/// Compare a caller-supplied version with the current one. `If-Match`
/// values may arrive with or without the surrounding quotes.
pub fn version_matches(expected: &str, actual: &str) -> bool {
  let expected = expected.trim().trim_matches('"');
  expected == "*" || expected == actual
}
