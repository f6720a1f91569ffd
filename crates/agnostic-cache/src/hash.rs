//! Content hashing for entity tags.

use sha1::{Digest, Sha1};

/// Returns the lower-case hex SHA-1 digest of `input`.
///
/// ```
/// assert_eq!(
///     agnostic_cache::hash_string("abc"),
///     "a9993e364706816aba3e25717850c26c9cd0d89d"
/// );
/// ```
#[must_use]
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(&hasher.finalize())
}

mod hex {
    use std::fmt::Write;

    pub fn encode(bytes: &[u8]) -> String {
        bytes
            .iter()
            .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
                let _ = write!(out, "{b:02x}");
                out
            })
    }
}
