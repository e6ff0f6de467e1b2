// hasher.rs — SHA-256 helpers for the journal chain.
//
// Chain links are SHA-256 digests of the previous entry's exact JSON line,
// hex-encoded lowercase (64 characters). Hashing the serialized line, not
// the in-memory entry, means verification can run over the raw file with
// no knowledge of field ordering.

use sha2::{Digest, Sha256};

/// SHA-256 of arbitrary bytes as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of a UTF-8 string as a lowercase hex string.
pub fn hash_line(line: &str) -> String {
    hash_bytes(line.as_bytes())
}
