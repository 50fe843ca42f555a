//! Fingerprints recorded next to derived assets.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of a transform configuration.
///
/// The marker file written beside a transformed asset stores this value; a
/// marker whose content differs from the current fingerprint means the file
/// was produced by another configuration.
pub fn transform_fingerprint(transform: &str, primitive: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(transform.as_bytes());
    hasher.update(b"\n");
    hasher.update(primitive.as_bytes());
    hex::encode(hasher.finalize())
}
