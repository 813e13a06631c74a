//! Pipeline shape digests.

use sha2::{Digest, Sha256};

/// Compute a deterministic digest of ordered check names.
///
/// Names are NUL-separated before hashing so `["ab", "c"]` and `["a", "bc"]`
/// never collide. Order matters: a reordered pipeline is a different pipeline.
pub fn checks_digest<S: AsRef<str>>(names: &[S]) -> String {
    let mut hasher = Sha256::new();
    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(b"\0");
    }
    hex::encode(hasher.finalize())
}
