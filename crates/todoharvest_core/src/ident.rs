//! Stable content identity for normalized task text.

use sha1::{Digest, Sha1};

/// Computes `task_id` as the hex-encoded SHA-1 of the task text.
///
/// Pure function: the same text always yields the same id, regardless of tag,
/// timeline hint, run or file of origin.
pub fn content_id(task_text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(task_text.as_bytes());
    hex::encode(hasher.finalize())
}
