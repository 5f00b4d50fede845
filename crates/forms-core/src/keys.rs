//! Single-use key generation.

use std::sync::atomic::{AtomicU64, Ordering};

use sha2::Digest;

use forms_model::{Form, Submission};

/// Process-wide counter folded into each key so two keys generated within
/// the same timestamp tick still differ.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate the double opt-in confirmation key for a submission.
///
/// Content-hashed over the submission's unique identity plus a process
/// counter; stable length, URL-safe (lowercase hex).
pub fn confirmation_key(form: &Form, submission: &Submission) -> String {
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = format!(
        "confirm:{}:{}:{}:{}",
        form.id,
        submission.id,
        submission.created_at.timestamp_micros(),
        counter
    );
    hex::encode(sha2::Sha256::digest(seed.as_bytes()))
}
