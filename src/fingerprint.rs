//! Content-addressed submission fingerprints
//!
//! A fingerprint is a deterministic identity for one submission state: the
//! attempt number, both timestamps, and a SHA-256 of the body. Equality of
//! fingerprints is the at-most-once-assessment guarantee; a state is skipped
//! whenever its marker already appears in the submission's comments.
//!
//! The canonical string form is:
//! `attempt=<n|?>|submitted_at=<ts>|updated_at=<ts>|body_hash=<hex>`
//!
//! This format is embedded verbatim into posted comments as the idempotency
//! marker, so changing it invalidates markers stamped by earlier versions.
//! That is an accepted, documented tradeoff.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::submission::SubmissionState;

/// Fixed prefix for fingerprint markers embedded in comments
pub const FINGERPRINT_PREFIX: &str = "rubricheck_fingerprint:";

/// Opaque, stable identity for a submission state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The marker text a writeback collaborator embeds into a comment
    pub fn marker(&self) -> String {
        format!("{} {}", FINGERPRINT_PREFIX, self.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the fingerprint for a submission state.
///
/// Pure and deterministic: identical discriminating fields always yield an
/// identical string; any change to attempt, either timestamp, or the body
/// changes it.
pub fn fingerprint(state: &SubmissionState) -> Fingerprint {
    let attempt = match state.attempt {
        Some(n) => n.to_string(),
        None => "?".to_string(),
    };
    let submitted_at = state.submitted_at.as_deref().unwrap_or("");
    let updated_at = state.updated_at.as_deref().unwrap_or("");
    let body_hash = sha256_hex(&state.body);

    Fingerprint(format!(
        "attempt={}|submitted_at={}|updated_at={}|body_hash={}",
        attempt, submitted_at, updated_at, body_hash
    ))
}

/// Check whether an assessment with this fingerprint was already recorded.
///
/// Scans the free-text comments for the literal marker substring. This is
/// intentionally a substring search, not structured metadata lookup: the
/// storage medium for comments is free text owned by a separate collaborator.
pub fn already_assessed(state: &SubmissionState, fp: &Fingerprint) -> bool {
    let needle = fp.marker();
    state.existing_comments.iter().any(|c| c.contains(&needle))
}
