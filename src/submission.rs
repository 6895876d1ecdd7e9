//! Submission state snapshots
//!
//! A [`SubmissionState`] is one point-in-time view of a piece of student work,
//! current or historical, already extracted to plain text by an upstream
//! collaborator. Timestamps stay as the opaque strings the LMS returned; they
//! only get parsed when computing elapsed time between attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::word_count;

/// One point-in-time view of a submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionState {
    /// Attempt number, when the LMS reports one
    #[serde(default)]
    pub attempt: Option<i64>,
    /// ISO-8601 timestamp string, e.g. `2026-01-28T22:00:04Z`
    #[serde(default)]
    pub submitted_at: Option<String>,
    /// ISO-8601 timestamp string of the last update
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Plain-text body; may be empty
    #[serde(default)]
    pub body: String,
    /// Free-text comments already attached to the submission
    #[serde(default)]
    pub existing_comments: Vec<String>,
}

impl SubmissionState {
    /// Word count of the body
    pub fn word_count(&self) -> usize {
        word_count(&self.body)
    }

    /// Parsed `submitted_at` as a UTC instant, when present and well-formed
    pub fn submitted_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.submitted_at.as_deref())
    }
}

/// Parse an ISO-8601 timestamp like `2026-01-28T22:00:04Z` into UTC.
///
/// Returns `None` for missing, blank, or unparseable input rather than
/// failing the surrounding computation.
pub fn parse_timestamp(ts: Option<&str>) -> Option<DateTime<Utc>> {
    let s = ts?.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Seconds elapsed from the previous attempt to the current one.
///
/// `None` unless both timestamps parse and the delta is non-negative.
pub fn elapsed_seconds(previous: &SubmissionState, current: &SubmissionState) -> Option<i64> {
    let prev = previous.submitted_at_utc()?;
    let curr = current.submitted_at_utc()?;
    let delta = (curr - prev).num_seconds();
    if delta >= 0 {
        Some(delta)
    } else {
        None
    }
}
