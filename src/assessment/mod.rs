//! Strict schema validation for claimed assessment payloads
//!
//! The text-generation collaborator returns an opaque string believed to encode:
//!
//! ```json
//! {
//!   "overall_score": 100,
//!   "overall_comment": "...",
//!   "criteria": {
//!     "<criterion_id>": {"score": 60, "comment": "..."}
//!   }
//! }
//! ```
//!
//! Validation is field-exact and all-or-nothing: no silent extras, no silent
//! omissions, no coercion, no repaired values. Exact key-set matching is the
//! only defense against a generative source inventing criteria, renaming them,
//! or dropping one. The first failing check terminates with exactly one error.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::rubric::RubricSnapshot;

/// Tolerance for floating round-off when checking a score against its bound.
/// This is a noise budget, not a grading concession.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Absolute tolerance when comparing `overall_score` to the criterion sum
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Longest excerpt of offending input carried in a parse error
const PARSE_EXCERPT_LEN: usize = 200;

/// Score and rationale for a single rubric criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    pub score: f64,
    /// Non-empty, trimmed
    pub comment: String,
}

/// A validated assessment, constructed only by [`validate`]
///
/// `criteria` holds exactly one entry per rubric criterion id. The map is a
/// `BTreeMap` so iteration and serialization order are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub overall_score: f64,
    /// Non-empty, trimmed
    pub overall_comment: String,
    pub criteria: BTreeMap<String, CriterionAssessment>,
}

impl AssessmentResult {
    /// Serialize back to the wire JSON contract
    pub fn wire_json(&self) -> crate::error::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Why a claimed assessment payload was rejected
///
/// Each variant is a programmatically distinct rejection reason; callers treat
/// any of them as fatal to the assessment attempt. Retrying against the
/// generator is the caller's policy, never this module's.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("model output was empty or all whitespace")]
    EmptyInput,

    #[error("invalid JSON at offset {offset}: {message} (near: {excerpt})")]
    Parse {
        /// Byte offset of the syntax failure in the input
        offset: usize,
        message: String,
        excerpt: String,
    },

    #[error("top-level JSON must be an object")]
    TopLevelNotObject,

    #[error("top-level key mismatch: missing {missing:?}, unexpected {extra:?}")]
    TopLevelKeyMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("criteria key mismatch: missing {missing:?}, unexpected {extra:?}")]
    CriterionKeyMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error(
        "criteria.{id} must be an object with exactly {{score, comment}}: \
         missing {missing:?}, unexpected {extra:?}"
    )]
    CriterionShapeMismatch {
        id: String,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("{location} must be a finite number")]
    ScoreType { location: String },

    #[error("criteria.{id}.score out of range: {score} (allowed 0..={max_points})")]
    ScoreRange {
        id: String,
        score: f64,
        max_points: f64,
    },

    #[error("{location} must be a non-empty string")]
    EmptyComment { location: String },

    #[error("overall_score {observed} does not equal sum of criterion scores {expected}")]
    OverallScoreMismatch { expected: f64, observed: f64 },
}

/// Parse and validate untrusted assessment text against a rubric.
///
/// Runs the checks in strict order; the first failing step terminates and
/// reports exactly one error. On success every score is an accepted `f64`
/// and every comment is trimmed and non-empty.
#[tracing::instrument(skip_all, fields(rubric = %rubric.title))]
pub fn validate(
    raw_text: &str,
    rubric: &RubricSnapshot,
) -> Result<AssessmentResult, ValidationError> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let obj = parse_object(trimmed)?;
    check_top_level_keys(&obj)?;

    let criteria_obj = match obj.get("criteria") {
        Some(Value::Object(map)) => map,
        // A non-object `criteria` presents no criterion ids at all
        _ => {
            return Err(ValidationError::CriterionKeyMismatch {
                missing: rubric.criteria.iter().map(|c| c.id.clone()).collect(),
                extra: Vec::new(),
            })
        }
    };
    check_criterion_keys(criteria_obj, rubric)?;

    let mut accepted: BTreeMap<String, CriterionAssessment> = BTreeMap::new();
    let mut score_sum = 0.0_f64;

    // Rubric order, so the first error names the earliest offending criterion
    for criterion in &rubric.criteria {
        let item = criteria_obj
            .get(&criterion.id)
            .ok_or_else(|| ValidationError::CriterionKeyMismatch {
                missing: vec![criterion.id.clone()],
                extra: Vec::new(),
            })?;
        check_criterion_shape(&criterion.id, item)?;

        let score = as_score(
            item.get("score"),
            &format!("criteria.{}.score", criterion.id),
        )?;
        if score < 0.0 || score > criterion.max_points + SCORE_EPSILON {
            return Err(ValidationError::ScoreRange {
                id: criterion.id.clone(),
                score,
                max_points: criterion.max_points,
            });
        }

        let comment = as_comment(
            item.get("comment"),
            &format!("criteria.{}.comment", criterion.id),
        )?;

        score_sum += score;
        accepted.insert(criterion.id.clone(), CriterionAssessment { score, comment });
    }

    let overall_score = as_score(obj.get("overall_score"), "overall_score")?;
    if (overall_score - score_sum).abs() > SUM_TOLERANCE {
        return Err(ValidationError::OverallScoreMismatch {
            expected: score_sum,
            observed: overall_score,
        });
    }

    let overall_comment = as_comment(obj.get("overall_comment"), "overall_comment")?;

    debug!(
        overall_score,
        criteria = accepted.len(),
        "assessment validated"
    );

    Ok(AssessmentResult {
        overall_score,
        overall_comment,
        criteria: accepted,
    })
}

fn parse_object(text: &str) -> Result<serde_json::Map<String, Value>, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        let offset = byte_offset(text, e.line(), e.column());
        ValidationError::Parse {
            offset,
            message: classify_parse_error(&e),
            excerpt: excerpt_around(text, offset),
        }
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::TopLevelNotObject),
    }
}

/// serde_json error messages embed line/column; strip that tail since the
/// structured fields already carry position
fn classify_parse_error(e: &serde_json::Error) -> String {
    let msg = e.to_string();
    match msg.find(" at line ") {
        Some(idx) => msg[..idx].to_string(),
        None => msg,
    }
}

/// Convert a 1-based (line, column) position to a byte offset
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0;
    for (i, l) in text.split('\n').enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1).min(l.len());
        }
        offset += l.len() + 1;
    }
    text.len()
}

fn excerpt_around(text: &str, offset: usize) -> String {
    // Back up a little so errors at end-of-input still show context
    let mut start = offset.min(text.len()).saturating_sub(PARSE_EXCERPT_LEN / 4);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    text[start..]
        .chars()
        .take(PARSE_EXCERPT_LEN)
        .collect::<String>()
        .replace('\n', "\\n")
}

fn check_top_level_keys(obj: &serde_json::Map<String, Value>) -> Result<(), ValidationError> {
    const REQUIRED: [&str; 3] = ["overall_score", "overall_comment", "criteria"];

    let keys: BTreeSet<&str> = obj.keys().map(String::as_str).collect();
    let required: BTreeSet<&str> = REQUIRED.iter().copied().collect();

    let missing: Vec<String> = required
        .difference(&keys)
        .map(|s| s.to_string())
        .collect();
    let extra: Vec<String> = keys
        .difference(&required)
        .map(|s| s.to_string())
        .collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::TopLevelKeyMismatch { missing, extra })
    }
}

fn check_criterion_keys(
    criteria_obj: &serde_json::Map<String, Value>,
    rubric: &RubricSnapshot,
) -> Result<(), ValidationError> {
    let got: BTreeSet<&str> = criteria_obj.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = rubric.criteria.iter().map(|c| c.id.as_str()).collect();

    let missing: Vec<String> = expected.difference(&got).map(|s| s.to_string()).collect();
    let extra: Vec<String> = got.difference(&expected).map(|s| s.to_string()).collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::CriterionKeyMismatch { missing, extra })
    }
}

fn check_criterion_shape(id: &str, item: &Value) -> Result<(), ValidationError> {
    const REQUIRED: [&str; 2] = ["score", "comment"];

    let Value::Object(map) = item else {
        return Err(ValidationError::CriterionShapeMismatch {
            id: id.to_string(),
            missing: REQUIRED.iter().map(|s| s.to_string()).collect(),
            extra: Vec::new(),
        });
    };

    let keys: BTreeSet<&str> = map.keys().map(String::as_str).collect();
    let required: BTreeSet<&str> = REQUIRED.iter().copied().collect();

    let missing: Vec<String> = required.difference(&keys).map(|s| s.to_string()).collect();
    let extra: Vec<String> = keys.difference(&required).map(|s| s.to_string()).collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::CriterionShapeMismatch {
            id: id.to_string(),
            missing,
            extra,
        })
    }
}

/// Accept only a numeric, non-boolean, finite JSON value
fn as_score(value: Option<&Value>, location: &str) -> Result<f64, ValidationError> {
    let err = || ValidationError::ScoreType {
        location: location.to_string(),
    };
    let Some(Value::Number(n)) = value else {
        return Err(err());
    };
    let score = n.as_f64().ok_or_else(err)?;
    if !score.is_finite() {
        return Err(err());
    }
    Ok(score)
}

/// Accept only a string that is non-empty after trimming; returns it trimmed
fn as_comment(value: Option<&Value>, location: &str) -> Result<String, ValidationError> {
    let err = || ValidationError::EmptyComment {
        location: location.to_string(),
    };
    let Some(Value::String(s)) = value else {
        return Err(err());
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(err());
    }
    Ok(trimmed.to_string())
}
