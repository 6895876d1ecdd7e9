//! Rubric snapshot types
//!
//! A rubric is supplied by an external retrieval collaborator (see
//! [`crate::provider::RubricSource`]) and treated as read-only here. The
//! snapshot is the ground truth the schema validator enforces against.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RubricheckError};

/// One scoring dimension within a rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCriterion {
    /// Opaque, externally assigned id, unique within the rubric
    pub id: String,
    /// Short criterion description
    pub description: String,
    /// Longer grading guidance, already normalized to plain text upstream
    #[serde(default)]
    pub long_description: String,
    /// Maximum awardable points for this criterion
    pub max_points: f64,
}

/// A point-in-time view of a rubric
///
/// `total_points` is informational and may legitimately diverge from the sum of
/// criterion points at the rubric-authoring layer. Assessment validation
/// enforces consistency against `criteria`, never against `total_points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricSnapshot {
    pub title: String,
    pub total_points: f64,
    /// Criteria in rubric order; ids are unique
    pub criteria: Vec<RubricCriterion>,
}

impl RubricSnapshot {
    /// Check the snapshot invariants: at least one criterion, unique ids,
    /// non-negative max points.
    pub fn validate(&self) -> Result<()> {
        if self.criteria.is_empty() {
            return Err(RubricheckError::EmptyRubric);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for c in &self.criteria {
            if c.id.is_empty() {
                return Err(RubricheckError::invalid_rubric("criterion with empty id"));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(RubricheckError::invalid_rubric(format!(
                    "duplicate criterion id: {}",
                    c.id
                )));
            }
            if !c.max_points.is_finite() || c.max_points < 0.0 {
                return Err(RubricheckError::invalid_rubric(format!(
                    "criterion {} has invalid max_points: {}",
                    c.id, c.max_points
                )));
            }
        }
        Ok(())
    }

    /// Sum of criterion max points (may differ from `total_points`)
    pub fn criteria_points_sum(&self) -> f64 {
        self.criteria.iter().map(|c| c.max_points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(id: &str, max: f64) -> RubricCriterion {
        RubricCriterion {
            id: id.to_string(),
            description: format!("Criterion {}", id),
            long_description: String::new(),
            max_points: max,
        }
    }

    #[test]
    fn test_validate_ok() {
        let rubric = RubricSnapshot {
            title: "Essay".to_string(),
            total_points: 100.0,
            criteria: vec![criterion("c1", 60.0), criterion("c2", 40.0)],
        };
        assert!(rubric.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_rubric() {
        let rubric = RubricSnapshot {
            title: "Empty".to_string(),
            total_points: 0.0,
            criteria: vec![],
        };
        assert!(matches!(
            rubric.validate(),
            Err(RubricheckError::EmptyRubric)
        ));
    }

    #[test]
    fn test_validate_duplicate_id() {
        let rubric = RubricSnapshot {
            title: "Essay".to_string(),
            total_points: 20.0,
            criteria: vec![criterion("c1", 10.0), criterion("c1", 10.0)],
        };
        let err = rubric.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate criterion id"));
    }

    #[test]
    fn test_validate_negative_points() {
        let rubric = RubricSnapshot {
            title: "Essay".to_string(),
            total_points: 10.0,
            criteria: vec![criterion("c1", -1.0)],
        };
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_total_points_may_diverge_from_sum() {
        // Informational field only; validate() must not compare the two.
        let rubric = RubricSnapshot {
            title: "Essay".to_string(),
            total_points: 50.0,
            criteria: vec![criterion("c1", 60.0), criterion("c2", 40.0)],
        };
        assert!(rubric.validate().is_ok());
        assert_eq!(rubric.criteria_points_sum(), 100.0);
    }
}
