//! Grade run assembly and the assessment pipeline
//!
//! A [`GradeRun`] is the immutable snapshot a grading pass works from: the
//! rubric, the current submission, the previous attempt when one exists, and
//! the derived revision analytics. [`assess`] drives the control flow:
//! fingerprint, skip when already assessed, generate, validate.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assessment::{validate, AssessmentResult};
use crate::config::GraderConfig;
use crate::error::{Result, RubricheckError};
use crate::fingerprint::{already_assessed, fingerprint, Fingerprint};
use crate::provider::AssessmentGenerator;
use crate::revision::{compute, depth_label, RevisionDepth, RevisionMetrics};
use crate::rubric::RubricSnapshot;
use crate::submission::{elapsed_seconds, SubmissionState};

/// Quick sanity summary of a run before any generation happens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightSummary {
    pub rubric_title: String,
    pub rubric_criteria_count: usize,
    pub rubric_points_total: f64,
    pub submission_word_count: usize,
}

/// One point-in-time snapshot of everything a grading pass needs
///
/// All revision fields are `None` unless a previous attempt with a usable body
/// was supplied; consumers must handle the absent case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRun {
    pub rubric: RubricSnapshot,
    pub submission: SubmissionState,
    pub submission_word_count: usize,

    pub previous: Option<SubmissionState>,
    pub previous_word_count: Option<usize>,
    pub time_since_previous_attempt_seconds: Option<i64>,
    pub revision_metrics: Option<RevisionMetrics>,
    pub revision_depth: Option<RevisionDepth>,
}

impl GradeRun {
    /// Assemble a run from collaborator-supplied inputs.
    ///
    /// Checks the rubric invariants, enforces the configured minimum word
    /// count, and derives revision analytics when a previous attempt with a
    /// non-empty body is present.
    pub fn assemble(
        rubric: RubricSnapshot,
        submission: SubmissionState,
        previous: Option<SubmissionState>,
        config: &GraderConfig,
    ) -> Result<GradeRun> {
        if config.require_rubric {
            rubric.validate()?;
        }

        let submission_word_count = submission.word_count();
        if submission_word_count < config.min_word_count {
            return Err(RubricheckError::SubmissionTooShort {
                words: submission_word_count,
                minimum: config.min_word_count,
            });
        }

        let previous = previous.filter(|p| !p.body.trim().is_empty());
        let previous_word_count = previous.as_ref().map(SubmissionState::word_count);
        let time_since_previous_attempt_seconds = previous
            .as_ref()
            .and_then(|p| elapsed_seconds(p, &submission));
        let revision_metrics = previous.as_ref().map(|p| compute(&p.body, &submission.body));
        let revision_depth = revision_metrics.as_ref().map(depth_label);

        debug!(
            words = submission_word_count,
            has_previous = previous.is_some(),
            "grade run assembled"
        );

        Ok(GradeRun {
            rubric,
            submission,
            submission_word_count,
            previous,
            previous_word_count,
            time_since_previous_attempt_seconds,
            revision_metrics,
            revision_depth,
        })
    }

    pub fn preflight(&self) -> PreflightSummary {
        PreflightSummary {
            rubric_title: self.rubric.title.clone(),
            rubric_criteria_count: self.rubric.criteria.len(),
            rubric_points_total: self.rubric.total_points,
            submission_word_count: self.submission_word_count,
        }
    }
}

/// Outcome of one assessment pass over a grade run
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentOutcome {
    /// This exact submission state already carries an assessment marker;
    /// nothing was generated.
    AlreadyAssessed { fingerprint: Fingerprint },
    /// Freshly validated assessment. The embedding collaborator should stamp
    /// `marker` into its posted comment so the next pass can skip this state.
    Assessed {
        result: AssessmentResult,
        fingerprint: Fingerprint,
        marker: String,
    },
}

/// Run the assessment pipeline over an assembled grade run.
///
/// Computes the submission fingerprint, skips generation when the marker is
/// already present in the submission's comments, otherwise obtains raw text
/// from the generator and validates it strictly against the rubric. Any
/// validation failure is fatal to this attempt; retry policy belongs to the
/// caller.
#[tracing::instrument(skip_all, fields(rubric = %run.rubric.title))]
pub fn assess(run: &GradeRun, generator: &dyn AssessmentGenerator) -> Result<AssessmentOutcome> {
    let fp = fingerprint(&run.submission);

    if already_assessed(&run.submission, &fp) {
        info!(fingerprint = %fp, "submission already assessed, skipping");
        return Ok(AssessmentOutcome::AlreadyAssessed { fingerprint: fp });
    }

    let raw_text = generator.generate(&run.rubric, &run.submission.body)?;
    let result = validate(&raw_text, &run.rubric)?;

    info!(
        fingerprint = %fp,
        overall_score = result.overall_score,
        "submission assessed"
    );

    let marker = fp.marker();
    Ok(AssessmentOutcome::Assessed {
        result,
        fingerprint: fp,
        marker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::RubricCriterion;

    struct FixedGenerator {
        payload: String,
    }

    impl AssessmentGenerator for FixedGenerator {
        fn generate(&self, _rubric: &RubricSnapshot, _submission_text: &str) -> Result<String> {
            Ok(self.payload.clone())
        }
    }

    fn rubric() -> RubricSnapshot {
        RubricSnapshot {
            title: "Essay".to_string(),
            total_points: 100.0,
            criteria: vec![
                RubricCriterion {
                    id: "c1".to_string(),
                    description: "Thesis".to_string(),
                    long_description: String::new(),
                    max_points: 60.0,
                },
                RubricCriterion {
                    id: "c2".to_string(),
                    description: "Grammar".to_string(),
                    long_description: String::new(),
                    max_points: 40.0,
                },
            ],
        }
    }

    fn submission(body: &str) -> SubmissionState {
        SubmissionState {
            attempt: Some(2),
            submitted_at: Some("2026-02-02T10:00:00Z".to_string()),
            updated_at: None,
            body: body.to_string(),
            existing_comments: vec![],
        }
    }

    fn lenient_config() -> GraderConfig {
        GraderConfig {
            min_word_count: 1,
            ..Default::default()
        }
    }

    fn good_payload() -> String {
        serde_json::json!({
            "overall_score": 95,
            "overall_comment": "Strong revision.",
            "criteria": {
                "c1": {"score": 58, "comment": "Clear thesis."},
                "c2": {"score": 37, "comment": "A few slips."}
            }
        })
        .to_string()
    }

    #[test]
    fn test_assemble_without_previous() {
        let run = GradeRun::assemble(
            rubric(),
            submission("A complete essay body."),
            None,
            &lenient_config(),
        )
        .unwrap();

        assert_eq!(run.submission_word_count, 4);
        assert!(run.previous.is_none());
        assert!(run.revision_metrics.is_none());
        assert!(run.revision_depth.is_none());
        assert!(run.time_since_previous_attempt_seconds.is_none());
    }

    #[test]
    fn test_assemble_with_previous_computes_analytics() {
        let mut prev = submission("The cat sat. The dog ran.");
        prev.attempt = Some(1);
        prev.submitted_at = Some("2026-02-01T10:00:00Z".to_string());

        let run = GradeRun::assemble(
            rubric(),
            submission("The cat sat. A bird flew by."),
            Some(prev),
            &lenient_config(),
        )
        .unwrap();

        let metrics = run.revision_metrics.as_ref().unwrap();
        assert_eq!(metrics.sentence_change_pct, 50.0);
        assert_eq!(run.revision_depth, Some(RevisionDepth::Moderate));
        assert_eq!(run.previous_word_count, Some(6));
        // One day between attempts
        assert_eq!(run.time_since_previous_attempt_seconds, Some(86_400));
    }

    #[test]
    fn test_assemble_ignores_previous_with_empty_body() {
        let prev = submission("   ");
        let run = GradeRun::assemble(
            rubric(),
            submission("A complete essay body."),
            Some(prev),
            &lenient_config(),
        )
        .unwrap();
        assert!(run.previous.is_none());
        assert!(run.revision_metrics.is_none());
    }

    #[test]
    fn test_assemble_rejects_empty_rubric() {
        let empty = RubricSnapshot {
            title: "Empty".to_string(),
            total_points: 0.0,
            criteria: vec![],
        };
        let err = GradeRun::assemble(empty, submission("Body text here."), None, &lenient_config())
            .unwrap_err();
        assert!(matches!(err, RubricheckError::EmptyRubric));
    }

    #[test]
    fn test_assemble_enforces_min_word_count() {
        let config = GraderConfig {
            min_word_count: 100,
            ..Default::default()
        };
        let err =
            GradeRun::assemble(rubric(), submission("Too short."), None, &config).unwrap_err();
        assert!(matches!(
            err,
            RubricheckError::SubmissionTooShort {
                words: 2,
                minimum: 100
            }
        ));
    }

    #[test]
    fn test_preflight_summary() {
        let run = GradeRun::assemble(
            rubric(),
            submission("A complete essay body."),
            None,
            &lenient_config(),
        )
        .unwrap();
        let pf = run.preflight();
        assert_eq!(pf.rubric_title, "Essay");
        assert_eq!(pf.rubric_criteria_count, 2);
        assert_eq!(pf.rubric_points_total, 100.0);
        assert_eq!(pf.submission_word_count, 4);
    }

    #[test]
    fn test_assess_happy_path() {
        let run = GradeRun::assemble(
            rubric(),
            submission("A complete essay body."),
            None,
            &lenient_config(),
        )
        .unwrap();
        let gen = FixedGenerator {
            payload: good_payload(),
        };

        let outcome = assess(&run, &gen).unwrap();
        match outcome {
            AssessmentOutcome::Assessed {
                result,
                fingerprint,
                marker,
            } => {
                assert_eq!(result.overall_score, 95.0);
                assert!(marker.contains(fingerprint.as_str()));
            }
            other => panic!("expected Assessed, got {:?}", other),
        }
    }

    #[test]
    fn test_assess_skips_when_marker_present() {
        let mut sub = submission("A complete essay body.");
        let fp = crate::fingerprint::fingerprint(&sub);
        sub.existing_comments = vec![format!("AI Assessment\n\n{}", fp.marker())];

        let run = GradeRun::assemble(rubric(), sub, None, &lenient_config()).unwrap();
        let gen = FixedGenerator {
            payload: good_payload(),
        };

        let outcome = assess(&run, &gen).unwrap();
        assert_eq!(
            outcome,
            AssessmentOutcome::AlreadyAssessed { fingerprint: fp }
        );
    }

    #[test]
    fn test_assess_reassesses_changed_body() {
        // Marker from the previous body must not suppress assessment of a
        // changed one.
        let old = submission("Old essay body here.");
        let old_fp = crate::fingerprint::fingerprint(&old);

        let mut sub = submission("New essay body here.");
        sub.existing_comments = vec![old_fp.marker()];

        let run = GradeRun::assemble(rubric(), sub, None, &lenient_config()).unwrap();
        let gen = FixedGenerator {
            payload: good_payload(),
        };

        assert!(matches!(
            assess(&run, &gen).unwrap(),
            AssessmentOutcome::Assessed { .. }
        ));
    }

    #[test]
    fn test_assess_propagates_validation_failure() {
        let run = GradeRun::assemble(
            rubric(),
            submission("A complete essay body."),
            None,
            &lenient_config(),
        )
        .unwrap();
        let gen = FixedGenerator {
            payload: "not json at all".to_string(),
        };

        let err = assess(&run, &gen).unwrap_err();
        assert!(matches!(err, RubricheckError::Validation(_)));
    }
}
