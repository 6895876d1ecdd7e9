//! Collaborator capability interfaces
//!
//! Everything network-bound lives outside this crate: rubric retrieval,
//! submission retrieval, and the text-generation call. Each capability is one
//! explicitly named method on a small trait, so an embedding application wires
//! up concrete clients while the core stays pure and testable against
//! in-memory fakes.

use crate::error::Result;
use crate::rubric::RubricSnapshot;
use crate::submission::SubmissionState;

/// Supplies the rubric attached to an assignment
pub trait RubricSource {
    fn rubric(&self, course_id: u64, assignment_id: u64) -> Result<RubricSnapshot>;
}

/// Supplies submission states, current and (optionally) previous
///
/// Text extraction from whatever the source format was (online entry or a
/// document upload) happens upstream; these return plain text.
pub trait SubmissionSource {
    fn current_submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: Option<u64>,
    ) -> Result<SubmissionState>;

    /// The most recent attempt before the current one, when one exists
    fn previous_submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: Option<u64>,
    ) -> Result<Option<SubmissionState>>;
}

/// Produces the raw candidate assessment text for a submission
///
/// The output is an opaque string believed to encode the wire JSON contract;
/// [`crate::assessment::validate`] decides whether to believe it.
pub trait AssessmentGenerator {
    fn generate(&self, rubric: &RubricSnapshot, submission_text: &str) -> Result<String>;
}
