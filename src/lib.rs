//! Rubricheck Core Library
//!
//! Validation and revision analytics for rubric-based assessments.
//!
//! The crate takes untrusted text claiming to be a JSON assessment, validates it
//! strictly against a rubric snapshot, tracks whether a submission state has
//! already been assessed (content-addressed fingerprints), and quantifies how
//! much a resubmission changed relative to a prior attempt.
//!
//! All engines are pure, synchronous functions over immutable inputs; network
//! retrieval and writeback belong to collaborators behind the traits in
//! [`provider`].

pub mod assessment;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod provider;
pub mod revision;
pub mod rubric;
pub mod run;
pub mod submission;
pub mod text;

pub use assessment::{AssessmentResult, CriterionAssessment, ValidationError};
pub use config::GraderConfig;
pub use error::{Result, RubricheckError};
pub use fingerprint::Fingerprint;
pub use revision::{RevisionDepth, RevisionMetrics};
pub use rubric::{RubricCriterion, RubricSnapshot};
pub use run::{AssessmentOutcome, GradeRun, PreflightSummary};
pub use submission::SubmissionState;
