//! Validation predicates gating each use case.
//!
//! Every rule is a pure function of its input and the slice of stored state the caller
//! already loaded. Within an entity the checks run in a fixed order and the first failure
//! wins, so the same request always produces the same error.

pub mod accounts;
pub mod applications;
pub mod blacklist;
pub mod bootcamps;
pub mod resume;

use crate::domain::{ApplicationState, BootcampState};

/// Bad input or a business-rule violation; surfaced as HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),
    #[error("{field} must be a date in YYYY-MM-DD format")]
    InvalidDate { field: &'static str },
    #[error("malformed form submission: {0}")]
    MalformedForm(String),
    #[error("start date must be before end date")]
    InvalidDateRange,
    #[error("instructor {0} does not exist")]
    UnknownInstructor(i64),
    #[error("user {0} is not an applicant")]
    NotAnApplicant(i64),
    #[error("applicant {0} is blacklisted")]
    ApplicantBlacklisted(i64),
    #[error("bootcamp is {} and not accepting applications", .0.label())]
    BootcampNotOpen(BootcampState),
    #[error("applicant {applicant} has already applied to bootcamp {bootcamp}")]
    DuplicateApplication { applicant: i64, bootcamp: i64 },
    #[error("applicant {0} is already blacklisted")]
    AlreadyBlacklisted(i64),
    #[error("résumé must be a PDF or Word document")]
    UnsupportedResumeType,
    #[error("résumé exceeds the {max} byte limit")]
    ResumeTooLarge { max: usize },
    #[error("only pending applications can be withdrawn (current state: {})", .0.label())]
    NotWithdrawable(ApplicationState),
}

impl ValidationError {
    /// Stable machine-readable discriminator for API clients.
    pub const fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidEmail(_) => "invalid_email",
            ValidationError::WeakPassword { .. } => "weak_password",
            ValidationError::DuplicateEmail(_) => "duplicate_email",
            ValidationError::InvalidDate { .. } => "invalid_date",
            ValidationError::MalformedForm(_) => "malformed_form",
            ValidationError::InvalidDateRange => "invalid_date_range",
            ValidationError::UnknownInstructor(_) => "unknown_instructor",
            ValidationError::NotAnApplicant(_) => "not_an_applicant",
            ValidationError::ApplicantBlacklisted(_) => "applicant_blacklisted",
            ValidationError::BootcampNotOpen(_) => "bootcamp_not_open",
            ValidationError::DuplicateApplication { .. } => "duplicate_application",
            ValidationError::AlreadyBlacklisted(_) => "already_blacklisted",
            ValidationError::UnsupportedResumeType => "unsupported_resume_type",
            ValidationError::ResumeTooLarge { .. } => "resume_too_large",
            ValidationError::NotWithdrawable(_) => "not_withdrawable",
        }
    }
}

/// Illegal lifecycle move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub entity: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
