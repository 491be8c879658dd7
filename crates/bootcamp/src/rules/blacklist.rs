use super::{require, ValidationError};
use crate::domain::User;

/// The target must be an applicant, the reason must be non-blank, and the applicant must not
/// already carry an entry. Existence is checked by the caller and reported as not-found.
pub fn ensure_can_blacklist(
    applicant: &User,
    reason: &str,
    existing_entry: bool,
) -> Result<(), ValidationError> {
    if applicant.applicant().is_none() {
        return Err(ValidationError::NotAnApplicant(applicant.id.0));
    }
    require(reason, "reason")?;
    if existing_entry || applicant.is_blacklisted() {
        return Err(ValidationError::AlreadyBlacklisted(applicant.id.0));
    }
    Ok(())
}
