use super::{InvalidTransition, ValidationError};
use crate::domain::{ApplicationState, Bootcamp, User};

/// Gate for new applications. Checked in order: the user is an applicant, the applicant is
/// not blacklisted, the bootcamp is open, and no live application exists for the pair.
pub fn ensure_can_apply(
    applicant: &User,
    blacklisted: bool,
    bootcamp: &Bootcamp,
    already_applied: bool,
) -> Result<(), ValidationError> {
    if applicant.applicant().is_none() {
        return Err(ValidationError::NotAnApplicant(applicant.id.0));
    }
    if blacklisted || applicant.is_blacklisted() {
        return Err(ValidationError::ApplicantBlacklisted(applicant.id.0));
    }
    if !bootcamp.state.accepts_applications() {
        return Err(ValidationError::BootcampNotOpen(bootcamp.state));
    }
    if already_applied {
        return Err(ValidationError::DuplicateApplication {
            applicant: applicant.id.0,
            bootcamp: bootcamp.id.0,
        });
    }
    Ok(())
}

pub fn ensure_status_change(
    current: ApplicationState,
    next: ApplicationState,
) -> Result<(), InvalidTransition> {
    if current.can_move_to(next) {
        Ok(())
    } else {
        Err(InvalidTransition {
            entity: "application",
            from: current.label(),
            to: next.label(),
        })
    }
}

/// Applicants may only withdraw while their application is still undecided.
pub fn ensure_withdrawable(state: ApplicationState) -> Result<(), ValidationError> {
    match state {
        ApplicationState::Pending => Ok(()),
        other => Err(ValidationError::NotWithdrawable(other)),
    }
}
