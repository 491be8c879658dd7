use super::{require, InvalidTransition, ValidationError};
use crate::domain::{BootcampDraft, BootcampState, User, UserRole};

/// Draft checks shared by create and update: name, then instructor, then dates.
pub fn ensure_valid_draft(
    draft: &BootcampDraft,
    instructor: Option<&User>,
) -> Result<(), ValidationError> {
    require(&draft.name, "name")?;
    match instructor {
        Some(user) if user.role() == UserRole::Instructor => {}
        _ => return Err(ValidationError::UnknownInstructor(draft.instructor_id.0)),
    }
    if draft.start_date >= draft.end_date {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}

pub fn ensure_state_move(
    current: BootcampState,
    next: BootcampState,
) -> Result<(), InvalidTransition> {
    if current.can_move_to(next) {
        Ok(())
    } else {
        Err(InvalidTransition {
            entity: "bootcamp",
            from: current.label(),
            to: next.label(),
        })
    }
}
