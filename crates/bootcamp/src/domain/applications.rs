use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bootcamps::BootcampId;
use super::users::UserId;
use crate::repository::Entity;

entity_id!(ApplicationId);

/// Review stage of an applicant's request to join a bootcamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationState {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationState {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationState::Pending => "Pending",
            ApplicationState::Approved => "Approved",
            ApplicationState::Rejected => "Rejected",
        }
    }

    /// Decisions are final: only a pending application may be approved or rejected.
    pub const fn can_move_to(self, next: ApplicationState) -> bool {
        matches!(
            (self, next),
            (
                ApplicationState::Pending,
                ApplicationState::Approved | ApplicationState::Rejected
            )
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub applicant_id: UserId,
    pub bootcamp_id: BootcampId,
    pub state: ApplicationState,
    pub created_at: DateTime<Utc>,
}

impl Entity for Application {
    type Id = ApplicationId;
    const NAME: &'static str = "application";

    fn id(&self) -> ApplicationId {
        self.id
    }

    fn assign_id(&mut self, id: ApplicationId) {
        self.id = id;
    }

    /// One live application per (applicant, bootcamp); withdrawal deletes the row.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.applicant_id == other.applicant_id && self.bootcamp_id == other.bootcamp_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_reviewable_state() {
        use ApplicationState::*;

        assert!(Pending.can_move_to(Approved));
        assert!(Pending.can_move_to(Rejected));
        assert!(!Pending.can_move_to(Pending));
        assert!(!Approved.can_move_to(Pending));
        assert!(!Approved.can_move_to(Rejected));
        assert!(!Rejected.can_move_to(Approved));
    }
}
