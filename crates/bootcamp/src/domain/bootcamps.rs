use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserId;
use crate::repository::Entity;

entity_id!(BootcampId);

/// Lifecycle stage of a training program. Moves are operator-driven and forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BootcampState {
    Preparing,
    Open,
    Started,
    Completed,
}

impl BootcampState {
    pub const fn ordinal(self) -> u8 {
        match self {
            BootcampState::Preparing => 0,
            BootcampState::Open => 1,
            BootcampState::Started => 2,
            BootcampState::Completed => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BootcampState::Preparing => "Preparing",
            BootcampState::Open => "Open",
            BootcampState::Started => "Started",
            BootcampState::Completed => "Completed",
        }
    }

    /// Staying put or moving forward (including jumps) is allowed; moving back is not.
    pub const fn can_move_to(self, next: BootcampState) -> bool {
        next.ordinal() >= self.ordinal()
    }

    pub const fn accepts_applications(self) -> bool {
        matches!(self, BootcampState::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: BootcampId,
    pub name: String,
    pub instructor_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub state: BootcampState,
    pub created_at: DateTime<Utc>,
}

impl Entity for Bootcamp {
    type Id = BootcampId;
    const NAME: &'static str = "bootcamp";

    fn id(&self) -> BootcampId {
        self.id
    }

    fn assign_id(&mut self, id: BootcampId) {
        self.id = id;
    }
}

/// Operator-supplied fields for creating or editing a bootcamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootcampDraft {
    pub name: String,
    pub instructor_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
