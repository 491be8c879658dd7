use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserId;
use crate::repository::Entity;

entity_id!(BlacklistEntryId);

/// Exclusion record; while present the applicant cannot submit new applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    pub id: BlacklistEntryId,
    pub applicant_id: UserId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for BlacklistEntry {
    type Id = BlacklistEntryId;
    const NAME: &'static str = "blacklist entry";

    fn id(&self) -> BlacklistEntryId {
        self.id
    }

    fn assign_id(&mut self, id: BlacklistEntryId) {
        self.id = id;
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.applicant_id == other.applicant_id
    }
}
