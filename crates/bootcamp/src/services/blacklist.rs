use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::{found, ServiceError};
use crate::domain::{BlacklistEntry, BlacklistEntryId, UserId};
use crate::repository::{RepositoryError, UnitOfWork};
use crate::rules::{blacklist as rules, ValidationError};

/// Applicant exclusion list. The entry and the applicant's flag always change together.
pub struct BlacklistService<U> {
    store: Arc<U>,
}

impl<U> Clone for BlacklistService<U> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<U> BlacklistService<U>
where
    U: UnitOfWork + 'static,
{
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<BlacklistEntry>, ServiceError> {
        self.store.execute(|session| Ok(session.blacklist().all()?))
    }

    pub fn get(&self, id: BlacklistEntryId) -> Result<BlacklistEntry, ServiceError> {
        self.store
            .execute(|session| found(session.blacklist().fetch(id)?, id))
    }

    pub fn add(&self, applicant_id: UserId, reason: &str) -> Result<BlacklistEntry, ServiceError> {
        let entry = self
            .store
            .execute(|session| -> Result<BlacklistEntry, ServiceError> {
                let mut applicant = found(session.users().fetch(applicant_id)?, applicant_id)?;
                let existing = !session
                    .blacklist()
                    .find(&|entry| entry.applicant_id == applicant_id)?
                    .is_empty();
                rules::ensure_can_blacklist(&applicant, reason, existing)?;

                let entry = session
                    .blacklist()
                    .insert(BlacklistEntry {
                        id: BlacklistEntryId(0),
                        applicant_id,
                        reason: reason.trim().to_string(),
                        created_at: Utc::now(),
                    })
                    .map_err(|err| match err {
                        RepositoryError::Conflict { .. } => {
                            ServiceError::from(ValidationError::AlreadyBlacklisted(applicant_id.0))
                        }
                        other => other.into(),
                    })?;

                if let Some(details) = applicant.applicant_mut() {
                    details.blacklisted = true;
                }
                session.users().update(applicant)?;
                Ok(entry)
            })
            .map_err(|err| err.report("blacklist.add"))?;

        info!(
            entry_id = entry.id.0,
            applicant_id = applicant_id.0,
            "applicant blacklisted"
        );
        Ok(entry)
    }

    pub fn remove(&self, id: BlacklistEntryId) -> Result<(), ServiceError> {
        let entry = self
            .store
            .execute(|session| -> Result<BlacklistEntry, ServiceError> {
                let entry = session.blacklist().remove(id)?;
                if let Some(mut applicant) = session.users().fetch(entry.applicant_id)? {
                    if let Some(details) = applicant.applicant_mut() {
                        details.blacklisted = false;
                    }
                    session.users().update(applicant)?;
                }
                Ok(entry)
            })
            .map_err(|err| err.report("blacklist.remove"))?;

        info!(
            entry_id = id.0,
            applicant_id = entry.applicant_id.0,
            "applicant removed from blacklist"
        );
        Ok(())
    }

    pub fn is_blacklisted(&self, applicant_id: UserId) -> Result<bool, ServiceError> {
        self.store.execute(|session| {
            let entries = session
                .blacklist()
                .find(&|entry| entry.applicant_id == applicant_id)?;
            Ok(!entries.is_empty())
        })
    }
}
