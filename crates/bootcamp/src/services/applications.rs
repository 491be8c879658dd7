use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::{found, ServiceError};
use crate::domain::{Application, ApplicationId, ApplicationState, BootcampId, UserId};
use crate::repository::{RepositoryError, Session, UnitOfWork};
use crate::rules::{applications as rules, ValidationError};

/// Application lifecycle: apply, review, withdraw, and the filtered reads around them.
pub struct ApplicationService<U> {
    store: Arc<U>,
}

impl<U> Clone for ApplicationService<U> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn live_application(
    session: &mut dyn Session,
    applicant_id: UserId,
    bootcamp_id: BootcampId,
) -> Result<bool, RepositoryError> {
    let matches = session.applications().find(&|application| {
        application.applicant_id == applicant_id && application.bootcamp_id == bootcamp_id
    })?;
    Ok(!matches.is_empty())
}

impl<U> ApplicationService<U>
where
    U: UnitOfWork + 'static,
{
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    /// Creates a pending application once the applicant, blacklist, bootcamp state and
    /// duplicate checks have passed.
    pub fn create(
        &self,
        applicant_id: UserId,
        bootcamp_id: BootcampId,
    ) -> Result<Application, ServiceError> {
        let created = self
            .store
            .execute(|session| -> Result<Application, ServiceError> {
                let applicant = found(session.users().fetch(applicant_id)?, applicant_id)?;
                let bootcamp = found(session.bootcamps().fetch(bootcamp_id)?, bootcamp_id)?;
                let blacklisted = !session
                    .blacklist()
                    .find(&|entry| entry.applicant_id == applicant_id)?
                    .is_empty();
                let already_applied = live_application(session, applicant_id, bootcamp_id)?;

                rules::ensure_can_apply(&applicant, blacklisted, &bootcamp, already_applied)?;

                let application = Application {
                    id: ApplicationId(0),
                    applicant_id,
                    bootcamp_id,
                    state: ApplicationState::Pending,
                    created_at: Utc::now(),
                };

                session
                    .applications()
                    .insert(application)
                    .map_err(|err| match err {
                        RepositoryError::Conflict { .. } => {
                            ServiceError::from(ValidationError::DuplicateApplication {
                                applicant: applicant_id.0,
                                bootcamp: bootcamp_id.0,
                            })
                        }
                        other => other.into(),
                    })
            })
            .map_err(|err| err.report("application.create"))?;

        info!(
            application_id = created.id.0,
            applicant_id = applicant_id.0,
            bootcamp_id = bootcamp_id.0,
            "application submitted"
        );
        Ok(created)
    }

    pub fn get(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        self.store
            .execute(|session| found(session.applications().fetch(id)?, id))
    }

    pub fn list_all(&self) -> Result<Vec<Application>, ServiceError> {
        self.store
            .execute(|session| Ok(session.applications().all()?))
    }

    /// Records a review decision. Only pending applications can be approved or rejected.
    pub fn update_status(
        &self,
        id: ApplicationId,
        next: ApplicationState,
    ) -> Result<Application, ServiceError> {
        let updated = self
            .store
            .execute(|session| -> Result<Application, ServiceError> {
                let mut application = found(session.applications().fetch(id)?, id)?;
                rules::ensure_status_change(application.state, next)?;
                application.state = next;
                session.applications().update(application.clone())?;
                Ok(application)
            })
            .map_err(|err| err.report("application.update_status"))?;

        info!(
            application_id = id.0,
            state = next.label(),
            "application reviewed"
        );
        Ok(updated)
    }

    /// Staff removal; only existence is checked.
    pub fn delete(&self, id: ApplicationId) -> Result<(), ServiceError> {
        self.store
            .execute(|session| -> Result<(), ServiceError> {
                session.applications().remove(id)?;
                Ok(())
            })
            .map_err(|err| err.report("application.delete"))?;

        info!(application_id = id.0, "application deleted");
        Ok(())
    }

    /// Applicant-initiated withdrawal: the caller must own the application and it must
    /// still be pending.
    pub fn withdraw(&self, id: ApplicationId, applicant_id: UserId) -> Result<(), ServiceError> {
        self.store
            .execute(|session| -> Result<(), ServiceError> {
                let application = found(session.applications().fetch(id)?, id)?;
                if application.applicant_id != applicant_id {
                    return Err(ServiceError::forbidden(
                        "applicants may only withdraw their own applications",
                    ));
                }
                rules::ensure_withdrawable(application.state)?;
                session.applications().remove(id)?;
                Ok(())
            })
            .map_err(|err| err.report("application.withdraw"))?;

        info!(
            application_id = id.0,
            applicant_id = applicant_id.0,
            "application withdrawn"
        );
        Ok(())
    }

    pub fn by_applicant(&self, applicant_id: UserId) -> Result<Vec<Application>, ServiceError> {
        self.store.execute(|session| {
            Ok(session
                .applications()
                .find(&|application| application.applicant_id == applicant_id)?)
        })
    }

    pub fn by_bootcamp(&self, bootcamp_id: BootcampId) -> Result<Vec<Application>, ServiceError> {
        self.store.execute(|session| {
            Ok(session
                .applications()
                .find(&|application| application.bootcamp_id == bootcamp_id)?)
        })
    }

    pub fn has_applied(
        &self,
        applicant_id: UserId,
        bootcamp_id: BootcampId,
    ) -> Result<bool, ServiceError> {
        self.store
            .execute(|session| Ok(live_application(session, applicant_id, bootcamp_id)?))
    }
}
