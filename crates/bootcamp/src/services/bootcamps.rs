use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::{found, ServiceError};
use crate::domain::{Bootcamp, BootcampDraft, BootcampId, BootcampState};
use crate::paging::{PagedRequest, PagedResponse};
use crate::repository::{Session, UnitOfWork};
use crate::rules::bootcamps as rules;

/// Bootcamp catalogue and its operator-driven lifecycle.
pub struct BootcampService<U> {
    store: Arc<U>,
}

impl<U> Clone for BootcampService<U> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn validate_draft(session: &mut dyn Session, draft: &BootcampDraft) -> Result<(), ServiceError> {
    let instructor = session.users().fetch(draft.instructor_id)?;
    rules::ensure_valid_draft(draft, instructor.as_ref())?;
    Ok(())
}

impl<U> BootcampService<U>
where
    U: UnitOfWork + 'static,
{
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    /// New bootcamps always start out `Preparing`.
    pub fn create(&self, draft: BootcampDraft) -> Result<Bootcamp, ServiceError> {
        let created = self
            .store
            .execute(|session| -> Result<Bootcamp, ServiceError> {
                validate_draft(session, &draft)?;
                let bootcamp = Bootcamp {
                    id: BootcampId(0),
                    name: draft.name.trim().to_string(),
                    instructor_id: draft.instructor_id,
                    start_date: draft.start_date,
                    end_date: draft.end_date,
                    state: BootcampState::Preparing,
                    created_at: Utc::now(),
                };
                Ok(session.bootcamps().insert(bootcamp)?)
            })
            .map_err(|err| err.report("bootcamp.create"))?;

        info!(bootcamp_id = created.id.0, name = %created.name, "bootcamp created");
        Ok(created)
    }

    pub fn get(&self, id: BootcampId) -> Result<Bootcamp, ServiceError> {
        self.store
            .execute(|session| found(session.bootcamps().fetch(id)?, id))
    }

    pub fn list_all(&self) -> Result<Vec<Bootcamp>, ServiceError> {
        self.store.execute(|session| Ok(session.bootcamps().all()?))
    }

    /// Id-ordered page; the total is counted over every bootcamp.
    pub fn list_paged(
        &self,
        request: PagedRequest,
    ) -> Result<PagedResponse<Bootcamp>, ServiceError> {
        self.store.execute(|session| {
            let repository = session.bootcamps();
            let total = repository.count()?;
            let items = repository.page(request.skip(), request.take())?;
            Ok(PagedResponse::new(items, total, request))
        })
    }

    /// Replaces the editable fields; the lifecycle state is left untouched.
    pub fn update(&self, id: BootcampId, draft: BootcampDraft) -> Result<Bootcamp, ServiceError> {
        let updated = self
            .store
            .execute(|session| -> Result<Bootcamp, ServiceError> {
                let mut bootcamp = found(session.bootcamps().fetch(id)?, id)?;
                validate_draft(session, &draft)?;
                bootcamp.name = draft.name.trim().to_string();
                bootcamp.instructor_id = draft.instructor_id;
                bootcamp.start_date = draft.start_date;
                bootcamp.end_date = draft.end_date;
                session.bootcamps().update(bootcamp.clone())?;
                Ok(bootcamp)
            })
            .map_err(|err| err.report("bootcamp.update"))?;

        info!(bootcamp_id = id.0, "bootcamp updated");
        Ok(updated)
    }

    /// Moves the bootcamp forward; staying in the current state is a no-op and any move
    /// to an earlier state is rejected.
    pub fn update_state(
        &self,
        id: BootcampId,
        next: BootcampState,
    ) -> Result<Bootcamp, ServiceError> {
        let (bootcamp, previous) = self
            .store
            .execute(|session| -> Result<(Bootcamp, BootcampState), ServiceError> {
                let mut bootcamp = found(session.bootcamps().fetch(id)?, id)?;
                let previous = bootcamp.state;
                rules::ensure_state_move(previous, next)?;
                if previous != next {
                    bootcamp.state = next;
                    session.bootcamps().update(bootcamp.clone())?;
                }
                Ok((bootcamp, previous))
            })
            .map_err(|err| err.report("bootcamp.update_state"))?;

        if previous != next {
            info!(
                bootcamp_id = id.0,
                from = previous.label(),
                to = next.label(),
                "bootcamp state changed"
            );
        }
        Ok(bootcamp)
    }

    /// Deletes the bootcamp together with every application filed against it.
    pub fn delete(&self, id: BootcampId) -> Result<(), ServiceError> {
        let removed = self
            .store
            .execute(|session| -> Result<usize, ServiceError> {
                session.bootcamps().remove(id)?;
                let applications = session
                    .applications()
                    .find(&|application| application.bootcamp_id == id)?;
                for application in &applications {
                    session.applications().remove(application.id)?;
                }
                Ok(applications.len())
            })
            .map_err(|err| err.report("bootcamp.delete"))?;

        info!(bootcamp_id = id.0, applications_removed = removed, "bootcamp deleted");
        Ok(())
    }
}
