use std::sync::Arc;

use super::ServiceError;
use crate::domain::{UserId, UserRole, UserView};
use crate::repository::UnitOfWork;

/// Read-only lookups of registered accounts, one role at a time.
pub struct DirectoryService<U> {
    store: Arc<U>,
}

impl<U> Clone for DirectoryService<U> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<U> DirectoryService<U>
where
    U: UnitOfWork + 'static,
{
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub fn applicants(&self) -> Result<Vec<UserView>, ServiceError> {
        self.list(UserRole::Applicant)
    }

    pub fn applicant(&self, id: UserId) -> Result<UserView, ServiceError> {
        self.lookup(UserRole::Applicant, id)
    }

    pub fn instructors(&self) -> Result<Vec<UserView>, ServiceError> {
        self.list(UserRole::Instructor)
    }

    pub fn instructor(&self, id: UserId) -> Result<UserView, ServiceError> {
        self.lookup(UserRole::Instructor, id)
    }

    pub fn employees(&self) -> Result<Vec<UserView>, ServiceError> {
        self.list(UserRole::Employee)
    }

    pub fn employee(&self, id: UserId) -> Result<UserView, ServiceError> {
        self.lookup(UserRole::Employee, id)
    }

    fn list(&self, role: UserRole) -> Result<Vec<UserView>, ServiceError> {
        self.store.execute(|session| {
            let users = session.users().find(&|user| user.role() == role)?;
            Ok(users.iter().map(|user| user.view()).collect())
        })
    }

    /// An account of a different role is reported as missing, not forbidden.
    fn lookup(&self, role: UserRole, id: UserId) -> Result<UserView, ServiceError> {
        self.store.execute(|session| {
            session
                .users()
                .fetch(id)?
                .filter(|user| user.role() == role)
                .map(|user| user.view())
                .ok_or(ServiceError::NotFound {
                    entity: role.label(),
                    id: id.0,
                })
        })
    }
}
