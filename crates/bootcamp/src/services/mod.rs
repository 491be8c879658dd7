//! Use cases composed from the repositories and the business rules.
//!
//! Each call runs inside one [`UnitOfWork`](crate::repository::UnitOfWork) execution, so
//! a rejected request never leaves partial writes behind.

mod applications;
mod blacklist;
mod bootcamps;
mod directory;
mod error;

#[cfg(test)]
mod tests;

pub use applications::ApplicationService;
pub use blacklist::BlacklistService;
pub use bootcamps::BootcampService;
pub use directory::DirectoryService;
pub use error::ServiceError;

use crate::repository::Entity;

/// Turn a missing row into a not-found error naming the table and id.
pub(crate) fn found<E: Entity>(row: Option<E>, id: E::Id) -> Result<E, ServiceError> {
    row.ok_or_else(|| ServiceError::NotFound {
        entity: E::NAME,
        id: id.into(),
    })
}
