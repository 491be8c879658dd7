//! Storage abstraction: generic CRUD per table, grouped into a unit of work.
//!
//! Services never hold a repository directly. They ask a [`UnitOfWork`] to run a closure
//! against a [`Session`]; the closure's changes are committed together when it returns
//! `Ok` and discarded when it returns `Err`.

mod memory;
#[cfg(test)]
pub(crate) mod stale;

pub use memory::{InMemoryStore, Table, Tables};

use crate::domain::{Application, BlacklistEntry, Bootcamp, User};

/// A row type owned by one table.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Copy + Ord + From<i64> + Into<i64> + Send + Sync;

    /// Human readable table name used in error messages.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;
    fn assign_id(&mut self, id: Self::Id);

    /// Unique-constraint check against an already stored row.
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }
}

/// CRUD surface of a single table.
pub trait Repository<E: Entity>: Send {
    /// Store a new row, assigning its identifier.
    fn insert(&mut self, entity: E) -> Result<E, RepositoryError>;
    fn update(&mut self, entity: E) -> Result<(), RepositoryError>;
    fn fetch(&self, id: E::Id) -> Result<Option<E>, RepositoryError>;
    fn remove(&mut self, id: E::Id) -> Result<E, RepositoryError>;
    /// Matching rows in insertion (id ascending) order.
    fn find(&self, filter: &dyn Fn(&E) -> bool) -> Result<Vec<E>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
    /// Slice of all rows ordered by id ascending.
    fn page(&self, skip: usize, take: usize) -> Result<Vec<E>, RepositoryError>;

    fn all(&self) -> Result<Vec<E>, RepositoryError> {
        self.find(&|_| true)
    }
}

/// Repositories visible inside one unit of work.
pub trait Session {
    fn users(&mut self) -> &mut dyn Repository<User>;
    fn bootcamps(&mut self) -> &mut dyn Repository<Bootcamp>;
    fn applications(&mut self) -> &mut dyn Repository<Application>;
    fn blacklist(&mut self) -> &mut dyn Repository<BlacklistEntry>;
}

/// Runs a request's repository operations as one transaction.
pub trait UnitOfWork: Send + Sync {
    fn execute<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Session) -> Result<T, E>,
        E: From<RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} violates a unique constraint")]
    Conflict { entity: &'static str },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
