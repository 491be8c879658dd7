//! Store double whose lookups miss rows that the unique constraints still see, so the
//! insert-time conflict path can be driven without a concurrent writer.

use std::sync::Mutex;

use super::{Entity, Repository, RepositoryError, Session, Table, Tables, UnitOfWork};
use crate::domain::{Application, BlacklistEntry, Bootcamp, User};

/// Table whose `find` always comes back empty.
#[derive(Debug, Clone)]
pub(crate) struct StaleReads<E>(Table<E>);

impl<E: Entity> Repository<E> for StaleReads<E> {
    fn insert(&mut self, entity: E) -> Result<E, RepositoryError> {
        self.0.insert(entity)
    }

    fn update(&mut self, entity: E) -> Result<(), RepositoryError> {
        self.0.update(entity)
    }

    fn fetch(&self, id: E::Id) -> Result<Option<E>, RepositoryError> {
        self.0.fetch(id)
    }

    fn remove(&mut self, id: E::Id) -> Result<E, RepositoryError> {
        self.0.remove(id)
    }

    fn find(&self, _filter: &dyn Fn(&E) -> bool) -> Result<Vec<E>, RepositoryError> {
        Ok(Vec::new())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        self.0.count()
    }

    fn page(&self, skip: usize, take: usize) -> Result<Vec<E>, RepositoryError> {
        self.0.page(skip, take)
    }
}

#[derive(Debug, Clone)]
struct StaleTables {
    users: StaleReads<User>,
    bootcamps: Table<Bootcamp>,
    applications: StaleReads<Application>,
    blacklist: Table<BlacklistEntry>,
}

impl Session for StaleTables {
    fn users(&mut self) -> &mut dyn Repository<User> {
        &mut self.users
    }

    fn bootcamps(&mut self) -> &mut dyn Repository<Bootcamp> {
        &mut self.bootcamps
    }

    fn applications(&mut self) -> &mut dyn Repository<Application> {
        &mut self.applications
    }

    fn blacklist(&mut self) -> &mut dyn Repository<BlacklistEntry> {
        &mut self.blacklist
    }
}

/// Users and applications are invisible to `find`; bootcamps and the blacklist read normally.
#[derive(Debug)]
pub(crate) struct StaleReadStore {
    tables: Mutex<StaleTables>,
}

impl StaleReadStore {
    pub(crate) fn seeded(tables: Tables) -> Self {
        Self {
            tables: Mutex::new(StaleTables {
                users: StaleReads(tables.users),
                bootcamps: tables.bootcamps,
                applications: StaleReads(tables.applications),
                blacklist: tables.blacklist,
            }),
        }
    }

    pub(crate) fn snapshot(&self) -> Tables {
        let tables = self.tables.lock().expect("stale store mutex poisoned");
        Tables {
            users: tables.users.0.clone(),
            bootcamps: tables.bootcamps.clone(),
            applications: tables.applications.0.clone(),
            blacklist: tables.blacklist.clone(),
        }
    }
}

impl UnitOfWork for StaleReadStore {
    fn execute<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Session) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut committed = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;

        let mut staged = committed.clone();
        let value = work(&mut staged)?;
        *committed = staged;
        Ok(value)
    }
}
