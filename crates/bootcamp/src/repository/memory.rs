use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{Entity, Repository, RepositoryError, Session, UnitOfWork};
use crate::domain::{Application, BlacklistEntry, Bootcamp, User};

/// Ordered rows plus the identity sequence for one entity type.
#[derive(Debug, Clone)]
pub struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Entity> Repository<E> for Table<E> {
    fn insert(&mut self, mut entity: E) -> Result<E, RepositoryError> {
        if self.rows.values().any(|row| entity.conflicts_with(row)) {
            return Err(RepositoryError::Conflict { entity: E::NAME });
        }

        let id = self.next_id;
        self.next_id += 1;
        entity.assign_id(E::Id::from(id));
        self.rows.insert(id, entity.clone());
        Ok(entity)
    }

    fn update(&mut self, entity: E) -> Result<(), RepositoryError> {
        let id: i64 = entity.id().into();
        if !self.rows.contains_key(&id) {
            return Err(RepositoryError::NotFound {
                entity: E::NAME,
                id,
            });
        }
        if self
            .rows
            .iter()
            .any(|(key, row)| *key != id && entity.conflicts_with(row))
        {
            return Err(RepositoryError::Conflict { entity: E::NAME });
        }

        self.rows.insert(id, entity);
        Ok(())
    }

    fn fetch(&self, id: E::Id) -> Result<Option<E>, RepositoryError> {
        let key: i64 = id.into();
        Ok(self.rows.get(&key).cloned())
    }

    fn remove(&mut self, id: E::Id) -> Result<E, RepositoryError> {
        let id: i64 = id.into();
        self.rows.remove(&id).ok_or(RepositoryError::NotFound {
            entity: E::NAME,
            id,
        })
    }

    fn find(&self, filter: &dyn Fn(&E) -> bool) -> Result<Vec<E>, RepositoryError> {
        Ok(self
            .rows
            .values()
            .filter(|row| filter(row))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.rows.len())
    }

    fn page(&self, skip: usize, take: usize) -> Result<Vec<E>, RepositoryError> {
        Ok(self.rows.values().skip(skip).take(take).cloned().collect())
    }
}

/// Every table the service owns.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Table<User>,
    pub bootcamps: Table<Bootcamp>,
    pub applications: Table<Application>,
    pub blacklist: Table<BlacklistEntry>,
}

impl Session for Tables {
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

/// Process-local store. Each unit of work runs against a staged copy of the tables and
/// swaps it in only on success, so a failed request leaves no partial writes behind.
/// The mutex is held for the whole unit of work, which also serializes the duplicate
/// checks behind the unique constraints.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed tables.
    pub fn snapshot(&self) -> Result<Tables, RepositoryError> {
        let guard = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

impl UnitOfWork for InMemoryStore {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationId, ApplicationState, BootcampId, UserId};
    use chrono::Utc;

    fn application(applicant: i64, bootcamp: i64) -> Application {
        Application {
            id: ApplicationId(0),
            applicant_id: UserId(applicant),
            bootcamp_id: BootcampId(bootcamp),
            state: ApplicationState::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_assigns_sequential_ids_and_enforces_uniqueness() {
        let mut table = Table::<Application>::default();

        let first = table.insert(application(1, 1)).expect("first insert");
        let second = table.insert(application(1, 2)).expect("second insert");
        assert_eq!(first.id, ApplicationId(1));
        assert_eq!(second.id, ApplicationId(2));

        assert_eq!(
            table.insert(application(1, 1)),
            Err(RepositoryError::Conflict {
                entity: "application"
            })
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut table = Table::<Application>::default();
        let first = table.insert(application(1, 1)).expect("insert");
        table.remove(first.id).expect("remove");

        let again = table.insert(application(1, 1)).expect("reinsert after withdrawal");
        assert_eq!(again.id, ApplicationId(2));
    }

    #[test]
    fn page_slices_in_id_order() {
        let mut table = Table::<Application>::default();
        for bootcamp in 1..=25 {
            table.insert(application(1, bootcamp)).expect("insert");
        }

        let page = table.page(20, 10).expect("page");
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].id, ApplicationId(21));
        assert_eq!(table.count().expect("count"), 25);
    }

    #[test]
    fn failed_unit_of_work_rolls_back() {
        let store = InMemoryStore::new();

        let result: Result<(), RepositoryError> = store.execute(|session| {
            session.applications().insert(application(1, 1))?;
            session.applications().insert(application(1, 1))?;
            Ok(())
        });

        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
        let tables = store.snapshot().expect("snapshot");
        assert!(tables.applications.is_empty());
    }

    #[test]
    fn successful_unit_of_work_commits_every_change() {
        let store = InMemoryStore::new();

        store
            .execute(|session| -> Result<(), RepositoryError> {
                session.applications().insert(application(1, 1))?;
                session.applications().insert(application(2, 1))?;
                Ok(())
            })
            .expect("commit");

        let tables = store.snapshot().expect("snapshot");
        assert_eq!(tables.applications.len(), 2);
    }
}
