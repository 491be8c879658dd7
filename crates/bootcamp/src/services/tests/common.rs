use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    ApplicantDetails, Application, ApplicationId, ApplicationState, Bootcamp, BootcampDraft,
    BootcampId, BootcampState, EmployeeDetails, InstructorDetails, User, UserId, UserProfile,
};
use crate::repository::{InMemoryStore, RepositoryError, Session, UnitOfWork};
use crate::services::BootcampService;

pub(super) fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

fn seed_user(store: &InMemoryStore, email: &str, profile: UserProfile) -> User {
    store
        .execute(|session| -> Result<User, RepositoryError> {
            session.users().insert(User {
                id: UserId(0),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
                profile,
                created_at: Utc::now(),
            })
        })
        .expect("seed user")
}

pub(super) fn seed_applicant(store: &InMemoryStore, email: &str) -> User {
    seed_user(
        store,
        email,
        UserProfile::Applicant(ApplicantDetails {
            date_of_birth: NaiveDate::from_ymd_opt(1996, 4, 2).expect("valid"),
            national_identity: "10000000001".to_string(),
            about: "Wants to learn Rust".to_string(),
            resume: None,
            blacklisted: false,
        }),
    )
}

pub(super) fn seed_instructor(store: &InMemoryStore, email: &str) -> User {
    seed_user(
        store,
        email,
        UserProfile::Instructor(InstructorDetails {
            company_name: "Ferris Labs".to_string(),
        }),
    )
}

pub(super) fn seed_employee(store: &InMemoryStore, email: &str) -> User {
    seed_user(
        store,
        email,
        UserProfile::Employee(EmployeeDetails {
            position: "Coordinator".to_string(),
        }),
    )
}

pub(super) fn draft(instructor: UserId, name: &str) -> BootcampDraft {
    BootcampDraft {
        name: name.to_string(),
        instructor_id: instructor,
        start_date: NaiveDate::from_ymd_opt(2026, 11, 2).expect("valid"),
        end_date: NaiveDate::from_ymd_opt(2027, 1, 29).expect("valid"),
    }
}

pub(super) fn bootcamp_in_state(
    store: &Arc<InMemoryStore>,
    instructor: UserId,
    state: BootcampState,
) -> Bootcamp {
    let service = BootcampService::new(Arc::clone(store));
    let created = service
        .create(draft(instructor, "Backend Rust"))
        .expect("create bootcamp");
    service
        .update_state(created.id, state)
        .expect("move bootcamp state")
}

/// Stores an application row directly, bypassing the apply rules.
pub(super) fn seed_application(
    store: &InMemoryStore,
    applicant: UserId,
    bootcamp: BootcampId,
) -> Application {
    store
        .execute(|session| -> Result<Application, RepositoryError> {
            session.applications().insert(Application {
                id: ApplicationId(0),
                applicant_id: applicant,
                bootcamp_id: bootcamp,
                state: ApplicationState::Pending,
                created_at: Utc::now(),
            })
        })
        .expect("seed application")
}

pub(super) fn application_count(store: &InMemoryStore) -> usize {
    store.snapshot().expect("snapshot").applications.len()
}

/// Store whose every unit of work fails before touching any table.
pub(super) struct UnavailableStore;

impl UnitOfWork for UnavailableStore {
    fn execute<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Session) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }
}
