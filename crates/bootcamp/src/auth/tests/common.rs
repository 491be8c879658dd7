use std::sync::Arc;

use crate::auth::{
    AccountFields, ApplicantRegistration, AuthService, EmployeeRegistration,
    InstructorRegistration, MemoryResumeStore, ResumeUpload,
};
use crate::config::{AuthConfig, UploadConfig};
use crate::repository::{InMemoryStore, UnitOfWork};

pub(super) const RESUME_LIMIT: usize = 64;

pub(super) struct Harness {
    pub(super) store: Arc<InMemoryStore>,
    pub(super) resumes: Arc<MemoryResumeStore>,
    pub(super) service: AuthService<InMemoryStore, MemoryResumeStore>,
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let resumes = Arc::new(MemoryResumeStore::new());
    let service = service_over(Arc::clone(&store), Arc::clone(&resumes));
    Harness {
        store,
        resumes,
        service,
    }
}

pub(super) fn service_over<U>(
    store: Arc<U>,
    resumes: Arc<MemoryResumeStore>,
) -> AuthService<U, MemoryResumeStore>
where
    U: UnitOfWork + 'static,
{
    let uploads = UploadConfig {
        directory: "uploads".into(),
        max_bytes: RESUME_LIMIT,
    };
    AuthService::new(store, resumes, &AuthConfig::development(), &uploads)
}

pub(super) fn account(email: &str) -> AccountFields {
    AccountFields {
        first_name: "Margaret".to_string(),
        last_name: "Hamilton".to_string(),
        email: email.to_string(),
        password: "apollo11".to_string(),
    }
}

pub(super) fn applicant(email: &str) -> ApplicantRegistration {
    ApplicantRegistration {
        account: account(email),
        date_of_birth: "1999-08-17".to_string(),
        national_identity: "12345678901".to_string(),
        about: "Self-taught programmer".to_string(),
    }
}

pub(super) fn instructor(email: &str) -> InstructorRegistration {
    InstructorRegistration {
        account: account(email),
        company_name: "Draper Lab".to_string(),
    }
}

pub(super) fn employee(email: &str) -> EmployeeRegistration {
    EmployeeRegistration {
        account: account(email),
        position: "Program manager".to_string(),
    }
}

pub(super) fn pdf(size: usize) -> ResumeUpload {
    ResumeUpload {
        file_name: "cv.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: vec![b'%'; size],
    }
}

pub(super) fn user_count(store: &InMemoryStore) -> usize {
    store.snapshot().expect("snapshot").users.len()
}
