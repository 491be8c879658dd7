//! Credential verification, token issuance and account registration.

pub mod password;
pub mod resume;
mod service;
pub mod token;

#[cfg(test)]
mod tests;

pub use resume::{FilesystemResumeStore, MemoryResumeStore, ResumeStore, ResumeUpload};
pub use service::{
    AccountFields, ApplicantRegistration, AuthService, EmployeeRegistration,
    InstructorRegistration, LoginRequest, LoginResponse,
};
pub use token::{Claims, TokenError, TokenIssuer};
