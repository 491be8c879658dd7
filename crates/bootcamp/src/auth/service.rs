use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use super::resume::{ResumeStore, ResumeUpload};
use super::token::TokenIssuer;
use crate::config::{AuthConfig, UploadConfig};
use crate::domain::{
    normalize_email, ApplicantDetails, EmployeeDetails, InstructorDetails, User, UserId,
    UserProfile, UserRole, UserView,
};
use crate::repository::{RepositoryError, Session, UnitOfWork};
use crate::rules::{accounts, require, resume, ValidationError};
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

/// Shared account fields of every registration form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApplicantRegistration {
    pub account: AccountFields,
    /// Raw `YYYY-MM-DD` form value; parsed after the account checks.
    pub date_of_birth: String,
    pub national_identity: String,
    pub about: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorRegistration {
    #[serde(flatten)]
    pub account: AccountFields,
    pub company_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRegistration {
    #[serde(flatten)]
    pub account: AccountFields,
    pub position: String,
}

fn email_taken(session: &mut dyn Session, email: &str) -> Result<Option<User>, RepositoryError> {
    Ok(session
        .users()
        .find(&|user| user.email == email)?
        .into_iter()
        .next())
}

/// Credential checks, token issuance and role-specific registration.
pub struct AuthService<U, S> {
    store: Arc<U>,
    resumes: Arc<S>,
    tokens: TokenIssuer,
    max_resume_bytes: usize,
}

impl<U, S> Clone for AuthService<U, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resumes: Arc::clone(&self.resumes),
            tokens: self.tokens.clone(),
            max_resume_bytes: self.max_resume_bytes,
        }
    }
}

impl<U, S> AuthService<U, S>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    pub fn new(store: Arc<U>, resumes: Arc<S>, auth: &AuthConfig, uploads: &UploadConfig) -> Self {
        Self {
            store,
            resumes,
            tokens: TokenIssuer::new(auth),
            max_resume_bytes: uploads.max_bytes,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// `Ok(None)` for unknown emails or wrong passwords; `Err` only for system failures.
    pub fn login(&self, request: &LoginRequest) -> Result<Option<LoginResponse>, ServiceError> {
        let email = normalize_email(&request.email);
        let user = self
            .store
            .execute(|session| -> Result<Option<User>, ServiceError> {
                Ok(email_taken(session, &email)?)
            })?;

        let Some(user) = user else {
            warn!(email = %email, "login failed: unknown email");
            return Ok(None);
        };

        let verified = verify_password(&user.password_hash, &request.password)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        if !verified {
            warn!(user_id = user.id.0, "login failed: wrong password");
            return Ok(None);
        }

        let issued = self
            .tokens
            .issue(&user)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        let role = user.role();
        info!(user_id = user.id.0, role = role.label(), "login succeeded");

        Ok(Some(LoginResponse {
            token: issued.token,
            id: user.id,
            email: user.email,
            role,
            expires_at: issued.expires_at,
        }))
    }

    pub fn register_applicant(
        &self,
        registration: ApplicantRegistration,
        upload: Option<ResumeUpload>,
    ) -> Result<UserView, ServiceError> {
        let ApplicantRegistration {
            account,
            date_of_birth,
            national_identity,
            about,
        } = registration;

        let (email, date_of_birth) = self
            .check_account(&account)
            .and_then(|email| {
                let date_of_birth = accounts::parse_birth_date(&date_of_birth)?;
                require(&national_identity, "nationalityIdentity")?;
                Ok((email, date_of_birth))
            })
            .map_err(|err| err.report("auth.register_applicant"))?;

        let accepted = match &upload {
            Some(file) => Some(
                resume::ensure_acceptable_resume(
                    &file.file_name,
                    file.content_type.as_deref(),
                    file.bytes.len(),
                    self.max_resume_bytes,
                )
                .map_err(|err| ServiceError::from(err).report("auth.register_applicant"))?,
            ),
            None => None,
        };

        let password_hash = hash_password(&account.password)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        let reference = match (accepted, &upload) {
            (Some(extension), Some(file)) => Some(
                self.resumes
                    .save(extension, &file.bytes)
                    .map_err(|err| ServiceError::Internal(err.to_string()))?,
            ),
            _ => None,
        };

        let profile = UserProfile::Applicant(ApplicantDetails {
            date_of_birth,
            national_identity: national_identity.trim().to_string(),
            about: about.trim().to_string(),
            resume: reference.clone(),
            blacklisted: false,
        });

        let stored = self.persist(&account, email, password_hash, profile);
        if stored.is_err() {
            if let Some(reference) = &reference {
                self.resumes.discard(reference);
            }
        }
        stored.map_err(|err| err.report("auth.register_applicant"))
    }

    pub fn register_instructor(
        &self,
        registration: InstructorRegistration,
    ) -> Result<UserView, ServiceError> {
        let InstructorRegistration {
            account,
            company_name,
        } = registration;
        let email = self
            .check_account(&account)
            .map_err(|err| err.report("auth.register_instructor"))?;
        let password_hash = hash_password(&account.password)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        let profile = UserProfile::Instructor(InstructorDetails {
            company_name: company_name.trim().to_string(),
        });
        self.persist(&account, email, password_hash, profile)
            .map_err(|err| err.report("auth.register_instructor"))
    }

    pub fn register_employee(
        &self,
        registration: EmployeeRegistration,
    ) -> Result<UserView, ServiceError> {
        let EmployeeRegistration { account, position } = registration;
        let email = self
            .check_account(&account)
            .map_err(|err| err.report("auth.register_employee"))?;
        let password_hash = hash_password(&account.password)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        let profile = UserProfile::Employee(EmployeeDetails {
            position: position.trim().to_string(),
        });
        self.persist(&account, email, password_hash, profile)
            .map_err(|err| err.report("auth.register_employee"))
    }

    /// Runs the shared account rules and returns the normalized email.
    fn check_account(&self, account: &AccountFields) -> Result<String, ServiceError> {
        let email = normalize_email(&account.email);
        self.store.execute(|session| -> Result<(), ServiceError> {
            let existing = email_taken(session, &email)?;
            accounts::ensure_registrable(
                &account.first_name,
                &account.last_name,
                &email,
                &account.password,
                existing.as_ref(),
            )?;
            Ok(())
        })?;
        Ok(email)
    }

    /// The unique email constraint is re-checked by the store on insert, which closes the
    /// window between the rule check and the write.
    fn persist(
        &self,
        account: &AccountFields,
        email: String,
        password_hash: String,
        profile: UserProfile,
    ) -> Result<UserView, ServiceError> {
        let role = profile.role();
        let user = User {
            id: UserId(0),
            first_name: account.first_name.trim().to_string(),
            last_name: account.last_name.trim().to_string(),
            email: email.clone(),
            password_hash,
            profile,
            created_at: Utc::now(),
        };

        let stored = self
            .store
            .execute(|session| -> Result<User, ServiceError> {
                session.users().insert(user).map_err(|err| match err {
                    RepositoryError::Conflict { .. } => {
                        ServiceError::from(ValidationError::DuplicateEmail(email.clone()))
                    }
                    other => other.into(),
                })
            })?;

        info!(user_id = stored.id.0, role = role.label(), "account registered");
        Ok(stored.view())
    }
}
