use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::SharedContext;
use crate::auth::{
    AccountFields, ApplicantRegistration, EmployeeRegistration, InstructorRegistration,
    LoginRequest, ResumeStore, ResumeUpload,
};
use crate::domain::UserView;
use crate::repository::UnitOfWork;
use crate::rules::ValidationError;
use crate::services::ServiceError;

pub(crate) async fn login<U, S>(
    State(context): State<SharedContext<U, S>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    match context.auth.login(&request) {
        Ok(Some(session)) => (StatusCode::OK, Json(session)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "Invalid email or password" });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn register_applicant<U, S>(
    State(context): State<SharedContext<U, S>>,
    multipart: Multipart,
) -> Result<Json<UserView>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    let form = ApplicantForm::read(multipart).await?;
    let (registration, upload) = form.into_registration();
    let view = context.auth.register_applicant(registration, upload)?;
    Ok(Json(view))
}

pub(crate) async fn register_instructor<U, S>(
    State(context): State<SharedContext<U, S>>,
    Json(registration): Json<InstructorRegistration>,
) -> Result<Json<UserView>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.auth.register_instructor(registration)?))
}

pub(crate) async fn register_employee<U, S>(
    State(context): State<SharedContext<U, S>>,
    Json(registration): Json<EmployeeRegistration>,
) -> Result<Json<UserView>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.auth.register_employee(registration)?))
}

/// Raw fields of the multipart applicant registration form.
#[derive(Debug, Default)]
struct ApplicantForm {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    date_of_birth: Option<String>,
    national_identity: Option<String>,
    about: Option<String>,
    resume: Option<ResumeUpload>,
}

fn malformed(err: axum::extract::multipart::MultipartError) -> ServiceError {
    ValidationError::MalformedForm(err.body_text()).into()
}

impl ApplicantForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ServiceError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "resumeFile" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                // Browsers send an empty part when no file was chosen.
                if let Some(file_name) = file_name.filter(|name| !name.is_empty()) {
                    if !bytes.is_empty() {
                        form.resume = Some(ResumeUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            let slot = match name.as_str() {
                "firstName" => &mut form.first_name,
                "lastName" => &mut form.last_name,
                "email" => &mut form.email,
                "password" => &mut form.password,
                "dateOfBirth" => &mut form.date_of_birth,
                "nationalityIdentity" | "nationalIdentity" => &mut form.national_identity,
                "about" => &mut form.about,
                _ => continue,
            };
            *slot = Some(value);
        }

        Ok(form)
    }

    fn into_registration(self) -> (ApplicantRegistration, Option<ResumeUpload>) {
        let registration = ApplicantRegistration {
            account: AccountFields {
                first_name: self.first_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
                email: self.email.unwrap_or_default(),
                password: self.password.unwrap_or_default(),
            },
            date_of_birth: self.date_of_birth.unwrap_or_default(),
            national_identity: self.national_identity.unwrap_or_default(),
            about: self.about.unwrap_or_default(),
        };
        (registration, self.resume)
    }
}
