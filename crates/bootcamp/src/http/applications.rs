use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{AuthenticatedUser, SharedContext};
use crate::auth::ResumeStore;
use crate::domain::{Application, ApplicationId, ApplicationState, BootcampId, UserId, UserRole};
use crate::repository::UnitOfWork;
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplyRequest {
    applicant_id: UserId,
    bootcamp_id: BootcampId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusUpdate {
    application_id: ApplicationId,
    new_state: ApplicationState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckQuery {
    applicant_id: i64,
    bootcamp_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckResponse {
    has_applied: bool,
}

pub(crate) async fn list<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
) -> Result<Json<Vec<Application>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    Ok(Json(context.applications.list_all()?))
}

pub(crate) async fn get_one<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Application>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    let application = context.applications.get(ApplicationId(id))?;
    caller.require_self_or_staff(application.applicant_id)?;
    Ok(Json(application))
}

pub(crate) async fn create<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>), ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_self_or_staff(request.applicant_id)?;
    let created = context
        .applications
        .create(request.applicant_id, request.bootcamp_id)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn update_status<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Application>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    Ok(Json(
        context
            .applications
            .update_status(update.application_id, update.new_state)?,
    ))
}

/// Staff delete outright; applicants withdraw their own pending applications.
pub(crate) async fn delete<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    let id = ApplicationId(id);
    match caller.role {
        UserRole::Applicant => context.applications.withdraw(id, caller.id)?,
        _ => context.applications.delete(id)?,
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn mine<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(applicant_id): Path<i64>,
) -> Result<Json<Vec<Application>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    let applicant_id = UserId(applicant_id);
    caller.require_self_or_staff(applicant_id)?;
    Ok(Json(context.applications.by_applicant(applicant_id)?))
}

pub(crate) async fn by_bootcamp<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(bootcamp_id): Path<i64>,
) -> Result<Json<Vec<Application>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    Ok(Json(
        context.applications.by_bootcamp(BootcampId(bootcamp_id))?,
    ))
}

pub(crate) async fn check<U, S>(
    State(context): State<SharedContext<U, S>>,
    _caller: AuthenticatedUser,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    let has_applied = context
        .applications
        .has_applied(UserId(query.applicant_id), BootcampId(query.bootcamp_id))?;
    Ok(Json(CheckResponse { has_applied }))
}
