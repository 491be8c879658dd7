use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{AuthenticatedUser, SharedContext};
use crate::auth::ResumeStore;
use crate::domain::{BlacklistEntry, BlacklistEntryId, UserId, UserRole};
use crate::repository::UnitOfWork;
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlacklistRequest {
    applicant_id: UserId,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlacklistStatus {
    applicant_id: UserId,
    is_blacklisted: bool,
}

pub(crate) async fn list<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
) -> Result<Json<Vec<BlacklistEntry>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_role(UserRole::Employee)?;
    Ok(Json(context.blacklist.list()?))
}

pub(crate) async fn get_one<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<BlacklistEntry>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_role(UserRole::Employee)?;
    Ok(Json(context.blacklist.get(BlacklistEntryId(id))?))
}

pub(crate) async fn create<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Json(request): Json<BlacklistRequest>,
) -> Result<(StatusCode, Json<BlacklistEntry>), ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_role(UserRole::Employee)?;
    let entry = context
        .blacklist
        .add(request.applicant_id, &request.reason)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub(crate) async fn delete<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_role(UserRole::Employee)?;
    context.blacklist.remove(BlacklistEntryId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn check<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(applicant_id): Path<i64>,
) -> Result<Json<BlacklistStatus>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_role(UserRole::Employee)?;
    let applicant_id = UserId(applicant_id);
    let is_blacklisted = context.blacklist.is_blacklisted(applicant_id)?;
    Ok(Json(BlacklistStatus {
        applicant_id,
        is_blacklisted,
    }))
}
