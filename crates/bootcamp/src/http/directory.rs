use axum::extract::{Path, State};
use axum::Json;

use super::{AuthenticatedUser, SharedContext};
use crate::auth::ResumeStore;
use crate::domain::{UserId, UserView};
use crate::repository::UnitOfWork;
use crate::services::ServiceError;

pub(crate) async fn applicants<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
) -> Result<Json<Vec<UserView>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    Ok(Json(context.directory.applicants()?))
}

pub(crate) async fn applicant<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<UserView>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_self_or_staff(UserId(id))?;
    Ok(Json(context.directory.applicant(UserId(id))?))
}

pub(crate) async fn instructors<U, S>(
    State(context): State<SharedContext<U, S>>,
    _caller: AuthenticatedUser,
) -> Result<Json<Vec<UserView>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.directory.instructors()?))
}

pub(crate) async fn instructor<U, S>(
    State(context): State<SharedContext<U, S>>,
    _caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<UserView>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.directory.instructor(UserId(id))?))
}

pub(crate) async fn employees<U, S>(
    State(context): State<SharedContext<U, S>>,
    _caller: AuthenticatedUser,
) -> Result<Json<Vec<UserView>>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.directory.employees()?))
}

pub(crate) async fn employee<U, S>(
    State(context): State<SharedContext<U, S>>,
    _caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<UserView>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.directory.employee(UserId(id))?))
}
