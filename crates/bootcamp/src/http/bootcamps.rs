use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::{AuthenticatedUser, SharedContext};
use crate::auth::ResumeStore;
use crate::domain::{Bootcamp, BootcampDraft, BootcampId, BootcampState};
use crate::paging::PagedRequest;
use crate::repository::UnitOfWork;
use crate::services::ServiceError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    page_number: Option<i64>,
    page_size: Option<i64>,
}

/// Accepts `{"state": "Open"}` as well as a bare `"Open"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StateChange {
    Wrapped { state: BootcampState },
    Bare(BootcampState),
}

impl StateChange {
    fn state(self) -> BootcampState {
        match self {
            StateChange::Wrapped { state } | StateChange::Bare(state) => state,
        }
    }
}

/// Paged when either paging parameter is present, the full list otherwise.
pub(crate) async fn list<U, S>(
    State(context): State<SharedContext<U, S>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    if query.page_number.is_none() && query.page_size.is_none() {
        let all = context.bootcamps.list_all()?;
        return Ok(Json(all).into_response());
    }

    let request = PagedRequest::new(query.page_number, query.page_size);
    Ok(Json(context.bootcamps.list_paged(request)?).into_response())
}

pub(crate) async fn get_one<U, S>(
    State(context): State<SharedContext<U, S>>,
    Path(id): Path<i64>,
) -> Result<Json<Bootcamp>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    Ok(Json(context.bootcamps.get(BootcampId(id))?))
}

pub(crate) async fn create<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Json(draft): Json<BootcampDraft>,
) -> Result<(StatusCode, Json<Bootcamp>), ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    let created = context.bootcamps.create(draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn update<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(draft): Json<BootcampDraft>,
) -> Result<Json<Bootcamp>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    Ok(Json(context.bootcamps.update(BootcampId(id), draft)?))
}

pub(crate) async fn update_state<U, S>(
    State(context): State<SharedContext<U, S>>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(change): Json<StateChange>,
) -> Result<Json<Bootcamp>, ServiceError>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    caller.require_staff()?;
    Ok(Json(
        context
            .bootcamps
            .update_state(BootcampId(id), change.state())?,
    ))
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
    caller.require_staff()?;
    context.bootcamps.delete(BootcampId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
