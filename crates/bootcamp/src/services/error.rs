use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::repository::RepositoryError;
use crate::rules::{InvalidTransition, ValidationError};

/// Error raised by every use case.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{0}")]
    Authorization(String),
    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidTransition),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Authorization(reason.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidStateTransition(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Authorization(_) => StatusCode::FORBIDDEN,
            ServiceError::Repository(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Log a rejected request under `operation` and hand the error back.
    pub(crate) fn report(self, operation: &'static str) -> Self {
        if !self.status().is_server_error() {
            warn!(operation, error = %self, "request rejected");
        }
        self
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repository(other),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServiceError::Validation(err) => json!({
                "error": err.to_string(),
                "kind": err.kind(),
            }),
            ServiceError::Repository(_) | ServiceError::Internal(_) => {
                error!(error = %self, "request failed");
                json!({ "error": "internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
