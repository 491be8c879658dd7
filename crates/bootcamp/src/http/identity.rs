//! Bearer-token authentication and per-handler role checks.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::auth::{token::extract_bearer, TokenIssuer};
use crate::domain::{UserId, UserRole};
use crate::services::ServiceError;

/// Caller identity taken from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn require_role(&self, role: UserRole) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!(
                "{} role required",
                role.label()
            )))
        }
    }

    pub fn require_staff(&self) -> Result<(), ServiceError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(ServiceError::forbidden("instructor or employee role required"))
        }
    }

    /// Staff may act on any applicant; applicants only on themselves.
    pub fn require_self_or_staff(&self, applicant_id: UserId) -> Result<(), ServiceError> {
        if self.role.is_staff() || self.id == applicant_id {
            Ok(())
        } else {
            Err(ServiceError::forbidden(
                "applicants may only access their own records",
            ))
        }
    }
}

/// 401 answer for missing or unusable credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthorized(pub String);

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0 }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Validates an `Authorization` header when one is sent and attaches the caller identity.
/// Requests without the header pass through anonymously; handlers that need a caller ask
/// for [`AuthenticatedUser`] and reject them there.
pub async fn authenticate(
    State(tokens): State<TokenIssuer>,
    mut req: Request,
    next: Next,
) -> Result<Response, Unauthorized> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(next.run(req).await);
    };

    let header = header
        .to_str()
        .map_err(|_| Unauthorized("authorization header must be valid UTF-8".to_string()))?;
    let claims = extract_bearer(header)
        .and_then(|token| tokens.validate(token))
        .and_then(|claims| claims.user_id().map(|id| (id, claims)))
        .map_err(|err| {
            warn!(error = %err, "rejected bearer token");
            Unauthorized(err.to_string())
        })?;

    let (id, claims) = claims;
    req.extensions_mut().insert(AuthenticatedUser {
        id,
        email: claims.email,
        role: claims.role,
    });
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| Unauthorized("missing bearer token".to_string()))
    }
}
