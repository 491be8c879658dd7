//! HTTP adapters: request decoding, role policies, and the router that ties them together.

mod applications;
mod auth;
mod blacklists;
mod bootcamps;
mod directory;
pub mod identity;
pub mod rate_limit;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::{AuthService, ResumeStore};
use crate::config::{AppConfig, ServerConfig};
use crate::repository::UnitOfWork;
use crate::services::{ApplicationService, BlacklistService, BootcampService, DirectoryService};

pub use identity::{AuthenticatedUser, Unauthorized};
pub use rate_limit::RateLimits;

/// Multipart framing allowance on top of the résumé size cap.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Every service the handlers reach, sharing one store.
pub struct ApiContext<U, S> {
    pub auth: AuthService<U, S>,
    pub applications: ApplicationService<U>,
    pub bootcamps: BootcampService<U>,
    pub blacklist: BlacklistService<U>,
    pub directory: DirectoryService<U>,
}

impl<U, S> ApiContext<U, S>
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    pub fn new(store: Arc<U>, resumes: Arc<S>, config: &AppConfig) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&store), resumes, &config.auth, &config.uploads),
            applications: ApplicationService::new(Arc::clone(&store)),
            bootcamps: BootcampService::new(Arc::clone(&store)),
            blacklist: BlacklistService::new(Arc::clone(&store)),
            directory: DirectoryService::new(store),
        }
    }
}

pub(crate) type SharedContext<U, S> = Arc<ApiContext<U, S>>;

/// Router builder exposing the `/api` surface with authentication, rate limiting,
/// request tracing and CORS applied.
pub fn api_router<U, S>(context: Arc<ApiContext<U, S>>, config: &AppConfig) -> Router
where
    U: UnitOfWork + 'static,
    S: ResumeStore + 'static,
{
    let limits = Arc::new(RateLimits::per_minute(
        config.rate_limit.general_per_minute,
        config.rate_limit.login_per_minute,
    ));
    let tokens = context.auth.tokens().clone();

    let login = Router::new()
        .route("/api/auth/login", post(auth::login::<U, S>))
        .route_layer(from_fn_with_state(
            Arc::clone(&limits),
            rate_limit::limit_login,
        ));

    let registration = Router::new()
        .route(
            "/api/auth/register/applicant",
            post(auth::register_applicant::<U, S>),
        )
        .layer(DefaultBodyLimit::max(
            config.uploads.max_bytes + FORM_OVERHEAD_BYTES,
        ))
        .route(
            "/api/auth/register/instructor",
            post(auth::register_instructor::<U, S>),
        )
        .route(
            "/api/auth/register/employee",
            post(auth::register_employee::<U, S>),
        );

    let bootcamps = Router::new()
        .route(
            "/api/bootcamps",
            get(bootcamps::list::<U, S>).post(bootcamps::create::<U, S>),
        )
        .route(
            "/api/bootcamps/:id",
            get(bootcamps::get_one::<U, S>)
                .put(bootcamps::update::<U, S>)
                .delete(bootcamps::delete::<U, S>),
        )
        .route(
            "/api/bootcamps/:id/state",
            patch(bootcamps::update_state::<U, S>),
        );

    let applications = Router::new()
        .route(
            "/api/applications",
            get(applications::list::<U, S>).post(applications::create::<U, S>),
        )
        .route(
            "/api/applications/status",
            patch(applications::update_status::<U, S>),
        )
        .route("/api/applications/check", get(applications::check::<U, S>))
        .route(
            "/api/applications/my-applications/:applicant_id",
            get(applications::mine::<U, S>),
        )
        .route(
            "/api/applications/bootcamp/:bootcamp_id",
            get(applications::by_bootcamp::<U, S>),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_one::<U, S>).delete(applications::delete::<U, S>),
        );

    let blacklists = Router::new()
        .route(
            "/api/blacklists",
            get(blacklists::list::<U, S>).post(blacklists::create::<U, S>),
        )
        .route(
            "/api/blacklists/:id",
            get(blacklists::get_one::<U, S>).delete(blacklists::delete::<U, S>),
        )
        .route(
            "/api/blacklists/check/:applicant_id",
            get(blacklists::check::<U, S>),
        );

    let directory = Router::new()
        .route("/api/applicants", get(directory::applicants::<U, S>))
        .route("/api/applicants/:id", get(directory::applicant::<U, S>))
        .route("/api/instructors", get(directory::instructors::<U, S>))
        .route("/api/instructors/:id", get(directory::instructor::<U, S>))
        .route("/api/employees", get(directory::employees::<U, S>))
        .route("/api/employees/:id", get(directory::employee::<U, S>));

    Router::new()
        .merge(login)
        .merge(registration)
        .merge(bootcamps)
        .merge(applications)
        .merge(blacklists)
        .merge(directory)
        .layer(from_fn_with_state(tokens, identity::authenticate))
        .layer(from_fn_with_state(limits, rate_limit::limit_general))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .with_state(context)
}

/// CORS for the configured browser origins; unparsable entries are skipped.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
