use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::MemoryResumeStore;
use crate::config::{AppConfig, RateLimitConfig};
use crate::domain::{
    ApplicantDetails, EmployeeDetails, InstructorDetails, User, UserId, UserProfile,
};
use crate::http::{api_router, ApiContext};
use crate::repository::{InMemoryStore, RepositoryError, UnitOfWork};

pub(super) struct TestApi {
    pub(super) router: Router,
    pub(super) store: Arc<InMemoryStore>,
    pub(super) context: Arc<ApiContext<InMemoryStore, MemoryResumeStore>>,
}

pub(super) fn api() -> TestApi {
    let mut config = AppConfig::development();
    config.rate_limit = RateLimitConfig {
        general_per_minute: 1_000,
        login_per_minute: 5,
    };
    api_with(config)
}

pub(super) fn api_with(config: AppConfig) -> TestApi {
    let store = Arc::new(InMemoryStore::new());
    let context = Arc::new(ApiContext::new(
        Arc::clone(&store),
        Arc::new(MemoryResumeStore::new()),
        &config,
    ));
    let router = api_router(Arc::clone(&context), &config);
    TestApi {
        router,
        store,
        context,
    }
}

impl TestApi {
    pub(super) async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    fn seed(&self, email: &str, profile: UserProfile) -> User {
        self.store
            .execute(|session| -> Result<User, RepositoryError> {
                session.users().insert(User {
                    id: UserId(0),
                    first_name: "Seeded".to_string(),
                    last_name: "User".to_string(),
                    email: email.to_string(),
                    password_hash: "$argon2id$placeholder".to_string(),
                    profile,
                    created_at: Utc::now(),
                })
            })
            .expect("seed user")
    }

    pub(super) fn applicant(&self, email: &str) -> User {
        self.seed(
            email,
            UserProfile::Applicant(ApplicantDetails {
                date_of_birth: NaiveDate::from_ymd_opt(1997, 3, 14).expect("valid"),
                national_identity: "22222222222".to_string(),
                about: String::new(),
                resume: None,
                blacklisted: false,
            }),
        )
    }

    pub(super) fn instructor(&self, email: &str) -> User {
        self.seed(
            email,
            UserProfile::Instructor(InstructorDetails {
                company_name: "Ferris Labs".to_string(),
            }),
        )
    }

    pub(super) fn employee(&self, email: &str) -> User {
        self.seed(
            email,
            UserProfile::Employee(EmployeeDetails {
                position: "Coordinator".to_string(),
            }),
        )
    }

    pub(super) fn token_for(&self, user: &User) -> String {
        self.context
            .auth
            .tokens()
            .issue(user)
            .expect("issue token")
            .token
    }

    /// Creates a bootcamp through the API and moves it to `state`; returns its id.
    pub(super) async fn bootcamp(&self, staff_token: &str, instructor: UserId, state: &str) -> i64 {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/bootcamps",
                Some(staff_token),
                serde_json::json!({
                    "name": "Rust Backend",
                    "instructorId": instructor.0,
                    "startDate": "2026-11-02",
                    "endDate": "2027-01-29",
                }),
            ))
            .await;
        let created = read_json_body(response).await;
        let id = created["id"].as_i64().expect("bootcamp id");

        let moved = self
            .send(json_request(
                Method::PATCH,
                &format!("/api/bootcamps/{id}/state"),
                Some(staff_token),
                serde_json::json!({ "state": state }),
            ))
            .await;
        assert!(moved.status().is_success());
        id
    }
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request")
}

pub(super) fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
