//! Fixed-window request limits keyed by client IP.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimited {
    pub limit: u32,
    pub retry_after: Duration,
}

/// Counts requests per key in consecutive windows; the counter resets when a window ends.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    name: &'static str,
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    pub fn per_minute(name: &'static str, limit: u32) -> Self {
        Self::new(name, limit, WINDOW)
    }

    pub fn new(name: &'static str, limit: u32, window: Duration) -> Self {
        Self {
            name,
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, client: IpAddr, now: Instant) -> Result<u32, RateLimited> {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Drop finished windows so idle clients do not accumulate.
        if windows.len() > 1024 {
            let span = self.window;
            windows.retain(|_, window| now.saturating_duration_since(window.started) < span);
        }

        let window = windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.limit {
            let retry_after = self
                .window
                .saturating_sub(now.saturating_duration_since(window.started));
            return Err(RateLimited {
                limit: self.limit,
                retry_after,
            });
        }

        window.count += 1;
        Ok(self.limit - window.count)
    }
}

/// The two limits the API applies.
#[derive(Debug)]
pub struct RateLimits {
    pub general: FixedWindowLimiter,
    pub login: FixedWindowLimiter,
}

impl RateLimits {
    pub fn per_minute(general: u32, login: u32) -> Self {
        Self {
            general: FixedWindowLimiter::per_minute("general", general),
            login: FixedWindowLimiter::per_minute("login", login),
        }
    }
}

/// Peer address when the server exposes it, otherwise the first `X-Forwarded-For` hop.
/// Requests with neither share one bucket.
pub fn client_ip(req: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    forwarded_for(req.headers()).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

fn too_many_requests(limited: RateLimited) -> Response {
    let seconds = limited.retry_after.as_secs().max(1);
    let body = Json(json!({
        "error": "too many requests; try again later",
        "limit": limited.limit,
    }));
    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
        response.headers_mut().insert(RETRY_AFTER, value);
    }
    response
}

async fn enforce(limiter: &FixedWindowLimiter, req: Request, next: Next) -> Response {
    let client = client_ip(&req);
    match limiter.check(client, Instant::now()) {
        Ok(_) => next.run(req).await,
        Err(limited) => {
            warn!(limiter = limiter.name, client = %client, "rate limit exceeded");
            too_many_requests(limited)
        }
    }
}

pub async fn limit_general(
    State(limits): State<Arc<RateLimits>>,
    req: Request,
    next: Next,
) -> Response {
    enforce(&limits.general, req, next).await
}

pub async fn limit_login(
    State(limits): State<Arc<RateLimits>>,
    req: Request,
    next: Next,
) -> Response {
    enforce(&limits.login, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));

    #[test]
    fn allows_up_to_limit_within_window() {
        let limiter = FixedWindowLimiter::per_minute("login", 5);
        let start = Instant::now();

        for expected_remaining in (0..5).rev() {
            assert_eq!(limiter.check(CLIENT, start), Ok(expected_remaining));
        }
        let rejected = limiter
            .check(CLIENT, start + Duration::from_secs(10))
            .expect_err("sixth request");
        assert_eq!(rejected.limit, 5);
        assert_eq!(rejected.retry_after, Duration::from_secs(50));
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = FixedWindowLimiter::per_minute("login", 1);
        let start = Instant::now();

        assert!(limiter.check(CLIENT, start).is_ok());
        assert!(limiter.check(CLIENT, start).is_err());
        assert!(limiter.check(CLIENT, start + WINDOW).is_ok());
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = FixedWindowLimiter::per_minute("general", 1);
        let start = Instant::now();
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8));

        assert!(limiter.check(CLIENT, start).is_ok());
        assert!(limiter.check(other, start).is_ok());
        assert!(limiter.check(CLIENT, start).is_err());
    }

    #[test]
    fn forwarded_header_supplies_client() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(
            forwarded_for(&headers),
            Some("203.0.113.9".parse().expect("ip"))
        );
    }
}
