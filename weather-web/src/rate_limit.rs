//! Fixed-window request limiting keyed by client identity.
//!
//! Two limiter instances share this mechanism: a global one covering every
//! route and a stricter one in front of the weather lookups. Counters are the
//! only state shared across requests; increments are atomic under the lock
//! and each key's window expires independently.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use crate::respond::prefers_json;
use crate::state::AppState;
use crate::views;

/// Counting window shared by both limiters.
pub const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Message rendered when the global threshold is exceeded.
pub const GLOBAL_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes";

/// Message rendered when the weather-endpoint threshold is exceeded.
pub const WEATHER_MESSAGE: &str =
    "Too many weather requests, please try again after 15 minutes";

/// Outcome of a limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request may proceed; `remaining` permits are left in the window.
    Allowed { remaining: u32 },
    /// Threshold reached for this window.
    Denied,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter per client identity.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    message: &'static str,
    buckets: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, message: &'static str) -> Self {
        Self {
            max_requests,
            window,
            message,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Message rendered when this limiter denies a request.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Count one request for `key` and decide whether it may proceed.
    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let window = buckets.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return Decision::Denied;
        }

        window.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - window.count,
        }
    }
}

/// Global limiter applied to every route.
pub async fn global(State(state): State<AppState>, request: Request, next: Next) -> Response {
    enforce(&state.global_limiter, request, next).await
}

/// Stricter limiter in front of the weather lookup routes.
pub async fn weather_api(State(state): State<AppState>, request: Request, next: Next) -> Response {
    enforce(&state.weather_limiter, request, next).await
}

async fn enforce(limiter: &RateLimiter, request: Request, next: Next) -> Response {
    let key = client_key(&request);
    match limiter.check(&key) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Denied => {
            warn!(client = %key, "rate limit exceeded");
            limited_response(limiter.message(), request.headers())
        }
    }
}

/// Client identity used to bucket counters: the first `X-Forwarded-For` hop
/// when present, otherwise the socket peer address.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 429 body, JSON or HTML by the client's accept preference.
fn limited_response(message: &str, headers: &HeaderMap) -> Response {
    let status = StatusCode::TOO_MANY_REQUESTS;
    if prefers_json(headers) {
        return (
            status,
            Json(json!({ "error": "Rate limit exceeded", "message": message })),
        )
            .into_response();
    }

    (
        status,
        Html(views::error_page("Too Many Requests", message, status.as_u16())),
    )
        .into_response()
}
