//! Per-request timing log.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// One JSON line written after every request, whatever its outcome.
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub request: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Nanoseconds.
    pub duration: u64,
}

impl LogEntry {
    pub fn new(request: String, start_time: DateTime<Utc>, elapsed: Duration) -> Self {
        Self {
            request,
            start_time,
            end_time: Utc::now(),
            duration: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

/// Short label for a request: the user operation it maps to, else its path.
pub fn request_label(method: &Method, path: &str) -> String {
    let on_user = path.starts_with("/users/") && path.len() > "/users/".len();
    match (method, path) {
        (&Method::GET, "/users") => "/get".to_string(),
        (&Method::POST, "/users") => "/create".to_string(),
        (&Method::PUT, _) if on_user => "/update".to_string(),
        (&Method::DELETE, _) if on_user => "/delete".to_string(),
        _ => path.to_string(),
    }
}

/// Middleware emitting a [`LogEntry`] once the inner handler has responded.
pub async fn request_timing(req: Request, next: Next) -> Response {
    let label = request_label(req.method(), req.uri().path());
    let start_time = Utc::now();
    let start = Instant::now();

    let response = next.run(req).await;

    let entry = LogEntry::new(label, start_time, start.elapsed());
    match serde_json::to_string(&entry) {
        Ok(line) => tracing::info!(target: "request_timing", "{}", line),
        Err(err) => tracing::error!("Error marshaling log entry: {}", err),
    }

    response
}
