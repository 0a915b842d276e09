mod admin;
mod health;
mod home;
mod learn;
mod practice;
mod review;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::response::{json_error, AppError};
use crate::state::AppState;

#[derive(Serialize)]
pub(crate) struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub(crate) fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

/// The adapter trusts this header; the core only ever sees a plain
/// `user_id` string (spec §6 identity contract).
pub(crate) fn user_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "missing X-User-Id header"))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/learn/session", get(learn::get_session))
        .route("/api/learn/complete", post(learn::complete))
        .route("/api/practice/session", get(practice::get_session))
        .route("/api/practice/submit", post(practice::submit))
        .route("/api/review/session", get(review::get_session))
        .route("/api/review/complete", post(review::complete))
        .route("/api/review/submit", post(review::submit))
        .route("/api/home/stats", get(home::stats))
        .route("/api/admin/reset-progress", post(admin::reset_progress))
        .route("/api/admin/pools", get(admin::list_pool))
        .fallback(fallback_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler() -> AppError {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "no such route")
}
