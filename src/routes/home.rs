use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use super::{user_id, SuccessResponse};
use crate::assembler::home_stats;
use crate::response::AppError;
use crate::state::AppState;

pub async fn stats(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match run(state, headers).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn run(state: AppState, headers: HeaderMap) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let stats = home_stats::get_home_stats(state.store(), state.catalog(), &uid, Utc::now()).await?;
    Ok(Json(SuccessResponse::new(stats)).into_response())
}
