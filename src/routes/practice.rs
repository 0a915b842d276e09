use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::{user_id, SuccessResponse};
use crate::assembler::practice::{self, PracticeAnswer};
use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPracticeRequest {
    pub answers: Vec<PracticeAnswer>,
}

pub async fn get_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match run(state, headers).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn run(state: AppState, headers: HeaderMap) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let session = practice::get_practice_session(state.store(), state.catalog(), &uid, Utc::now()).await?;
    Ok(Json(SuccessResponse::new(session)).into_response())
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitPracticeRequest>,
) -> Response {
    match submit_inner(state, headers, payload).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn submit_inner(
    state: AppState,
    headers: HeaderMap,
    payload: SubmitPracticeRequest,
) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let result = practice::submit_practice(state.store(), &uid, &payload.answers, Utc::now()).await?;
    Ok(Json(SuccessResponse::new(result)).into_response())
}
