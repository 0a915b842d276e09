use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::{user_id, SuccessResponse};
use crate::assembler::learn;
use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLearnRequest {
    pub word_ids: Vec<String>,
}

pub async fn get_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match run(state, headers).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn run(state: AppState, headers: HeaderMap) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let session = learn::get_learn_session(state.store(), state.catalog(), &uid, Utc::now()).await?;
    Ok(Json(SuccessResponse::new(session)).into_response())
}

pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CompleteLearnRequest>,
) -> Response {
    match complete_inner(state, headers, payload).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn complete_inner(
    state: AppState,
    headers: HeaderMap,
    payload: CompleteLearnRequest,
) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let result = learn::complete_learn(state.store(), &uid, &payload.word_ids, Utc::now()).await?;
    Ok(Json(SuccessResponse::new(result)).into_response())
}
