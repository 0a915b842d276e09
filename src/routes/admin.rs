use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{user_id, SuccessResponse};
use crate::assembler::admin;
use crate::response::AppError;
use crate::state::AppState;

pub async fn reset_progress(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match reset_inner(state, headers).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn reset_inner(state: AppState, headers: HeaderMap) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let result = admin::reset_progress(state.store(), &uid).await?;
    Ok(Json(SuccessResponse::new(result)).into_response())
}

pub async fn list_pool(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match list_pool_inner(state, headers).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}

async fn list_pool_inner(state: AppState, headers: HeaderMap) -> Result<Response, AppError> {
    let uid = user_id(&headers)?;
    let pools = admin::list_pool(state.store(), state.catalog(), &uid).await?;
    Ok(Json(SuccessResponse::new(pools)).into_response())
}
