use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{AppState, utils::success_to_api_response};

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub label: String,
    pub count: u64,
}

#[axum::debug_handler]
pub async fn all_counts(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, success_to_api_response(state.counter.all_counts()))
}

#[axum::debug_handler]
pub async fn count(State(state): State<AppState>, Path(label): Path<String>) -> impl IntoResponse {
    let count = state.counter.count(&label);
    (StatusCode::OK, success_to_api_response(CountResponse { label, count }))
}

#[axum::debug_handler]
pub async fn reset(State(state): State<AppState>, Path(label): Path<String>) -> impl IntoResponse {
    state.counter.reset(&label);
    StatusCode::NO_CONTENT
}
