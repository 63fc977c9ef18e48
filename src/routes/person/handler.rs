use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    models::{PersonDetails, PersonUpdate},
    routes::IdsRequest,
    utils::success_to_api_response,
};

#[axum::debug_handler]
pub async fn find_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let persons = state.persons.find_all().await?;
    Ok((StatusCode::OK, success_to_api_response(persons)))
}

#[axum::debug_handler]
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    match state.persons.find_by_id(id).await? {
        Some(person) => Ok((StatusCode::OK, success_to_api_response(person))),
        None => Err(AppError::NotFound(format!("Person {} not found", id))),
    }
}

#[axum::debug_handler]
pub async fn find_by_country_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let persons = state.persons.find_by_country_name(&name).await?;
    Ok((StatusCode::OK, success_to_api_response(persons)))
}

#[axum::debug_handler]
pub async fn create_person(
    State(state): State<AppState>,
    Json(req): Json<PersonDetails>,
) -> Result<impl IntoResponse, AppError> {
    let person = state.persons.create(req).await?;
    Ok((StatusCode::CREATED, success_to_api_response(person)))
}

#[axum::debug_handler]
pub async fn create_persons(
    State(state): State<AppState>,
    Json(req): Json<Vec<PersonDetails>>,
) -> Result<impl IntoResponse, AppError> {
    let persons = state.persons.create_all(req).await?;
    Ok((StatusCode::CREATED, success_to_api_response(persons)))
}

#[axum::debug_handler]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<PersonDetails>,
) -> Result<impl IntoResponse, AppError> {
    match state.persons.update(id, req).await? {
        Some(person) => Ok((StatusCode::OK, success_to_api_response(person))),
        None => Err(AppError::NotFound(format!("Person {} not found", id))),
    }
}

#[axum::debug_handler]
pub async fn update_persons(
    State(state): State<AppState>,
    Json(req): Json<Vec<PersonUpdate>>,
) -> Result<impl IntoResponse, AppError> {
    let persons = state.persons.update_all(req).await?;
    Ok((StatusCode::OK, success_to_api_response(persons)))
}

#[axum::debug_handler]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    state.persons.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_persons(
    State(state): State<AppState>,
    Json(req): Json<IdsRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.persons.delete_all(&req.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
