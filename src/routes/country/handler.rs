use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::model::{CountryCodeResponse, PersonIdQuery};
use crate::{
    AppState,
    error::AppError,
    models::{CountryDetails, CountryUpdate},
    routes::IdsRequest,
    utils::success_to_api_response,
};

#[axum::debug_handler]
pub async fn find_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let countries = state.countries.find_all().await?;
    Ok((StatusCode::OK, success_to_api_response(countries)))
}

#[axum::debug_handler]
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    match state.countries.find_by_id(id).await? {
        Some(country) => Ok((StatusCode::OK, success_to_api_response(country))),
        None => Err(AppError::NotFound(format!("Country {} not found", id))),
    }
}

#[axum::debug_handler]
pub async fn get_code_by_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.countries.get_code_by_country(&name).await? {
        Some(code) => Ok((
            StatusCode::OK,
            success_to_api_response(CountryCodeResponse { name, code }),
        )),
        None => Err(AppError::NotFound(format!("No code known for country '{}'", name))),
    }
}

#[axum::debug_handler]
pub async fn get_country_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.countries.get_country_by_code(&code).await? {
        Some(name) => Ok((
            StatusCode::OK,
            success_to_api_response(CountryCodeResponse { name, code }),
        )),
        None => Err(AppError::NotFound(format!("No country known for code '{}'", code))),
    }
}

#[axum::debug_handler]
pub async fn create_country(
    State(state): State<AppState>,
    Query(query): Query<PersonIdQuery>,
    Json(req): Json<CountryDetails>,
) -> Result<impl IntoResponse, AppError> {
    match state.countries.create(req, query.person_id).await? {
        Some(country) => Ok((StatusCode::CREATED, success_to_api_response(country))),
        None => Err(query
            .person_id
            .map_or(AppError::InternalServerError, owner_not_found)),
    }
}

#[axum::debug_handler]
pub async fn create_countries(
    State(state): State<AppState>,
    Query(query): Query<PersonIdQuery>,
    Json(req): Json<Vec<CountryDetails>>,
) -> Result<impl IntoResponse, AppError> {
    let expected = req.len();
    let countries = state.countries.create_all(req, query.person_id).await?;
    if countries.is_empty() && expected > 0 {
        if let Some(person_id) = query.person_id {
            return Err(owner_not_found(person_id));
        }
    }
    Ok((StatusCode::CREATED, success_to_api_response(countries)))
}

#[axum::debug_handler]
pub async fn update_country(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<CountryDetails>,
) -> Result<impl IntoResponse, AppError> {
    match state.countries.update(id, req).await? {
        Some(country) => Ok((StatusCode::OK, success_to_api_response(country))),
        None => Err(AppError::NotFound(format!("Country {} not found", id))),
    }
}

#[axum::debug_handler]
pub async fn update_countries(
    State(state): State<AppState>,
    Json(req): Json<Vec<CountryUpdate>>,
) -> Result<impl IntoResponse, AppError> {
    let countries = state.countries.update_all(req).await?;
    Ok((StatusCode::OK, success_to_api_response(countries)))
}

#[axum::debug_handler]
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    state.countries.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_countries(
    State(state): State<AppState>,
    Json(req): Json<IdsRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.countries.delete_all(&req.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn owner_not_found(person_id: i32) -> AppError {
    AppError::NotFound(format!("Person {} not found", person_id))
}
