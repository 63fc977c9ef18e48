use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{AppState, middleware::log_errors, routes};

pub fn build_router(state: AppState) -> Router {
    let country_routes = Router::new()
        .route(
            "/countries",
            get(routes::country::find_all).post(routes::country::create_country),
        )
        .route(
            "/countries/batch",
            post(routes::country::create_countries)
                .put(routes::country::update_countries)
                .delete(routes::country::delete_countries),
        )
        .route(
            "/countries/{id}",
            get(routes::country::find_by_id)
                .put(routes::country::update_country)
                .delete(routes::country::delete_country),
        )
        .route("/countries/code/{name}", get(routes::country::get_code_by_country))
        .route("/countries/country/{code}", get(routes::country::get_country_by_code));

    let person_routes = Router::new()
        .route(
            "/persons",
            get(routes::person::find_all).post(routes::person::create_person),
        )
        .route(
            "/persons/batch",
            post(routes::person::create_persons)
                .put(routes::person::update_persons)
                .delete(routes::person::delete_persons),
        )
        .route(
            "/persons/{id}",
            get(routes::person::find_by_id)
                .put(routes::person::update_person)
                .delete(routes::person::delete_person),
        )
        .route("/persons/by-country/{name}", get(routes::person::find_by_country_name));

    let counter_routes = Router::new()
        .route("/counters", get(routes::counter::all_counts))
        .route(
            "/counters/{label}",
            get(routes::counter::count).delete(routes::counter::reset),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(country_routes)
        .merge(person_routes)
        .merge(counter_routes);

    // axum refuses to nest at the root
    let base_uri = state.config.api_base_uri.trim_end_matches('/').to_string();
    let router = if base_uri.is_empty() {
        api_routes
    } else {
        Router::new().nest(&base_uri, api_routes)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .layer(cors)
        .with_state(state)
}
