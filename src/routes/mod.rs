use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use minijinja::context;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppResult,
    middleware::{request_id_middleware, request_span},
};

pub mod flash;
pub mod genres;
pub mod recommendations;
pub mod search;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(recommendations::index))
        .route(
            "/add",
            get(recommendations::add_form).post(recommendations::add_submit),
        )
        .route(
            "/edit/:id",
            get(recommendations::edit_form).post(recommendations::edit_submit),
        )
        .route("/movie/:id", get(recommendations::view))
        .route("/delete/:id", post(recommendations::delete))
        .route("/genres", get(genres::list).post(genres::add))
        .route("/search", get(search::search))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Fallback for unknown routes
async fn not_found(State(state): State<AppState>) -> AppResult<Response> {
    not_found_page(&state)
}

pub(crate) fn not_found_page(state: &AppState) -> AppResult<Response> {
    let html = state.renderer.render("404.html", context! {})?;
    Ok((StatusCode::NOT_FOUND, html).into_response())
}

/// Path ids are plain non-negative integers; anything else is a 404
pub(crate) fn parse_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
