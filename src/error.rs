use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Application-level errors
///
/// Anything that reaches the HTTP layer as an `AppError` is fatal for the
/// request. Expected outcomes such as invalid forms or missing records are
/// modelled by [`crate::services::Outcome`] instead.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed data document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        let body = Html(
            "<!doctype html><title>Internal Server Error</title>\
             <h1>Internal Server Error</h1>\
             <p>Something went wrong while handling this request.</p>",
        );

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
