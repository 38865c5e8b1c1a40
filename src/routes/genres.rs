use axum::{
    extract::State,
    response::Response,
    Extension, Form,
};
use minijinja::context;
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::RequestId,
    routes::{
        flash::{redirect_with, Flash, IncomingFlash},
        AppState,
    },
    services::FieldErrors,
};

#[derive(Debug, Default, Deserialize)]
pub struct GenreForm {
    #[serde(default)]
    genre: String,
}

fn render_genres(
    state: &AppState,
    genres: &[String],
    submitted: &str,
    errors: &FieldErrors,
    flash: &IncomingFlash,
) -> AppResult<Response> {
    let html = state.renderer.render(
        "genres.html",
        context! {
            genres => genres,
            genre => submitted,
            errors => errors,
            flash => flash.view(),
        },
    )?;
    Ok(flash.page(html))
}

/// Lists the genre registry
pub async fn list(State(state): State<AppState>, flash: IncomingFlash) -> AppResult<Response> {
    let genres = state.genres.list().await?;
    render_genres(&state, &genres, "", &FieldErrors::new(), &flash)
}

/// Registers a genre; duplicates re-render the page unchanged
pub async fn add(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let no_flash = IncomingFlash::default();

    if form.genre.trim().is_empty() {
        let mut errors = FieldErrors::new();
        errors.add("genre", "This field is required.");
        let genres = state.genres.list().await?;
        return render_genres(&state, &genres, &form.genre, &errors, &no_flash);
    }

    // Known genres fall through to a plain re-render
    if state.genres.add(&form.genre).await? {
        tracing::info!(request_id = %request_id, genre = %form.genre.trim(), "Genre form accepted");
        return Ok(redirect_with("/genres", Flash::GenreAdded));
    }

    let genres = state.genres.list().await?;
    render_genres(&state, &genres, &form.genre, &FieldErrors::new(), &no_flash)
}
