use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;

use crate::{
    error::AppResult,
    render::RecommendationView,
    routes::{flash::IncomingFlash, AppState},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Title search; a blank query goes back to the listing
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
    flash: IncomingFlash,
) -> AppResult<Response> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let hits = state.recommendations.search(query).await?;
    let recommendations: Vec<RecommendationView> =
        hits.iter().map(RecommendationView::from).collect();

    let html = state.renderer.render(
        "index.html",
        context! {
            recommendations => recommendations,
            // Search results are a single unpaginated page
            page => 1,
            has_more => false,
            searching => true,
            query => query,
            flash => flash.view(),
        },
    )?;
    Ok(flash.page(html))
}
