use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Local;
use minijinja::context;
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::RequestId,
    render::{markdown, RecommendationView},
    routes::{
        flash::{redirect_with, Flash, IncomingFlash},
        not_found_page, parse_id, AppState,
    },
    services::{FieldErrors, Outcome, RecommendationForm},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    q: Option<String>,
}

/// Which form page is being shown
#[derive(Debug, Clone, Copy)]
enum FormPage {
    Add,
    Edit(u64),
}

impl FormPage {
    fn heading(self) -> &'static str {
        match self {
            FormPage::Add => "Add Recommendation",
            FormPage::Edit(_) => "Edit Recommendation",
        }
    }

    fn action(self) -> String {
        match self {
            FormPage::Add => "/add".to_string(),
            FormPage::Edit(id) => format!("/edit/{}", id),
        }
    }
}

fn render_form(
    state: &AppState,
    which: FormPage,
    form: &RecommendationForm,
    all_genres: &[String],
    errors: &FieldErrors,
    flash: &IncomingFlash,
) -> AppResult<Response> {
    let html = state.renderer.render(
        "form.html",
        context! {
            heading => which.heading(),
            action => which.action(),
            form => form,
            all_genres => all_genres,
            errors => errors,
            flash => flash.view(),
        },
    )?;
    Ok(flash.page(html))
}

fn back_to_listing() -> Response {
    Redirect::to("/").into_response()
}

/// Paginated listing, newest first
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    flash: IncomingFlash,
) -> AppResult<Response> {
    // Junk page numbers fall back to the first page
    let page = params
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(1);
    let query = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let listing = state.recommendations.list(page, state.page_size).await?;
    let recommendations: Vec<RecommendationView> =
        listing.items.iter().map(RecommendationView::from).collect();

    let html = state.renderer.render(
        "index.html",
        context! {
            recommendations => recommendations,
            page => listing.page,
            has_more => listing.has_more,
            searching => false,
            query => query,
            flash => flash.view(),
        },
    )?;
    Ok(flash.page(html))
}

/// Empty add form
pub async fn add_form(State(state): State<AppState>, flash: IncomingFlash) -> AppResult<Response> {
    let all_genres = state.genres.list().await?;
    let form = RecommendationForm::blank(Local::now().date_naive());
    render_form(&state, FormPage::Add, &form, &all_genres, &FieldErrors::new(), &flash)
}

/// Creates a recommendation, or shows the form again with errors
pub async fn add_submit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = RecommendationForm::from_pairs(pairs);
    let all_genres = state.genres.list().await?;
    let no_flash = IncomingFlash::default();

    // Coercion errors are shown before the service sees the input
    let input = match form.parse(&all_genres) {
        Ok(input) => input,
        Err(errors) => {
            return render_form(&state, FormPage::Add, &form, &all_genres, &errors, &no_flash)
        }
    };

    match state.recommendations.add(input).await? {
        Ok(rec) => {
            tracing::info!(request_id = %request_id, id = rec.id, "Add form accepted");
            Ok(redirect_with("/", Flash::Added))
        }
        Err(errors) => render_form(&state, FormPage::Add, &form, &all_genres, &errors, &no_flash),
    }
}

/// Edit form prefilled from the stored record
pub async fn edit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    flash: IncomingFlash,
) -> AppResult<Response> {
    let Some(id) = parse_id(&raw_id) else {
        return not_found_page(&state);
    };

    match state.recommendations.get(id).await? {
        Outcome::Success(rec) => {
            let all_genres = state.genres.list().await?;
            let form = RecommendationForm::from(&rec);
            render_form(&state, FormPage::Edit(id), &form, &all_genres, &FieldErrors::new(), &flash)
        }
        _ => Ok(back_to_listing()),
    }
}

/// Applies an edit and shows the updated record
pub async fn edit_submit(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let Some(id) = parse_id(&raw_id) else {
        return not_found_page(&state);
    };

    let form = RecommendationForm::from_pairs(pairs);
    let all_genres = state.genres.list().await?;
    let no_flash = IncomingFlash::default();

    let input = match form.parse(&all_genres) {
        Ok(input) => input,
        Err(errors) => {
            // A form for a record that no longer exists goes back to the listing
            if state.recommendations.get(id).await? == Outcome::NotFound {
                return Ok(back_to_listing());
            }
            return render_form(&state, FormPage::Edit(id), &form, &all_genres, &errors, &no_flash);
        }
    };

    match state.recommendations.edit(id, input).await? {
        Outcome::Success(rec) => {
            tracing::info!(request_id = %request_id, id = rec.id, "Edit form accepted");
            Ok(redirect_with(&format!("/movie/{}", id), Flash::Updated))
        }
        Outcome::Invalid(errors) => {
            render_form(&state, FormPage::Edit(id), &form, &all_genres, &errors, &no_flash)
        }
        Outcome::NotFound => Ok(back_to_listing()),
    }
}

/// Detail page with the rendered review
pub async fn view(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    flash: IncomingFlash,
) -> AppResult<Response> {
    let Some(id) = parse_id(&raw_id) else {
        return not_found_page(&state);
    };

    let rec = match state.recommendations.get(id).await? {
        Outcome::Success(rec) => rec,
        _ => return Ok(back_to_listing()),
    };

    let html = state.renderer.render(
        "movie.html",
        context! {
            rec => RecommendationView::from(&rec),
            review_html => markdown::to_html(&rec.review),
            flash => flash.view(),
        },
    )?;
    Ok(flash.page(html))
}

/// Deletes a record; unknown ids are ignored
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Response> {
    let Some(id) = parse_id(&raw_id) else {
        return not_found_page(&state);
    };

    // The notice is shown even when nothing was removed
    let removed = state.recommendations.delete(id).await?;
    tracing::info!(request_id = %request_id, id, removed, "Delete requested");
    Ok(redirect_with("/", Flash::Deleted))
}
