use std::sync::Arc;

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::{error::AppResult, models::Recommendation};

pub mod markdown;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("form.html", include_str!("../../templates/form.html")),
    ("movie.html", include_str!("../../templates/movie.html")),
    ("genres.html", include_str!("../../templates/genres.html")),
    ("404.html", include_str!("../../templates/404.html")),
];

/// HTML page renderer backed by templates compiled into the binary
#[derive(Clone)]
pub struct Renderer {
    env: Arc<Environment<'static>>,
}

impl Renderer {
    pub fn new() -> AppResult<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env: Arc::new(env) })
    }

    /// Renders template `name` with `ctx`; `.html` templates auto-escape
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> AppResult<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

/// Template-facing projection of a [`Recommendation`]
#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub rating: u8,
    pub genres: Vec<String>,
    pub watched_date: String,
    pub poster_url: Option<String>,
    pub platform: Option<String>,
    pub watched: bool,
    pub rewatch: bool,
    pub added_at: String,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        Self {
            id: rec.id,
            title: rec.title.clone(),
            year: rec.year,
            rating: rec.rating,
            genres: rec.genres.clone(),
            watched_date: rec.watched_date.format("%B %-d, %Y").to_string(),
            poster_url: rec.poster_url.clone(),
            platform: rec.platform.clone(),
            watched: rec.watched,
            rewatch: rec.rewatch,
            added_at: rec.added_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}
