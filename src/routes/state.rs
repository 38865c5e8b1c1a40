use std::sync::Arc;

use crate::{
    config::Config,
    db::{DocumentStore, JsonFileStore, Repository},
    error::AppResult,
    render::Renderer,
    services::{GenreRegistry, RecommendationService},
};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub recommendations: RecommendationService,
    pub genres: GenreRegistry,
    pub renderer: Renderer,
    /// Records per listing page
    pub page_size: usize,
}

impl AppState {
    /// Builds the services on top of `store`
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize) -> AppResult<Self> {
        let repo = Repository::new(store);
        Ok(Self {
            recommendations: RecommendationService::new(repo.clone()),
            genres: GenreRegistry::new(repo),
            renderer: Renderer::new()?,
            page_size,
        })
    }

    /// State backed by the JSON file named in `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let store = JsonFileStore::new(config.data_path.clone());
        Self::new(Arc::new(store), config.page_size)
    }
}
