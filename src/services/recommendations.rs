use chrono::Utc;

use crate::{
    db::{Change, Repository},
    error::AppResult,
    models::{Page, Recommendation, RecommendationInput},
    services::{validation, FieldErrors, Outcome},
};

/// Create/read/update/delete over the recommendation list
///
/// Every call reloads the document; mutations persist it before returning.
#[derive(Clone)]
pub struct RecommendationService {
    repo: Repository,
}

impl RecommendationService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Stores a new recommendation under the next id
    ///
    /// A new record can't be missing, so the only rejection is invalid input.
    pub async fn add(
        &self,
        input: RecommendationInput,
    ) -> AppResult<Result<Recommendation, FieldErrors>> {
        if let Err(errors) = validation::check(&input) {
            tracing::debug!(fields = ?errors, "Rejected new recommendation");
            return Ok(Err(errors));
        }

        let rec = self
            .repo
            .mutate(move |doc| Change::Commit(doc.insert(input, Utc::now())))
            .await?;

        tracing::info!(id = rec.id, title = %rec.title, "Recommendation added");
        Ok(Ok(rec))
    }

    /// Replaces every editable field of record `id`
    pub async fn edit(
        &self,
        id: u64,
        input: RecommendationInput,
    ) -> AppResult<Outcome<Recommendation>> {
        let outcome = self
            .repo
            .mutate(move |doc| {
                if doc.get(id).is_none() {
                    return Change::Discard(Outcome::NotFound);
                }
                if let Err(errors) = validation::check(&input) {
                    return Change::Discard(Outcome::Invalid(errors));
                }
                match doc.update(id, input) {
                    Some(rec) => Change::Commit(Outcome::Success(rec)),
                    None => Change::Discard(Outcome::NotFound),
                }
            })
            .await?;

        match &outcome {
            Outcome::Success(rec) => tracing::info!(id, title = %rec.title, "Recommendation updated"),
            Outcome::Invalid(errors) => tracing::debug!(id, fields = ?errors, "Rejected edit"),
            Outcome::NotFound => tracing::debug!(id, "Edit of unknown recommendation"),
        }

        Ok(outcome)
    }

    /// Removes record `id`; returns whether it existed
    pub async fn delete(&self, id: u64) -> AppResult<bool> {
        let removed = self
            .repo
            .mutate(move |doc| Change::Commit(doc.remove(id).is_some()))
            .await?;

        tracing::info!(id, removed, "Recommendation delete");
        Ok(removed)
    }

    pub async fn get(&self, id: u64) -> AppResult<Outcome<Recommendation>> {
        let doc = self.repo.read().await?;
        Ok(match doc.get(id) {
            Some(rec) => Outcome::Success(rec.clone()),
            None => Outcome::NotFound,
        })
    }

    /// One page of the listing, newest first
    pub async fn list(&self, page: usize, per_page: usize) -> AppResult<Page> {
        let doc = self.repo.read().await?;
        Ok(doc.page(page, per_page))
    }

    /// Every record whose title contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> AppResult<Vec<Recommendation>> {
        let doc = self.repo.read().await?;
        let hits = doc.search(query);
        tracing::debug!(query = %query, hits = hits.len(), "Title search");
        Ok(hits)
    }
}
