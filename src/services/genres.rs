use crate::{
    db::{Change, Repository},
    error::AppResult,
};

/// The sorted, duplicate-free list of known genre tags
#[derive(Clone)]
pub struct GenreRegistry {
    repo: Repository,
}

impl GenreRegistry {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> AppResult<Vec<String>> {
        Ok(self.repo.read().await?.genres)
    }

    /// Registers `name` unless it is blank or already known.
    ///
    /// Returns `true` when the registry changed.
    pub async fn add(&self, name: &str) -> AppResult<bool> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Ok(false);
        }

        let added = self
            .repo
            .mutate(move |doc| {
                if doc.register_genres([name.as_str()]) > 0 {
                    Change::Commit(true)
                } else {
                    Change::Discard(false)
                }
            })
            .await?;

        tracing::info!(added, "Genre registration");
        Ok(added)
    }
}
