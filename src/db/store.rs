use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error::AppResult, models::Document};

/// Persistence for the whole data document
///
/// Implementations read and write the document wholesale; there are no
/// partial reads or writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads the document, or the empty default when nothing is persisted yet
    async fn load(&self) -> AppResult<Document>;

    /// Replaces the persisted document
    async fn save(&self, document: &Document) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// What a mutation decided to do with the loaded document
#[derive(Debug, PartialEq)]
pub enum Change<R> {
    /// Persist the document and return the value
    Commit(R),
    /// Leave the persisted document alone and return the value
    Discard(R),
}

/// Runs load-mutate-save cycles against a [`DocumentStore`]
///
/// Mutations issued through the same repository are serialized so two
/// requests in this process can't overwrite each other's changes. Reads
/// don't take the lock.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads a fresh snapshot of the document
    pub async fn read(&self) -> AppResult<Document> {
        self.store.load().await
    }

    /// Loads the document, applies `f` and saves the result if `f` commits
    pub async fn mutate<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Document) -> Change<R> + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;

        match f(&mut document) {
            Change::Commit(value) => {
                self.store.save(&document).await?;
                tracing::debug!(
                    store = self.store.name(),
                    next_id = document.next_id,
                    records = document.recommendations.len(),
                    "Document saved"
                );
                Ok(value)
            }
            Change::Discard(value) => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn repository(mock: MockDocumentStore) -> Repository {
        Repository::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_commit_saves_mutated_document() {
        let mut mock = MockDocumentStore::new();
        mock.expect_name().return_const("mock");
        mock.expect_load().times(1).returning(|| Ok(Document::default()));
        mock.expect_save()
            .withf(|doc: &Document| doc.genres == vec!["Noir".to_string()])
            .times(1)
            .returning(|_| Ok(()));

        let added = repository(mock)
            .mutate(|doc| Change::Commit(doc.register_genres(["Noir"])))
            .await
            .unwrap();

        assert_eq!(added, 1);
    }

    #[tokio::test]
    async fn test_discard_skips_save() {
        let mut mock = MockDocumentStore::new();
        mock.expect_load().times(1).returning(|| Ok(Document::default()));
        mock.expect_save().times(0);

        let value = repository(mock)
            .mutate(|doc| {
                doc.next_id = 99;
                Change::Discard("rejected")
            })
            .await
            .unwrap();

        assert_eq!(value, "rejected");
    }

    #[tokio::test]
    async fn test_load_failure_propagates_without_save() {
        let mut mock = MockDocumentStore::new();
        mock.expect_load().returning(|| {
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        });
        mock.expect_save().times(0);

        let result = repository(mock)
            .mutate(|_| Change::Commit(()))
            .await;

        tokio_test::assert_err!(result);
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let mut mock = MockDocumentStore::new();
        mock.expect_load().returning(|| Ok(Document::default()));
        mock.expect_save()
            .returning(|_| Err(AppError::Internal("disk full".to_string())));

        let result = repository(mock).mutate(|_| Change::Commit(())).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
