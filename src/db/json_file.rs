use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{db::DocumentStore, error::AppResult, models::Document};

/// Stores the document as one pretty-printed JSON file
///
/// Saves overwrite the file in place. There is no temp-file rename, so a
/// crash mid-write can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(document: &Document) -> AppResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut serializer)?;
        Ok(buf)
    }
}

#[async_trait::async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> AppResult<Document> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No data file yet, using empty document");
                return Ok(Document::default());
            }
            Err(e) => return Err(e.into()),
        };

        let document: Document = serde_json::from_slice(&bytes)?;
        Ok(document)
    }

    async fn save(&self, document: &Document) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = Self::encode(document)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}
