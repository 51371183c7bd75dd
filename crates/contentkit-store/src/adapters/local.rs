use crate::adapters::{ContentAdapter, WritePrecondition};
use crate::atomic::atomic_write;
use crate::errors::{conflict, invalid_document, io_error, not_found, write_error, Result};
use crate::layout::content_path;
use async_trait::async_trait;
use contentkit_core::{ContentDocument, ContentSource};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const ADAPTER: &str = "local";

/// Filesystem adapter rooted at a project directory
///
/// Documents live at `<root><content_path(id)>`, e.g.
/// `<root>/content/pages/home.json`.
pub struct LocalAdapter {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a content id
    pub fn path_for(&self, content_id: &str) -> Result<PathBuf> {
        let relative = content_path(content_id)?;
        Ok(self.root.join(relative.trim_start_matches('/')))
    }

    async fn read_existing(&self, content_id: &str, path: &Path) -> Result<Option<ContentDocument>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => ContentDocument::from_json_slice(&bytes)
                .map(Some)
                .map_err(|e| invalid_document(ADAPTER, content_id, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read_content", e)
                .with_adapter(ADAPTER)
                .with_content_id(content_id)),
        }
    }
}

#[async_trait]
impl ContentAdapter for LocalAdapter {
    fn source(&self) -> ContentSource {
        ContentSource::Local
    }

    async fn load(&self, content_id: &str) -> Result<ContentDocument> {
        let path = self.path_for(content_id)?;
        tracing::debug!(content_id, path = %path.display(), "loading local content");
        self.read_existing(content_id, &path)
            .await?
            .ok_or_else(|| not_found(ADAPTER, content_id))
    }

    async fn save(
        &self,
        content_id: &str,
        document: &ContentDocument,
        precondition: WritePrecondition,
    ) -> Result<()> {
        let path = self.path_for(content_id)?;
        let _guard = self.write_lock.lock().await;

        if precondition != WritePrecondition::None {
            let current = self.read_existing(content_id, &path).await?;
            precondition
                .check(current.as_ref().map(|d| d.version()))
                .map_err(|reason| conflict(ADAPTER, content_id, reason))?;
        }

        let body = document
            .to_pretty_json()
            .map_err(|e| write_error(ADAPTER, content_id, e.to_string()))?;
        atomic_write(&path, body.as_bytes())
            .await
            .map_err(|e| write_error(ADAPTER, content_id, e.message().to_string()).with_source(e))?;

        tracing::debug!(content_id, path = %path.display(), %precondition, "saved local content");
        Ok(())
    }
}
