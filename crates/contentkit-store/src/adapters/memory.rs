use crate::adapters::{ContentAdapter, WritePrecondition};
use crate::errors::{conflict, not_found, Result};
use crate::layout::validate_content_id;
use async_trait::async_trait;
use contentkit_core::{ContentDocument, ContentSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const ADAPTER: &str = "memory";

/// In-process adapter
///
/// Holds documents in a map and counts successful saves, which makes it the
/// stand-in for any source in tests and previews.
#[derive(Debug)]
pub struct MemoryAdapter {
    source: ContentSource,
    documents: Mutex<HashMap<String, ContentDocument>>,
    save_count: AtomicUsize,
}

impl MemoryAdapter {
    pub fn new(source: ContentSource) -> Self {
        Self {
            source,
            documents: Mutex::new(HashMap::new()),
            save_count: AtomicUsize::new(0),
        }
    }

    /// Seed a document without counting it as a save
    pub fn with_document(self, content_id: impl Into<String>, document: ContentDocument) -> Self {
        if let Ok(mut docs) = self.documents.lock() {
            docs.insert(content_id.into(), document);
        }
        self
    }

    pub fn get(&self, content_id: &str) -> Option<ContentDocument> {
        self.documents
            .lock()
            .ok()
            .and_then(|docs| docs.get(content_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of saves that reached storage
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    fn lock_poisoned(content_id: &str) -> contentkit_core::ExError {
        contentkit_core::ExError::new(contentkit_core::ExErrorKind::Internal)
            .with_adapter(ADAPTER)
            .with_content_id(content_id)
            .with_message("memory adapter lock poisoned")
    }
}

#[async_trait]
impl ContentAdapter for MemoryAdapter {
    fn source(&self) -> ContentSource {
        self.source
    }

    async fn load(&self, content_id: &str) -> Result<ContentDocument> {
        validate_content_id(content_id)?;
        let docs = self
            .documents
            .lock()
            .map_err(|_| Self::lock_poisoned(content_id))?;
        docs.get(content_id)
            .cloned()
            .ok_or_else(|| not_found(ADAPTER, content_id))
    }

    async fn save(
        &self,
        content_id: &str,
        document: &ContentDocument,
        precondition: WritePrecondition,
    ) -> Result<()> {
        validate_content_id(content_id)?;
        let mut docs = self
            .documents
            .lock()
            .map_err(|_| Self::lock_poisoned(content_id))?;

        precondition
            .check(docs.get(content_id).map(|d| d.version()))
            .map_err(|reason| conflict(ADAPTER, content_id, reason))?;

        docs.insert(content_id.to_string(), document.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
