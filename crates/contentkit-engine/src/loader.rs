//! Cached, migrating content loader for presentation code
//!
//! Documents are fetched once per id from a single adapter, brought up to the
//! latest registered schema version when a migration registry is attached, and
//! served from an in-memory cache afterwards.

use contentkit_core::errors::ExError;
use contentkit_core::{log_op_end, log_op_error, log_op_start, ContentDocument, MigrationManager};
use contentkit_store::layout::{page_id, SITE_CONFIG_ID};
use contentkit_store::{ContentAdapter, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct ContentLoader {
    adapter: Arc<dyn ContentAdapter>,
    migrations: Option<Arc<MigrationManager>>,
    cache: RwLock<HashMap<String, ContentDocument>>,
}

impl ContentLoader {
    pub fn new(adapter: Arc<dyn ContentAdapter>) -> Self {
        Self {
            adapter,
            migrations: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Migrate loaded documents to the registry's latest version
    pub fn with_migrations(mut self, migrations: Arc<MigrationManager>) -> Self {
        self.migrations = Some(migrations);
        self
    }

    /// Load a document by id
    ///
    /// # Errors
    ///
    /// Adapter errors (`NotFound`, `ValidationError`, ...) and migration errors
    /// converted to `ExError`. Failures are not cached.
    pub async fn load_content(&self, content_id: &str) -> Result<ContentDocument> {
        if let Some(cached) = self.cache.read().await.get(content_id) {
            tracing::debug!(content_id, "content cache hit");
            return Ok(cached.clone());
        }

        log_op_start!("load_content", content_id = content_id);
        let start = std::time::Instant::now();

        let document = self.fetch(content_id).await.map_err(|e| {
            let e = e.with_content_id(content_id);
            log_op_error!(
                "load_content",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                content_id = content_id
            );
            e
        })?;

        self.cache
            .write()
            .await
            .insert(content_id.to_string(), document.clone());

        log_op_end!(
            "load_content",
            duration_ms = start.elapsed().as_millis() as u64,
            content_id = content_id,
            version = %document.version()
        );
        Ok(document)
    }

    /// Load `page-<name>`
    pub async fn load_page_content(&self, name: &str) -> Result<ContentDocument> {
        self.load_content(&page_id(name)).await
    }

    /// Load the `site` configuration document
    pub async fn load_site_config(&self) -> Result<ContentDocument> {
        self.load_content(SITE_CONFIG_ID).await
    }

    /// Drop one cached document
    pub async fn invalidate(&self, content_id: &str) {
        self.cache.write().await.remove(content_id);
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cached_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.cache.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn fetch(&self, content_id: &str) -> Result<ContentDocument> {
        let document = self.adapter.load(content_id).await?;

        let Some(migrations) = &self.migrations else {
            return Ok(document);
        };
        let Some(latest) = migrations.latest_version().copied() else {
            return Ok(document);
        };
        if !migrations.needs_migration(&document, &latest) {
            return Ok(document);
        }

        let from = *document.version();
        let outcome = migrations
            .migrate_to(document, &latest)
            .map_err(ExError::from)?;
        tracing::debug!(
            content_id,
            from = %from,
            to = %latest,
            steps = outcome.applied.len(),
            "migrated content on load"
        );
        Ok(outcome.content)
    }
}
