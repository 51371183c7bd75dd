//! Adapter lookup by content source

use crate::config::ContentConfig;
use contentkit_core::errors::{ExError, ExErrorKind};
use contentkit_core::ContentSource;
use contentkit_store::{CdnAdapter, ContentAdapter, LocalAdapter, RemoteAdapter, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// The adapters available to sync and loading, at most one per source
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ContentSource, Arc<dyn ContentAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the adapters the configuration enables
    ///
    /// Local is always available; remote needs `api_url`, cdn needs `cdn_url`.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        let mut registry = Self::new().with(Arc::new(LocalAdapter::new(&config.content_root)));

        if let Some(api_url) = &config.api_url {
            registry.register(Arc::new(RemoteAdapter::new(
                api_url.clone(),
                config.api_token.clone(),
                config.request_timeout,
            )?));
        }
        if let Some(cdn_url) = &config.cdn_url {
            registry.register(Arc::new(CdnAdapter::new(
                cdn_url.clone(),
                config.request_timeout,
            )?));
        }

        tracing::debug!(sources = ?registry.sources(), "adapter registry built");
        Ok(registry)
    }

    /// Register an adapter under its own source, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn ContentAdapter>) {
        self.adapters.insert(adapter.source(), adapter);
    }

    pub fn with(mut self, adapter: Arc<dyn ContentAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// # Errors
    ///
    /// `InvalidInput` when no adapter is registered for `source`.
    pub fn get(&self, source: ContentSource) -> Result<Arc<dyn ContentAdapter>> {
        self.adapters.get(&source).cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("adapter_lookup")
                .with_adapter(source.as_str())
                .with_message(format!("no adapter configured for source '{}'", source))
        })
    }

    pub fn sources(&self) -> Vec<ContentSource> {
        let mut sources: Vec<_> = self.adapters.keys().copied().collect();
        sources.sort();
        sources
    }
}
