//! Wiring for variant assignment backed by durable storage

use crate::config::ContentConfig;
use contentkit_core::analytics::{AnalyticsSink, TracingAnalyticsSink};
use contentkit_core::identity::{FixedIdentity, IdentityProvider, StorageIdentity};
use contentkit_core::storage::{KeyValueStorage, MemoryStorage};
use contentkit_core::VariantAssigner;
use contentkit_store::{Result, SqliteStorage};
use std::sync::Arc;

/// Assigner using the configured SQLite file for ids and assignments
///
/// With `user_id` set the visitor identity is pinned to it and assignments are
/// kept in memory only, so previewing another user leaves stored state alone.
pub fn open_assigner(config: &ContentConfig, user_id: Option<&str>) -> Result<VariantAssigner> {
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(TracingAnalyticsSink);

    if let Some(user_id) = user_id {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let identity: Arc<dyn IdentityProvider> = Arc::new(FixedIdentity::new(user_id));
        return Ok(VariantAssigner::new(storage, identity, analytics));
    }

    let durable: Arc<dyn KeyValueStorage> = Arc::new(SqliteStorage::open(&config.storage_path)?);
    let identity: Arc<dyn IdentityProvider> = Arc::new(StorageIdentity::new(
        durable.clone(),
        Arc::new(MemoryStorage::new()),
    ));
    Ok(VariantAssigner::new(durable, identity, analytics))
}
