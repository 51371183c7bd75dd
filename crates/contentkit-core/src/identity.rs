//! Visitor identity
//!
//! Components that need a user or session id receive an [`IdentityProvider`]
//! instead of reading ambient globals, so tests can pin ids.

use crate::errors::Result;
use crate::storage::{KeyValueStorage, SESSION_ID_KEY, USER_ID_KEY};
use std::sync::Arc;
use uuid::Uuid;

pub trait IdentityProvider: Send + Sync {
    /// Stable id for the visitor across sessions
    fn user_id(&self) -> Result<String>;
    /// Id for the current session
    fn session_id(&self) -> Result<String>;
}

/// Identity with fixed ids
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    user_id: String,
    session_id: String,
}

impl FixedIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            session_id: format!("{}-session", user_id),
            user_id,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

impl IdentityProvider for FixedIdentity {
    fn user_id(&self) -> Result<String> {
        Ok(self.user_id.clone())
    }

    fn session_id(&self) -> Result<String> {
        Ok(self.session_id.clone())
    }
}

/// Identity read from storage, generated and persisted on first use
///
/// The user id lives in durable storage under `analytics_user_id`; the session
/// id lives in session storage under `analytics_session_id`.
pub struct StorageIdentity {
    durable: Arc<dyn KeyValueStorage>,
    session: Arc<dyn KeyValueStorage>,
}

impl StorageIdentity {
    pub fn new(durable: Arc<dyn KeyValueStorage>, session: Arc<dyn KeyValueStorage>) -> Self {
        Self { durable, session }
    }

    fn get_or_create(storage: &dyn KeyValueStorage, key: &str, prefix: &str) -> Result<String> {
        if let Some(existing) = storage.get(key)? {
            if !existing.is_empty() {
                return Ok(existing);
            }
        }
        let generated = format!("{}_{}", prefix, Uuid::new_v4().simple());
        storage.set(key, &generated)?;
        tracing::debug!(key, "generated visitor identifier");
        Ok(generated)
    }
}

impl IdentityProvider for StorageIdentity {
    fn user_id(&self) -> Result<String> {
        Self::get_or_create(self.durable.as_ref(), USER_ID_KEY, "user")
    }

    fn session_id(&self) -> Result<String> {
        Self::get_or_create(self.session.as_ref(), SESSION_ID_KEY, "session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_storage_identity_is_stable() {
        let durable = Arc::new(MemoryStorage::new());
        let session = Arc::new(MemoryStorage::new());
        let identity = StorageIdentity::new(durable.clone(), session.clone());

        let first = identity.user_id().unwrap();
        let second = identity.user_id().unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("user_"));
        assert_eq!(durable.get(USER_ID_KEY).unwrap(), Some(first));
    }

    #[test]
    fn test_new_session_keeps_user() {
        let durable: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let first = StorageIdentity::new(durable.clone(), Arc::new(MemoryStorage::new()));
        let second = StorageIdentity::new(durable, Arc::new(MemoryStorage::new()));

        assert_eq!(first.user_id().unwrap(), second.user_id().unwrap());
        assert_ne!(first.session_id().unwrap(), second.session_id().unwrap());
    }

    #[test]
    fn test_fixed_identity() {
        let identity = FixedIdentity::new("u-1").with_session_id("s-1");
        assert_eq!(identity.user_id().unwrap(), "u-1");
        assert_eq!(identity.session_id().unwrap(), "s-1");
    }
}
