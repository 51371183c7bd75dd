//! Key/value storage contract
//!
//! Mirrors browser-style client storage: string keys to string values. A
//! durable store keeps user ids and experiment assignments across runs; a
//! session store is dropped with the process. The SQLite-backed durable
//! implementation lives in `contentkit-store`.

use crate::errors::{ContentError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Durable pseudo-identity of the visitor
pub const USER_ID_KEY: &str = "analytics_user_id";
/// Session-scoped identifier
pub const SESSION_ID_KEY: &str = "analytics_session_id";
const ASSIGNMENT_KEY_PREFIX: &str = "ab_test_";

/// Storage key holding the assigned variant id for a test
pub fn assignment_key(test_id: &str) -> String {
    format!("{}{}", ASSIGNMENT_KEY_PREFIX, test_id)
}

/// String key/value storage
///
/// Each call is individually atomic; read-then-write sequences are not.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage; used as session storage and in tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(op: &str) -> ContentError {
    ContentError::Storage {
        op: op.to_string(),
        message: "storage lock poisoned".to_string(),
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| poisoned("storage_get"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned("storage_set"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| poisoned("storage_remove"))?;
        entries.remove(key);
        Ok(())
    }
}
