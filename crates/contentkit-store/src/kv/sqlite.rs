use crate::db;
use crate::migrations::apply_migrations;
use contentkit_core::errors::ContentError;
use contentkit_core::storage::KeyValueStorage;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

const DEFAULT_NAMESPACE: &str = "default";

/// SQLite implementation of [`KeyValueStorage`]
///
/// Entries are partitioned by namespace so several tools can share one file.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let mut conn = db::open(path)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> crate::Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn with_conn<T>(
        &self,
        op: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> contentkit_core::Result<T> {
        let conn = self.conn.lock().map_err(|_| ContentError::Storage {
            op: op.to_string(),
            message: "connection lock poisoned".to_string(),
        })?;
        f(&conn).map_err(|e| ContentError::Storage {
            op: op.to_string(),
            message: e.to_string(),
        })
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> contentkit_core::Result<Option<String>> {
        self.with_conn("kv_get", |conn| {
            conn.query_row(
                "SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn set(&self, key: &str, value: &str) -> contentkit_core::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.with_conn("kv_set", |conn| {
            conn.execute(
                "INSERT INTO kv_entries (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value,
                     updated_at = excluded.updated_at",
                params![self.namespace, key, value, now],
            )
            .map(|_| ())
        })
    }

    fn remove(&self, key: &str) -> contentkit_core::Result<()> {
        self.with_conn("kv_remove", |conn| {
            conn.execute(
                "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
            )
            .map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_are_isolated() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.set("analytics_user_id", "user_a").unwrap();

        let conn = storage.conn.into_inner().unwrap();
        let other = SqliteStorage::from_connection(conn).with_namespace("preview");
        assert_eq!(other.get("analytics_user_id").unwrap(), None);
        other.set("analytics_user_id", "user_b").unwrap();
        assert_eq!(other.get("analytics_user_id").unwrap().as_deref(), Some("user_b"));
    }
}
