//! Durable key/value storage
//!
//! Backs user ids and experiment assignments so they survive across CLI runs.

mod sqlite;

pub use sqlite::SqliteStorage;
