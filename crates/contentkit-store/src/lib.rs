//! contentkit store - persistence for content documents and client state
//!
//! Provides:
//! - The `ContentAdapter` contract with local filesystem, remote API, CDN and
//!   in-memory implementations
//! - Mapping from content ids to file layout paths
//! - SQLite-backed durable key/value storage with an embedded migration runner

pub mod adapters;
pub mod atomic;
pub mod db;
pub mod errors;
pub mod kv;
pub mod layout;
pub mod migrations;

pub use adapters::{
    CdnAdapter, ContentAdapter, LocalAdapter, MemoryAdapter, RemoteAdapter, WritePrecondition,
};
pub use errors::Result;
pub use kv::SqliteStorage;
pub use layout::content_path;
