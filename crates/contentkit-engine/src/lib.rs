//! contentkit engine - orchestration over adapters
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for its operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod config;
pub mod experiments;
pub mod loader;
pub mod registry;
pub mod sync;

pub use config::ContentConfig;
pub use loader::ContentLoader;
pub use registry::AdapterRegistry;
pub use sync::{SyncChange, SyncFailure, SyncManager, SyncOptions, SyncResult, SyncSummary};
