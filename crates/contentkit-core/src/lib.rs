//! contentkit core - content model and the pure logic around it
//!
//! This crate holds everything that does not touch a network or a disk:
//! - Versioned content documents and the change records produced when comparing them
//! - Document-level and field-level diffing
//! - The ordered migration registry that moves documents between schema versions
//! - Deterministic A/B variant assignment keyed by a hashed user id
//! - Analytics event shapes, identity provision and key/value storage contracts
//! - The canonical error facility and structured logging facility
//!
//! Adapters that read and write documents live in `contentkit-store`; batch
//! orchestration (sync, cached loading) lives in `contentkit-engine`.

pub mod analytics;
pub mod diff;
pub mod errors;
pub mod experiment;
pub mod identity;
pub mod logging_facility;
pub mod migration;
pub mod model;
pub mod storage;

#[doc(hidden)]
pub use contentkit_core_types as core_types;
#[doc(hidden)]
pub use tracing as __tracing;

pub use diff::{compare, compare_fields, DiffMode};
pub use errors::{ContentError, ExError, ExErrorKind, Result};
pub use experiment::{AbTest, AbTestVariant, VariantAssigner};
pub use migration::{MigrationManager, MigrationOutcome, MigrationScript};
pub use model::{ChangeOperation, ContentChange, ContentDocument, ContentSource, Timestamp, Version};
