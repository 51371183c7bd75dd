//! Content schema migrations
//!
//! A [`MigrationManager`] holds [`MigrationScript`]s ordered by target
//! version. Moving a document between two registered versions applies every
//! script in between, in order: `up` when moving forward, `down` in reverse
//! when moving backward. Scripts cannot be skipped.
//!
//! A failing step aborts the call with `MigrationFailed`; steps already
//! applied are not rolled back.

mod manager;
mod script;

pub use manager::{AppliedMigration, MigrationDirection, MigrationManager, MigrationOutcome};
pub use script::{MigrationFn, MigrationScript};
