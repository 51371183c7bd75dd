//! Content comparison
//!
//! Two comparison strategies over a source and an (optional) target document:
//!
//! - [`compare`] (document mode, the default): reports `version` and
//!   `lastUpdated` drift plus a single whole-document `content` replacement
//!   whenever the serialized forms differ. Any sub-field difference collapses
//!   into that one change.
//! - [`compare_fields`] (field mode): a structural walk producing one change
//!   per changed leaf, for review output.
//!
//! Both return exactly one `add` change carrying the whole source when the
//! target is absent, and an empty list when the documents serialize identically.

pub mod engine;
pub mod human_summary;

use serde::{Deserialize, Serialize};

pub use engine::{compare, compare_fields, compare_with, CONTENT_PATH};
pub use human_summary::render_human_summary;

/// Which comparison strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Coarse whole-document comparison
    #[default]
    Document,
    /// One change per differing leaf
    Field,
}
