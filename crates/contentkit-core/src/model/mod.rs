//! Content data model
//!
//! - [`ContentDocument`]: a versioned JSON object with mandatory `version`
//!   and `lastUpdated` fields
//! - [`Version`]: structured `major.minor.patch`, ordered numerically
//! - [`Timestamp`]: validated ISO-8601 text, preserved verbatim
//! - [`ContentChange`]: one detected difference between two documents
//! - [`ContentSource`]: which store a document came from

pub mod change;
pub mod document;
pub mod source;
pub mod version;

pub use change::{ChangeOperation, ContentChange};
pub use document::{ContentDocument, Timestamp};
pub use source::ContentSource;
pub use version::Version;
