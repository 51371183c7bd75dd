//! A/B experiments
//!
//! Deterministic, sticky variant assignment. A user is bucketed by hashing
//! `"{user_id}-{test_id}"`; the first assignment is persisted and reused on
//! every later call, even if weights change afterwards.

mod assigner;
mod hash;
mod model;

pub use assigner::{assign_variant, VariantAssigner, ASSIGNED_EVENT, CONVERSION_EVENT};
pub use hash::{bucket_hash, bucket_key};
pub use model::{AbTest, AbTestVariant};
