//! Core types shared across contentkit crates
//!
//! - **Correlation types**: `RequestId` for tying a sync run's log lines and
//!   errors together
//! - **Sensitive data**: `Sensitive<T>` for API tokens that must never be logged
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
