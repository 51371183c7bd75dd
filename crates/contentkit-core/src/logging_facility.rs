//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) that
//!   emit the canonical `component`/`op`/`event` fields
//! - Test capture mode for asserting on emitted events
//!
//! ```rust
//! use contentkit_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! The engine layer owns operation boundaries (start/end/end_error). Adapters
//! and pure logic only emit `debug!`/`warn!` detail events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
