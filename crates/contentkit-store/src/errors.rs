//! Error handling for contentkit-store
//!
//! Wraps contentkit-core ExError with store-specific helpers

use contentkit_core::errors::{ContentError, ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// No document stored for the id
pub fn not_found(adapter: &str, content_id: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("load")
        .with_adapter(adapter)
        .with_content_id(content_id)
        .with_message(format!("Content '{}' not found", content_id))
}

/// A save failed on I/O or authorization
pub fn write_error(adapter: &str, content_id: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::WriteError)
        .with_op("save")
        .with_adapter(adapter)
        .with_content_id(content_id)
        .with_message(reason)
}

/// The write precondition did not hold
pub fn conflict(adapter: &str, content_id: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Conflict)
        .with_op("save")
        .with_adapter(adapter)
        .with_content_id(content_id)
        .with_message(reason)
}

/// The adapter cannot perform the operation
pub fn unsupported(adapter: &str, op: &str, content_id: &str) -> ExError {
    ExError::new(ExErrorKind::UnsupportedOperation)
        .with_op(op)
        .with_adapter(adapter)
        .with_content_id(content_id)
        .with_message(format!("{} adapter does not support {}", adapter, op))
}

/// A remote service misbehaved or was unreachable
pub fn external_service(adapter: &str, content_id: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op("load")
        .with_adapter(adapter)
        .with_content_id(content_id)
        .with_message(reason)
}

/// Attach adapter and id context to a document validation failure
pub fn invalid_document(adapter: &str, content_id: &str, err: ContentError) -> ExError {
    ExError::from(err)
        .with_op("load")
        .with_adapter(adapter)
        .with_content_id(content_id)
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("kv_migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// A recorded migration no longer matches the embedded SQL
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("kv_migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
