use contentkit_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ContentError
pub type Result<T> = std::result::Result<T, ContentError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that crosses a crate boundary is classified by one of these
/// kinds. Each kind maps to a stable code used in CLI output, sync batch error
/// lists and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Input / validation
    InvalidInput,
    /// Content document is missing `version`/`lastUpdated` or they are malformed
    ValidationError,

    // Content store
    /// No document exists for the content id at the given source
    NotFound,
    /// A save failed on I/O or authorization
    WriteError,
    /// The adapter does not support the operation (CDN writes)
    UnsupportedOperation,
    /// The target changed since it was read (optimistic concurrency)
    Conflict,
    AlreadyExists,

    // Migration
    /// A requested version is not registered
    MigrationPathNotFound,
    /// A migration step returned an error; earlier steps are not rolled back
    MigrationFailed,

    // Integration / IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ValidationError => "ERR_VALIDATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::WriteError => "ERR_WRITE",
            ExErrorKind::UnsupportedOperation => "ERR_UNSUPPORTED_OPERATION",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::MigrationPathNotFound => "ERR_MIGRATION_PATH_NOT_FOUND",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus optional context about where
/// the failure happened (operation, content id, adapter) for humans and logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    content_id: Option<String>,
    adapter: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            content_id: None,
            adapter: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add content id context
    pub fn with_content_id(mut self, id: impl Into<String>) -> Self {
        self.content_id = Some(id.into());
        self
    }

    /// Add the name of the adapter that produced the error
    pub fn with_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    pub fn adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// True when the error means "nothing stored there", which callers such as
    /// sync treat as an expected, recoverable condition
    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(content_id) = &self.content_id {
            write!(f, " (content_id: {})", content_id)?;
        }
        if let Some(adapter) = &self.adapter {
            write!(f, " (adapter: {})", adapter)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for the pure content logic in this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    // ===== Validation =====
    /// Document is not an object, or required fields are absent
    #[error("Invalid content document: {reason}")]
    InvalidDocument { reason: String },

    /// Version string is not `major.minor.patch`
    #[error("Invalid version '{value}': expected major.minor.patch")]
    InvalidVersion { value: String },

    /// Timestamp is not RFC 3339 / ISO-8601
    #[error("Invalid timestamp '{value}': expected ISO-8601")]
    InvalidTimestamp { value: String },

    /// Content id cannot be mapped to a storage path
    #[error("Invalid content id '{content_id}': {reason}")]
    InvalidContentId { content_id: String, reason: String },

    /// Experiment definition cannot be used for bucketing
    #[error("Invalid A/B test '{test_id}': {reason}")]
    InvalidExperiment { test_id: String, reason: String },

    // ===== Migration =====
    /// A migration for this version is already registered
    #[error("Migration for version {version} is already registered")]
    DuplicateMigration { version: String },

    /// One of the requested versions has no registered migration
    #[error("No migration path from {from} to {to}: version {missing} is not registered")]
    MigrationPathNotFound {
        from: String,
        to: String,
        missing: String,
    },

    /// A step's up/down function failed; the document is left mid-sequence
    #[error("Migration {version} ({direction}) failed: {reason}")]
    MigrationFailed {
        version: String,
        direction: String,
        reason: String,
    },

    // ===== Storage =====
    /// Key/value storage read or write failed
    #[error("Storage error during {op}: {message}")]
    Storage { op: String, message: String },

    // ===== Generic =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ContentError {
    /// Shorthand for an `InvalidDocument` error
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        ContentError::InvalidDocument {
            reason: reason.into(),
        }
    }
}

/// Conversion from ContentError to the canonical ExError
impl From<ContentError> for ExError {
    fn from(err: ContentError) -> Self {
        let message = err.to_string();
        match err {
            ContentError::InvalidDocument { .. }
            | ContentError::InvalidVersion { .. }
            | ContentError::InvalidTimestamp { .. } => {
                ExError::new(ExErrorKind::ValidationError).with_message(message)
            }

            ContentError::InvalidExperiment { test_id, .. } => {
                ExError::new(ExErrorKind::ValidationError)
                    .with_op("validate_test")
                    .with_content_id(test_id)
                    .with_message(message)
            }

            ContentError::InvalidContentId { content_id, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_content_id(content_id)
                    .with_message(message)
            }

            ContentError::DuplicateMigration { .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("register_migration")
                .with_message(message),

            ContentError::MigrationPathNotFound { .. } => {
                ExError::new(ExErrorKind::MigrationPathNotFound)
                    .with_op("migrate_content")
                    .with_message(message)
            }

            ContentError::MigrationFailed { .. } => ExError::new(ExErrorKind::MigrationFailed)
                .with_op("migrate_content")
                .with_message(message),

            ContentError::Storage { op, .. } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),

            ContentError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            ContentError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_store_kind_codes() {
        let cases = [
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::WriteError, "ERR_WRITE"),
            (ExErrorKind::UnsupportedOperation, "ERR_UNSUPPORTED_OPERATION"),
            (ExErrorKind::Conflict, "ERR_CONFLICT"),
            (
                ExErrorKind::MigrationPathNotFound,
                "ERR_MIGRATION_PATH_NOT_FOUND",
            ),
            (ExErrorKind::ValidationError, "ERR_VALIDATION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("load")
            .with_content_id("page-home")
            .with_adapter("remote")
            .with_message("no document");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_NOT_FOUND]"));
        assert!(rendered.contains("'load'"));
        assert!(rendered.contains("page-home"));
        assert!(rendered.contains("remote"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::WriteError).with_source(inner);
        let source = std::error::Error::source(&outer).expect("source should be set");
        assert!(source.to_string().contains("disk full"));
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
    }

    #[test]
    fn test_migration_path_error_maps_to_kind() {
        let err: ExError = ContentError::MigrationPathNotFound {
            from: "1.0.0".into(),
            to: "9.9.9".into(),
            missing: "9.9.9".into(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::MigrationPathNotFound);
        assert!(err.message().contains("9.9.9"));
    }
}
