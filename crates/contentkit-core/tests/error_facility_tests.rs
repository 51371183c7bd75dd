#![allow(clippy::unwrap_used, clippy::expect_used)]

use contentkit_core::errors::{ContentError, ExError, ExErrorKind};
use contentkit_core::{ContentDocument, Version};
use serde_json::json;

#[test]
fn test_missing_version_is_validation_error() {
    let err = ContentDocument::from_value(json!({"lastUpdated": "2024-01-01T00:00:00Z"}))
        .unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::ValidationError);
    assert_eq!(ex.code(), "ERR_VALIDATION");
}

#[test]
fn test_bad_timestamp_is_validation_error() {
    let err = ContentDocument::from_value(json!({"version": "1.0.0", "lastUpdated": "yesterday"}))
        .unwrap_err();
    assert!(matches!(err, ContentError::InvalidTimestamp { .. }));
}

#[test]
fn test_version_must_have_three_numeric_parts() {
    for bad in ["1.0", "1.0.0.0", "a.b.c", "1..0", "-1.0.0", ""] {
        assert!(Version::parse(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn test_duplicate_migration_maps_to_already_exists() {
    let ex: ExError = ContentError::DuplicateMigration {
        version: "1.0.0".into(),
    }
    .into();
    assert_eq!(ex.kind(), ExErrorKind::AlreadyExists);
    assert_eq!(ex.op(), Some("register_migration"));
}

#[test]
fn test_experiment_error_names_test() {
    let ex: ExError = ContentError::InvalidExperiment {
        test_id: "hero".into(),
        reason: "variant weights sum to zero".into(),
    }
    .into();
    assert_eq!(ex.content_id(), Some("hero"));
    assert!(ex.to_string().contains("sum to zero"));
}
