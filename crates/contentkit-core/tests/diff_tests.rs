#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{doc, page};
use contentkit_core::diff::{compare_with, render_human_summary, CONTENT_PATH};
use contentkit_core::{compare, compare_fields, ChangeOperation, DiffMode};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_identical_documents_produce_no_changes() {
    let a = page("1.0.0", "Home");
    let b = page("1.0.0", "Home");
    assert!(compare(&a, Some(&b)).is_empty());
    assert!(compare_fields(&a, Some(&b)).is_empty());
}

#[test]
fn test_absent_target_is_single_add() {
    let source = page("1.0.0", "Home");
    let changes = compare(&source, None);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].path, CONTENT_PATH);
    assert_eq!(changes[0].operation, ChangeOperation::Add);
    assert_eq!(changes[0].new_value.as_ref(), Some(&source.to_value()));
    assert!(changes[0].old_value.is_none());
}

#[test]
fn test_version_bump_yields_version_and_content_updates() {
    let source = page("1.1.0", "Home");
    let target = page("1.0.0", "Home");
    let changes = compare(&source, Some(&target));

    let paths: Vec<&str> = changes.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec!["version", CONTENT_PATH]);
    assert_eq!(changes[0].old_value, Some(json!("1.0.0")));
    assert_eq!(changes[0].new_value, Some(json!("1.1.0")));
    assert!(changes.iter().all(|c| c.operation == ChangeOperation::Update));
}

#[test]
fn test_key_order_does_not_register_as_change() {
    let a = doc(json!({"version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z", "a": 1, "b": {"x": 1, "y": 2}}));
    let b = doc(json!({"b": {"y": 2, "x": 1}, "a": 1, "lastUpdated": "2024-01-01T00:00:00Z", "version": "1.0.0"}));
    assert!(compare(&a, Some(&b)).is_empty());
}

#[test]
fn test_field_mode_reports_leaves() {
    let source = doc(json!({
        "version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z",
        "title": "New", "tags": ["a", "b", "c"], "meta": {"author": "kim"}
    }));
    let target = doc(json!({
        "version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z",
        "title": "Old", "tags": ["a", "x"], "meta": {"author": "kim", "draft": true}
    }));
    let changes = compare_with(DiffMode::Field, &source, Some(&target));

    let summary: Vec<(&str, ChangeOperation)> = changes
        .iter()
        .map(|c| (c.path.as_str(), c.operation))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("meta.draft", ChangeOperation::Delete),
            ("tags.1", ChangeOperation::Update),
            ("tags.2", ChangeOperation::Add),
            ("title", ChangeOperation::Update),
        ]
    );
}

#[test]
fn test_human_summary_lists_each_change() {
    let source = page("1.1.0", "Home");
    let rendered = render_human_summary(&compare(&source, None));
    assert!(rendered.starts_with('+'));
    assert_eq!(render_human_summary(&[]), "no changes\n");
}

fn arb_doc() -> impl Strategy<Value = contentkit_core::ContentDocument> {
    (
        0u64..5,
        0u64..5,
        "[a-z]{0,8}",
        proptest::collection::vec(0i64..100, 0..4),
    )
        .prop_map(|(major, minor, title, numbers)| {
            doc(json!({
                "version": format!("{}.{}.0", major, minor),
                "lastUpdated": "2024-01-01T00:00:00Z",
                "title": title,
                "numbers": numbers,
            }))
        })
}

proptest! {
    #[test]
    fn prop_compare_is_empty_iff_documents_equal(a in arb_doc(), b in arb_doc()) {
        let changes = compare(&a, Some(&b));
        prop_assert_eq!(changes.is_empty(), a.to_canonical_json() == b.to_canonical_json());
    }

    #[test]
    fn prop_field_changes_never_touch_equal_documents(a in arb_doc()) {
        prop_assert!(compare_fields(&a, Some(&a.clone())).is_empty());
    }

    #[test]
    fn prop_reversed_field_diff_swaps_adds_and_deletes(a in arb_doc(), b in arb_doc()) {
        let forward = compare_fields(&a, Some(&b));
        let backward = compare_fields(&b, Some(&a));
        prop_assert_eq!(forward.len(), backward.len());
        let adds = forward.iter().filter(|c| c.operation == ChangeOperation::Add).count();
        let deletes = backward.iter().filter(|c| c.operation == ChangeOperation::Delete).count();
        prop_assert_eq!(adds, deletes);
    }
}
