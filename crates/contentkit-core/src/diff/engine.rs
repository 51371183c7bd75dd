//! Comparison engine

use crate::diff::DiffMode;
use crate::model::document::{LAST_UPDATED_FIELD, VERSION_FIELD};
use crate::model::{ContentChange, ContentDocument};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Path used for whole-document changes
pub const CONTENT_PATH: &str = "content";

/// Coarse comparison of `source` against `target`
///
/// - target absent: one `add` at `content` with the full source
/// - `version` differs: `update` at `version`
/// - `lastUpdated` differs: `update` at `lastUpdated`
/// - canonical serializations differ: one `update` at `content`, full target as
///   old value and full source as new value
pub fn compare(source: &ContentDocument, target: Option<&ContentDocument>) -> Vec<ContentChange> {
    let Some(target) = target else {
        return vec![ContentChange::add(CONTENT_PATH, source.to_value())];
    };

    let mut changes = Vec::new();

    if source.version() != target.version() {
        changes.push(ContentChange::update(
            VERSION_FIELD,
            Value::String(target.version().to_string()),
            Value::String(source.version().to_string()),
        ));
    }

    if source.last_updated() != target.last_updated() {
        changes.push(ContentChange::update(
            LAST_UPDATED_FIELD,
            Value::String(target.last_updated().as_str().to_string()),
            Value::String(source.last_updated().as_str().to_string()),
        ));
    }

    if source.to_canonical_json() != target.to_canonical_json() {
        changes.push(ContentChange::update(
            CONTENT_PATH,
            target.to_value(),
            source.to_value(),
        ));
    }

    changes
}

/// Field-level comparison: one change per differing leaf
///
/// Paths are dotted, array elements use their index as a segment. Keys only
/// in the source are `add`, keys only in the target are `delete`. Output is
/// ordered by key at each level.
pub fn compare_fields(
    source: &ContentDocument,
    target: Option<&ContentDocument>,
) -> Vec<ContentChange> {
    let Some(target) = target else {
        return vec![ContentChange::add(CONTENT_PATH, source.to_value())];
    };

    let mut changes = Vec::new();
    walk_value("", &source.to_value(), &target.to_value(), &mut changes);
    changes
}

/// Dispatch on [`DiffMode`]
pub fn compare_with(
    mode: DiffMode,
    source: &ContentDocument,
    target: Option<&ContentDocument>,
) -> Vec<ContentChange> {
    match mode {
        DiffMode::Document => compare(source, target),
        DiffMode::Field => compare_fields(source, target),
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn walk_value(path: &str, source: &Value, target: &Value, out: &mut Vec<ContentChange>) {
    match (source, target) {
        (Value::Object(src), Value::Object(tgt)) => walk_object(path, src, tgt, out),
        (Value::Array(src), Value::Array(tgt)) => walk_array(path, src, tgt, out),
        _ => {
            if source != target {
                out.push(ContentChange::update(
                    path_or_root(path),
                    target.clone(),
                    source.clone(),
                ));
            }
        }
    }
}

fn walk_object(
    path: &str,
    source: &Map<String, Value>,
    target: &Map<String, Value>,
    out: &mut Vec<ContentChange>,
) {
    let keys: BTreeSet<&String> = source.keys().chain(target.keys()).collect();
    for key in keys {
        let child = join(path, key);
        match (source.get(key), target.get(key)) {
            (Some(s), Some(t)) => walk_value(&child, s, t, out),
            (Some(s), None) => out.push(ContentChange::add(child, s.clone())),
            (None, Some(t)) => out.push(ContentChange::delete(child, t.clone())),
            (None, None) => {}
        }
    }
}

fn walk_array(path: &str, source: &[Value], target: &[Value], out: &mut Vec<ContentChange>) {
    let shared = source.len().min(target.len());
    for index in 0..shared {
        walk_value(
            &join(path, &index.to_string()),
            &source[index],
            &target[index],
            out,
        );
    }
    for (index, extra) in source.iter().enumerate().skip(shared) {
        out.push(ContentChange::add(join(path, &index.to_string()), extra.clone()));
    }
    for (index, missing) in target.iter().enumerate().skip(shared) {
        out.push(ContentChange::delete(
            join(path, &index.to_string()),
            missing.clone(),
        ));
    }
}

fn path_or_root(path: &str) -> String {
    if path.is_empty() {
        CONTENT_PATH.to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeOperation;
    use serde_json::json;

    fn doc(value: Value) -> ContentDocument {
        ContentDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_identical_documents_have_no_changes() {
        let a = doc(json!({"version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z", "x": 1}));
        assert!(compare(&a, Some(&a.clone())).is_empty());
        assert!(compare_fields(&a, Some(&a.clone())).is_empty());
    }

    #[test]
    fn test_absent_target_is_single_add() {
        let a = doc(json!({"version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z"}));
        let changes = compare(&a, None);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].operation, ChangeOperation::Add);
        assert_eq!(changes[0].path, CONTENT_PATH);
        assert_eq!(changes[0].new_value, Some(a.to_value()));
        assert_eq!(compare_fields(&a, None), changes);
    }

    #[test]
    fn test_sub_field_change_collapses_to_content_update() {
        let source = doc(json!({
            "version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z",
            "hero": {"title": "New"}
        }));
        let target = doc(json!({
            "version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z",
            "hero": {"title": "Old"}
        }));
        let changes = compare(&source, Some(&target));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "content");
        assert_eq!(changes[0].old_value, Some(target.to_value()));
        assert_eq!(changes[0].new_value, Some(source.to_value()));
    }

    #[test]
    fn test_version_and_timestamp_drift_reported_separately() {
        let source = doc(json!({"version": "1.1.0", "lastUpdated": "2024-02-01T00:00:00Z"}));
        let target = doc(json!({"version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z"}));
        let paths: Vec<_> = compare(&source, Some(&target))
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert_eq!(paths, vec!["version", "lastUpdated", "content"]);
    }

    #[test]
    fn test_field_mode_reports_leaves() {
        let source = doc(json!({
            "version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z",
            "hero": {"title": "New", "cta": "Go"},
            "sections": ["a", "b", "c"]
        }));
        let target = doc(json!({
            "version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z",
            "hero": {"title": "Old", "subtitle": "gone"},
            "sections": ["a", "x"]
        }));
        let changes = compare_fields(&source, Some(&target));
        let summary: Vec<(String, ChangeOperation)> = changes
            .iter()
            .map(|c| (c.path.clone(), c.operation))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("hero.cta".to_string(), ChangeOperation::Add),
                ("hero.subtitle".to_string(), ChangeOperation::Delete),
                ("hero.title".to_string(), ChangeOperation::Update),
                ("sections.1".to_string(), ChangeOperation::Update),
                ("sections.2".to_string(), ChangeOperation::Add),
            ]
        );
    }

    #[test]
    fn test_compare_with_dispatches() {
        let source = doc(json!({"version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z", "a": 1}));
        let target = doc(json!({"version": "1.0.0", "lastUpdated": "2024-01-01T00:00:00Z", "a": 2}));
        assert_eq!(compare_with(DiffMode::Document, &source, Some(&target))[0].path, "content");
        assert_eq!(compare_with(DiffMode::Field, &source, Some(&target))[0].path, "a");
    }
}
