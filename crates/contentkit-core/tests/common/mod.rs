#![allow(dead_code)]

use contentkit_core::{ContentDocument, Version};
use serde_json::{json, Value};

pub fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

pub fn doc(value: Value) -> ContentDocument {
    ContentDocument::from_value(value).unwrap()
}

pub fn page(version: &str, title: &str) -> ContentDocument {
    doc(json!({
        "version": version,
        "lastUpdated": "2024-03-01T12:00:00Z",
        "title": title,
        "sections": [{"kind": "hero", "heading": "Welcome"}]
    }))
}
