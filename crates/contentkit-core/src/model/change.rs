use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of difference between a source and a target document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOperation {
    Add,
    Update,
    Delete,
}

impl ChangeOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOperation::Add => "add",
            ChangeOperation::Update => "update",
            ChangeOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected difference
///
/// `path` is a dotted path into the document (`hero.title`, `sections.2`) or
/// the coarse path `content` when the whole document is replaced. Created while
/// comparing and consumed immediately by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub path: String,
    pub operation: ChangeOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl ContentChange {
    pub fn add(path: impl Into<String>, new_value: Value) -> Self {
        Self {
            path: path.into(),
            operation: ChangeOperation::Add,
            old_value: None,
            new_value: Some(new_value),
        }
    }

    pub fn update(path: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            path: path.into(),
            operation: ChangeOperation::Update,
            old_value: Some(old_value),
            new_value: Some(new_value),
        }
    }

    pub fn delete(path: impl Into<String>, old_value: Value) -> Self {
        Self {
            path: path.into(),
            operation: ChangeOperation::Delete,
            old_value: Some(old_value),
            new_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_is_camel_case() {
        let change = ContentChange::update("version", json!("1.0.0"), json!("1.1.0"));
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(
            value,
            json!({
                "path": "version",
                "operation": "update",
                "oldValue": "1.0.0",
                "newValue": "1.1.0"
            })
        );
    }

    #[test]
    fn test_add_omits_old_value() {
        let change = ContentChange::add("content", json!({"a": 1}));
        let value = serde_json::to_value(&change).unwrap();
        assert!(value.get("oldValue").is_none());
        assert_eq!(value["operation"], "add");
    }
}
