//! Versioned content documents

use crate::errors::{ContentError, Result};
use crate::model::version::Version;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt;

pub const VERSION_FIELD: &str = "version";
pub const LAST_UPDATED_FIELD: &str = "lastUpdated";

/// An ISO-8601 timestamp
///
/// The original text is kept so a document read from disk serializes back to
/// exactly the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn parse(value: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(value).map_err(|_| ContentError::InvalidTimestamp {
            value: value.to_string(),
        })?;
        Ok(Self(value.to_string()))
    }

    /// Current UTC time in millisecond precision with a `Z` suffix
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.0).ok()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A content document: `version`, `lastUpdated` and arbitrary other fields
///
/// A value of this type is always valid; construction from JSON goes through
/// [`ContentDocument::from_value`], which rejects documents missing either
/// required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ContentDocument {
    version: Version,
    #[serde(rename = "lastUpdated")]
    last_updated: Timestamp,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ContentDocument {
    pub fn new(version: Version, last_updated: Timestamp, fields: Map<String, Value>) -> Self {
        let mut fields = fields;
        fields.remove(VERSION_FIELD);
        fields.remove(LAST_UPDATED_FIELD);
        Self {
            version,
            last_updated,
            fields,
        }
    }

    /// Validate and wrap a JSON value
    ///
    /// # Errors
    ///
    /// - `InvalidDocument` if the value is not an object or a required field is
    ///   absent or not a string
    /// - `InvalidVersion` / `InvalidTimestamp` if a required field is malformed
    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(ContentError::invalid_document(format!(
                    "document root must be an object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let version = match fields.remove(VERSION_FIELD) {
            Some(Value::String(raw)) => Version::parse(&raw)?,
            Some(other) => {
                return Err(ContentError::invalid_document(format!(
                    "`{}` must be a string, got {}",
                    VERSION_FIELD,
                    json_type_name(&other)
                )))
            }
            None => {
                return Err(ContentError::invalid_document(format!(
                    "required field `{}` is absent",
                    VERSION_FIELD
                )))
            }
        };

        let last_updated = match fields.remove(LAST_UPDATED_FIELD) {
            Some(Value::String(raw)) => Timestamp::parse(&raw)?,
            Some(other) => {
                return Err(ContentError::invalid_document(format!(
                    "`{}` must be a string, got {}",
                    LAST_UPDATED_FIELD,
                    json_type_name(&other)
                )))
            }
            None => {
                return Err(ContentError::invalid_document(format!(
                    "required field `{}` is absent",
                    LAST_UPDATED_FIELD
                )))
            }
        };

        Ok(Self {
            version,
            last_updated,
            fields,
        })
    }

    /// Parse and validate raw JSON bytes
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn last_updated(&self) -> &Timestamp {
        &self.last_updated
    }

    /// Content fields other than `version` and `lastUpdated`
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a dotted path such as `hero.title` or `sections.0.heading`
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Insert or replace a content field; required fields cannot be set this way
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if key == VERSION_FIELD || key == LAST_UPDATED_FIELD {
            return None;
        }
        self.fields.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn set_last_updated(&mut self, at: Timestamp) {
        self.last_updated = at;
    }

    /// Full JSON form, including `version` and `lastUpdated`
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert(
            VERSION_FIELD.to_string(),
            Value::String(self.version.to_string()),
        );
        map.insert(
            LAST_UPDATED_FIELD.to_string(),
            Value::String(self.last_updated.as_str().to_string()),
        );
        Value::Object(map)
    }

    /// Deterministic serialization with object keys sorted at every level
    pub fn to_canonical_json(&self) -> String {
        canonical_json(&self.to_value())
    }

    /// SHA-256 hex digest of the canonical serialization
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_canonical_json().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Pretty JSON as written to content files
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&sort_keys(&self.to_value()))?)
    }
}

impl TryFrom<Value> for ContentDocument {
    type Error = ContentError;

    fn try_from(value: Value) -> Result<Self> {
        ContentDocument::from_value(value)
    }
}

/// Serialize a value with object keys sorted recursively
pub fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
