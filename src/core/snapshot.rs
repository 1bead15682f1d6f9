//! The previously published string table, used as the diff baseline.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot must be a JSON object of label to text, found {0}")]
    NotAnObject(&'static str),
}

/// Label to published text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SnapshotTable {
    values: IndexMap<String, String>,
}

impl SnapshotTable {
    /// Parse a snapshot file.
    ///
    /// A list value is normalized to its first element. Empty lists and nulls
    /// carry no text and are dropped. Other non-string scalars keep their JSON
    /// spelling (`3`, `true`).
    pub fn parse(json: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let Value::Object(object) = value else {
            return Err(SnapshotError::NotAnObject(json_kind(&value)));
        };

        let mut values = IndexMap::with_capacity(object.len());
        for (label, value) in object {
            match normalize_value(value) {
                Some(text) => {
                    values.insert(label, text);
                }
                None => {
                    tracing::warn!(label = %label, "snapshot entry has no text, ignoring it");
                }
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SnapshotTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn normalize_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Array(items) => items.into_iter().next().and_then(normalize_value),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
