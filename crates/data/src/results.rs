//! Merged multi-namespace query results.

use crate::types::{Metadata, ScoredVector, SparseValues, Usage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lists longer than this are shortened in `Display` output.
const DISPLAY_MAX_ITEMS: usize = 2;

/// A scored match tagged with the namespace it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespacedMatch {
    pub namespace: String,
    pub score: f32,
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<SparseValues>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NamespacedMatch {
    pub fn new(matched: ScoredVector, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            score: matched.score,
            id: matched.id,
            values: matched.values,
            sparse_values: matched.sparse_values,
            metadata: matched.metadata,
        }
    }

    /// Look a field up by name.
    ///
    /// Returns `None` for unknown keys and for fields that are unset.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "namespace" => Some(Value::from(self.namespace.clone())),
            "id" => Some(Value::from(self.id.clone())),
            "score" => Some(Value::from(self.score)),
            "values" => self.values.as_ref().map(|v| Value::from(v.clone())),
            "sparse_values" => self
                .sparse_values
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            "metadata" => self.metadata.clone().map(Value::Object),
            _ => None,
        }
    }
}

/// Combined, ranked results of a query across several namespaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryNamespacesResults {
    pub usage: Usage,
    pub matches: Vec<NamespacedMatch>,
}

impl QueryNamespacesResults {
    /// Look a top-level field (`usage` or `matches`) up by name.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "usage" => serde_json::to_value(self.usage).ok(),
            "matches" => serde_json::to_value(&self.matches).ok(),
            _ => None,
        }
    }
}

/// Recursively drop nulls and shorten long lists to a short preview.
///
/// The "... N more" marker is only used when at least two items would be
/// hidden; hiding a single item saves nothing, so that list prints in full.
fn truncate_for_display(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut kept: Vec<Value> = items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(truncate_for_display)
                .collect();
            let hidden = kept.len().saturating_sub(DISPLAY_MAX_ITEMS);
            if hidden > 1 {
                kept.truncate(DISPLAY_MAX_ITEMS);
                kept.push(Value::from(format!("... {} more", hidden)));
            }
            Value::Array(kept)
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, truncate_for_display(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Write `value` as pretty JSON with nulls dropped and long lists shortened.
pub(crate) fn write_preview<T: Serialize>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    let json = serde_json::to_value(value).map_err(|_| fmt::Error)?;
    let pretty =
        serde_json::to_string_pretty(&truncate_for_display(json)).map_err(|_| fmt::Error)?;
    f.write_str(&pretty)
}

impl fmt::Display for NamespacedMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_preview(f, self)
    }
}

impl fmt::Display for QueryNamespacesResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The top-level match list is always printed in full; only the
        // per-match vectors are previewed.
        let matches: Vec<Value> = self
            .matches
            .iter()
            .map(|m| serde_json::to_value(m).map(truncate_for_display))
            .collect::<Result<_, _>>()
            .map_err(|_| fmt::Error)?;
        let usage = serde_json::to_value(self.usage).map_err(|_| fmt::Error)?;
        let body = serde_json::json!({ "usage": usage, "matches": matches });
        let pretty = serde_json::to_string_pretty(&body).map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}
