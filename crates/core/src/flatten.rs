//! Flattened key/value view of a Bundle

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::bundle::Bundle;

/// Dotted paths to scalar leaves, in document order.
///
/// Array elements are addressed by index (`entry.0.resource.name.0.family`).
/// Empty arrays and objects contribute no leaves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedView {
    leaves: Vec<(String, JsonValue)>,
}

impl FlattenedView {
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let mut view = Self::default();
        view.walk(String::new(), bundle.as_json());
        view
    }

    fn walk(&mut self, path: String, value: &JsonValue) {
        match value {
            JsonValue::Object(map) => {
                for (key, child) in map {
                    self.walk(join(&path, key), child);
                }
            }
            JsonValue::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.walk(join(&path, &i.to_string()), child);
                }
            }
            scalar => self.leaves.push((path, scalar.clone())),
        }
    }

    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        self.leaves.iter().find(|(p, _)| p == path).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.leaves.iter().map(|(p, v)| (p.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// One `path: value` line per leaf, strings unquoted
    pub fn to_text(&self) -> String {
        self.leaves
            .iter()
            .map(|(path, value)| match value {
                JsonValue::String(s) => format!("{path}: {s}"),
                other => format!("{path}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for FlattenedView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.leaves.len()))?;
        for (path, value) in &self.leaves {
            map.serialize_entry(path, value)?;
        }
        map.end()
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}
