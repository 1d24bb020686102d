//! Tabular view of a Bundle: one row per entry
//!
//! Each entry is flattened the way a JSON normalizer would: nested objects
//! expand into dotted column names (`resource.meta.lastUpdated`) while arrays
//! stay whole in a single cell. Columns appear in first-seen order across
//! entries; an entry lacking a column gets a null cell.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::bundle::Bundle;
use crate::error::QueryError;

/// Columns never shown; narrative XHTML is unreadable in a cell
const DROPPED_COLUMNS: &[&str] = &["resource.text.div"];

/// Derived column linking each row to the patient it is about
pub const PATIENT_ID_COLUMN: &str = "patientId";

/// Fields whose reference points at the owning patient
const PATIENT_REFERENCE_FIELDS: &[&str] = &["subject", "patient"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularView {
    columns: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
}

impl TabularView {
    /// Build the table for a bundle and normalize its cells for display.
    ///
    /// Fails when an entry is not an object wrapping a `resource` object.
    pub fn from_bundle(bundle: &Bundle) -> Result<Self, QueryError> {
        let mut view = Self::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (position, entry) in bundle.entries().iter().enumerate() {
            let entry = entry
                .as_object()
                .ok_or_else(|| QueryError::Shaping(format!("entry {position} is not an object")))?;
            let resource = entry
                .get("resource")
                .and_then(|r| r.as_object())
                .ok_or_else(|| QueryError::Shaping(format!("entry {position} has no resource")))?;

            let mut cells = Vec::new();
            flatten_into("", entry, &mut cells);
            if let Some(id) = patient_id(resource) {
                cells.push((PATIENT_ID_COLUMN.to_string(), JsonValue::String(id)));
            }

            let mut row = vec![JsonValue::Null; view.columns.len()];
            for (name, value) in cells {
                if DROPPED_COLUMNS.contains(&name.as_str()) {
                    continue;
                }
                let col = *index.entry(name.clone()).or_insert_with(|| {
                    view.columns.push(name);
                    view.columns.len() - 1
                });
                if col >= row.len() {
                    row.resize(col + 1, JsonValue::Null);
                }
                row[col] = value;
            }
            view.rows.push(row);
        }

        let width = view.columns.len();
        for row in &mut view.rows {
            row.resize(width, JsonValue::Null);
        }

        view.normalize();
        Ok(view)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<JsonValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&JsonValue>> {
        let col = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[col]).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&JsonValue> {
        let col = self.columns.iter().position(|c| c == name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Make every column renderable as text, one column at a time.
    ///
    /// If any cell of a column is an array or object, every non-null cell of
    /// that column becomes its pretty-printed JSON text, strings included, so
    /// the column reads uniformly. Columns of plain scalars are left alone.
    fn normalize(&mut self) {
        for col in 0..self.columns.len() {
            if !self.rows.iter().any(|row| is_container(&row[col])) {
                continue;
            }
            for row in &mut self.rows {
                let cell = &mut row[col];
                if !cell.is_null() {
                    *cell = JsonValue::String(to_json_text(cell));
                }
            }
        }
    }
}

fn is_container(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Array(_) | JsonValue::Object(_))
}

fn to_json_text(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn flatten_into(prefix: &str, map: &Map<String, JsonValue>, out: &mut Vec<(String, JsonValue)>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            JsonValue::Object(inner) if !inner.is_empty() => flatten_into(&name, inner, out),
            other => out.push((name, other.clone())),
        }
    }
}

/// Patient id for a resource: its own id for a Patient, otherwise the id
/// in a `Patient/<id>` subject or patient reference.
fn patient_id(resource: &Map<String, JsonValue>) -> Option<String> {
    if resource.get("resourceType").and_then(|v| v.as_str()) == Some("Patient") {
        return resource.get("id").and_then(|v| v.as_str()).map(str::to_string);
    }

    PATIENT_REFERENCE_FIELDS.iter().find_map(|field| {
        let reference = resource.get(*field)?.get("reference")?.as_str()?;
        let (_, tail) = reference.rsplit_once("Patient/")?;
        let id = tail.split('/').next()?;
        (!id.is_empty()).then(|| id.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(entries: JsonValue) -> Bundle {
        Bundle::try_from(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": entries
        }))
        .unwrap()
    }

    #[test]
    fn test_container_column_is_stringified_uniformly() {
        let address = json!([{"line": ["12 Main St"], "city": "Boston"}]);
        let view = TabularView::from_bundle(&bundle(json!([
            {"resource": {"resourceType": "Patient", "id": "1", "address": address}},
            {"resource": {"resourceType": "Patient", "id": "2", "address": "12 Main St"}}
        ])))
        .unwrap();

        let column = view.column("resource.address").unwrap();
        assert_eq!(
            column[0],
            &JsonValue::String(serde_json::to_string_pretty(&address).unwrap())
        );
        assert_eq!(column[1], &JsonValue::String("\"12 Main St\"".to_string()));
        assert!(column[0].as_str().unwrap().contains("\n  {"));
    }

    #[test]
    fn test_scalar_columns_pass_through() {
        let view = TabularView::from_bundle(&bundle(json!([
            {"resource": {"resourceType": "Patient", "id": "1", "active": true, "multipleBirthInteger": 2}},
            {"resource": {"resourceType": "Patient", "id": "2", "birthDate": "1990-05-15"}}
        ])))
        .unwrap();

        assert_eq!(view.cell(0, "resource.active"), Some(&json!(true)));
        assert_eq!(view.cell(0, "resource.multipleBirthInteger"), Some(&json!(2)));
        assert_eq!(view.cell(1, "resource.birthDate"), Some(&json!("1990-05-15")));
        assert_eq!(view.cell(0, "resource.birthDate"), Some(&JsonValue::Null));
        assert_eq!(view.cell(1, "resource.active"), Some(&JsonValue::Null));
    }

    #[test]
    fn test_null_cells_stay_null_in_container_column() {
        let view = TabularView::from_bundle(&bundle(json!([
            {"resource": {"resourceType": "Patient", "id": "1", "name": [{"family": "Smith"}]}},
            {"resource": {"resourceType": "Patient", "id": "2"}}
        ])))
        .unwrap();

        let column = view.column("resource.name").unwrap();
        assert!(column[0].is_string());
        assert!(column[1].is_null());
    }

    #[test]
    fn test_nested_objects_expand_into_columns() {
        let view = TabularView::from_bundle(&bundle(json!([{
            "fullUrl": "http://example.org/fhir/Patient/1",
            "resource": {
                "resourceType": "Patient",
                "id": "1",
                "meta": {"versionId": "3"},
                "text": {"status": "generated", "div": "<div>Smith</div>"}
            },
            "search": {"mode": "match"}
        }])))
        .unwrap();

        assert_eq!(view.len(), 1);
        assert_eq!(view.cell(0, "resource.meta.versionId"), Some(&json!("3")));
        assert_eq!(view.cell(0, "search.mode"), Some(&json!("match")));
        assert_eq!(view.cell(0, "resource.text.status"), Some(&json!("generated")));
        assert!(view.column("resource.text.div").is_none());
        assert!(view.column("resource.meta").is_none());
    }

    #[test]
    fn test_columns_follow_document_order() {
        let view = TabularView::from_bundle(&bundle(json!([
            {"resource": {"resourceType": "Patient", "id": "1", "name": [{"family": "Smith"}], "gender": "male"}},
            {"resource": {"resourceType": "Patient", "id": "2", "birthDate": "1990-05-15"}}
        ])))
        .unwrap();

        assert_eq!(
            view.columns(),
            [
                "resource.resourceType",
                "resource.id",
                "resource.name",
                "resource.gender",
                "patientId",
                "resource.birthDate",
            ]
        );
    }

    #[test]
    fn test_patient_id_column() {
        let view = TabularView::from_bundle(&bundle(json!([
            {"resource": {"resourceType": "Patient", "id": "p1"}},
            {"resource": {"resourceType": "Observation", "id": "o1",
                "subject": {"reference": "Patient/p2/_history/4"}}},
            {"resource": {"resourceType": "AllergyIntolerance", "id": "a1",
                "patient": {"reference": "http://example.org/fhir/Patient/p3"}}},
            {"resource": {"resourceType": "Organization", "id": "org"}}
        ])))
        .unwrap();

        let ids = view.column(PATIENT_ID_COLUMN).unwrap();
        assert_eq!(ids, vec![&json!("p1"), &json!("p2"), &json!("p3"), &JsonValue::Null]);
    }

    #[test]
    fn test_entry_without_resource_fails() {
        let err = TabularView::from_bundle(&bundle(json!([
            {"resource": {"resourceType": "Patient", "id": "1"}},
            {"fullUrl": "urn:uuid:1234"}
        ])))
        .unwrap_err();
        assert_eq!(err, QueryError::Shaping("entry 1 has no resource".to_string()));

        let err = TabularView::from_bundle(&bundle(json!(["Patient/1"]))).unwrap_err();
        assert_eq!(err.kind(), "shaping");
    }

    #[test]
    fn test_empty_bundle() {
        let view = TabularView::from_bundle(&bundle(json!([]))).unwrap();
        assert!(view.is_empty());
        assert!(view.columns().is_empty());
    }
}
