use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// FHIR Bundle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Searchset,
    History,
    Collection,
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
}

/// FHIR Bundle as returned by a server search.
///
/// The document is kept exactly as received so it can be forwarded to
/// renderers untouched. Deserialization only checks that the JSON is a
/// Bundle at all (`resourceType` and the `entry` array); no further FHIR
/// validation happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub struct Bundle(JsonValue);

impl TryFrom<JsonValue> for Bundle {
    type Error = String;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| "expected a JSON object".to_string())?;

        match obj.get("resourceType").and_then(|v| v.as_str()) {
            Some("Bundle") => {}
            Some(other) => return Err(format!("expected resourceType Bundle, got {other}")),
            None => return Err("missing resourceType".to_string()),
        }

        if let Some(entry) = obj.get("entry") {
            if !entry.is_array() {
                return Err("Bundle.entry must be an array".to_string());
            }
        }

        Ok(Self(value))
    }
}

impl From<Bundle> for JsonValue {
    fn from(bundle: Bundle) -> Self {
        bundle.0
    }
}

impl Bundle {
    /// Entries of the bundle, empty when the server sent none
    pub fn entries(&self) -> &[JsonValue] {
        self.0
            .get("entry")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn bundle_type(&self) -> Option<BundleType> {
        self.0
            .get("type")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Server-reported match count, which may exceed `len()` when paged
    pub fn total(&self) -> Option<u64> {
        self.0.get("total").and_then(|v| v.as_u64())
    }

    /// URL of the `link` entry with the given relation (e.g. "next")
    pub fn link(&self, relation: &str) -> Option<&str> {
        self.0
            .get("link")?
            .as_array()?
            .iter()
            .find(|l| l.get("relation").and_then(|r| r.as_str()) == Some(relation))?
            .get("url")?
            .as_str()
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_searchset_bundle() {
        let bundle: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 12,
            "link": [{"relation": "next", "url": "http://example.org/fhir?page=2"}],
            "entry": [
                {"resource": {"resourceType": "Patient", "id": "a"}},
                {"resource": {"resourceType": "Patient", "id": "b"}}
            ]
        }))
        .unwrap();

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.bundle_type(), Some(BundleType::Searchset));
        assert_eq!(bundle.total(), Some(12));
        assert_eq!(bundle.link("next"), Some("http://example.org/fhir?page=2"));
        assert_eq!(bundle.link("previous"), None);
    }

    #[test]
    fn test_bundle_without_entries() {
        let bundle = Bundle::try_from(json!({"resourceType": "Bundle", "type": "searchset"}))
            .unwrap();
        assert!(bundle.is_empty());
        assert_eq!(bundle.total(), None);
    }

    #[test]
    fn test_rejects_other_resources() {
        let err = Bundle::try_from(json!({"resourceType": "Patient", "id": "x"})).unwrap_err();
        assert!(err.contains("Patient"));

        assert!(Bundle::try_from(json!([1, 2, 3])).is_err());
        assert!(Bundle::try_from(json!({"entry": []})).is_err());
        assert!(Bundle::try_from(json!({"resourceType": "Bundle", "entry": {}})).is_err());
    }

    #[test]
    fn test_text_roundtrip_keeps_key_order() {
        let text = r#"{"resourceType":"Bundle","type":"searchset","entry":[{"resource":{"resourceType":"Patient","id":"1","name":[{"family":"Smith"}],"gender":"male"}}]}"#;
        let bundle: Bundle = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&bundle).unwrap(), text);
    }

    #[test]
    fn test_serializes_verbatim() {
        let raw = json!({
            "resourceType": "Bundle",
            "type": "transaction-response",
            "meta": {"lastUpdated": "2024-01-01T00:00:00Z"}
        });
        let bundle = Bundle::try_from(raw.clone()).unwrap();
        assert_eq!(bundle.bundle_type(), Some(BundleType::TransactionResponse));
        assert_eq!(serde_json::to_value(&bundle).unwrap(), raw);
    }
}
