use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub results: Vec<RawRecord>,
}

/// One result object exactly as the search service sent it. Keys may come
/// spelled with spaces (`Patent Number`) or underscores (`Patent_Number`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    /// Textual value under `key`. `null`, empty strings, arrays and objects
    /// count as absent; numbers and booleans are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// First present value among the key spellings, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.text(k))
    }
}

impl From<Value> for RawRecord {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(map) => RawRecord(map),
            _ => RawRecord::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_defaults_missing_fields() {
        let resp: SearchResponse = serde_json::from_value(json!({ "total": 0 })).unwrap();
        assert!(resp.keywords.is_empty());
        assert!(resp.results.is_empty());
    }

    #[test]
    fn text_skips_null_and_empty() {
        let raw = RawRecord::from(json!({
            "Patent Number": "",
            "Patent_Number": "US123",
            "Title": null,
            "Year": 2021
        }));
        assert_eq!(raw.first_of(&["Patent Number", "Patent_Number"]).as_deref(), Some("US123"));
        assert_eq!(raw.text("Title"), None);
        assert_eq!(raw.text("Year").as_deref(), Some("2021"));
    }
}
