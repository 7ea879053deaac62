use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single new field value. Serialises untagged, so an `Update` renders as
/// a flat JSON object such as `{"severity":5}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

/// Partial update of a finding. Fields that are absent are left untouched by
/// whoever merges the update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Update(BTreeMap<String, FieldValue>);

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_integer)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_object() {
        let update = Update::new().with("severity", 5u8).with("title", "CVE-1 - Bug");
        let v = serde_json::to_value(&update).expect("serialize");
        assert_eq!(v, serde_json::json!({"severity": 5, "title": "CVE-1 - Bug"}));
    }

    #[test]
    fn empty_update_serializes_as_empty_object() {
        let v = serde_json::to_value(Update::new()).expect("serialize");
        assert_eq!(v, serde_json::json!({}));
    }

    #[test]
    fn typed_accessors() {
        let update = Update::new().with("severity", 3u8).with("title", "x");
        assert_eq!(update.integer("severity"), Some(3));
        assert_eq!(update.text("severity"), None);
        assert_eq!(update.text("title"), Some("x"));
        assert_eq!(update.len(), 2);
    }
}
