//! Payload values
//!
//! `form_data` is an open, flat, string-keyed mapping. Values are usually
//! text (including upload URLs and dates as entered) or integers (location
//! ids and capacity); anything else a client sends is carried through as
//! raw JSON so the mapping stays extensible.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Absent-equivalent: blank text, JSON null or an empty JSON string/array.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Other(serde_json::Value::Null) => true,
            FieldValue::Other(serde_json::Value::String(s)) => s.trim().is_empty(),
            FieldValue::Other(serde_json::Value::Array(items)) => items.is_empty(),
            FieldValue::Other(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self { FieldValue::Text(s.to_string()) }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self { FieldValue::Text(s) }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self { FieldValue::Number(n) }
}

/// Flat `form_data` mapping, serialized as a plain JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, key: &str) -> Option<&FieldValue> { self.0.get(key) }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> { self.0.remove(key) }

    pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

    /// True when `key` is absent or holds a blank value.
    pub fn is_blank(&self, key: &str) -> bool {
        self.0.get(key).map_or(true, FieldValue::is_blank)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(FieldValue::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> { self.0.keys() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> { self.0.iter() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_values_deserialize() {
        let data: FormData = serde_json::from_str(
            r#"{"descripcion":"Fuga de agua","salon_id":12,"urgente":true,"vacio":null}"#,
        )
        .unwrap();
        assert_eq!(data.get("descripcion"), Some(&FieldValue::Text("Fuga de agua".into())));
        assert_eq!(data.get("salon_id"), Some(&FieldValue::Number(12)));
        assert_eq!(data.get("urgente"), Some(&FieldValue::Other(serde_json::Value::Bool(true))));
        assert!(data.is_blank("vacio"));
        assert!(data.is_blank("missing"));
        assert!(!data.is_blank("salon_id"));
    }

    #[test]
    fn test_serializes_flat() {
        let data: FormData = [("a", FieldValue::from("x")), ("b", FieldValue::from(3))].into_iter().collect();
        assert_eq!(serde_json::to_value(&data).unwrap(), serde_json::json!({"a": "x", "b": 3}));
    }

    #[test]
    fn test_whitespace_is_blank() {
        let mut data = FormData::new();
        data.insert("nota", "   ");
        assert!(data.is_blank("nota"));
    }
}
