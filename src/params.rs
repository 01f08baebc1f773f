//! Raw request parameters.
//!
//! [`FormParams`] is the string-keyed bag handed to the submission factory.
//! The controller passes it through untouched; only the factory decides
//! which keys mean anything.

use serde_json::Value;
use std::collections::BTreeMap;

/// String-keyed mapping of submitted field names to values.
///
/// Repeated keys follow "last write wins", matching how the query string
/// and the request body are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(BTreeMap<String, String>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` payload.
    pub fn from_urlencoded(input: &str) -> Self {
        url::form_urlencoded::parse(input.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Flatten a JSON object body into parameters.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified, and
    /// one level of nested objects is flattened to `outer[inner]` keys so a
    /// JSON client can post `{"contact_us_request": {"name": ..}}`.
    /// Anything that is not an object yields an empty bag.
    pub fn from_json(value: &Value) -> Self {
        let mut params = FormParams::new();
        if let Value::Object(map) = value {
            for (key, val) in map {
                match val {
                    Value::Object(inner) => {
                        for (inner_key, inner_val) in inner {
                            if let Some(s) = scalar_to_string(inner_val) {
                                params.insert(format!("{key}[{inner_key}]"), s);
                            }
                        }
                    }
                    other => {
                        if let Some(s) = scalar_to_string(other) {
                            params.insert(key.clone(), s);
                        }
                    }
                }
            }
        }
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of `self`; keys present in both take `other`'s value.
    pub fn merge(&mut self, other: FormParams) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormParams(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
