use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// A call-site value for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Json(JsonValue),
    /// Raw bytes; passed through unmodified in body and formData parameters.
    Binary(Vec<u8>),
}

/// Argument values for one call, keyed by parameter name.
///
/// A `null` value is treated exactly like an absent one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: BTreeMap<String, ArgValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_binary(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.set_binary(name, bytes);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.values.insert(name.into(), ArgValue::Json(value.into()));
    }

    pub fn set_binary(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.values.insert(name.into(), ArgValue::Binary(bytes.into()));
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        match self.values.get(name) {
            Some(ArgValue::Json(JsonValue::Null)) | None => None,
            Some(v) => Some(v),
        }
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.set(k, v);
        }
        args
    }
}
