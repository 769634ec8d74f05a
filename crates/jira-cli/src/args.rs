//! Keyword arguments passed to a tool.

use serde_json::{Map, Value};

use crate::error::ToolError;

/// Borrowed view over a tool's JSON object arguments.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Arguments<'a> {
    #[must_use]
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Raw value of `key`, present even when `null`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// Fetch all `keys` as text, failing with the full list when any is
    /// absent or falsy. Numbers are accepted and rendered as text.
    pub fn require<const N: usize>(
        &self,
        keys: &'static [&'static str; N],
    ) -> Result<[String; N], ToolError> {
        if keys.iter().any(|key| !self.get(key).is_some_and(is_truthy)) {
            return Err(ToolError::MissingArguments(keys));
        }

        let mut values: [String; N] = std::array::from_fn(|_| String::new());
        for (slot, &key) in values.iter_mut().zip(keys) {
            *slot = self
                .get(key)
                .and_then(as_text)
                .ok_or(ToolError::InvalidArgument { key })?;
        }
        Ok(values)
    }

    /// Optional text argument; falsy values count as absent.
    #[must_use]
    pub fn optional_text(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| is_truthy(v)).and_then(as_text)
    }
}

/// Truthiness of a JSON value: `null`, `false`, `0`, `""`, `[]` and `{}`
/// are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
