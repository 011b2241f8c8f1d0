use crate::core::value_path::{self, Path};
use serde_json::Value;

/// The nested data object being edited. The shape is interpreted dynamically
/// via dotted paths; there is no fixed schema. A document is exclusively
/// owned by one editor instance for the duration of an edit session.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn new() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn get(&self, path: &Path) -> Option<&Value> {
        value_path::get(&self.root, path)
    }

    /// Lookup with a fallback, mirroring `objectPath.get(obj, path, default)`.
    pub fn get_or<'a>(&'a self, path: &Path, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    pub fn get_str(&self, path: &Path) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn set(&mut self, path: &Path, value: Value) {
        value_path::set(&mut self.root, path, value);
    }

    pub fn delete(&mut self, path: &Path) {
        value_path::delete(&mut self.root, path);
    }

    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared emptiness predicate used by required-field checks: the empty
/// string, empty collections and null all count as empty; `false` and `0`
/// do not.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
