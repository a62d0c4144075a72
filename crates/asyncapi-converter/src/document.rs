//! Generic document tree.
//!
//! The converter never deserializes into per-entity structs. Legacy documents
//! are too loosely shaped for that, so every step walks a `serde_json::Value`
//! tree and addresses fields by name. The helpers here turn shape mismatches
//! into [`ConvertError::InvalidProperty`] instead of panics.

use serde_json::{Map, Value};

use crate::error::ConvertError;

/// A JSON/YAML mapping.
pub type Object = Map<String, Value>;

/// Root mapping of an AsyncAPI document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document(Object);

impl Document {
    /// Wrap a decoded value, which must be a mapping.
    pub fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ConvertError::InvalidDocument),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn as_object(&self) -> &Object {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Borrow `value` as a mapping, or fail naming `context`.
pub(crate) fn expect_object<'a>(
    value: &'a Value,
    context: &str,
) -> Result<&'a Object, ConvertError> {
    value
        .as_object()
        .ok_or_else(|| ConvertError::invalid_property(context))
}

/// Mutable counterpart of [`expect_object`].
pub(crate) fn expect_object_mut<'a>(
    value: &'a mut Value,
    context: &str,
) -> Result<&'a mut Object, ConvertError> {
    value
        .as_object_mut()
        .ok_or_else(|| ConvertError::invalid_property(context))
}

/// Move the value under `from` to `to`, if `from` exists.
pub(crate) fn rename_key(obj: &mut Object, from: &str, to: &str) {
    if let Some(value) = obj.remove(from) {
        obj.insert(to.to_string(), value);
    }
}

/// Render a scalar the way it reads in the source text.
///
/// Strings are returned verbatim, numbers and booleans as their JSON text.
/// `null`, sequences and mappings have no scalar rendering.
pub(crate) fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_mapping_root_is_invalid_document() {
        for value in [json!([1, 2]), json!("asyncapi"), json!(null), json!(3)] {
            assert!(matches!(
                Document::from_value(value),
                Err(ConvertError::InvalidDocument)
            ));
        }
    }

    #[test]
    fn rename_moves_value() {
        let mut obj = json!({"protocolInfo": {"mqtt": {}}, "other": 1})
            .as_object()
            .cloned()
            .unwrap();
        rename_key(&mut obj, "protocolInfo", "bindings");
        assert!(!obj.contains_key("protocolInfo"));
        assert_eq!(obj["bindings"], json!({"mqtt": {}}));

        // Absent source key leaves the mapping alone.
        rename_key(&mut obj, "protocolInfo", "bindings");
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn scalar_rendering() {
        assert_eq!(render_scalar(&json!("Title")), Some("Title".into()));
        assert_eq!(render_scalar(&json!(12)), Some("12".into()));
        assert_eq!(render_scalar(&json!(true)), Some("true".into()));
        assert_eq!(render_scalar(&json!(null)), None);
        assert_eq!(render_scalar(&json!({"a": 1})), None);
    }

    #[test]
    fn expect_object_reports_context() {
        let err = expect_object(&json!([]), "topics").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidProperty(ctx) if ctx == "topics"));
    }
}
