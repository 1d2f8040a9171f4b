//! Documents and typed decoding.

use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Field name under which a document's id is exposed to typed records.
pub const ID_FIELD: &str = "id";

/// A stored document: an opaque id plus a JSON object of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    /// Document fields, never containing `id`.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a new document.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == ID_FIELD {
            return None;
        }
        self.fields.get(field)
    }

    /// The document as a single JSON object with `id` merged in.
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }

    /// Try to deserialize the document into a type.
    ///
    /// The document id is injected as the `id` field first, so records can
    /// carry their identifier without storing it twice.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.to_value())?)
    }
}

/// Encode a record into document fields, dropping any `id` it carries.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(mut map) => {
            map.remove(ID_FIELD);
            Ok(map)
        }
        other => Err(StoreError::Backend(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        id: String,
        title: String,
    }

    #[test]
    fn test_deserialize_injects_id() {
        let fields = json!({ "title": "Honey" }).as_object().cloned().unwrap();
        let doc = Document::new("abc", fields);
        let item: Item = doc.deserialize().unwrap();
        assert_eq!(item.id, "abc");
        assert_eq!(item.title, "Honey");
    }

    #[test]
    fn test_to_fields_strips_id() {
        let item = Item {
            id: "ignored".to_string(),
            title: "Ghee".to_string(),
        };
        let fields = to_fields(&item).unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["title"], "Ghee");
    }

    #[test]
    fn test_to_fields_rejects_scalars() {
        assert!(to_fields(&42).is_err());
    }
}
