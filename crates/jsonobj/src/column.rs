//! Storage column codec.
//!
//! Moves value objects in and out of a text column holding JSON. Decoding is
//! lenient: whatever the column holds, the caller gets an object back.
//! Encoding is strict about its input, since writing a scalar into a JSON
//! object column is a programming error.

use tracing::warn;

use crate::error::{Error, Result};
use crate::object::{JsonObject, JsonOptions};
use crate::spec::ObjectSpec;
use crate::value::{map_to_json, Value};

/// Encodes and decodes one definition's objects.
#[derive(Debug, Clone, Copy)]
pub struct ColumnCodec {
    spec: &'static ObjectSpec,
}

impl ColumnCodec {
    pub fn new(spec: &'static ObjectSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &'static ObjectSpec {
        self.spec
    }

    /// Build an object from a stored column value.
    ///
    /// NULL, invalid JSON and non-container JSON all decode to an object with
    /// no attributes.
    pub fn decode(&self, stored: Option<&str>) -> JsonObject {
        let raw = match stored {
            None => serde_json::Value::Null,
            Some(text) => serde_json::from_str(text).unwrap_or_else(|err| {
                warn!(object = self.spec.name, error = %err, "stored JSON is invalid, decoding as empty");
                serde_json::Value::Null
            }),
        };
        self.spec.from_json(raw)
    }

    /// Produce the stored column value.
    ///
    /// `Null` stores NULL. Objects and maps store their JSON text. Any other
    /// value is rejected with [`Error::InvalidCastArgument`].
    pub fn encode(&self, value: &Value) -> Result<Option<String>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(obj) => Ok(Some(self.encode_object(obj))),
            Value::Map(map) => Ok(Some(serde_json::to_string(&map_to_json(map))?)),
            other => Err(Error::InvalidCastArgument(format!(
                "{} column expects an object or map, got {}",
                self.spec.name,
                other.type_name()
            ))),
        }
    }

    pub fn encode_object(&self, object: &JsonObject) -> String {
        object.to_json(JsonOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::DirtyTracking;
    use crate::spec::CastType;
    use serde_json::json;

    static SETTINGS: ObjectSpec = ObjectSpec::new("Settings")
        .casts(&[("retries", CastType::Int)])
        .capabilities(&[&DirtyTracking]);

    fn codec() -> ColumnCodec {
        ColumnCodec::new(&SETTINGS)
    }

    #[test]
    fn test_decode_runs_the_factory() {
        let obj = codec().decode(Some(r#"{"retries": "3", "mode": "fast"}"#));
        assert_eq!(obj.name(), "Settings");
        assert_eq!(obj.get("retries"), Some(&Value::Int(3)));
        assert!(!obj.is_dirty());
    }

    #[test]
    fn test_decode_null_and_garbage_yield_empty_objects() {
        assert!(codec().decode(None).attributes().is_empty());
        assert!(codec().decode(Some("{not json")).attributes().is_empty());
        assert!(codec().decode(Some("42")).attributes().is_empty());
        assert!(codec().decode(Some("")).attributes().is_empty());
    }

    #[test]
    fn test_encode_null_stores_null() {
        assert_eq!(codec().encode(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_encode_object_and_map() {
        let obj = SETTINGS.from_json(json!({"retries": "2"}));
        assert_eq!(
            codec().encode(&Value::from(obj)).unwrap(),
            Some(r#"{"retries":2}"#.to_string())
        );

        let map = Value::from(json!({"a": [1, 2]}));
        assert_eq!(codec().encode(&map).unwrap(), Some(r#"{"a":[1,2]}"#.to_string()));
    }

    #[test]
    fn test_encode_scalar_is_rejected() {
        let err = codec().encode(&Value::from("text")).unwrap_err();
        assert!(matches!(err, Error::InvalidCastArgument(_)));
        assert!(err.to_string().contains("string"));

        assert!(codec().encode(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_stored_unsigned_ids_are_unchanged() {
        let stored = r#"{"owner":18446744073709551615,"retries":1}"#;
        let obj = codec().decode(Some(stored));
        assert_eq!(obj.get("owner"), Some(&Value::UInt(u64::MAX)));
        assert_eq!(codec().encode(&Value::from(obj)).unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_encoded_text_decodes_to_an_equal_object() {
        let obj = SETTINGS.from_json(json!({"retries": 5, "nested": {"x": true}}));
        let stored = codec().encode_object(&obj);
        assert_eq!(codec().decode(Some(stored.as_str())), obj);
    }
}
