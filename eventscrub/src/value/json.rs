//! `serde` support for [`Value`].
//!
//! Deserialization goes through `serde_json::Value`, so it never produces
//! shared cells. Serialization follows shared cells, emitting `null` for a
//! cell that is already being serialized further up the same path.

use std::{cell::RefCell, collections::HashSet};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::Value as JsonValue;

use super::{Map, Value};

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl Value {
    /// Converts to a `serde_json::Value`.
    ///
    /// Non-finite floats have no JSON form and become `null`, as does a
    /// shared cell reached again from inside itself.
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Value::from)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visiting = RefCell::new(HashSet::new());
        Guarded {
            value: self,
            visiting: &visiting,
        }
        .serialize(serializer)
    }
}

// =============================================================================
// Guarded - serializer that tracks the shared cells on the current path
// =============================================================================

struct Guarded<'a> {
    value: &'a Value,
    visiting: &'a RefCell<HashSet<usize>>,
}

impl Guarded<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Guarded<'b> {
        Guarded {
            value,
            visiting: self.visiting,
        }
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, &self.child(value))?;
                }
                map.end()
            }
            Value::Shared(cell) => {
                let id = cell.identity();
                if !self.visiting.borrow_mut().insert(id) {
                    return serializer.serialize_unit();
                }
                let inner = cell.read();
                let result = self.child(&inner).serialize(serializer);
                self.visiting.borrow_mut().remove(&id);
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::value::SharedValue;

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(Value::from(json!(-3)), Value::Int(-3));
        assert_eq!(Value::from(json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn deserializes_nested_json() {
        let value: Value = serde_json::from_str(r#"{"a": [1, "two", null]}"#).unwrap();
        let items = value.as_map().unwrap()["a"].as_seq().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], Value::from("two"));
        assert!(items[2].is_null());
    }

    #[test]
    fn serializes_shared_cells_through() {
        let cell = SharedValue::new(Value::from(json!({"k": "v"})));
        let value = Value::Seq(vec![Value::Shared(cell.clone()), Value::Shared(cell)]);
        assert_eq!(value.to_json(), json!([{"k": "v"}, {"k": "v"}]));
    }

    #[test]
    fn serializes_cycle_as_null() {
        let cell = SharedValue::new(Map::new());
        let inner = cell.clone();
        if let Some(map) = cell.write().as_map_mut() {
            map.insert("name".into(), "loop".into());
            map.insert("self".into(), Value::Shared(inner));
        }
        let json = Value::Shared(cell).to_json();
        assert_eq!(json, json!({"name": "loop", "self": null}));
    }
}
