//! The event record handed to processors.
//!
//! An [`Event`] is a mapping from string keys to arbitrary values. Two
//! sub-records have a well-known meaning, named by [`Interface`]:
//!
//! - `http`: a mapping that may hold `body`, `cookies`, `headers`, `env` and
//!   `querystring`
//! - `stacktrace`: a mapping whose `frames` sequence holds frame mappings,
//!   each of which may hold the frame's local `vars`

use crate::value::{Map, Value};

// =============================================================================
// Interface
// =============================================================================

/// Well-known sub-records of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interface {
    Http,
    Stacktrace,
}

impl Interface {
    /// Canonical key of the sub-record.
    pub const fn key(self) -> &'static str {
        match self {
            Interface::Http => "http",
            Interface::Stacktrace => "stacktrace",
        }
    }

    /// Every key the sub-record is accepted under, canonical key first.
    ///
    /// Older clients address interfaces by their fully qualified name.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Interface::Http => &["http", "sentry.interfaces.Http"],
            Interface::Stacktrace => &["stacktrace", "sentry.interfaces.Stacktrace"],
        }
    }

    fn matches(self, key: &str) -> bool {
        self.aliases().contains(&key)
    }
}

// =============================================================================
// Event
// =============================================================================

/// One monitoring event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    fields: Map,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map {
        &self.fields
    }

    pub fn into_map(self) -> Map {
        self.fields
    }

    /// Returns the first sub-record present for `interface`, if it is an
    /// owned mapping.
    pub fn interface(&self, interface: Interface) -> Option<&Map> {
        interface
            .aliases()
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_map))
    }

    /// Runs `edit` on every sub-record present for `interface`, under any
    /// of its keys, and returns how many were edited.
    ///
    /// Sub-records held in shared cells are edited into new cells, see
    /// [`Value::edit_map`]. Sub-records that are not mappings are skipped.
    pub fn edit_interface(
        &mut self,
        interface: Interface,
        mut edit: impl FnMut(&mut Map),
    ) -> usize {
        let mut edited = 0;
        for (key, value) in &mut self.fields {
            if interface.matches(key) && value.edit_map(&mut edit) {
                edited += 1;
            }
        }
        edited
    }
}

impl From<Map> for Event {
    fn from(fields: Map) -> Self {
        Self { fields }
    }
}

impl From<Event> for Map {
    fn from(event: Event) -> Self {
        event.fields
    }
}

impl From<Event> for Value {
    fn from(event: Event) -> Self {
        Value::Map(event.fields)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Event {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(feature = "json")]
mod json {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
    use serde_json::Value as JsonValue;

    use super::Event;
    use crate::value::Value;

    impl Event {
        pub fn to_json(&self) -> JsonValue {
            serde_json::to_value(self).unwrap_or(JsonValue::Null)
        }
    }

    impl Serialize for Event {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.fields.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Event {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            match Value::deserialize(deserializer)? {
                Value::Map(fields) => Ok(Event { fields }),
                _ => Err(D::Error::custom("an event must be a JSON object")),
            }
        }
    }

    impl TryFrom<JsonValue> for Event {
        type Error = serde_json::Error;

        fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
            serde_json::from_value(value)
        }
    }
}
