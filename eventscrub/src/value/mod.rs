//! Tagged values carried by an event.
//!
//! Every value is one of three kinds, decided when the value is built:
//!
//! - **Text**: [`Value::Text`], the only kind a query-string parse applies to
//! - **Containers**: [`Value::Seq`], [`Value::Map`] and [`Value::Shared`]
//! - **Other scalars**: null, booleans and numbers
//!
//! Owned containers form a tree. [`SharedValue`] is the escape hatch for data
//! that is referenced from more than one place; since a shared cell can be
//! reached from its own contents, anything that walks values must track the
//! cells it is currently inside (see [`crate::varmap`]).

#[cfg(feature = "json")]
mod json;

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Ordered mapping from string keys to values.
pub type Map = BTreeMap<String, Value>;

// =============================================================================
// Value
// =============================================================================

/// A single value inside an event.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Seq(Vec<Value>),
    Map(Map),
    Shared(SharedValue),
}

impl Value {
    /// Returns the text if this is a textual scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_seq_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` for sequences, mappings and shared cells.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Seq(_) | Value::Map(_) | Value::Shared(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runs `edit` on this value if it is a mapping, directly or through
    /// shared cells. Returns `false` if no mapping was reached.
    ///
    /// A shared cell is never written to: its contents are copied, edited and
    /// stored in a new cell that takes the old one's place in `self`.
    pub fn edit_map(&mut self, edit: impl FnOnce(&mut Map)) -> bool {
        self.edit_as(Value::as_map_mut, edit, &mut HashSet::new())
    }

    /// Like [`Value::edit_map`], for sequences.
    pub fn edit_seq(&mut self, edit: impl FnOnce(&mut Vec<Value>)) -> bool {
        self.edit_as(Value::as_seq_mut, edit, &mut HashSet::new())
    }

    fn edit_as<T: ?Sized, F: FnOnce(&mut T)>(
        &mut self,
        project: fn(&mut Value) -> Option<&mut T>,
        edit: F,
        seen: &mut HashSet<usize>,
    ) -> bool {
        if let Value::Shared(cell) = self {
            // A cell holding only itself has nothing to edit.
            if !seen.insert(cell.identity()) {
                return false;
            }
            let mut inner = cell.read().clone();
            if !inner.edit_as(project, edit, seen) {
                return false;
            }
            *self = Value::Shared(SharedValue::new(inner));
            return true;
        }
        match project(self) {
            Some(target) => {
                edit(target);
                true
            }
            None => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Seq(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<SharedValue> for Value {
    fn from(value: SharedValue) -> Self {
        Value::Shared(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// =============================================================================
// SharedValue - aliased container cell
// =============================================================================

/// A value cell that can be referenced from several places in an event.
///
/// Cloning a `SharedValue` clones the handle, not the contents. Two handles
/// compare equal only when they point at the same cell.
#[derive(Clone)]
pub struct SharedValue(Arc<RwLock<Value>>);

impl SharedValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    /// Address of the cell, stable for as long as any handle is alive.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Locks the cell for reading.
    ///
    /// A poisoned lock still yields the value; a panic elsewhere must not
    /// stop an event from being scrubbed.
    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Value> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the contents of the cell, returning the previous value.
    pub fn replace(&self, value: impl Into<Value>) -> Value {
        std::mem::replace(&mut *self.write(), value.into())
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for SharedValue {
    // Contents may refer back to this cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedValue({:#x})", self.identity())
    }
}
