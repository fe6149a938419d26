//! Deep traversal of values with a per-leaf visitor.
//!
//! [`varmap`] walks a value, hands every scalar leaf to a [`KeyVisitor`]
//! together with the key it sits under, and rebuilds the containers around
//! the visited leaves. Shapes are preserved: a mapping comes back with the
//! same keys, a sequence with the same length.
//!
//! Keys only exist at mapping level. Elements of a sequence are visited with
//! no key, and so is anything nested under them until a mapping is entered
//! again.

use std::collections::HashSet;

use crate::value::{SharedValue, Value};

// =============================================================================
// KeyVisitor
// =============================================================================

/// Decides the replacement for a single leaf.
pub trait KeyVisitor {
    /// Returns the value to store in place of `value`, found under `key`.
    fn visit(&self, key: Option<&str>, value: Value) -> Value;
}

impl<F> KeyVisitor for F
where
    F: Fn(Option<&str>, Value) -> Value,
{
    fn visit(&self, key: Option<&str>, value: Value) -> Value {
        self(key, value)
    }
}

// =============================================================================
// Visiting - cycle guard
// =============================================================================

/// Shared cells on the path from the traversal root to the current value.
///
/// Owned maps and sequences cannot alias, so only shared cells are tracked.
#[derive(Debug, Default)]
pub struct Visiting {
    cells: HashSet<usize>,
}

impl Visiting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `cell` as entered. Returns `false` if it already was.
    fn enter(&mut self, cell: &SharedValue) -> bool {
        self.cells.insert(cell.identity())
    }

    fn leave(&mut self, cell: &SharedValue) {
        self.cells.remove(&cell.identity());
    }

    pub fn contains(&self, cell: &SharedValue) -> bool {
        self.cells.contains(&cell.identity())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// =============================================================================
// varmap
// =============================================================================

/// Applies `visitor` to every scalar leaf of `value`, rebuilding containers.
///
/// A shared cell is rebuilt into a new cell. A shared cell that is already
/// being traversed further up the current path is returned as is, without
/// visiting its contents.
pub fn varmap<V: KeyVisitor + ?Sized>(visitor: &V, value: Value) -> Value {
    varmap_with(visitor, value, &mut Visiting::new())
}

/// Like [`varmap`], continuing a traversal whose path is tracked in `visiting`.
pub fn varmap_with<V: KeyVisitor + ?Sized>(
    visitor: &V,
    value: Value,
    visiting: &mut Visiting,
) -> Value {
    walk(visitor, None, value, visiting)
}

fn walk<V: KeyVisitor + ?Sized>(
    visitor: &V,
    key: Option<&str>,
    value: Value,
    visiting: &mut Visiting,
) -> Value {
    match value {
        Value::Map(fields) => Value::Map(
            fields
                .into_iter()
                .map(|(k, v)| {
                    let v = walk(visitor, Some(k.as_str()), v, visiting);
                    (k, v)
                })
                .collect(),
        ),
        Value::Seq(items) => Value::Seq(
            items
                .into_iter()
                .map(|item| walk(visitor, None, item, visiting))
                .collect(),
        ),
        Value::Shared(cell) => {
            if !visiting.enter(&cell) {
                return Value::Shared(cell);
            }
            let inner = cell.read().clone();
            let rebuilt = walk(visitor, key, inner, visiting);
            visiting.leave(&cell);
            Value::Shared(SharedValue::new(rebuilt))
        }
        leaf => visitor.visit(key, leaf),
    }
}
