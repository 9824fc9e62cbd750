//! Runtime variable storage: a frame stack addressed by scope ids.
//!
//! Each frame belongs to one static scope. Lookups search from the
//! innermost frame outward for the frame whose scope matches the
//! reference's *resolved* scope, so shadowing and recursion fall out of
//! the search order (the nearest frame of a recursive function's scope is
//! the current invocation). Function calls remember the depth at entry
//! and truncate back to it on exit, so unwinding can never leak frames.

use rustc_hash::FxHashMap;
use vex_ir::Name;
use vex_sema::ScopeId;

use crate::Value;

struct Frame {
    scope: ScopeId,
    slots: FxHashMap<Name, Value>,
}

/// The interpreter's frame stack.
#[derive(Default)]
pub struct ScopeStorage {
    frames: Vec<Frame>,
}

impl ScopeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current depth, for truncate-on-exit.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a frame for `scope`.
    pub fn push(&mut self, scope: ScopeId) {
        self.frames.push(Frame {
            scope,
            slots: FxHashMap::default(),
        });
    }

    /// Drop every frame above `depth`.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// Read the slot for `name` in the nearest frame of `scope`.
    pub fn get(&self, scope: ScopeId, name: Name) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.scope == scope)
            .and_then(|f| f.slots.get(&name).cloned())
    }

    /// Write the slot for `name` in the nearest frame of `scope`.
    ///
    /// # Panics
    /// Panics if no frame for `scope` is open; analysis guarantees the
    /// declaring scope is on the stack wherever a reference resolves.
    pub fn set(&mut self, scope: ScopeId, name: Name, value: Value) {
        let frame = self
            .frames
            .iter_mut()
            .rev()
            .find(|f| f.scope == scope)
            .unwrap_or_else(|| panic!("no open frame for scope {scope:?}"));
        frame.slots.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_frame_wins() {
        let mut storage = ScopeStorage::new();
        let outer = ScopeId::from_raw(0);
        let inner = ScopeId::from_raw(1);
        let x = Name::from_raw(1);

        storage.push(outer);
        storage.set(outer, x, Value::Int(1));
        storage.push(inner);
        storage.set(inner, x, Value::Int(2));

        assert!(matches!(storage.get(inner, x), Some(Value::Int(2))));
        assert!(matches!(storage.get(outer, x), Some(Value::Int(1))));

        // Recursion: a second frame of the same scope shadows the first.
        storage.push(inner);
        storage.set(inner, x, Value::Int(3));
        assert!(matches!(storage.get(inner, x), Some(Value::Int(3))));

        storage.truncate(2);
        assert!(matches!(storage.get(inner, x), Some(Value::Int(2))));
    }
}
