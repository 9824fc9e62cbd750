//! Nested lexical scopes.
//!
//! Scopes form a tree stored in one arena. Each scope maps names to the
//! declaration node that introduced them; lookup walks parents. Runtime
//! bindings live elsewhere (the interpreter's storage is keyed by the
//! `ScopeId`s resolved here).

use rustc_hash::FxHashMap;
use vex_ir::{Name, NodeId};

/// Index of a scope in the [`ScopeTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ScopeId(raw)
    }
}

#[derive(Debug)]
struct ScopeData {
    owner: NodeId,
    parent: Option<ScopeId>,
    decls: FxHashMap<Name, NodeId>,
}

/// Arena of all scopes of one program. Index 0 is the root scope.
#[derive(Debug, Default)]
pub struct ScopeTable {
    scopes: Vec<ScopeData>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope owned by `owner`, child of `parent`.
    pub fn push(&mut self, owner: NodeId, parent: Option<ScopeId>) -> ScopeId {
        let id = u32::try_from(self.scopes.len()).expect("scope capacity exceeded");
        self.scopes.push(ScopeData {
            owner,
            parent,
            decls: FxHashMap::default(),
        });
        ScopeId(id)
    }

    /// Declare `name` in `scope`. Redeclaration shadows the earlier entry.
    pub fn declare(&mut self, scope: ScopeId, name: Name, decl: NodeId) {
        self.scopes[scope.0 as usize].decls.insert(name, decl);
    }

    /// Look up `name` starting at `scope`, walking parents. Returns the
    /// scope the declaration lives in along with the declaration node.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<(ScopeId, NodeId)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.0 as usize];
            if let Some(&decl) = data.decls.get(&name) {
                return Some((id, decl));
            }
            current = data.parent;
        }
        None
    }

    /// The AST node that owns `scope`.
    pub fn owner(&self, scope: ScopeId) -> NodeId {
        self.scopes[scope.0 as usize].owner
    }

    /// Parent of `scope`, `None` for the root.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0 as usize].parent
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let mut table = ScopeTable::new();
        let root = table.push(NodeId::from_raw(0), None);
        let child = table.push(NodeId::from_raw(1), Some(root));
        let name = Name::from_raw(5);
        table.declare(root, name, NodeId::from_raw(7));

        assert_eq!(table.lookup(child, name), Some((root, NodeId::from_raw(7))));
        assert_eq!(table.lookup(root, name), Some((root, NodeId::from_raw(7))));
        assert_eq!(table.lookup(child, Name::from_raw(9)), None);
    }

    #[test]
    fn test_shadowing() {
        let mut table = ScopeTable::new();
        let root = table.push(NodeId::from_raw(0), None);
        let child = table.push(NodeId::from_raw(1), Some(root));
        let name = Name::from_raw(5);
        table.declare(root, name, NodeId::from_raw(7));
        table.declare(child, name, NodeId::from_raw(8));

        assert_eq!(table.lookup(child, name), Some((child, NodeId::from_raw(8))));
        assert_eq!(table.lookup(root, name), Some((root, NodeId::from_raw(7))));
    }
}
