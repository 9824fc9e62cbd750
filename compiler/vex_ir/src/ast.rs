//! Flat AST using arena allocation.
//!
//! Every node of every category (expression, type annotation, declaration,
//! statement) lives in one contiguous arena and is addressed by a
//! `NodeId(u32)`. Child lists are `NodeRange`s into a side table. A single
//! id space lets later phases attach attributes to any node with one key
//! type.

use std::fmt;

use crate::{BinaryOp, Name, Span, UnaryOp};

/// Index of a node in the [`Ast`] arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for "no node" (absent else branch, bare `return`, ...).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId(INVALID)")
        }
    }
}

/// Range into the arena's node-list side table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }
}

/// Synthetic declarations pre-installed in the root scope.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    IntType,
    FloatType,
    BoolType,
    StringType,
    VoidType,
    TypeType,
    True,
    False,
    Null,
    Print,
}

impl Builtin {
    /// All builtins, in root-scope declaration order.
    pub const ALL: [Builtin; 10] = [
        Builtin::IntType,
        Builtin::FloatType,
        Builtin::BoolType,
        Builtin::StringType,
        Builtin::VoidType,
        Builtin::TypeType,
        Builtin::True,
        Builtin::False,
        Builtin::Null,
        Builtin::Print,
    ];

    /// Source-level name of the declaration.
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::IntType => "Int",
            Builtin::FloatType => "Float",
            Builtin::BoolType => "Bool",
            Builtin::StringType => "String",
            Builtin::VoidType => "Void",
            Builtin::TypeType => "Type",
            Builtin::True => "true",
            Builtin::False => "false",
            Builtin::Null => "null",
            Builtin::Print => "print",
        }
    }

    /// Whether this builtin declares a type.
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Builtin::IntType
                | Builtin::FloatType
                | Builtin::BoolType
                | Builtin::StringType
                | Builtin::VoidType
                | Builtin::TypeType
        )
    }
}

/// Node payload.
///
/// All children are `NodeId` indices or `NodeRange`s; the variants mirror
/// the surface language one-to-one plus the synthesized shapes the parser
/// materializes (slice endpoint defaults, per-`case` wildcard declaration,
/// empty default blocks).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // Expressions
    /// Integer literal: `42`
    IntLit(i64),
    /// Float literal: `4.2` (stored as bits)
    FloatLit(u64),
    /// String literal (interned, escapes processed)
    StrLit(Name),
    /// Reference to a declaration: `x`, `print`, `true`, `_`
    Ref(Name),
    /// Array literal: `[1, 2, 3]` (possibly empty)
    ArrayLit(NodeRange),
    /// Matrix literal: `[[1, 2], [3, 4]]` - every row is an `ArrayLit`
    MatrixLit(NodeRange),
    /// Matrix generator: `[filler](rows, cols)` - shape has exactly 2 ids
    /// after parsing (`[f](n)` becomes `[f](1, n)`), more only on a
    /// malformed program that analysis rejects.
    MatrixGen { filler: NodeId, shape: NodeRange },
    /// Parenthesized expression: `(e)`
    Paren(NodeId),
    /// Field access: `e.length`, `m.shape`, `p.x`
    FieldAccess { stem: NodeId, field: Name },
    /// Array indexing: `a[i]`
    IndexAccess { array: NodeId, index: NodeId },
    /// Slicing: `a[s:e]` - the parser materializes defaults `0` and `-1`
    SliceAccess { array: NodeId, start: NodeId, end: NodeId },
    /// Unary expression: `!e`
    Unary { op: UnaryOp, operand: NodeId },
    /// Binary expression
    Binary { op: BinaryOp, left: NodeId, right: NodeId },
    /// Constructor reference: `$S` (target is a `Ref`)
    Constructor { target: NodeId },
    /// Function call: `f(a, b)`
    Call { function: NodeId, args: NodeRange },
    /// Assignment (an expression): `lvalue = e`
    Assign { target: NodeId, value: NodeId },

    // Type annotations
    /// Named type: `Int`, `T`, `Point`
    SimpleType(Name),
    /// Array type: `T[]`
    ArrayType { component: NodeId },
    /// Matrix type: `Mat#T`
    MatType { component: NodeId },

    // Declarations
    /// `var name: T = init`
    VarDecl { name: Name, ty: NodeId, init: NodeId },
    /// Struct field: `var name: T`
    FieldDecl { name: Name, ty: NodeId },
    /// Function parameter: `name: T`
    Param { name: Name, ty: NodeId },
    /// `fun name(params): R { ... }` - `return_type` defaults to `Void`
    FunDecl {
        name: Name,
        params: NodeRange,
        return_type: NodeId,
        body: NodeId,
    },
    /// `struct Name { fields }`
    StructDecl { name: Name, fields: NodeRange },
    /// Synthetic declaration of `_`, one per `case` statement.
    WildcardDecl,
    /// Synthetic root-scope declaration (types, `true`/`false`/`null`, `print`).
    BuiltinDecl(Builtin),

    // Statements
    /// `{ stmts }`
    Block(NodeRange),
    /// `if (cond) then else els` - `els` may be `INVALID`
    If { cond: NodeId, then_branch: NodeId, else_branch: NodeId },
    /// `while (cond) body`
    While { cond: NodeId, body: NodeId },
    /// `return e?` - `expr` may be `INVALID`
    Return { expr: NodeId },
    /// Expression in statement position
    ExprStmt(NodeId),
    /// `case subject { bodies, default: block }` - `default` is always a
    /// `Block` (synthesized empty when absent); `wildcard` is this case's
    /// `WildcardDecl`.
    Case {
        subject: NodeId,
        bodies: NodeRange,
        default: NodeId,
        wildcard: NodeId,
    },
    /// One arm of a `case`: `pattern : block`
    CaseBody { pattern: NodeId, body: NodeId },
    /// Whole program.
    Root(NodeRange),
}

/// A node: payload plus source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Contiguous storage for all AST nodes of one program.
#[derive(Clone, Default, Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    node_lists: Vec<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its id.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("AST capacity exceeded");
        self.nodes.push(Node { kind, span });
        NodeId::from_raw(id)
    }

    /// Allocate a child list, returning its range.
    pub fn alloc_list(&mut self, children: &[NodeId]) -> NodeRange {
        let start = u32::try_from(self.node_lists.len()).expect("AST list capacity exceeded");
        self.node_lists.extend_from_slice(children);
        let len = u32::try_from(children.len()).expect("AST list length exceeded");
        NodeRange { start, len }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.raw() as usize]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.raw() as usize].kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.raw() as usize].span
    }

    #[inline]
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        &self.node_lists[range.start as usize..(range.start + range.len) as usize]
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name of a declaration node, if it has one.
    pub fn decl_name(&self, id: NodeId) -> Option<Name> {
        match self.kind(id) {
            NodeKind::VarDecl { name, .. }
            | NodeKind::FieldDecl { name, .. }
            | NodeKind::Param { name, .. }
            | NodeKind::FunDecl { name, .. }
            | NodeKind::StructDecl { name, .. } => Some(name),
            _ => None,
        }
    }

    /// What kind of thing a declaration node declares, for diagnostics.
    pub fn declared_thing(&self, id: NodeId) -> &'static str {
        match self.kind(id) {
            NodeKind::VarDecl { .. } | NodeKind::WildcardDecl => "variable",
            NodeKind::FieldDecl { .. } => "field",
            NodeKind::Param { .. } => "parameter",
            NodeKind::FunDecl { .. } => "function",
            NodeKind::StructDecl { .. } => "struct",
            NodeKind::BuiltinDecl(b) => {
                if b.is_type() {
                    "type"
                } else if matches!(b, Builtin::Print) {
                    "function"
                } else {
                    "variable"
                }
            }
            _ => "node",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_lookup() {
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::IntLit(1), Span::new(0, 1));
        let b = ast.alloc(NodeKind::IntLit(2), Span::new(2, 3));
        let list = ast.alloc_list(&[a, b]);
        let arr = ast.alloc(NodeKind::ArrayLit(list), Span::new(0, 3));

        assert_eq!(ast.kind(a), NodeKind::IntLit(1));
        assert_eq!(ast.list(list), &[a, b]);
        match ast.kind(arr) {
            NodeKind::ArrayLit(r) => assert_eq!(r.len(), 2),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_invalid_sentinel() {
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId::from_raw(0).is_valid());
    }

    #[test]
    fn test_decl_name() {
        let mut ast = Ast::new();
        let ty = ast.alloc(NodeKind::SimpleType(Name::EMPTY), Span::DUMMY);
        let decl = ast.alloc(
            NodeKind::VarDecl {
                name: Name::from_raw(7),
                ty,
                init: NodeId::INVALID,
            },
            Span::DUMMY,
        );
        assert_eq!(ast.decl_name(decl), Some(Name::from_raw(7)));
        assert_eq!(ast.decl_name(ty), None);
    }
}
