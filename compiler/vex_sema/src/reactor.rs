//! The attribute reactor: a write-once dataflow engine.
//!
//! Attributes are keyed by `(node, attribute)`. Rules declare the input
//! attributes they need and fire once, when every input is present. Rules
//! may register further rules while firing (dynamic dependencies), which
//! is how forward references resolve: a reference rule can only wire up
//! its type once the declaration it resolves to is known.
//!
//! Errors poison their target attributes: a rule with a poisoned input is
//! cancelled silently, so one root cause yields one diagnostic.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use vex_diagnostic::Diagnostic;
use vex_ir::{Ast, NodeId, StringInterner};
use vex_types::Type;

use crate::{ScopeId, ScopeTable};

/// Attribute names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Attr {
    /// Type of an expression or declaration.
    Type,
    /// The `Type` denoted by a type annotation node.
    Value,
    /// Resolved declaration of a reference.
    Decl,
    /// Scope of a reference/declaration, or the scope a node introduces.
    Scope,
    /// Whether a construct unconditionally returns.
    Returns,
    /// The type declared by a struct or synthetic type declaration.
    Declared,
    /// Position of an argument in its call.
    Index,
}

/// Attribute key: `(node, name)`.
pub type AttrKey = (NodeId, Attr);

/// Attribute values.
#[derive(Clone, Debug)]
pub enum AttrValue {
    Type(Type),
    Node(NodeId),
    Scope(ScopeId),
    Bool(bool),
    Index(usize),
}

/// A rule's run-once body.
pub type RuleFn = Box<dyn FnOnce(&mut RuleCx<'_, '_>)>;

struct RuleCell {
    /// Inputs still missing.
    missing: usize,
    cancelled: bool,
    run: Option<RuleFn>,
}

/// The reactor: attribute store + rule queue + diagnostics.
#[derive(Default)]
pub struct Reactor {
    attrs: FxHashMap<AttrKey, AttrValue>,
    poisoned: FxHashSet<AttrKey>,
    rules: Vec<RuleCell>,
    /// Rules blocked on an attribute, by key.
    waiting: FxHashMap<AttrKey, Vec<usize>>,
    /// Rules whose inputs are all present, fired in registration order.
    ready: VecDeque<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Reactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute. Attributes are write-once; a second write to the
    /// same key is a bug in the rule set.
    pub fn set(&mut self, node: NodeId, attr: Attr, value: AttrValue) {
        let key = (node, attr);
        let previous = self.attrs.insert(key, value);
        debug_assert!(previous.is_none(), "attribute {key:?} set twice");
        if let Some(waiters) = self.waiting.remove(&key) {
            for rule_id in waiters {
                let cell = &mut self.rules[rule_id];
                cell.missing -= 1;
                if cell.missing == 0 && !cell.cancelled {
                    self.ready.push_back(rule_id);
                }
            }
        }
    }

    /// Register a rule over `inputs`. Fires once all inputs are set;
    /// cancelled if any input is already poisoned.
    pub fn rule(&mut self, inputs: &[AttrKey], run: RuleFn) {
        let rule_id = self.rules.len();
        let cancelled = inputs.iter().any(|key| self.poisoned.contains(key));
        let mut missing = 0;
        if !cancelled {
            for &key in inputs {
                if !self.attrs.contains_key(&key) {
                    missing += 1;
                    self.waiting.entry(key).or_default().push(rule_id);
                }
            }
        }
        self.rules.push(RuleCell {
            missing,
            cancelled,
            run: Some(run),
        });
        if !cancelled && missing == 0 {
            self.ready.push_back(rule_id);
        }
    }

    /// Record a diagnostic and poison the attributes it makes unknowable.
    pub fn error(&mut self, diagnostic: Diagnostic, poison: &[AttrKey]) {
        self.diagnostics.push(diagnostic);
        for &key in poison {
            self.poisoned.insert(key);
            if let Some(waiters) = self.waiting.remove(&key) {
                for rule_id in waiters {
                    self.rules[rule_id].cancelled = true;
                }
            }
        }
    }

    /// Run rules to fixpoint. Rules may register rules and set attributes
    /// while firing. Rules still blocked when the queue drains never fire;
    /// the missing inputs either carry a diagnostic already or belong to
    /// nodes without an inference context.
    pub fn run(&mut self, ast: &Ast, interner: &StringInterner, scopes: &mut ScopeTable) {
        let mut fired = 0usize;
        while let Some(rule_id) = self.ready.pop_front() {
            if self.rules[rule_id].cancelled {
                continue;
            }
            let Some(run) = self.rules[rule_id].run.take() else {
                continue;
            };
            fired += 1;
            let mut cx = RuleCx {
                reactor: self,
                ast,
                interner,
                scopes,
            };
            run(&mut cx);
        }
        trace!(fired, total = self.rules.len(), "reactor converged");
    }

    pub fn get(&self, node: NodeId, attr: Attr) -> Option<&AttrValue> {
        self.attrs.get(&(node, attr))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Tear down into the final attribute set and diagnostics.
    pub fn finish(self) -> (Attrs, Vec<Diagnostic>) {
        (Attrs { attrs: self.attrs }, self.diagnostics)
    }
}

/// Context handed to a firing rule.
pub struct RuleCx<'r, 'a> {
    reactor: &'r mut Reactor,
    pub ast: &'a Ast,
    pub interner: &'a StringInterner,
    pub scopes: &'r mut ScopeTable,
}

impl RuleCx<'_, '_> {
    /// Read an input attribute. Inputs are guaranteed present when the
    /// rule fires, so this panics on a rule-set bug.
    pub fn get(&self, node: NodeId, attr: Attr) -> &AttrValue {
        self.reactor
            .get(node, attr)
            .unwrap_or_else(|| panic!("rule fired without input ({node:?}, {attr:?})"))
    }

    /// Read an input attribute as a type.
    pub fn get_type(&self, node: NodeId, attr: Attr) -> Type {
        match self.get(node, attr) {
            AttrValue::Type(ty) => ty.clone(),
            other => panic!("attribute ({node:?}, {attr:?}) is not a type: {other:?}"),
        }
    }

    pub fn get_node(&self, node: NodeId, attr: Attr) -> NodeId {
        match self.get(node, attr) {
            AttrValue::Node(id) => *id,
            other => panic!("attribute ({node:?}, {attr:?}) is not a node: {other:?}"),
        }
    }

    pub fn get_bool(&self, node: NodeId, attr: Attr) -> bool {
        match self.get(node, attr) {
            AttrValue::Bool(b) => *b,
            other => panic!("attribute ({node:?}, {attr:?}) is not a bool: {other:?}"),
        }
    }

    pub fn get_index(&self, node: NodeId, attr: Attr) -> usize {
        match self.get(node, attr) {
            AttrValue::Index(i) => *i,
            other => panic!("attribute ({node:?}, {attr:?}) is not an index: {other:?}"),
        }
    }

    pub fn set(&mut self, node: NodeId, attr: Attr, value: AttrValue) {
        self.reactor.set(node, attr, value);
    }

    pub fn set_type(&mut self, node: NodeId, ty: Type) {
        self.set(node, Attr::Type, AttrValue::Type(ty));
    }

    pub fn rule(&mut self, inputs: &[AttrKey], run: RuleFn) {
        self.reactor.rule(inputs, run);
    }

    pub fn error(&mut self, diagnostic: Diagnostic, poison: &[AttrKey]) {
        self.reactor.error(diagnostic, poison);
    }
}

/// The converged attribute set, consumed by the interpreter.
#[derive(Debug, Default)]
pub struct Attrs {
    attrs: FxHashMap<AttrKey, AttrValue>,
}

impl Attrs {
    pub fn get(&self, node: NodeId, attr: Attr) -> Option<&AttrValue> {
        self.attrs.get(&(node, attr))
    }

    /// Type of an expression or declaration node.
    pub fn ty(&self, node: NodeId) -> Option<&Type> {
        match self.get(node, Attr::Type)? {
            AttrValue::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// The `Type` a type annotation node denotes.
    pub fn value(&self, node: NodeId) -> Option<&Type> {
        match self.get(node, Attr::Value)? {
            AttrValue::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// The type a struct or synthetic type declaration declares.
    pub fn declared(&self, node: NodeId) -> Option<&Type> {
        match self.get(node, Attr::Declared)? {
            AttrValue::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn decl(&self, node: NodeId) -> Option<NodeId> {
        match self.get(node, Attr::Decl)? {
            AttrValue::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn scope(&self, node: NodeId) -> Option<ScopeId> {
        match self.get(node, Attr::Scope)? {
            AttrValue::Scope(id) => Some(*id),
            _ => None,
        }
    }

    pub fn returns(&self, node: NodeId) -> Option<bool> {
        match self.get(node, Attr::Returns)? {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Ast, StringInterner, ScopeTable) {
        (Ast::new(), StringInterner::new(), ScopeTable::new())
    }

    #[test]
    fn test_rule_fires_when_inputs_arrive() {
        let (ast, interner, mut scopes) = fixture();
        let mut reactor = Reactor::new();
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);

        reactor.rule(&[(a, Attr::Type)], Box::new(move |cx| {
            let ty = cx.get_type(a, Attr::Type);
            cx.set_type(b, ty);
        }));

        reactor.set(a, Attr::Type, AttrValue::Type(Type::Int));
        reactor.run(&ast, &interner, &mut scopes);

        let (attrs, diags) = reactor.finish();
        assert!(diags.is_empty());
        assert_eq!(attrs.ty(b), Some(&Type::Int));
    }

    #[test]
    fn test_dynamic_rule_registration() {
        let (ast, interner, mut scopes) = fixture();
        let mut reactor = Reactor::new();
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);
        let c = NodeId::from_raw(2);

        // A zero-input rule that registers a dependent rule while firing.
        reactor.rule(&[], Box::new(move |cx| {
            cx.rule(&[(a, Attr::Type)], Box::new(move |cx| {
                let ty = cx.get_type(a, Attr::Type);
                cx.set_type(b, ty);
            }));
            cx.set_type(a, Type::Float);
            cx.set_type(c, Type::Bool);
        }));

        reactor.run(&ast, &interner, &mut scopes);
        let (attrs, _) = reactor.finish();
        assert_eq!(attrs.ty(b), Some(&Type::Float));
        assert_eq!(attrs.ty(c), Some(&Type::Bool));
    }

    #[test]
    fn test_poisoned_input_cancels_rule() {
        let (ast, interner, mut scopes) = fixture();
        let mut reactor = Reactor::new();
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);

        reactor.rule(&[(a, Attr::Type)], Box::new(move |cx| {
            let ty = cx.get_type(a, Attr::Type);
            cx.set_type(b, ty);
        }));

        reactor.error(
            Diagnostic::error(vex_diagnostic::ErrorCode::E2001).with_message("could not resolve: x"),
            &[(a, Attr::Type)],
        );
        reactor.run(&ast, &interner, &mut scopes);

        let (attrs, diags) = reactor.finish();
        assert_eq!(diags.len(), 1);
        assert_eq!(attrs.ty(b), None);
    }

    #[test]
    fn test_unfired_rules_are_silent() {
        let (ast, interner, mut scopes) = fixture();
        let mut reactor = Reactor::new();
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);

        reactor.rule(&[(a, Attr::Type)], Box::new(move |cx| {
            cx.set_type(b, Type::Int);
        }));
        reactor.run(&ast, &interner, &mut scopes);

        let (attrs, diags) = reactor.finish();
        assert!(diags.is_empty());
        assert_eq!(attrs.ty(b), None);
    }
}
