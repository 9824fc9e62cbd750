//! Semantic analysis: walks the AST and registers typing rules.
//!
//! The walk is pre-order for scope building and rule registration,
//! post-order for popping scopes. The rules themselves fire later, when
//! [`Reactor::run`] drains the queue - by which time every scope exists,
//! so forward references to functions, structs and types resolve
//! uniformly.
//!
//! Attributes established (see the crate docs for the full contract):
//! every expression gets `Type`; every type annotation gets `Value`;
//! references get `Decl` and `Scope`; declarations get `Type` (and
//! `Declared` for structs and synthetic types); blocks, ifs and returns
//! get `Returns`; scope-introducing nodes get `Scope`.

mod exprs;

use tracing::debug;
use vex_diagnostic::{Diagnostic, ErrorCode};
use vex_ir::{Ast, Builtin, Name, NodeId, NodeKind, StringInterner};
use vex_types::{is_assignable_to, Type};

use crate::reactor::{Attr, AttrKey, AttrValue, Attrs, Reactor};
use crate::{ScopeId, ScopeTable};

/// Result of semantic analysis.
pub struct Analysis {
    pub attrs: Attrs,
    pub scopes: ScopeTable,
    pub diagnostics: Vec<Diagnostic>,
    pub root_scope: ScopeId,
}

impl Analysis {
    /// Whether execution may proceed.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.iter().all(|d| !d.is_error())
    }
}

/// Names the analyzer needs at hand.
pub(crate) struct Names {
    pub underscore: Name,
    pub length: Name,
    pub shape: Name,
    /// Parallel to `Builtin::ALL`.
    pub builtins: [Name; 10],
}

impl Names {
    fn intern(interner: &mut StringInterner) -> Self {
        Names {
            underscore: interner.intern("_"),
            length: interner.intern("length"),
            shape: interner.intern("shape"),
            builtins: Builtin::ALL.map(|b| interner.intern(b.name())),
        }
    }
}

/// Analyze a parsed program.
///
/// Appends the synthetic root-scope declarations to the arena, walks the
/// tree registering rules, runs the reactor to fixpoint, and returns the
/// attribute set plus accumulated diagnostics. Execution must only
/// proceed on a clean analysis.
pub fn analyze(ast: &mut Ast, interner: &mut StringInterner, root: NodeId) -> Analysis {
    let names = Names::intern(interner);
    let builtin_nodes: [NodeId; 10] =
        Builtin::ALL.map(|b| ast.alloc(NodeKind::BuiltinDecl(b), vex_ir::Span::DUMMY));

    let ast = &*ast;
    let interner = &*interner;
    let mut reactor = Reactor::new();
    let mut scopes = ScopeTable::new();

    {
        let mut analyzer = Analyzer {
            reactor: &mut reactor,
            scopes: &mut scopes,
            ast,
            interner,
            names: &names,
            builtin_nodes,
            scope: None,
            infer_cx: None,
        };
        analyzer.walk(root);
    }

    debug!(nodes = ast.len(), "semantic walk complete, running reactor");
    reactor.run(ast, interner, &mut scopes);

    let (attrs, diagnostics) = reactor.finish();
    Analysis {
        attrs,
        scopes,
        diagnostics,
        root_scope: ScopeId::from_raw(0),
    }
}

pub(crate) struct Analyzer<'a, 'r> {
    pub reactor: &'r mut Reactor,
    pub scopes: &'r mut ScopeTable,
    pub ast: &'a Ast,
    pub interner: &'a StringInterner,
    pub names: &'a Names,
    pub builtin_nodes: [NodeId; 10],
    /// Current scope during the walk.
    pub scope: Option<ScopeId>,
    /// Most recently pre-visited inference context (variable declaration,
    /// function declaration, call, or case statement).
    pub infer_cx: Option<NodeId>,
}

impl Analyzer<'_, '_> {
    pub(crate) fn walk(&mut self, node: NodeId) {
        self.pre(node);
        let children = self.children(node);
        for child in children {
            self.walk(child);
        }
        self.post(node);
    }

    /// Ordered children of a node; `INVALID` slots are skipped.
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut push = |id: NodeId, out: &mut Vec<NodeId>| {
            if id.is_valid() {
                out.push(id);
            }
        };
        match self.ast.kind(node) {
            NodeKind::Root(stmts) | NodeKind::Block(stmts) => {
                out.extend_from_slice(self.ast.list(stmts));
            }
            NodeKind::ArrayLit(els) | NodeKind::MatrixLit(els) => {
                out.extend_from_slice(self.ast.list(els));
            }
            NodeKind::MatrixGen { filler, shape } => {
                push(filler, &mut out);
                out.extend_from_slice(self.ast.list(shape));
            }
            NodeKind::Paren(inner) | NodeKind::ExprStmt(inner) => push(inner, &mut out),
            NodeKind::FieldAccess { stem, .. } => push(stem, &mut out),
            NodeKind::IndexAccess { array, index } => {
                push(array, &mut out);
                push(index, &mut out);
            }
            NodeKind::SliceAccess { array, start, end } => {
                push(array, &mut out);
                push(start, &mut out);
                push(end, &mut out);
            }
            NodeKind::Unary { operand, .. } => push(operand, &mut out),
            NodeKind::Binary { left, right, .. } => {
                push(left, &mut out);
                push(right, &mut out);
            }
            NodeKind::Constructor { target } => push(target, &mut out),
            NodeKind::Call { function, args } => {
                push(function, &mut out);
                out.extend_from_slice(self.ast.list(args));
            }
            NodeKind::Assign { target, value } => {
                push(target, &mut out);
                push(value, &mut out);
            }
            NodeKind::ArrayType { component } | NodeKind::MatType { component } => {
                push(component, &mut out)
            }
            NodeKind::VarDecl { ty, init, .. } => {
                push(ty, &mut out);
                push(init, &mut out);
            }
            NodeKind::FieldDecl { ty, .. } | NodeKind::Param { ty, .. } => push(ty, &mut out),
            NodeKind::FunDecl {
                params,
                return_type,
                body,
                ..
            } => {
                out.extend_from_slice(self.ast.list(params));
                push(return_type, &mut out);
                push(body, &mut out);
            }
            NodeKind::StructDecl { fields, .. } => out.extend_from_slice(self.ast.list(fields)),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                push(cond, &mut out);
                push(then_branch, &mut out);
                push(else_branch, &mut out);
            }
            NodeKind::While { cond, body } => {
                push(cond, &mut out);
                push(body, &mut out);
            }
            NodeKind::Return { expr } => push(expr, &mut out),
            NodeKind::Case {
                subject,
                bodies,
                default,
                ..
            } => {
                push(subject, &mut out);
                out.extend_from_slice(self.ast.list(bodies));
                push(default, &mut out);
            }
            NodeKind::CaseBody { pattern, body } => {
                push(pattern, &mut out);
                push(body, &mut out);
            }
            NodeKind::IntLit(_)
            | NodeKind::FloatLit(_)
            | NodeKind::StrLit(_)
            | NodeKind::Ref(_)
            | NodeKind::SimpleType(_)
            | NodeKind::WildcardDecl
            | NodeKind::BuiltinDecl(_) => {}
        }
        out
    }

    fn pre(&mut self, node: NodeId) {
        match self.ast.kind(node) {
            NodeKind::Root(_) => self.root(node),
            NodeKind::Block(stmts) => self.block(node, stmts),
            NodeKind::VarDecl { name, ty, init } => self.var_decl(node, name, ty, init),
            NodeKind::FieldDecl { ty, .. } => self.field_decl(node, ty),
            NodeKind::Param { name, ty } => self.param(node, name, ty),
            NodeKind::FunDecl {
                name,
                params,
                return_type,
                body,
            } => self.fun_decl(node, name, params, return_type, body),
            NodeKind::StructDecl { name, .. } => self.struct_decl(node, name),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.if_stmt(node, cond, then_branch, else_branch),
            NodeKind::While { cond, .. } => self.while_stmt(cond),
            NodeKind::Return { expr } => self.return_stmt(node, expr),
            NodeKind::Case {
                subject,
                bodies,
                wildcard,
                ..
            } => self.case_stmt(node, subject, bodies, wildcard),

            NodeKind::IntLit(_) => self.reactor.set(node, Attr::Type, AttrValue::Type(Type::Int)),
            NodeKind::FloatLit(_) => {
                self.reactor.set(node, Attr::Type, AttrValue::Type(Type::Float))
            }
            NodeKind::StrLit(_) => {
                self.reactor.set(node, Attr::Type, AttrValue::Type(Type::String))
            }
            NodeKind::Ref(name) => self.reference(node, name),
            NodeKind::Constructor { target } => self.constructor(node, target),
            NodeKind::ArrayLit(els) => self.array_literal(node, els),
            NodeKind::MatrixLit(rows) => self.matrix_literal(node, rows),
            NodeKind::MatrixGen { filler, shape } => self.matrix_generator(node, filler, shape),
            NodeKind::Paren(inner) => self.parenthesized(node, inner),
            NodeKind::FieldAccess { stem, field } => self.field_access(node, stem, field),
            NodeKind::IndexAccess { array, index } => self.index_access(node, array, index),
            NodeKind::SliceAccess { array, start, end } => {
                self.slice_access(node, array, start, end)
            }
            NodeKind::Call { function, args } => self.call(node, function, args),
            NodeKind::Unary { operand, .. } => self.unary(node, operand),
            NodeKind::Binary { op, left, right } => self.binary(node, op, left, right),
            NodeKind::Assign { target, value } => self.assignment(node, target, value),

            NodeKind::SimpleType(name) => self.simple_type(node, name),
            NodeKind::ArrayType { component } => self.array_type(node, component),
            NodeKind::MatType { component } => self.mat_type(node, component),

            NodeKind::ExprStmt(_) | NodeKind::CaseBody { .. } => {}
            NodeKind::WildcardDecl | NodeKind::BuiltinDecl(_) => {}
        }
    }

    fn post(&mut self, node: NodeId) {
        if matches!(
            self.ast.kind(node),
            NodeKind::Root(_) | NodeKind::Block(_) | NodeKind::FunDecl { .. } | NodeKind::Case { .. }
        ) {
            self.scope = self.scopes.parent(self.current_scope());
        }
    }

    pub(crate) fn current_scope(&self) -> ScopeId {
        self.scope.expect("walk outside any scope")
    }

    /// The function declaration owning the current scope chain, if any.
    fn current_function(&self) -> Option<NodeId> {
        let mut scope = self.scope;
        while let Some(id) = scope {
            let owner = self.scopes.owner(id);
            if matches!(self.ast.kind(owner), NodeKind::FunDecl { .. }) {
                return Some(owner);
            }
            scope = self.scopes.parent(id);
        }
        None
    }

    /// Dependencies for a `Returns` attribute: the `Returns` of every
    /// child that is a return container (block, if, return).
    fn returns_deps(&self, children: &[NodeId]) -> Vec<AttrKey> {
        children
            .iter()
            .filter(|&&id| id.is_valid())
            .filter(|&&id| {
                matches!(
                    self.ast.kind(id),
                    NodeKind::Block(_) | NodeKind::If { .. } | NodeKind::Return { .. }
                )
            })
            .map(|&id| (id, Attr::Returns))
            .collect()
    }

    // Scopes & declarations

    fn root(&mut self, node: NodeId) {
        debug_assert!(self.scope.is_none());
        let root_scope = self.scopes.push(node, None);
        self.scope = Some(root_scope);
        self.reactor.set(node, Attr::Scope, AttrValue::Scope(root_scope));

        for (i, builtin) in Builtin::ALL.into_iter().enumerate() {
            let decl = self.builtin_nodes[i];
            self.scopes.declare(root_scope, self.names.builtins[i], decl);
            match builtin {
                Builtin::IntType => self.declare_builtin_type(decl, Type::Int),
                Builtin::FloatType => self.declare_builtin_type(decl, Type::Float),
                Builtin::BoolType => self.declare_builtin_type(decl, Type::Bool),
                Builtin::StringType => self.declare_builtin_type(decl, Type::String),
                Builtin::VoidType => self.declare_builtin_type(decl, Type::Void),
                Builtin::TypeType => self.declare_builtin_type(decl, Type::Type),
                Builtin::True | Builtin::False => {
                    self.reactor.set(decl, Attr::Type, AttrValue::Type(Type::Bool));
                }
                Builtin::Null => {
                    self.reactor.set(decl, Attr::Type, AttrValue::Type(Type::Null));
                }
                Builtin::Print => {
                    let ty = Type::fun(Type::String, vec![Type::String]);
                    self.reactor.set(decl, Attr::Type, AttrValue::Type(ty));
                }
            }
        }
    }

    fn declare_builtin_type(&mut self, decl: NodeId, declared: Type) {
        self.reactor.set(decl, Attr::Declared, AttrValue::Type(declared));
        self.reactor.set(decl, Attr::Type, AttrValue::Type(Type::Type));
    }

    fn block(&mut self, node: NodeId, stmts: vex_ir::NodeRange) {
        let scope = self.scopes.push(node, self.scope);
        self.scope = Some(scope);
        self.reactor.set(node, Attr::Scope, AttrValue::Scope(scope));

        let deps = self.returns_deps(self.ast.list(stmts));
        let inputs = deps.clone();
        self.reactor.rule(
            &inputs,
            Box::new(move |cx| {
                let returns =
                    !deps.is_empty() && deps.iter().any(|&(id, _)| cx.get_bool(id, Attr::Returns));
                cx.set(node, Attr::Returns, AttrValue::Bool(returns));
            }),
        );
    }

    fn var_decl(&mut self, node: NodeId, name: Name, ty: NodeId, init: NodeId) {
        self.infer_cx = Some(node);
        self.scopes.declare(self.current_scope(), name, node);
        self.reactor
            .set(node, Attr::Scope, AttrValue::Scope(self.current_scope()));

        self.reactor.rule(
            &[(ty, Attr::Value)],
            Box::new(move |cx| {
                let declared = cx.get_type(ty, Attr::Value);
                cx.set_type(node, declared);
            }),
        );

        let init_span = self.ast.span(init);
        self.reactor.rule(
            &[(ty, Attr::Value), (init, Attr::Type)],
            Box::new(move |cx| {
                let expected = cx.get_type(ty, Attr::Value);
                let actual = cx.get_type(init, Attr::Type);
                if !is_assignable_to(&actual, &expected) {
                    let name = cx.interner.lookup(name).to_owned();
                    let message = format!(
                        "incompatible initializer type provided for variable `{}`: expected {} but got {}",
                        name,
                        expected.display(cx.ast, cx.interner),
                        actual.display(cx.ast, cx.interner)
                    );
                    cx.error(
                        Diagnostic::error(ErrorCode::E2004)
                            .with_message(message)
                            .with_label(init_span, "initializer"),
                        &[],
                    );
                }
            }),
        );
    }

    fn field_decl(&mut self, node: NodeId, ty: NodeId) {
        self.reactor.rule(
            &[(ty, Attr::Value)],
            Box::new(move |cx| {
                let declared = cx.get_type(ty, Attr::Value);
                cx.set_type(node, declared);
            }),
        );
    }

    fn param(&mut self, node: NodeId, name: Name, ty: NodeId) {
        self.reactor
            .set(node, Attr::Scope, AttrValue::Scope(self.current_scope()));
        self.scopes.declare(self.current_scope(), name, node);

        self.reactor.rule(
            &[(ty, Attr::Value)],
            Box::new(move |cx| {
                let declared = cx.get_type(ty, Attr::Value);
                cx.set_type(node, declared);
            }),
        );
    }

    fn fun_decl(
        &mut self,
        node: NodeId,
        name: Name,
        params: vex_ir::NodeRange,
        return_type: NodeId,
        body: NodeId,
    ) {
        self.infer_cx = Some(node);
        self.scopes.declare(self.current_scope(), name, node);
        let scope = self.scopes.push(node, self.scope);
        self.scope = Some(scope);
        self.reactor.set(node, Attr::Scope, AttrValue::Scope(scope));

        let param_ids: Vec<NodeId> = self.ast.list(params).to_vec();
        let mut deps: Vec<AttrKey> = vec![(return_type, Attr::Value)];
        deps.extend(param_ids.iter().map(|&p| (p, Attr::Type)));

        // A generic return type must be bound by some parameter.
        let span = self.ast.span(node);
        let check_params = param_ids.clone();
        self.reactor.rule(
            &deps.clone(),
            Box::new(move |cx| {
                let ret = cx.get_type(return_type, Attr::Value);
                if matches!(ret, Type::Generic { .. }) {
                    let declared = check_params
                        .iter()
                        .any(|&p| cx.get_type(p, Attr::Type).same(&ret));
                    if !declared {
                        cx.error(
                            Diagnostic::error(ErrorCode::E2017)
                                .with_message("Generic return Type should be declared in parameters")
                                .with_label(span, "in this function"),
                            &[],
                        );
                    }
                }
            }),
        );

        let sig_params = param_ids;
        self.reactor.rule(
            &deps,
            Box::new(move |cx| {
                let ret = cx.get_type(return_type, Attr::Value);
                let param_types: Vec<Type> = sig_params
                    .iter()
                    .map(|&p| cx.get_type(p, Attr::Type))
                    .collect();
                cx.set_type(node, Type::fun(ret, param_types));
            }),
        );

        self.reactor.rule(
            &[(body, Attr::Returns), (return_type, Attr::Value)],
            Box::new(move |cx| {
                let returns = cx.get_bool(body, Attr::Returns);
                let ret = cx.get_type(return_type, Attr::Value);
                if !returns && !matches!(ret, Type::Void) {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2015)
                            .with_message("Missing return in function.")
                            .with_label(span, "this function does not always return"),
                        &[],
                    );
                }
            }),
        );
    }

    fn struct_decl(&mut self, node: NodeId, name: Name) {
        self.scopes.declare(self.current_scope(), name, node);
        self.reactor.set(node, Attr::Type, AttrValue::Type(Type::Type));
        self.reactor
            .set(node, Attr::Declared, AttrValue::Type(Type::Struct(node)));
    }

    // Other statements

    fn if_stmt(&mut self, node: NodeId, cond: NodeId, then_branch: NodeId, else_branch: NodeId) {
        let cond_span = self.ast.span(cond);
        self.reactor.rule(
            &[(cond, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(cond, Attr::Type);
                if !matches!(ty, Type::Bool) {
                    let message = format!(
                        "If statement with a non-boolean condition of type: {}",
                        ty.display(cx.ast, cx.interner)
                    );
                    cx.error(
                        Diagnostic::error(ErrorCode::E2008)
                            .with_message(message)
                            .with_label(cond_span, "condition"),
                        &[],
                    );
                }
            }),
        );

        let deps = self.returns_deps(&[then_branch, else_branch]);
        let inputs = deps.clone();
        self.reactor.rule(
            &inputs,
            Box::new(move |cx| {
                let returns =
                    deps.len() == 2 && deps.iter().all(|&(id, _)| cx.get_bool(id, Attr::Returns));
                cx.set(node, Attr::Returns, AttrValue::Bool(returns));
            }),
        );
    }

    fn while_stmt(&mut self, cond: NodeId) {
        let cond_span = self.ast.span(cond);
        self.reactor.rule(
            &[(cond, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(cond, Attr::Type);
                if !matches!(ty, Type::Bool) {
                    let message = format!(
                        "While statement with a non-boolean condition of type: {}",
                        ty.display(cx.ast, cx.interner)
                    );
                    cx.error(
                        Diagnostic::error(ErrorCode::E2008)
                            .with_message(message)
                            .with_label(cond_span, "condition"),
                        &[],
                    );
                }
            }),
        );
    }

    fn return_stmt(&mut self, node: NodeId, expr: NodeId) {
        self.reactor.set(node, Attr::Returns, AttrValue::Bool(true));

        let Some(function) = self.current_function() else {
            // Top-level return: no declared type to check against.
            return;
        };
        let NodeKind::FunDecl { return_type, .. } = self.ast.kind(function) else {
            unreachable!("current_function returned a non-function");
        };

        let span = self.ast.span(node);
        if !expr.is_valid() {
            self.reactor.rule(
                &[(return_type, Attr::Value)],
                Box::new(move |cx| {
                    let formal = cx.get_type(return_type, Attr::Value);
                    if !matches!(formal, Type::Void) {
                        cx.error(
                            Diagnostic::error(ErrorCode::E2016)
                                .with_message("Return without value in a function with a return type.")
                                .with_label(span, "bare return"),
                            &[],
                        );
                    }
                }),
            );
            return;
        }

        let expr_span = self.ast.span(expr);
        self.reactor.rule(
            &[(return_type, Attr::Value), (expr, Attr::Type)],
            Box::new(move |cx| {
                let formal = cx.get_type(return_type, Attr::Value);
                let actual = cx.get_type(expr, Attr::Type);
                if matches!(formal, Type::Void) {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2016)
                            .with_message("Return with value in a Void function.")
                            .with_label(span, "this return"),
                        &[],
                    );
                } else if !is_assignable_to(&actual, &formal) {
                    let message = format!(
                        "Incompatible return type, expected {} but got {}",
                        formal.display(cx.ast, cx.interner),
                        actual.display(cx.ast, cx.interner)
                    );
                    cx.error(
                        Diagnostic::error(ErrorCode::E2004)
                            .with_message(message)
                            .with_label(expr_span, "returned value"),
                        &[],
                    );
                }
            }),
        );
    }

    fn case_stmt(
        &mut self,
        node: NodeId,
        subject: NodeId,
        bodies: vex_ir::NodeRange,
        wildcard: NodeId,
    ) {
        self.infer_cx = Some(node);
        let scope = self.scopes.push(node, self.scope);
        self.scope = Some(scope);
        self.reactor.set(node, Attr::Scope, AttrValue::Scope(scope));

        self.scopes.declare(scope, self.names.underscore, wildcard);
        self.reactor
            .set(wildcard, Attr::Type, AttrValue::Type(Type::Symbolic));

        if matches!(self.ast.kind(subject), NodeKind::Ref(name) if name == self.names.underscore) {
            self.reactor.error(
                Diagnostic::error(ErrorCode::E2018)
                    .with_message("Cannot use case on variable named '_'")
                    .with_label(self.ast.span(subject), "subject"),
                &[],
            );
            return;
        }

        let body_ids: Vec<NodeId> = self.ast.list(bodies).to_vec();
        let mut patterns = Vec::with_capacity(body_ids.len());
        for &body in &body_ids {
            if let NodeKind::CaseBody { pattern, .. } = self.ast.kind(body) {
                self.check_consecutive_wildcards(pattern);
                patterns.push(pattern);
            }
        }

        let mut deps: Vec<AttrKey> = vec![(subject, Attr::Type)];
        deps.extend(patterns.iter().map(|&p| (p, Attr::Type)));
        let span = self.ast.span(node);
        self.reactor.rule(
            &deps,
            Box::new(move |cx| {
                let subject_ty = cx.get_type(subject, Attr::Type);
                for &pattern in &patterns {
                    let pattern_ty = cx.get_type(pattern, Attr::Type);
                    if !pattern_ty.same(&subject_ty) {
                        let message = format!(
                            "Cannot compare {} and {}",
                            subject_ty.display(cx.ast, cx.interner),
                            pattern_ty.display(cx.ast, cx.interner)
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2018)
                                .with_message(message)
                                .with_label(span, "in this case statement"),
                            &[],
                        );
                    }
                }
                cx.set_type(node, subject_ty);
            }),
        );
    }

    /// Two consecutive wildcards make matching undefined; reject them.
    fn check_consecutive_wildcards(&mut self, pattern: NodeId) {
        let ast = self.ast;
        match ast.kind(pattern) {
            NodeKind::ArrayLit(els) | NodeKind::MatrixLit(els) => {
                let elements = ast.list(els);
                for pair in elements.windows(2) {
                    let both_wild = pair.iter().all(|&e| {
                        matches!(ast.kind(e), NodeKind::Ref(n) if n == self.names.underscore)
                    });
                    if both_wild {
                        self.reactor.error(
                            Diagnostic::error(ErrorCode::E2020)
                                .with_message("Consecutive wildcards in a pattern")
                                .with_label(ast.span(pair[1]), "second wildcard"),
                            &[],
                        );
                    }
                }
                for &element in elements {
                    self.check_consecutive_wildcards(element);
                }
            }
            NodeKind::StrLit(name) => {
                if self.interner.lookup(name).contains("\u{c}\u{c}") {
                    self.reactor.error(
                        Diagnostic::error(ErrorCode::E2020)
                            .with_message("Consecutive wildcards in a string pattern")
                            .with_label(ast.span(pattern), "this pattern"),
                        &[],
                    );
                }
            }
            _ => {}
        }
    }
}
