//! Expression and type-annotation rules.
//!
//! These encode the typing judgements: arithmetic with array-like lifting,
//! the two comparison families, call checking with vectorization and
//! generic parameters, literal inference (including the context-dependent
//! empty array), and name resolution for type annotations (where an
//! unresolved name inside a function declaration births a generic).

use vex_diagnostic::{Diagnostic, ErrorCode};
use vex_ir::{Ast, BinaryOp, Name, NodeId, NodeKind, NodeRange, Span};
use vex_types::{
    common_supertype, is_array_like_comparable_to, is_assignable_to, is_comparable_to, Type,
};

use crate::reactor::{Attr, AttrKey, AttrValue, RuleCx};

use super::Analyzer;

/// Whether a declaration node declares a type.
fn is_type_decl(ast: &Ast, decl: NodeId) -> bool {
    match ast.kind(decl) {
        NodeKind::StructDecl { .. } => true,
        NodeKind::BuiltinDecl(b) => b.is_type(),
        // A first-use type annotation doubling as a generic declaration.
        NodeKind::SimpleType(_) => true,
        _ => false,
    }
}

impl Analyzer<'_, '_> {
    // References & constructors

    pub(super) fn reference(&mut self, node: NodeId, name: Name) {
        let scope = self.current_scope();
        let span = self.ast.span(node);

        // Try to look up immediately. This must succeed for variables, but
        // not necessarily for functions or types; resolving now lets a
        // later deferred lookup report variables used before declaration.
        if let Some((decl_scope, decl)) = self.scopes.lookup(scope, name) {
            self.reactor.set(node, Attr::Decl, AttrValue::Node(decl));
            self.reactor
                .set(node, Attr::Scope, AttrValue::Scope(decl_scope));
            self.reactor.rule(
                &[(decl, Attr::Type)],
                Box::new(move |cx| {
                    let ty = cx.get_type(decl, Attr::Type);
                    cx.set_type(node, ty);
                }),
            );
            return;
        }

        // Re-lookup after the scopes have been built.
        self.reactor.rule(
            &[],
            Box::new(move |cx| match cx.scopes.lookup(scope, name) {
                None => {
                    let message = format!("Could not resolve: {}", cx.interner.lookup(name));
                    cx.error(
                        Diagnostic::error(ErrorCode::E2001)
                            .with_message(message)
                            .with_label(span, "not found in this scope"),
                        &[(node, Attr::Decl), (node, Attr::Scope), (node, Attr::Type)],
                    );
                }
                Some((decl_scope, decl)) => {
                    cx.set(node, Attr::Scope, AttrValue::Scope(decl_scope));
                    cx.set(node, Attr::Decl, AttrValue::Node(decl));
                    if matches!(cx.ast.kind(decl), NodeKind::VarDecl { .. }) {
                        let message =
                            format!("Variable used before declaration: {}", cx.interner.lookup(name));
                        cx.error(
                            Diagnostic::error(ErrorCode::E2002)
                                .with_message(message)
                                .with_label(span, "used here"),
                            &[(node, Attr::Type)],
                        );
                    } else {
                        cx.rule(
                            &[(decl, Attr::Type)],
                            Box::new(move |cx| {
                                let ty = cx.get_type(decl, Attr::Type);
                                cx.set_type(node, ty);
                            }),
                        );
                    }
                }
            }),
        );
    }

    pub(super) fn constructor(&mut self, node: NodeId, target: NodeId) {
        let span = self.ast.span(node);
        self.reactor.rule(
            &[(target, Attr::Decl)],
            Box::new(move |cx| {
                let decl = cx.get_node(target, Attr::Decl);
                let NodeKind::StructDecl { fields, .. } = cx.ast.kind(decl) else {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2006)
                            .with_message(
                                "Applying the constructor operator ($) to a non-struct reference",
                            )
                            .with_label(span, "not a struct"),
                        &[(node, Attr::Type)],
                    );
                    return;
                };
                let field_ids: Vec<NodeId> = cx.ast.list(fields).to_vec();
                let mut deps: Vec<AttrKey> = vec![(decl, Attr::Declared)];
                deps.extend(field_ids.iter().map(|&f| (f, Attr::Type)));
                cx.rule(
                    &deps,
                    Box::new(move |cx| {
                        let struct_ty = cx.get_type(decl, Attr::Declared);
                        let params: Vec<Type> = field_ids
                            .iter()
                            .map(|&f| cx.get_type(f, Attr::Type))
                            .collect();
                        cx.set_type(node, Type::fun(struct_ty, params));
                    }),
                );
            }),
        );
    }

    // Literals

    pub(super) fn array_literal(&mut self, node: NodeId, els: NodeRange) {
        let ast = self.ast;
        let elements: Vec<NodeId> = ast.list(els).to_vec();

        if elements.is_empty() {
            // An empty array has no intrinsic type; it inherits the
            // expected type from its inference context.
            let Some(context) = self.infer_cx else { return };
            match ast.kind(context) {
                NodeKind::VarDecl { .. } | NodeKind::Case { .. } => {
                    self.reactor.rule(
                        &[(context, Attr::Type)],
                        Box::new(move |cx| {
                            let ty = cx.get_type(context, Attr::Type);
                            cx.set_type(node, ty);
                        }),
                    );
                }
                NodeKind::Call { function, .. } => {
                    self.reactor.rule(
                        &[(function, Attr::Type), (node, Attr::Index)],
                        Box::new(move |cx| {
                            if let Type::Fun { params, .. } = cx.get_type(function, Attr::Type) {
                                let index = cx.get_index(node, Attr::Index);
                                if let Some(param) = params.get(index) {
                                    cx.set_type(node, param.clone());
                                }
                            }
                        }),
                    );
                }
                _ => {}
            }
            return;
        }

        let mut deps: Vec<AttrKey> = Vec::with_capacity(elements.len());
        deps.extend(elements.iter().map(|&e| (e, Attr::Type)));
        let span = ast.span(node);
        self.reactor.rule(
            &deps,
            Box::new(move |cx| {
                let mut supertype: Option<Type> = None;
                for &element in &elements {
                    let ty = cx.get_type(element, Attr::Type);
                    if matches!(ty, Type::Void) {
                        // Report, but still compute a type from the rest.
                        cx.error(
                            Diagnostic::error(ErrorCode::E2019)
                                .with_message("Void-valued expression in array literal")
                                .with_label(cx.ast.span(element), "this element"),
                            &[],
                        );
                        continue;
                    }
                    supertype = match supertype {
                        None => Some(ty),
                        Some(current) => match common_supertype(&current, &ty) {
                            Some(merged) => Some(merged),
                            None => {
                                cx.error(
                                    Diagnostic::error(ErrorCode::E2019)
                                        .with_message(
                                            "Could not find common supertype in array literal.",
                                        )
                                        .with_label(span, "this literal"),
                                    &[(node, Attr::Type)],
                                );
                                return;
                            }
                        },
                    };
                }
                match supertype {
                    Some(component) => cx.set_type(node, Type::array(component)),
                    None => cx.error(
                        Diagnostic::error(ErrorCode::E2019)
                            .with_message(
                                "Could not find common supertype in array literal: all members have Void type.",
                            )
                            .with_label(span, "this literal"),
                        &[(node, Attr::Type)],
                    ),
                }
            }),
        );
    }

    pub(super) fn matrix_literal(&mut self, node: NodeId, rows: NodeRange) {
        let ast = self.ast;
        let row_ids: Vec<NodeId> = ast.list(rows).to_vec();
        let span = ast.span(node);

        if row_ids.is_empty() {
            self.reactor.error(
                Diagnostic::error(ErrorCode::E2019)
                    .with_message("Cannot create empty matrix")
                    .with_label(span, "this literal"),
                &[(node, Attr::Type)],
            );
            return;
        }

        // Row lengths are syntactic; check them before any typing.
        let mut row_len: Option<usize> = None;
        for &row in &row_ids {
            if let NodeKind::ArrayLit(elements) = ast.kind(row) {
                let len = elements.len();
                match row_len {
                    None => row_len = Some(len),
                    Some(expected) if expected != len => {
                        self.reactor.error(
                            Diagnostic::error(ErrorCode::E2010)
                                .with_message("Matrices must have constant line lengths")
                                .with_label(ast.span(row), "this row"),
                            &[],
                        );
                    }
                    Some(_) => {}
                }
            }
        }

        let deps: Vec<AttrKey> = row_ids.iter().map(|&r| (r, Attr::Type)).collect();
        self.reactor.rule(
            &deps,
            Box::new(move |cx| {
                let mut supertype: Option<Type> = None;
                for &row in &row_ids {
                    let ty = cx.get_type(row, Attr::Type);
                    supertype = match supertype {
                        None => Some(ty),
                        Some(current) => match common_supertype(&current, &ty) {
                            Some(merged) => Some(merged),
                            None => {
                                cx.error(
                                    Diagnostic::error(ErrorCode::E2019)
                                        .with_message(
                                            "Could not find common supertype in matrix literal.",
                                        )
                                        .with_label(span, "this literal"),
                                    &[(node, Attr::Type)],
                                );
                                return;
                            }
                        },
                    };
                }
                match supertype.as_ref().and_then(|s| s.component()) {
                    Some(component) => {
                        let component = component.clone();
                        cx.set_type(node, Type::mat(component));
                    }
                    None => cx.error(
                        Diagnostic::error(ErrorCode::E2019)
                            .with_message("Could not find common supertype in matrix literal.")
                            .with_label(span, "this literal"),
                        &[(node, Attr::Type)],
                    ),
                }
            }),
        );
    }

    pub(super) fn matrix_generator(&mut self, node: NodeId, filler: NodeId, shape: NodeRange) {
        let ast = self.ast;
        let dims: Vec<NodeId> = ast.list(shape).to_vec();
        let span = ast.span(node);

        if dims.len() > 2 {
            self.reactor.error(
                Diagnostic::error(ErrorCode::E2012)
                    .with_message(format!(
                        "Too many arguments for matrix generator, expected 1 or 2 but got {}",
                        dims.len()
                    ))
                    .with_label(span, "this generator"),
                &[],
            );
        }

        if dims.len() >= 2 {
            let (rows, cols) = (dims[0], dims[1]);
            self.reactor.rule(
                &[(rows, Attr::Type), (cols, Attr::Type)],
                Box::new(move |cx| {
                    let rows_ty = cx.get_type(rows, Attr::Type);
                    let cols_ty = cx.get_type(cols, Attr::Type);
                    if !matches!(rows_ty, Type::Int) || !matches!(cols_ty, Type::Int) {
                        cx.error(
                            Diagnostic::error(ErrorCode::E2012)
                                .with_message("Invalid shape type")
                                .with_label(span, "shape must be Int"),
                            &[],
                        );
                    }
                }),
            );
        }

        self.reactor.rule(
            &[(filler, Attr::Type)],
            Box::new(move |cx| {
                let filler_ty = cx.get_type(filler, Attr::Type);
                if filler_ty.is_array_like() {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2011)
                            .with_message("Invalid filler type")
                            .with_label(span, "filler must not be array-like"),
                        &[(node, Attr::Type)],
                    );
                } else {
                    cx.set_type(node, Type::mat(filler_ty));
                }
            }),
        );
    }

    pub(super) fn parenthesized(&mut self, node: NodeId, inner: NodeId) {
        self.reactor.rule(
            &[(inner, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(inner, Attr::Type);
                cx.set_type(node, ty);
            }),
        );
    }

    // Accesses

    pub(super) fn field_access(&mut self, node: NodeId, stem: NodeId, field: Name) {
        let span = self.ast.span(node);
        let length = self.names.length;
        let shape = self.names.shape;
        self.reactor.rule(
            &[(stem, Attr::Type)],
            Box::new(move |cx| {
                let stem_ty = cx.get_type(stem, Attr::Type);
                match stem_ty {
                    Type::Array(_) => {
                        if field == length {
                            cx.set_type(node, Type::Int);
                        } else {
                            cx.error(
                                Diagnostic::error(ErrorCode::E2013)
                                    .with_message("Trying to access a non-length field on an array")
                                    .with_label(span, "arrays only have `length`"),
                                &[(node, Attr::Type)],
                            );
                        }
                    }
                    Type::Mat(_) => {
                        if field == shape {
                            cx.set_type(node, Type::array(Type::Int));
                        } else {
                            cx.error(
                                Diagnostic::error(ErrorCode::E2013)
                                    .with_message("Trying to access an unknown field on a matrix")
                                    .with_label(span, "matrices only have `shape`"),
                                &[(node, Attr::Type)],
                            );
                        }
                    }
                    Type::Struct(decl) => {
                        let NodeKind::StructDecl { fields, name } = cx.ast.kind(decl) else {
                            unreachable!("struct type without struct declaration");
                        };
                        for &field_decl in cx.ast.list(fields) {
                            if cx.ast.decl_name(field_decl) == Some(field) {
                                cx.rule(
                                    &[(field_decl, Attr::Type)],
                                    Box::new(move |cx| {
                                        let ty = cx.get_type(field_decl, Attr::Type);
                                        cx.set_type(node, ty);
                                    }),
                                );
                                return;
                            }
                        }
                        let message = format!(
                            "Trying to access missing field {} on struct {}",
                            cx.interner.lookup(field),
                            cx.interner.lookup(name)
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2013)
                                .with_message(message)
                                .with_label(span, "no such field"),
                            &[(node, Attr::Type)],
                        );
                    }
                    other => {
                        let message = format!(
                            "Trying to access a field on an expression of type {}",
                            other.display(cx.ast, cx.interner)
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2013)
                                .with_message(message)
                                .with_label(span, "not a struct, array or matrix"),
                            &[(node, Attr::Type)],
                        );
                    }
                }
            }),
        );
    }

    pub(super) fn index_access(&mut self, node: NodeId, array: NodeId, index: NodeId) {
        let index_span = self.ast.span(index);
        self.reactor.rule(
            &[(index, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(index, Attr::Type);
                if !matches!(ty, Type::Int) {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2009)
                            .with_message("Indexing an array using a non-Int-valued expression")
                            .with_label(index_span, "index"),
                        &[],
                    );
                }
            }),
        );

        let span = self.ast.span(node);
        self.reactor.rule(
            &[(array, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(array, Attr::Type);
                match ty {
                    Type::Array(component) => cx.set_type(node, *component),
                    Type::Mat(component) => cx.set_type(node, Type::Array(component)),
                    other => {
                        let message = format!(
                            "Trying to index a non-array expression of type {}",
                            other.display(cx.ast, cx.interner)
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2007)
                                .with_message(message)
                                .with_label(span, "indexed here"),
                            &[(node, Attr::Type)],
                        );
                    }
                }
            }),
        );
    }

    pub(super) fn slice_access(&mut self, node: NodeId, array: NodeId, start: NodeId, end: NodeId) {
        for (bound, side) in [(start, "start"), (end, "end")] {
            let bound_span = self.ast.span(bound);
            self.reactor.rule(
                &[(bound, Attr::Type)],
                Box::new(move |cx| {
                    let ty = cx.get_type(bound, Attr::Type);
                    if !matches!(ty, Type::Int) {
                        let message = format!(
                            "Slicing an array at {side} using a non-Int-valued expression"
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2009)
                                .with_message(message)
                                .with_label(bound_span, "bound"),
                            &[],
                        );
                    }
                }),
            );
        }

        let span = self.ast.span(node);
        self.reactor.rule(
            &[(array, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(array, Attr::Type);
                match ty {
                    Type::Array(component) => cx.set_type(node, Type::Array(component)),
                    Type::Mat(component) => cx.set_type(node, Type::Mat(component)),
                    other => {
                        let message = format!(
                            "Trying to slice an invalid type: {}",
                            other.display(cx.ast, cx.interner)
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2007)
                                .with_message(message)
                                .with_label(span, "sliced here"),
                            &[(node, Attr::Type)],
                        );
                    }
                }
            }),
        );
    }

    // Calls

    pub(super) fn call(&mut self, node: NodeId, function: NodeId, args: NodeRange) {
        self.infer_cx = Some(node);
        let ast = self.ast;
        let arg_ids: Vec<NodeId> = ast.list(args).to_vec();
        for (i, &arg) in arg_ids.iter().enumerate() {
            self.reactor.set(arg, Attr::Index, AttrValue::Index(i));
        }

        let mut deps: Vec<AttrKey> = vec![(function, Attr::Type)];
        deps.extend(arg_ids.iter().map(|&a| (a, Attr::Type)));
        let fn_span = ast.span(function);
        let span = ast.span(node);
        self.reactor.rule(
            &deps,
            Box::new(move |cx| {
                let fun_ty = cx.get_type(function, Attr::Type);
                let Type::Fun { ret, params } = fun_ty else {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2006)
                            .with_message("trying to call a non-function expression")
                            .with_label(fn_span, "not callable"),
                        &[(node, Attr::Type)],
                    );
                    return;
                };

                if params.len() != arg_ids.len() {
                    let message = format!(
                        "wrong number of arguments, expected {} but got {}",
                        params.len(),
                        arg_ids.len()
                    );
                    cx.error(
                        Diagnostic::error(ErrorCode::E2005)
                            .with_message(message)
                            .with_label(span, "in this call"),
                        &[],
                    );
                }

                let checked = params.len().min(arg_ids.len());
                let mut vectorized = false;
                for i in 0..checked {
                    let arg_ty = cx.get_type(arg_ids[i], Attr::Type);
                    let mut param_ty = params[i].clone();
                    if matches!(param_ty, Type::Generic { .. }) {
                        param_ty = arg_ty.clone();
                    }
                    // A scalar parameter receiving an array-like argument
                    // whose component fits is a vectorized call.
                    let arg_vectorizes = arg_ty.is_array_like()
                        && !param_ty.is_array_like()
                        && arg_ty
                            .component()
                            .is_some_and(|c| is_assignable_to(c, &param_ty));
                    if arg_vectorizes {
                        vectorized = true;
                    }
                    if !is_assignable_to(&arg_ty, &param_ty) && !arg_vectorizes {
                        let message = format!(
                            "incompatible argument provided for argument {}: expected {} but got {}",
                            i,
                            param_ty.display(cx.ast, cx.interner),
                            arg_ty.display(cx.ast, cx.interner)
                        );
                        cx.error(
                            Diagnostic::error(ErrorCode::E2004)
                                .with_message(message)
                                .with_label(cx.ast.span(arg_ids[i]), "this argument"),
                            &[],
                        );
                    }
                }

                let ret = *ret;
                if vectorized {
                    cx.set_type(node, Type::mat(ret));
                } else {
                    cx.set_type(node, ret);
                }
            }),
        );
    }

    // Unary & binary operators

    pub(super) fn unary(&mut self, node: NodeId, operand: NodeId) {
        self.reactor.set(node, Attr::Type, AttrValue::Type(Type::Bool));
        let span = self.ast.span(node);
        self.reactor.rule(
            &[(operand, Attr::Type)],
            Box::new(move |cx| {
                let ty = cx.get_type(operand, Attr::Type);
                if !matches!(ty, Type::Bool) {
                    let message =
                        format!("Trying to negate type: {}", ty.display(cx.ast, cx.interner));
                    cx.error(
                        Diagnostic::error(ErrorCode::E2007)
                            .with_message(message)
                            .with_label(span, "negation"),
                        &[],
                    );
                }
            }),
        );
    }

    pub(super) fn binary(&mut self, node: NodeId, op: BinaryOp, left: NodeId, right: NodeId) {
        let span = self.ast.span(node);
        let left_span = self.ast.span(left);
        let right_span = self.ast.span(right);
        self.reactor.rule(
            &[(left, Attr::Type), (right, Attr::Type)],
            Box::new(move |cx| {
                let l = cx.get_type(left, Attr::Type);
                let r = cx.get_type(right, Attr::Type);

                // Generic operands resolve at call time; statically the
                // expression is only typed when both sides agree.
                let has_generic = matches!(l, Type::Generic { .. } | Type::Unknown)
                    || matches!(r, Type::Generic { .. } | Type::Unknown);
                if has_generic {
                    if l.same(&r) {
                        cx.set_type(node, l);
                    } else {
                        cx.set_type(node, Type::Unknown);
                    }
                    return;
                }

                if op == BinaryOp::Add
                    && (matches!(l, Type::String) || matches!(r, Type::String))
                {
                    cx.set_type(node, Type::String);
                    return;
                }

                if op.is_arithmetic() {
                    binary_arithmetic(cx, node, op, &l, &r, span);
                } else if op.is_comparison() {
                    binary_comparison(cx, node, &l, &r, left_span, right_span);
                } else if op.is_array_like_comparison() {
                    array_like_comparison(cx, node, &l, &r, left_span, right_span);
                } else if op.is_logic() {
                    binary_logic(cx, node, &l, &r, left_span, right_span);
                } else if op.is_equality() {
                    binary_equality(cx, node, &l, &r, span);
                } else if op.is_array_like_equality() {
                    binary_array_like_equality(cx, node, &l, &r, span);
                }
            }),
        );
    }

    pub(super) fn assignment(&mut self, node: NodeId, target: NodeId, value: NodeId) {
        let span = self.ast.span(node);
        let target_span = self.ast.span(target);
        self.reactor.rule(
            &[(target, Attr::Type), (value, Attr::Type)],
            Box::new(move |cx| {
                let target_ty = cx.get_type(target, Attr::Type);
                let value_ty = cx.get_type(value, Attr::Type);

                // The type of the assignment is the left-side type.
                cx.set_type(node, target_ty.clone());

                let is_lvalue = matches!(
                    cx.ast.kind(target),
                    NodeKind::Ref(_)
                        | NodeKind::FieldAccess { .. }
                        | NodeKind::IndexAccess { .. }
                        | NodeKind::SliceAccess { .. }
                );
                if is_lvalue {
                    if !is_assignable_to(&value_ty, &target_ty) {
                        cx.error(
                            Diagnostic::error(ErrorCode::E2004)
                                .with_message("Trying to assign a value to a non-compatible lvalue.")
                                .with_label(span, "in this assignment"),
                            &[],
                        );
                    }
                } else {
                    cx.error(
                        Diagnostic::error(ErrorCode::E2014)
                            .with_message("Trying to assign to a non-lvalue expression.")
                            .with_label(target_span, "not assignable"),
                        &[],
                    );
                }
            }),
        );
    }

    // Type annotations

    pub(super) fn simple_type(&mut self, node: NodeId, name: Name) {
        let scope = self.current_scope();
        let context = self.infer_cx;
        let span = self.ast.span(node);

        // Type declarations may occur after use, so resolution is deferred
        // until the walk is complete.
        self.reactor.rule(
            &[],
            Box::new(move |cx| {
                match cx.scopes.lookup(scope, name) {
                    None => {
                        let in_fun_decl = context
                            .is_some_and(|c| matches!(cx.ast.kind(c), NodeKind::FunDecl { .. }));
                        if let Some(owner) = context.filter(|_| in_fun_decl) {
                            // An unresolved type name inside a function
                            // declaration is a fresh generic; this first
                            // use doubles as its declaration.
                            let generic = Type::Generic { name, owner };
                            cx.set(node, Attr::Value, AttrValue::Type(generic.clone()));
                            cx.set(node, Attr::Declared, AttrValue::Type(generic));
                            cx.set(node, Attr::Type, AttrValue::Type(Type::Type));
                            cx.scopes.declare(scope, name, node);
                        } else {
                            let message =
                                format!("could not resolve: {}", cx.interner.lookup(name));
                            cx.error(
                                Diagnostic::error(ErrorCode::E2001)
                                    .with_message(message)
                                    .with_label(span, "unknown type"),
                                &[(node, Attr::Value)],
                            );
                        }
                    }
                    Some((_, decl)) => {
                        if !is_type_decl(cx.ast, decl) {
                            let message = format!(
                                "{} did not resolve to a type declaration but to a {} declaration",
                                cx.interner.lookup(name),
                                cx.ast.declared_thing(decl)
                            );
                            cx.error(
                                Diagnostic::error(ErrorCode::E2003)
                                    .with_message(message)
                                    .with_label(span, "not a type"),
                                &[(node, Attr::Value)],
                            );
                        } else {
                            cx.rule(
                                &[(decl, Attr::Declared)],
                                Box::new(move |cx| {
                                    let declared = cx.get_type(decl, Attr::Declared);
                                    cx.set(node, Attr::Value, AttrValue::Type(declared));
                                }),
                            );
                        }
                    }
                }
            }),
        );
    }

    pub(super) fn array_type(&mut self, node: NodeId, component: NodeId) {
        self.reactor.rule(
            &[(component, Attr::Value)],
            Box::new(move |cx| {
                let inner = cx.get_type(component, Attr::Value);
                cx.set(node, Attr::Value, AttrValue::Type(Type::array(inner)));
            }),
        );
    }

    pub(super) fn mat_type(&mut self, node: NodeId, component: NodeId) {
        let span = self.ast.span(node);
        self.reactor.rule(
            &[(component, Attr::Value)],
            Box::new(move |cx| {
                let inner = cx.get_type(component, Attr::Value);
                if inner.is_array_like() {
                    let message = format!(
                        "Cannot declare a matrix of type {}",
                        inner.display(cx.ast, cx.interner)
                    );
                    cx.error(
                        Diagnostic::error(ErrorCode::E2011)
                            .with_message(message)
                            .with_label(span, "matrix component"),
                        &[(node, Attr::Value)],
                    );
                    return;
                }
                cx.set(node, Attr::Value, AttrValue::Type(Type::mat(inner)));
            }),
        );
    }
}

// Binary operator judgements

fn numeric_join(a: &Type, b: &Type) -> Option<Type> {
    match (a, b) {
        (Type::Int, Type::Int) => Some(Type::Int),
        (Type::Int | Type::Float, Type::Int | Type::Float) => Some(Type::Float),
        _ => None,
    }
}

fn arithmetic_verb(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "subtract",
        BinaryOp::Mul => "multiply",
        BinaryOp::Div => "divide",
        BinaryOp::Rem => "remainder",
        BinaryOp::MatMul => "dot-multiply",
        _ => "combine",
    }
}

/// Arithmetic result type: numeric join lifted over array-like shapes,
/// with `Mat` dominating `Array` except in the array-array case.
fn binary_arithmetic(
    cx: &mut RuleCx<'_, '_>,
    node: NodeId,
    op: BinaryOp,
    l: &Type,
    r: &Type,
    span: Span,
) {
    let result = match (l, r) {
        (Type::Array(lc), Type::Array(rc)) => numeric_join(lc, rc).map(Type::array),
        (Type::Array(lc), Type::Mat(rc)) | (Type::Mat(lc), Type::Array(rc)) => {
            numeric_join(lc, rc).map(Type::mat)
        }
        (Type::Mat(lc), Type::Mat(rc)) => numeric_join(lc, rc).map(Type::mat),
        (Type::Array(lc), scalar) | (scalar, Type::Array(lc)) if !scalar.is_array_like() => {
            numeric_join(lc, scalar).map(Type::array)
        }
        (Type::Mat(lc), scalar) | (scalar, Type::Mat(lc)) if !scalar.is_array_like() => {
            numeric_join(lc, scalar).map(Type::mat)
        }
        (a, b) => numeric_join(a, b),
    };
    match result {
        Some(ty) => cx.set_type(node, ty),
        None => {
            let message = format!(
                "Trying to {} {} with {}",
                arithmetic_verb(op),
                l.display(cx.ast, cx.interner),
                r.display(cx.ast, cx.interner)
            );
            cx.error(
                Diagnostic::error(ErrorCode::E2007)
                    .with_message(message)
                    .with_label(span, "invalid operands"),
                &[(node, Attr::Type)],
            );
        }
    }
}

fn binary_comparison(
    cx: &mut RuleCx<'_, '_>,
    node: NodeId,
    l: &Type,
    r: &Type,
    left_span: Span,
    right_span: Span,
) {
    cx.set_type(node, Type::Bool);
    for (ty, span) in [(l, left_span), (r, right_span)] {
        if !ty.is_numeric() {
            let message = format!(
                "Attempting to perform arithmetic comparison on non-numeric type: {}",
                ty.display(cx.ast, cx.interner)
            );
            cx.error(
                Diagnostic::error(ErrorCode::E2007)
                    .with_message(message)
                    .with_label(span, "this operand"),
                &[],
            );
        }
    }
}

fn array_like_comparison(
    cx: &mut RuleCx<'_, '_>,
    node: NodeId,
    l: &Type,
    r: &Type,
    left_span: Span,
    right_span: Span,
) {
    cx.set_type(node, Type::Bool);
    for (ty, span) in [(l, left_span), (r, right_span)] {
        let numeric_component = ty
            .component()
            .is_some_and(|c| matches!(c, Type::Int | Type::Float));
        if !ty.is_array_like() || !numeric_component {
            let message = format!(
                "Attempting to perform arithmetic comparison on non-arraylike type: {}",
                ty.display(cx.ast, cx.interner)
            );
            cx.error(
                Diagnostic::error(ErrorCode::E2007)
                    .with_message(message)
                    .with_label(span, "this operand"),
                &[],
            );
        }
    }
}

fn binary_logic(
    cx: &mut RuleCx<'_, '_>,
    node: NodeId,
    l: &Type,
    r: &Type,
    left_span: Span,
    right_span: Span,
) {
    cx.set_type(node, Type::Bool);
    for (ty, span) in [(l, left_span), (r, right_span)] {
        if !matches!(ty, Type::Bool) {
            let message = format!(
                "Attempting to perform binary logic on non-boolean type: {}",
                ty.display(cx.ast, cx.interner)
            );
            cx.error(
                Diagnostic::error(ErrorCode::E2007)
                    .with_message(message)
                    .with_label(span, "this operand"),
                &[],
            );
        }
    }
}

fn binary_equality(cx: &mut RuleCx<'_, '_>, node: NodeId, l: &Type, r: &Type, span: Span) {
    cx.set_type(node, Type::Bool);
    if !is_comparable_to(l, r) {
        let message = format!(
            "Trying to compare incomparable types {} and {}",
            l.display(cx.ast, cx.interner),
            r.display(cx.ast, cx.interner)
        );
        cx.error(
            Diagnostic::error(ErrorCode::E2007)
                .with_message(message)
                .with_label(span, "this comparison"),
            &[],
        );
    }
}

fn binary_array_like_equality(
    cx: &mut RuleCx<'_, '_>,
    node: NodeId,
    l: &Type,
    r: &Type,
    span: Span,
) {
    cx.set_type(node, Type::Bool);
    if !is_array_like_comparable_to(l, r) {
        let message = format!(
            "Trying to compare incomparable types {} and {}",
            l.display(cx.ast, cx.interner),
            r.display(cx.ast, cx.interner)
        );
        cx.error(
            Diagnostic::error(ErrorCode::E2007)
                .with_message(message)
                .with_label(span, "this comparison"),
            &[],
        );
    }
}
