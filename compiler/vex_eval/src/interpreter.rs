//! Tree-walking interpreter.
//!
//! Evaluation consults the converged attribute set for types, resolved
//! declarations and scopes; a clean analysis is a precondition, and the
//! missing-attribute panics below are compiler bugs, not user errors.
//!
//! Control flow: `return` and runtime faults both travel as `Err(Unwind)`.
//! Every frame-pushing construct records the storage depth on entry and
//! truncates back on every exit path, so unwinding cannot leak frames.

use rustc_hash::FxHashMap;
use tracing::trace;
use vex_ir::{Ast, BinaryOp, Builtin, Name, NodeId, NodeKind, StringInterner};
use vex_sema::{Analysis, ScopeId};
use vex_types::Type;

use crate::display::render;
use crate::errors::{
    generic_conflict, index_out_of_bounds, invalid_operator, invalid_slice, negative_index,
    non_positive_shape, null_access, slice_end_out_of_bounds, slice_length_mismatch,
    vectorized_shape_mismatch, EvalError, EvalResult, Unwind,
};
use crate::matrix::{broadcast, elementwise_arith, elementwise_predicate, shape_of, to_rows};
use crate::pattern::match_value;
use crate::print_handler::PrintHandler;
use crate::storage::ScopeStorage;
use crate::value::{identity_eq, structural_eq, Shared, StructValue, Value};

/// Names the interpreter compares against directly.
struct WellKnown {
    underscore: Option<Name>,
    length: Option<Name>,
    shape: Option<Name>,
}

/// How one argument of a vectorized call is bound per cell.
enum ArgPlan {
    /// Vectorized: the cell at `[i][j]` is bound.
    PerCell(Vec<Vec<Value>>),
    /// Passed through whole (scalars and non-vectorized arguments).
    Whole(Value),
}

/// The tree-walking evaluator.
pub struct Interpreter<'a> {
    ast: &'a Ast,
    analysis: &'a Analysis,
    interner: &'a StringInterner,
    storage: ScopeStorage,
    /// Generic resolutions, keyed by owning function then name. Reset at
    /// each entry to the owning function; deliberately left in place
    /// after the call returns.
    generics: FxHashMap<NodeId, FxHashMap<Name, Type>>,
    print: PrintHandler,
    known: WellKnown,
}

impl<'a> Interpreter<'a> {
    pub fn new(ast: &'a Ast, analysis: &'a Analysis, interner: &'a StringInterner) -> Self {
        Self::with_print_handler(ast, analysis, interner, PrintHandler::stdout())
    }

    pub fn with_print_handler(
        ast: &'a Ast,
        analysis: &'a Analysis,
        interner: &'a StringInterner,
        print: PrintHandler,
    ) -> Self {
        Interpreter {
            ast,
            analysis,
            interner,
            storage: ScopeStorage::new(),
            generics: FxHashMap::default(),
            print,
            known: WellKnown {
                underscore: interner.get("_"),
                length: interner.get("length"),
                shape: interner.get("shape"),
            },
        }
    }

    /// Run the program. Returns the value of a top-level `return`, or
    /// `Null` when the script runs off the end.
    pub fn interpret(&mut self, root: NodeId) -> Result<Value, EvalError> {
        let NodeKind::Root(stmts) = self.ast.kind(root) else {
            panic!("interpret called on a non-root node");
        };
        let scope = self.scope_of(root);
        self.storage.push(scope);

        let mut outcome = Ok(Value::Null);
        for &stmt in self.ast.list(stmts) {
            if let Err(unwind) = self.eval(stmt) {
                outcome = match unwind {
                    Unwind::Return(value) => Ok(value),
                    Unwind::Fault(error) => Err(error),
                };
                break;
            }
        }
        self.storage.truncate(0);
        outcome
    }

    // Attribute access (clean analysis is a precondition)

    fn type_of(&self, node: NodeId) -> &Type {
        self.analysis
            .attrs
            .ty(node)
            .unwrap_or_else(|| panic!("missing type attribute on {node:?}"))
    }

    fn denoted(&self, node: NodeId) -> &Type {
        self.analysis
            .attrs
            .value(node)
            .unwrap_or_else(|| panic!("missing value attribute on {node:?}"))
    }

    fn scope_of(&self, node: NodeId) -> ScopeId {
        self.analysis
            .attrs
            .scope(node)
            .unwrap_or_else(|| panic!("missing scope attribute on {node:?}"))
    }

    fn decl_of(&self, node: NodeId) -> NodeId {
        self.analysis
            .attrs
            .decl(node)
            .unwrap_or_else(|| panic!("missing decl attribute on {node:?}"))
    }

    /// Unwrap a generic through the current bindings of its owner.
    fn resolve_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Generic { name, owner } => self
                .generics
                .get(owner)
                .and_then(|table| table.get(name))
                .cloned()
                .unwrap_or(Type::Unknown),
            other => other.clone(),
        }
    }

    fn render(&self, value: &Value) -> String {
        render(value, self.ast, self.interner)
    }

    // Evaluation

    fn eval(&mut self, node: NodeId) -> EvalResult {
        self.eval_inner(node)
            .map_err(|unwind| unwind.with_span(self.ast.span(node)))
    }

    fn eval_inner(&mut self, node: NodeId) -> EvalResult {
        match self.ast.kind(node) {
            NodeKind::IntLit(v) => Ok(Value::Int(v)),
            NodeKind::FloatLit(bits) => Ok(Value::Float(f64::from_bits(bits))),
            NodeKind::StrLit(name) => Ok(Value::string(self.interner.lookup(name))),
            NodeKind::Ref(name) => self.eval_reference(node, name),
            NodeKind::ArrayLit(els) => {
                let ids = self.ast.list(els).to_vec();
                let mut values = Vec::with_capacity(ids.len());
                for id in ids {
                    values.push(self.eval(id)?);
                }
                Ok(Value::array(values))
            }
            NodeKind::MatrixLit(rows) => {
                let ids = self.ast.list(rows).to_vec();
                let mut values = Vec::with_capacity(ids.len());
                for id in ids {
                    values.push(self.eval(id)?);
                }
                Ok(Value::array(values))
            }
            NodeKind::MatrixGen { filler, shape } => self.eval_matrix_gen(filler, shape),
            NodeKind::Paren(inner) => self.eval(inner),
            NodeKind::FieldAccess { stem, field } => self.eval_field_access(stem, field),
            NodeKind::IndexAccess { array, index } => self.eval_index_access(array, index),
            NodeKind::SliceAccess { array, start, end } => self.eval_slice(array, start, end),
            NodeKind::Unary { operand, .. } => {
                let value = self.eval(operand)?;
                Ok(Value::Bool(!self.as_bool(value)?))
            }
            NodeKind::Binary { op, left, right } => self.eval_binary(op, left, right),
            NodeKind::Constructor { target } => match self.eval(target)? {
                Value::TypeRef(decl) if matches!(self.ast.kind(decl), NodeKind::StructDecl { .. }) => {
                    Ok(Value::Constructor(decl))
                }
                other => Err(invalid_operator("$", other.type_name()).into()),
            },
            NodeKind::Call { function, args } => self.eval_call(function, args),
            NodeKind::Assign { target, value } => self.eval_assign(node, target, value),

            NodeKind::VarDecl { name, init, .. } => {
                let value = self.eval(init)?;
                let target_ty = self.type_of(node).clone();
                let scope = self.scope_of(node);
                self.assign(scope, name, value, &target_ty);
                Ok(Value::Null)
            }
            NodeKind::Block(stmts) => self.eval_block(node, stmts),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval(cond)?;
                if self.as_bool(cond)? {
                    self.eval(then_branch)?;
                } else if else_branch.is_valid() {
                    self.eval(else_branch)?;
                }
                Ok(Value::Null)
            }
            NodeKind::While { cond, body } => {
                loop {
                    let value = self.eval(cond)?;
                    if !self.as_bool(value)? {
                        break;
                    }
                    self.eval(body)?;
                }
                Ok(Value::Null)
            }
            NodeKind::Return { expr } => {
                let value = if expr.is_valid() {
                    self.eval(expr)?
                } else {
                    Value::Null
                };
                Err(Unwind::Return(value))
            }
            NodeKind::ExprStmt(expr) => {
                self.eval(expr)?;
                Ok(Value::Null)
            }
            NodeKind::Case {
                subject,
                bodies,
                default,
                ..
            } => self.eval_case(node, subject, bodies, default),

            // Declarations and type annotations are no-ops at runtime.
            NodeKind::FunDecl { .. }
            | NodeKind::StructDecl { .. }
            | NodeKind::FieldDecl { .. }
            | NodeKind::Param { .. }
            | NodeKind::WildcardDecl
            | NodeKind::BuiltinDecl(_)
            | NodeKind::SimpleType(_)
            | NodeKind::ArrayType { .. }
            | NodeKind::MatType { .. }
            | NodeKind::CaseBody { .. }
            | NodeKind::Root(_) => Ok(Value::Null),
        }
    }

    fn eval_reference(&mut self, node: NodeId, name: Name) -> EvalResult {
        let decl = self.decl_of(node);
        match self.ast.kind(decl) {
            NodeKind::VarDecl { .. } | NodeKind::Param { .. } | NodeKind::WildcardDecl => {
                let scope = self.scope_of(node);
                match self.storage.get(scope, name) {
                    Some(value) => Ok(value),
                    None => panic!("unbound slot for {:?}", self.interner.lookup(name)),
                }
            }
            NodeKind::FunDecl { .. } => Ok(Value::Function(decl)),
            NodeKind::StructDecl { .. } => Ok(Value::TypeRef(decl)),
            NodeKind::BuiltinDecl(b) => Ok(match b {
                Builtin::True => Value::Bool(true),
                Builtin::False => Value::Bool(false),
                Builtin::Null => Value::Null,
                Builtin::Print => Value::Function(decl),
                _ => Value::TypeRef(decl),
            }),
            // A reference to a synthetic generic type declaration.
            NodeKind::SimpleType(_) => Ok(Value::TypeRef(decl)),
            other => panic!("reference resolved to a non-declaration: {other:?}"),
        }
    }

    fn eval_block(&mut self, node: NodeId, stmts: vex_ir::NodeRange) -> EvalResult {
        let scope = self.scope_of(node);
        let depth = self.storage.depth();
        self.storage.push(scope);
        let mut result = Ok(Value::Null);
        for &stmt in self.ast.list(stmts) {
            if let Err(unwind) = self.eval(stmt) {
                result = Err(unwind);
                break;
            }
        }
        self.storage.truncate(depth);
        result
    }

    fn eval_matrix_gen(&mut self, filler: NodeId, shape: vex_ir::NodeRange) -> EvalResult {
        let dims = self.ast.list(shape).to_vec();
        let rows = self.int_value(dims[0])?;
        let cols = self.int_value(dims[1])?;
        if rows <= 0 || cols <= 0 {
            return Err(non_positive_shape(rows, cols).into());
        }
        let mut out = Vec::with_capacity(rows as usize);
        for _ in 0..rows {
            let mut row = Vec::with_capacity(cols as usize);
            for _ in 0..cols {
                // The filler is re-evaluated per cell.
                row.push(self.eval(filler)?);
            }
            out.push(Value::array(row));
        }
        Ok(Value::array(out))
    }

    fn eval_field_access(&mut self, stem: NodeId, field: Name) -> EvalResult {
        let stem = self.eval(stem)?;
        match stem {
            Value::Null => Err(null_access("accessing a field").into()),
            Value::Struct(sv) => {
                let NodeKind::StructDecl { fields, .. } = self.ast.kind(sv.decl) else {
                    panic!("struct value without struct declaration");
                };
                let index = self
                    .ast
                    .list(fields)
                    .iter()
                    .position(|&f| self.ast.decl_name(f) == Some(field))
                    .unwrap_or_else(|| panic!("missing field slot after clean analysis"));
                let slots = sv.fields.borrow();
                Ok(slots[index].clone())
            }
            Value::Array(cells) => {
                let cells = cells.borrow();
                if Some(field) == self.known.length {
                    Ok(Value::Int(cells.len() as i64))
                } else if Some(field) == self.known.shape {
                    let (rows, cols) = shape_of(&cells);
                    Ok(Value::array(vec![
                        Value::Int(rows as i64),
                        Value::Int(cols as i64),
                    ]))
                } else {
                    Err(invalid_operator("field access", "array").into())
                }
            }
            other => Err(invalid_operator("field access", other.type_name()).into()),
        }
    }

    fn eval_index_access(&mut self, array: NodeId, index: NodeId) -> EvalResult {
        let array = self.non_null_array(array, "indexing null array")?;
        let raw = self.int_value(index)?;
        if raw < 0 {
            return Err(negative_index(raw).into());
        }
        let cells = array.borrow();
        cells
            .get(raw as usize)
            .cloned()
            .ok_or_else(|| index_out_of_bounds(raw, cells.len()).into())
    }

    /// `a[s:e]`: bounds evaluate before the array; `e = -1` means "to
    /// length". Matrix slices copy their rows.
    fn eval_slice(&mut self, array: NodeId, start: NodeId, end: NodeId) -> EvalResult {
        let start = self.start_index(start)?;
        let end = self.end_index(end)?;
        if let Some(end) = end {
            if start > end {
                return Err(invalid_slice(start as i64, end as i64).into());
            }
        }

        let array = self.non_null_array(array, "slicing null array")?;
        let cells = array.borrow();
        let len = cells.len();
        if let Some(end) = end {
            if end > len {
                return Err(slice_end_out_of_bounds(end, len).into());
            }
        }
        let end = end.unwrap_or(len);
        if start > len {
            return Err(index_out_of_bounds(start as i64, len).into());
        }

        let out = cells[start..end]
            .iter()
            .map(|cell| match cell {
                // Rows are copied; their cells are shared.
                Value::Array(row) => Value::array(row.borrow().clone()),
                other => other.clone(),
            })
            .collect();
        Ok(Value::array(out))
    }

    // Calls

    fn eval_call(&mut self, function: NodeId, args: vex_ir::NodeRange) -> EvalResult {
        let callee = self.eval(function)?;
        let arg_ids = self.ast.list(args).to_vec();
        let mut arg_values = Vec::with_capacity(arg_ids.len());
        for &arg in &arg_ids {
            arg_values.push(self.eval(arg)?);
        }

        match callee {
            Value::Null => Err(null_access("calling a function").into()),
            Value::Constructor(decl) => Ok(Value::Struct(StructValue {
                decl,
                fields: Shared::new(arg_values),
            })),
            Value::Function(decl) => match self.ast.kind(decl) {
                NodeKind::BuiltinDecl(Builtin::Print) => {
                    let arg = arg_values.into_iter().next().unwrap_or(Value::Null);
                    let out = self.render(&arg);
                    self.print.println(&out);
                    Ok(Value::string(out))
                }
                NodeKind::FunDecl { .. } => self.user_call(decl, &arg_ids, arg_values),
                other => panic!("function value over a non-function declaration: {other:?}"),
            },
            other => Err(invalid_operator("call", other.type_name()).into()),
        }
    }

    fn user_call(&mut self, decl: NodeId, arg_ids: &[NodeId], args: Vec<Value>) -> EvalResult {
        let NodeKind::FunDecl { params, .. } = self.ast.kind(decl) else {
            panic!("user_call on a non-function");
        };
        let param_ids = self.ast.list(params).to_vec();
        trace!(args = args.len(), "function call");

        // Static argument types, resolved through the caller's bindings.
        let arg_types: Vec<Type> = arg_ids
            .iter()
            .map(|&a| self.resolve_type(self.type_of(a)))
            .collect();
        let param_types: Vec<Type> = param_ids
            .iter()
            .map(|&p| {
                let NodeKind::Param { ty, .. } = self.ast.kind(p) else {
                    panic!("non-parameter in parameter list");
                };
                self.denoted(ty).clone()
            })
            .collect();

        self.bind_generics(decl, &param_types, &arg_types)?;

        // The call vectorizes when an argument is array-like while its
        // parameter's declared type is neither array-like nor generic.
        // The target shape comes from the first vectorized argument.
        let mut target_shape = None;
        for (value, param_ty) in args.iter().zip(&param_types) {
            if is_vectorized(value, param_ty) {
                if let Value::Array(cells) = value {
                    target_shape = Some(shape_of(&cells.borrow()));
                    break;
                }
            }
        }

        match target_shape {
            None => self.plain_call(decl, &param_ids, args),
            Some(shape) => self.vectorized_call(decl, &param_ids, &param_types, args, shape),
        }
    }

    fn bind_generics(
        &mut self,
        decl: NodeId,
        param_types: &[Type],
        arg_types: &[Type],
    ) -> EvalResult<()> {
        // Reset at every entry so bindings never bleed across calls.
        self.generics.insert(decl, FxHashMap::default());
        for (param_ty, arg_ty) in param_types.iter().zip(arg_types) {
            if let Type::Generic { name, owner } = param_ty {
                let table = self.generics.entry(*owner).or_default();
                match table.get(name).cloned() {
                    None => {
                        table.insert(*name, arg_ty.clone());
                    }
                    Some(bound) if !bound.same(arg_ty) => {
                        let fault = generic_conflict(
                            self.interner.lookup(*name),
                            &bound.display(self.ast, self.interner).to_string(),
                            &arg_ty.display(self.ast, self.interner).to_string(),
                        );
                        return Err(fault.into());
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    fn plain_call(&mut self, decl: NodeId, param_ids: &[NodeId], args: Vec<Value>) -> EvalResult {
        let scope = self.scope_of(decl);
        let depth = self.storage.depth();
        self.storage.push(scope);
        for (&param, value) in param_ids.iter().zip(args) {
            let name = self.ast.decl_name(param).expect("parameter without a name");
            self.storage.set(scope, name, value);
        }
        let NodeKind::FunDecl { body, .. } = self.ast.kind(decl) else {
            unreachable!();
        };
        let result = self.eval(body);
        self.storage.truncate(depth);
        match result {
            Ok(_) => Ok(Value::Null),
            Err(Unwind::Return(value)) => Ok(value),
            Err(fault) => Err(fault),
        }
    }

    fn vectorized_call(
        &mut self,
        decl: NodeId,
        param_ids: &[NodeId],
        param_types: &[Type],
        args: Vec<Value>,
        shape: (usize, usize),
    ) -> EvalResult {
        let mut plans = Vec::with_capacity(args.len());
        for (value, param_ty) in args.into_iter().zip(param_types) {
            if is_vectorized(&value, param_ty) {
                let Value::Array(cells) = &value else {
                    unreachable!("vectorized argument is always an array");
                };
                let cells = cells.borrow();
                let arg_shape = shape_of(&cells);
                if arg_shape != shape {
                    return Err(vectorized_shape_mismatch(arg_shape, shape).into());
                }
                plans.push(ArgPlan::PerCell(to_rows(&cells)));
            } else {
                plans.push(ArgPlan::Whole(value));
            }
        }

        let scope = self.scope_of(decl);
        let NodeKind::FunDecl { body, .. } = self.ast.kind(decl) else {
            unreachable!();
        };

        let mut out = Vec::with_capacity(shape.0);
        for i in 0..shape.0 {
            let mut row = Vec::with_capacity(shape.1);
            for j in 0..shape.1 {
                let depth = self.storage.depth();
                self.storage.push(scope);
                for (&param, plan) in param_ids.iter().zip(&plans) {
                    let name = self.ast.decl_name(param).expect("parameter without a name");
                    let value = match plan {
                        ArgPlan::PerCell(rows) => rows[i][j].clone(),
                        ArgPlan::Whole(value) => value.clone(),
                    };
                    self.storage.set(scope, name, value);
                }
                let result = self.eval(body);
                self.storage.truncate(depth);
                let cell = match result {
                    Ok(_) => Value::Null,
                    Err(Unwind::Return(value)) => value,
                    Err(fault) => return Err(fault),
                };
                row.push(cell);
            }
            out.push(Value::array(row));
        }
        Ok(Value::array(out))
    }

    // Assignment

    fn eval_assign(&mut self, node: NodeId, target: NodeId, value: NodeId) -> EvalResult {
        match self.ast.kind(target) {
            NodeKind::Ref(name) => {
                let scope = self.scope_of(target);
                let rvalue = self.eval(value)?;
                let target_ty = self.type_of(node).clone();
                self.assign(scope, name, rvalue.clone(), &target_ty);
                Ok(rvalue)
            }
            NodeKind::IndexAccess { array, index } => {
                let array = self.non_null_array(array, "indexing null array")?;
                let raw = self.int_value(index)?;
                if raw < 0 {
                    return Err(negative_index(raw).into());
                }
                let rvalue = self.eval(value)?;
                let mut cells = array.borrow_mut();
                let len = cells.len();
                match cells.get_mut(raw as usize) {
                    Some(slot) => {
                        *slot = rvalue.clone();
                        Ok(rvalue)
                    }
                    None => Err(index_out_of_bounds(raw, len).into()),
                }
            }
            NodeKind::SliceAccess { array, start, end } => {
                let start = self.start_index(start)?;
                let end = self.end_index(end)?;
                if let Some(end) = end {
                    if start > end {
                        return Err(invalid_slice(start as i64, end as i64).into());
                    }
                }
                let array = self.non_null_array(array, "slicing null array")?;
                let rvalue = self.non_null_array(value, "assigning null to slice")?;
                let len = array.borrow().len();
                if let Some(end) = end {
                    if end > len {
                        return Err(slice_end_out_of_bounds(end, len).into());
                    }
                }
                let end = end.unwrap_or(len);
                if start > len {
                    return Err(index_out_of_bounds(start as i64, len).into());
                }
                // The slice keeps its length; the right side must fill it
                // exactly.
                if array.ptr_eq(&rvalue) {
                    // a[s:e] = a: every cell is copied onto itself.
                    if len != end - start {
                        return Err(slice_length_mismatch(end - start, len).into());
                    }
                    return Ok(Value::Array(array));
                }
                let source = rvalue.borrow();
                if source.len() != end - start {
                    return Err(slice_length_mismatch(end - start, source.len()).into());
                }
                array.borrow_mut()[start..end].clone_from_slice(&source);
                drop(source);
                Ok(Value::Array(array))
            }
            NodeKind::FieldAccess { stem, field } => {
                let object = self.eval(stem)?;
                match object {
                    Value::Null => Err(null_access("accessing a field").into()),
                    Value::Struct(sv) => {
                        let NodeKind::StructDecl { fields, .. } = self.ast.kind(sv.decl) else {
                            panic!("struct value without struct declaration");
                        };
                        let index = self
                            .ast
                            .list(fields)
                            .iter()
                            .position(|&f| self.ast.decl_name(f) == Some(field))
                            .unwrap_or_else(|| panic!("missing field slot after clean analysis"));
                        let rvalue = self.eval(value)?;
                        sv.fields.borrow_mut()[index] = rvalue.clone();
                        Ok(rvalue)
                    }
                    other => Err(invalid_operator("field assignment", other.type_name()).into()),
                }
            }
            other => panic!("assignment to a non-lvalue survived analysis: {other:?}"),
        }
    }

    /// Store a value, converting `Int`s to `Float`s (recursively for
    /// arrays) when the declared component type is `Float`.
    fn assign(&mut self, scope: ScopeId, name: Name, value: Value, target_ty: &Type) {
        let converted = convert_assigned(value, target_ty);
        self.storage.set(scope, name, converted);
    }

    // Case statement

    fn eval_case(
        &mut self,
        node: NodeId,
        subject: NodeId,
        bodies: vex_ir::NodeRange,
        default: NodeId,
    ) -> EvalResult {
        let scope = self.scope_of(node);
        let depth = self.storage.depth();
        self.storage.push(scope);
        if let Some(underscore) = self.known.underscore {
            self.storage.set(scope, underscore, Value::Wildcard);
        }
        let result = self.eval_case_arms(subject, bodies, default);
        self.storage.truncate(depth);
        result
    }

    fn eval_case_arms(
        &mut self,
        subject: NodeId,
        bodies: vex_ir::NodeRange,
        default: NodeId,
    ) -> EvalResult {
        let subject = self.eval(subject)?;
        let arms = self.ast.list(bodies).to_vec();
        for arm in arms {
            let NodeKind::CaseBody { pattern, body } = self.ast.kind(arm) else {
                panic!("non-arm in case body list");
            };
            let pattern = self.eval(pattern)?;
            if match_value(&pattern, &subject)? {
                self.eval(body)?;
                return Ok(Value::Null);
            }
        }
        self.eval(default)?;
        Ok(Value::Null)
    }

    // Binary operators

    fn eval_binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> EvalResult {
        // Short-circuit forms evaluate the right side lazily.
        match op {
            BinaryOp::And => {
                let l = self.eval(left)?;
                if !self.as_bool(l)? {
                    return Ok(Value::Bool(false));
                }
                let r = self.eval(right)?;
                return Ok(Value::Bool(self.as_bool(r)?));
            }
            BinaryOp::Or => {
                let l = self.eval(left)?;
                if self.as_bool(l)? {
                    return Ok(Value::Bool(true));
                }
                let r = self.eval(right)?;
                return Ok(Value::Bool(self.as_bool(r)?));
            }
            _ => {}
        }

        let lv = self.eval(left)?;
        let rv = self.eval(right)?;
        let lt = self.resolve_type(self.type_of(left));
        let rt = self.resolve_type(self.type_of(right));

        if op == BinaryOp::Add && (matches!(lt, Type::String) || matches!(rt, Type::String)) {
            let out = format!("{}{}", self.render(&lv), self.render(&rv));
            return Ok(Value::string(out));
        }

        let floating = matches!(lt, Type::Float) || matches!(rt, Type::Float);
        let numeric = floating || matches!(lt, Type::Int) || matches!(rt, Type::Int);
        let array_like = lt.is_array_like() || rt.is_array_like();

        if numeric && !array_like {
            return scalar_numeric(op, floating, &lv, &rv);
        }

        let lcomp = lt.component().cloned().unwrap_or_else(|| lt.clone());
        let rcomp = rt.component().cloned().unwrap_or_else(|| rt.clone());

        if array_like && !numeric {
            let (lrows, rrows) = match (&lv, &rv) {
                (Value::Array(a), Value::Array(b)) => (to_rows(&a.borrow()), to_rows(&b.borrow())),
                _ => return Err(invalid_operator(op.as_symbol(), "these operands").into()),
            };
            return array_like_op(op, (&lcomp, &rcomp), &lrows, &rrows);
        }

        if array_like && numeric {
            // Scalar with array-like: broadcast the scalar to the
            // array-like's shape, then fall back to the element-wise path.
            return match (&lv, &rv) {
                (Value::Array(cells), scalar) => {
                    let cells = cells.borrow();
                    let rows = to_rows(&cells);
                    let other = broadcast(scalar, shape_of(&cells));
                    array_like_op(op, (&lcomp, &rcomp), &rows, &other)
                }
                (scalar, Value::Array(cells)) => {
                    let cells = cells.borrow();
                    let rows = to_rows(&cells);
                    let other = broadcast(scalar, shape_of(&cells));
                    array_like_op(op, (&lcomp, &rcomp), &other, &rows)
                }
                _ => Err(invalid_operator(op.as_symbol(), "these operands").into()),
            };
        }

        // Residual equality on non-numeric scalars: structural for
        // primitive types, identity for references.
        match op {
            BinaryOp::Eq | BinaryOp::NotEq => {
                let equal = if lt.is_primitive() {
                    structural_eq(&lv, &rv)
                } else {
                    identity_eq(&lv, &rv)
                };
                Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }))
            }
            _ => Err(invalid_operator(op.as_symbol(), "these operands").into()),
        }
    }

    // Coercions

    fn as_bool(&self, value: Value) -> EvalResult<bool> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(invalid_operator("boolean logic", other.type_name()).into()),
        }
    }

    fn int_value(&mut self, node: NodeId) -> EvalResult<i64> {
        match self.eval(node)? {
            Value::Int(v) => Ok(v),
            other => Err(invalid_operator("integer position", other.type_name()).into()),
        }
    }

    fn start_index(&mut self, node: NodeId) -> EvalResult<usize> {
        let raw = self.int_value(node)?;
        if raw < 0 {
            return Err(negative_index(raw).into());
        }
        Ok(raw as usize)
    }

    /// `-1` means "to length"; any other negative is a fault.
    fn end_index(&mut self, node: NodeId) -> EvalResult<Option<usize>> {
        let raw = self.int_value(node)?;
        if raw == -1 {
            return Ok(None);
        }
        if raw < 0 {
            return Err(negative_index(raw).into());
        }
        Ok(Some(raw as usize))
    }

    fn non_null_array(&mut self, node: NodeId, what: &str) -> EvalResult<Shared<Vec<Value>>> {
        match self.eval(node)? {
            Value::Array(cells) => Ok(cells),
            Value::Null => Err(null_access(what).into()),
            other => Err(invalid_operator("array access", other.type_name()).into()),
        }
    }
}

/// Whether an argument/parameter pair makes the call vectorized.
fn is_vectorized(value: &Value, param_ty: &Type) -> bool {
    !matches!(param_ty, Type::Generic { .. })
        && !param_ty.is_array_like()
        && matches!(value, Value::Array(_))
}

fn array_like_op(
    op: BinaryOp,
    comps: (&Type, &Type),
    left: &[Vec<Value>],
    right: &[Vec<Value>],
) -> EvalResult {
    if op.is_arithmetic() {
        elementwise_arith(op, comps, left, right)
    } else if op.is_array_like_comparison() || op.is_array_like_equality() {
        elementwise_predicate(op, comps, left, right)
    } else {
        Err(invalid_operator(op.as_symbol(), "array-like values").into())
    }
}

fn scalar_numeric(op: BinaryOp, floating: bool, left: &Value, right: &Value) -> EvalResult {
    fn as_f64(value: &Value) -> EvalResult<f64> {
        match value {
            Value::Int(v) => Ok(*v as f64),
            Value::Float(v) => Ok(*v),
            other => Err(invalid_operator("arithmetic", other.type_name()).into()),
        }
    }
    fn as_i64(value: &Value) -> EvalResult<i64> {
        match value {
            Value::Int(v) => Ok(*v),
            other => Err(invalid_operator("arithmetic", other.type_name()).into()),
        }
    }

    if floating {
        let a = as_f64(left)?;
        let b = as_f64(right)?;
        Ok(match op {
            BinaryOp::Add => Value::Float(a + b),
            BinaryOp::Sub => Value::Float(a - b),
            BinaryOp::Mul => Value::Float(a * b),
            BinaryOp::Div => Value::Float(a / b),
            BinaryOp::Rem => Value::Float(a % b),
            BinaryOp::Lt => Value::Bool(a < b),
            BinaryOp::LtEq => Value::Bool(a <= b),
            BinaryOp::Gt => Value::Bool(a > b),
            BinaryOp::GtEq => Value::Bool(a >= b),
            BinaryOp::Eq => Value::Bool(a == b),
            BinaryOp::NotEq => Value::Bool(a != b),
            _ => return Err(invalid_operator(op.as_symbol(), "numbers").into()),
        })
    } else {
        let a = as_i64(left)?;
        let b = as_i64(right)?;
        Ok(match op {
            BinaryOp::Add => Value::Int(a.wrapping_add(b)),
            BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
            BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
            BinaryOp::Div => {
                if b == 0 {
                    return Err(crate::errors::division_by_zero().into());
                }
                Value::Int(a.wrapping_div(b))
            }
            BinaryOp::Rem => {
                if b == 0 {
                    return Err(crate::errors::division_by_zero().into());
                }
                Value::Int(a.wrapping_rem(b))
            }
            BinaryOp::Lt => Value::Bool(a < b),
            BinaryOp::LtEq => Value::Bool(a <= b),
            BinaryOp::Gt => Value::Bool(a > b),
            BinaryOp::GtEq => Value::Bool(a >= b),
            BinaryOp::Eq => Value::Bool(a == b),
            BinaryOp::NotEq => Value::Bool(a != b),
            _ => return Err(invalid_operator(op.as_symbol(), "numbers").into()),
        })
    }
}

/// Numeric conversion on assignment: `Int` values become `Float`s when
/// the declared (component) type is `Float`, recursively through arrays.
fn convert_assigned(value: Value, target_ty: &Type) -> Value {
    match target_ty {
        Type::Float => match value {
            Value::Int(v) => Value::Float(v as f64),
            other => other,
        },
        Type::Array(c) | Type::Mat(c) if matches!(c.as_ref(), Type::Float) => deep_to_float(value),
        _ => value,
    }
}

fn deep_to_float(value: Value) -> Value {
    match value {
        Value::Int(v) => Value::Float(v as f64),
        Value::Array(cells) => {
            let converted = cells.borrow().iter().cloned().map(deep_to_float).collect();
            Value::array(converted)
        }
        other => other,
    }
}
