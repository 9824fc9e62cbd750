//! Runtime faults and the unwinding signal.
//!
//! `return` control flow and runtime faults both unwind the evaluation,
//! but they are distinct signals: [`Unwind::Return`] carries a value to
//! the nearest call (or the script top level), [`Unwind::Fault`] aborts
//! execution and surfaces an [`EvalError`] to the driver.
//!
//! Fault constructors are `#[cold]` functions, one per fault kind.

use vex_diagnostic::ErrorCode;
use vex_ir::Span;

use crate::Value;

/// A runtime fault.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Option<Span>,
}

impl EvalError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EvalError {
            code,
            message: message.into(),
            span: None,
        }
    }

    /// Attach a source span if none is set yet.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

/// Why evaluation of a node did not produce a value.
#[derive(Clone, Debug)]
pub enum Unwind {
    /// A `return` statement propagating to the enclosing call.
    Return(Value),
    /// A runtime fault propagating to the driver.
    Fault(EvalError),
}

impl Unwind {
    /// Attach a span to a fault; returns propagate unchanged.
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        match self {
            Unwind::Fault(e) => Unwind::Fault(e.with_span(span)),
            other => other,
        }
    }
}

impl From<EvalError> for Unwind {
    fn from(e: EvalError) -> Self {
        Unwind::Fault(e)
    }
}

/// Result of evaluating a node.
pub type EvalResult<T = Value> = Result<T, Unwind>;

// Fault constructors

/// Null dereference: field access, indexing, or call on `null`.
#[cold]
pub fn null_access(what: &str) -> EvalError {
    EvalError::new(ErrorCode::E6001, format!("{what} on null"))
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(
        ErrorCode::E6002,
        format!("index {index} out of bounds for length {len}"),
    )
}

#[cold]
pub fn negative_index(index: i64) -> EvalError {
    EvalError::new(ErrorCode::E6002, format!("negative index: {index}"))
}

#[cold]
pub fn invalid_slice(start: i64, end: i64) -> EvalError {
    EvalError::new(
        ErrorCode::E6003,
        format!("slice start {start} is greater than end {end}"),
    )
}

#[cold]
pub fn slice_end_out_of_bounds(end: usize, len: usize) -> EvalError {
    EvalError::new(
        ErrorCode::E6003,
        format!("slice end {end} exceeds length {len}"),
    )
}

#[cold]
pub fn slice_length_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorCode::E6003,
        format!("slice assignment needs {expected} elements but got {got}"),
    )
}

#[cold]
pub fn shape_mismatch(left: (usize, usize), right: (usize, usize)) -> EvalError {
    EvalError::new(
        ErrorCode::E6004,
        format!(
            "operands must have the same shape: ({}, {}) != ({}, {})",
            left.0, left.1, right.0, right.1
        ),
    )
}

#[cold]
pub fn dot_shape_mismatch(left: (usize, usize), right: (usize, usize)) -> EvalError {
    EvalError::new(
        ErrorCode::E6004,
        format!(
            "invalid shapes for dot product: ({}, {}) and ({}, {})",
            left.0, left.1, right.0, right.1
        ),
    )
}

#[cold]
pub fn vectorized_shape_mismatch(arg: (usize, usize), target: (usize, usize)) -> EvalError {
    EvalError::new(
        ErrorCode::E6004,
        format!(
            "arguments of a vectorized call must have the same shape: ({}, {}) != ({}, {})",
            arg.0, arg.1, target.0, target.1
        ),
    )
}

#[cold]
pub fn invalid_operator(op: &str, kind: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E6005,
        format!("`{op}` is not a valid operator for {kind}"),
    )
}

#[cold]
pub fn generic_conflict(name: &str, bound: &str, got: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E6006,
        format!("generic type conflict: {name} is {bound} but got {got}"),
    )
}

#[cold]
pub fn non_positive_shape(rows: i64, cols: i64) -> EvalError {
    EvalError::new(
        ErrorCode::E6007,
        format!("invalid shape when generating a matrix: [{rows}, {cols}]"),
    )
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(ErrorCode::E6008, "division by zero")
}

#[cold]
pub fn invalid_pattern(subject: &str, pattern: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E6009,
        format!("cannot match a {subject} subject against a {pattern} pattern"),
    )
}
