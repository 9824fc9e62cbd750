//! Element-wise engine for array-like operands.
//!
//! Operands are normalized to two-dimensional form: a one-dimensional
//! array becomes a single-row matrix, which is why `[1] + [2]` yields
//! `[[3]]`. Cell arithmetic follows the *declared* component types, not
//! the runtime classes: if either side's component is `Float` the cell
//! computes in doubles, otherwise in longs. The dot product requires the
//! inner dimensions to agree; everything else requires equal shapes.
//! All-predicates bail out `false` on the first violating pair,
//! one-predicates bail out `true` on the first satisfying pair.

use vex_ir::BinaryOp;
use vex_types::Type;

use crate::errors::{
    division_by_zero, dot_shape_mismatch, invalid_operator, shape_mismatch, EvalResult,
};
use crate::value::{structural_eq, Value};

/// `(rows, cols)` of an array-like value. A one-dimensional array is one
/// row; nested arrays are rows of a matrix.
pub(crate) fn shape_of(values: &[Value]) -> (usize, usize) {
    match values.first() {
        Some(Value::Array(row)) => (values.len(), row.borrow().len()),
        _ => (1, values.len()),
    }
}

/// Normalize to rows: a matrix keeps its rows, a one-dimensional array
/// becomes a single row.
pub(crate) fn to_rows(values: &[Value]) -> Vec<Vec<Value>> {
    if matches!(values.first(), Some(Value::Array(_))) {
        values
            .iter()
            .map(|row| match row {
                Value::Array(cells) => cells.borrow().clone(),
                other => vec![other.clone()],
            })
            .collect()
    } else {
        vec![values.to_vec()]
    }
}

/// Expand a scalar to a uniformly-filled matrix of `shape`.
pub(crate) fn broadcast(scalar: &Value, shape: (usize, usize)) -> Vec<Vec<Value>> {
    vec![vec![scalar.clone(); shape.1]; shape.0]
}

/// Rebuild a value from rows.
pub(crate) fn rows_to_value(rows: Vec<Vec<Value>>) -> Value {
    Value::array(rows.into_iter().map(Value::array).collect())
}

fn rows_shape(rows: &[Vec<Value>]) -> (usize, usize) {
    (rows.len(), rows.first().map_or(0, Vec::len))
}

fn cell_i64(value: &Value) -> EvalResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        other => Err(invalid_operator("arithmetic", other.type_name()).into()),
    }
}

fn cell_f64(value: &Value) -> EvalResult<f64> {
    match value {
        Value::Int(v) => Ok(*v as f64),
        Value::Float(v) => Ok(*v),
        other => Err(invalid_operator("arithmetic", other.type_name()).into()),
    }
}

fn int_arith(op: BinaryOp, a: i64, b: i64) -> EvalResult<i64> {
    match op {
        BinaryOp::Add => Ok(a.wrapping_add(b)),
        BinaryOp::Sub => Ok(a.wrapping_sub(b)),
        BinaryOp::Mul => Ok(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                Err(division_by_zero().into())
            } else {
                Ok(a.wrapping_div(b))
            }
        }
        BinaryOp::Rem => {
            if b == 0 {
                Err(division_by_zero().into())
            } else {
                Ok(a.wrapping_rem(b))
            }
        }
        _ => Err(invalid_operator(op.as_symbol(), "integer cells").into()),
    }
}

fn float_arith(op: BinaryOp, a: f64, b: f64) -> EvalResult<f64> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div => Ok(a / b),
        BinaryOp::Rem => Ok(a % b),
        _ => Err(invalid_operator(op.as_symbol(), "float cells").into()),
    }
}

fn is_float_mode(comps: (&Type, &Type)) -> bool {
    matches!(comps.0, Type::Float) || matches!(comps.1, Type::Float)
}

/// Element-wise arithmetic over normalized rows (`@` dispatches to the
/// dot product).
pub(crate) fn elementwise_arith(
    op: BinaryOp,
    comps: (&Type, &Type),
    left: &[Vec<Value>],
    right: &[Vec<Value>],
) -> EvalResult<Value> {
    let lshape = rows_shape(left);
    let rshape = rows_shape(right);

    if op == BinaryOp::MatMul {
        return dot_product(comps, left, right);
    }
    if lshape != rshape {
        return Err(shape_mismatch(lshape, rshape).into());
    }

    let float_mode = is_float_mode(comps);
    let mut rows = Vec::with_capacity(lshape.0);
    for (lrow, rrow) in left.iter().zip(right) {
        let mut row = Vec::with_capacity(lrow.len());
        for (a, b) in lrow.iter().zip(rrow) {
            let cell = if float_mode {
                Value::Float(float_arith(op, cell_f64(a)?, cell_f64(b)?)?)
            } else {
                Value::Int(int_arith(op, cell_i64(a)?, cell_i64(b)?)?)
            };
            row.push(cell);
        }
        rows.push(row);
    }
    Ok(rows_to_value(rows))
}

/// Matrix product; `Int x Int` stays integral, any `Float` involvement
/// computes in doubles.
fn dot_product(
    comps: (&Type, &Type),
    left: &[Vec<Value>],
    right: &[Vec<Value>],
) -> EvalResult<Value> {
    let (rows, inner) = rows_shape(left);
    let (rinner, cols) = rows_shape(right);
    if inner != rinner {
        return Err(dot_shape_mismatch((rows, inner), (rinner, cols)).into());
    }

    let float_mode = is_float_mode(comps);
    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let mut row = Vec::with_capacity(cols);
        for j in 0..cols {
            if float_mode {
                let mut acc = 0.0f64;
                for k in 0..inner {
                    acc += cell_f64(&left[i][k])? * cell_f64(&right[k][j])?;
                }
                row.push(Value::Float(acc));
            } else {
                let mut acc = 0i64;
                for k in 0..inner {
                    acc = acc.wrapping_add(cell_i64(&left[i][k])?.wrapping_mul(cell_i64(&right[k][j])?));
                }
                row.push(Value::Int(acc));
            }
        }
        out.push(row);
    }
    Ok(rows_to_value(out))
}

fn cells_equal(comps: (&Type, &Type), a: &Value, b: &Value) -> EvalResult<bool> {
    if matches!(comps.0, Type::String) || matches!(comps.1, Type::String) {
        return Ok(structural_eq(a, b));
    }
    if is_float_mode(comps) {
        Ok(cell_f64(a)? == cell_f64(b)?)
    } else {
        Ok(cell_i64(a)? == cell_i64(b)?)
    }
}

/// `Less | Equal | Greater` as an i8, numeric cells only.
fn cells_cmp(op: BinaryOp, comps: (&Type, &Type), a: &Value, b: &Value) -> EvalResult<i8> {
    if matches!(comps.0, Type::String) || matches!(comps.1, Type::String) {
        return Err(invalid_operator(op.as_symbol(), "string components").into());
    }
    let ordering = if is_float_mode(comps) {
        cell_f64(a)?.partial_cmp(&cell_f64(b)?)
    } else {
        Some(cell_i64(a)?.cmp(&cell_i64(b)?))
    };
    Ok(match ordering {
        Some(std::cmp::Ordering::Less) => -1,
        Some(std::cmp::Ordering::Equal) => 0,
        Some(std::cmp::Ordering::Greater) => 1,
        // NaN satisfies no ordering relation; report as incomparable.
        None => 2,
    })
}

fn pair_satisfies(
    op: BinaryOp,
    comps: (&Type, &Type),
    a: &Value,
    b: &Value,
) -> EvalResult<bool> {
    Ok(match op {
        BinaryOp::OneEq | BinaryOp::AllEq => cells_equal(comps, a, b)?,
        BinaryOp::OneNotEq | BinaryOp::AllNotEq => !cells_equal(comps, a, b)?,
        BinaryOp::OneLt | BinaryOp::AllLt => cells_cmp(op, comps, a, b)? == -1,
        BinaryOp::OneLtEq | BinaryOp::AllLtEq => matches!(cells_cmp(op, comps, a, b)?, -1 | 0),
        BinaryOp::OneGt | BinaryOp::AllGt => cells_cmp(op, comps, a, b)? == 1,
        BinaryOp::OneGtEq | BinaryOp::AllGtEq => matches!(cells_cmp(op, comps, a, b)?, 0 | 1),
        _ => return Err(invalid_operator(op.as_symbol(), "array-like values").into()),
    })
}

/// One-predicates: `true` as soon as any pair satisfies, else `false`.
/// All-predicates: `false` as soon as any pair violates, else `true`.
pub(crate) fn elementwise_predicate(
    op: BinaryOp,
    comps: (&Type, &Type),
    left: &[Vec<Value>],
    right: &[Vec<Value>],
) -> EvalResult<Value> {
    let lshape = rows_shape(left);
    let rshape = rows_shape(right);
    if lshape != rshape {
        return Err(shape_mismatch(lshape, rshape).into());
    }

    let one = op.is_one_predicate();
    for (lrow, rrow) in left.iter().zip(right) {
        for (a, b) in lrow.iter().zip(rrow) {
            let satisfied = pair_satisfies(op, comps, a, b)?;
            if one && satisfied {
                return Ok(Value::Bool(true));
            }
            if !one && !satisfied {
                return Ok(Value::Bool(false));
            }
        }
    }
    Ok(Value::Bool(!one))
}
