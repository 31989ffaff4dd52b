//! Binary operator implementations for the evaluator.
//!
//! Value-level semantics only: equality, ordering, concatenation and
//! arithmetic. Operators that need the environment (assignment, swap,
//! short-circuit logic, `is`, `as`, `.` and composite dispatch) live in the
//! interpreter.

use std::cmp::Ordering;

use kb_ir::BinaryOp;

use crate::errors::{
    division_by_zero, invalid_left_operand, invalid_right_operand, EvalError, EvalResult,
};
use crate::value::numeric::{self, NumericKind};
use crate::value::Value;

/// Both operands moved up the ladder to the wider of their kinds.
fn promote(left: &Value, right: &Value) -> Option<(Value, Value, NumericKind)> {
    let kind = left.numeric_kind()?.max(right.numeric_kind()?);
    Some((numeric::widen(left, kind)?, numeric::widen(right, kind)?, kind))
}

/// Ladder-aware equality used by `==`, `!=` and switch value cases.
///
/// An `Empty` operand compares through the other side's is-empty predicate.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Empty, other) | (other, Value::Empty) => other.is_empty(),
        _ => match promote(left, right) {
            Some((l, r, _)) => l == r,
            None => left == right,
        },
    }
}

/// Ordering for `<`, `<=`, `>`, `>=`: numerics on the ladder, chars and
/// strings lexicographically. `None` when the operands are unordered (NaN).
fn compare(left: &Value, right: &Value, op: BinaryOp) -> Result<Option<Ordering>, EvalError> {
    let symbol = op.as_symbol();
    if let Some((l, r, _)) = promote(left, right) {
        let ordering = match (&l, &r) {
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            _ => Some(l.as_integral().cmp(&r.as_integral())),
        };
        return Ok(ordering);
    }
    match (left, right) {
        (Value::Char(a), Value::Char(b)) => Ok(Some(a.cmp(b))),
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        (Value::Char(_) | Value::String(_), _) => Err(invalid_right_operand(symbol, right)),
        (l, _) if l.numeric_kind().is_some() => Err(invalid_right_operand(symbol, right)),
        _ => Err(invalid_left_operand(symbol, left)),
    }
}

fn ordered(left: &Value, right: &Value, op: BinaryOp, holds: fn(Ordering) -> bool) -> EvalResult {
    Ok(Value::Bool(compare(left, right, op)?.is_some_and(holds)))
}

fn integral(op: BinaryOp, a: i64, b: i64, kind: NumericKind) -> EvalResult {
    let n = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Subtract => a.wrapping_sub(b),
        BinaryOp::Multiply => a.wrapping_mul(b),
        BinaryOp::Divide if b == 0 => return Err(division_by_zero()),
        BinaryOp::Divide => a.wrapping_div(b),
        BinaryOp::Modulus if b == 0 => return Err(division_by_zero()),
        BinaryOp::Modulus => a.wrapping_rem(b),
        _ => return Err(invalid_left_operand(op.as_symbol(), &numeric::from_i64(a, kind))),
    };
    Ok(numeric::from_i64(n, kind))
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let symbol = op.as_symbol();
    let Some((l, r, kind)) = promote(left, right) else {
        return Err(if left.numeric_kind().is_some() {
            invalid_right_operand(symbol, right)
        } else {
            invalid_left_operand(symbol, left)
        });
    };
    match (l, r) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            _ => a % b,
        })),
        (Value::Double(a), Value::Double(b)) => Ok(Value::Double(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            _ => a % b,
        })),
        (l, r) => match (l.as_integral(), r.as_integral()) {
            (Some(a), Some(b)) => integral(op, a, b, kind),
            _ => Err(invalid_left_operand(symbol, left)),
        },
    }
}

/// Evaluate a value-level binary operator.
///
/// Both operands are already evaluated, left first.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!values_equal(left, right))),
        BinaryOp::Less => ordered(left, right, op, Ordering::is_lt),
        BinaryOp::LessEqual => ordered(left, right, op, Ordering::is_le),
        BinaryOp::Greater => ordered(left, right, op, Ordering::is_gt),
        BinaryOp::GreaterEqual => ordered(left, right, op, Ordering::is_ge),
        BinaryOp::Concat => Ok(Value::string(&format!("{left}{right}"))),
        BinaryOp::Add
        | BinaryOp::Subtract
        | BinaryOp::Multiply
        | BinaryOp::Divide
        | BinaryOp::Modulus => arithmetic(op, left, right),
        BinaryOp::And | BinaryOp::Or => match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            (Value::Bool(_), other) => Err(invalid_right_operand(op.as_symbol(), other)),
            (other, _) => Err(invalid_left_operand(op.as_symbol(), other)),
        },
        BinaryOp::Assign
        | BinaryOp::Swap
        | BinaryOp::Is
        | BinaryOp::IsNot
        | BinaryOp::As
        | BinaryOp::Dot => Err(invalid_left_operand(op.as_symbol(), left)),
    }
}
