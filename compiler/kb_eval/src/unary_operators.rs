//! Unary operator implementations for the evaluator.
//!
//! Composite operands with a user-declared operator sub are dispatched by the
//! interpreter before reaching this module.

use kb_ir::UnaryOp;

use crate::errors::{invalid_left_operand, EvalError, EvalResult};
use crate::types::Type;
use crate::value::Value;

fn length(len: usize) -> EvalResult {
    i32::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvalError::new("length does not fit in `int`"))
}

/// Evaluate a unary operation using direct pattern matching.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    let symbol = op.as_symbol();
    match op {
        UnaryOp::Negate => match *value {
            Value::Byte(v) => Ok(Value::Byte(v.wrapping_neg())),
            Value::Short(v) => Ok(Value::Short(v.wrapping_neg())),
            Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
            Value::Long(v) => Ok(Value::Long(v.wrapping_neg())),
            Value::Float(v) => Ok(Value::Float(-v)),
            Value::Double(v) => Ok(Value::Double(-v)),
            _ => Err(invalid_left_operand(symbol, value)),
        },
        UnaryOp::Not => match value {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(invalid_left_operand(symbol, value)),
        },
        UnaryOp::Length => match value {
            Value::String(s) => length(s.chars().count()),
            Value::Array(a) => length(a.len()),
            _ => Err(invalid_left_operand(symbol, value)),
        },
        UnaryOp::Stringify => Ok(Value::string(&value.to_string())),
        UnaryOp::Unwrap => match value {
            Value::Enum(entry) => Ok(entry.value().clone()),
            Value::Data(data) => Ok(Value::array(Type::ANY, data.field_values())),
            _ => Err(invalid_left_operand(symbol, value)),
        },
    }
}
