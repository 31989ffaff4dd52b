//! Tests for value-level binary operators.

use kb_ir::BinaryOp;
use pretty_assertions::assert_eq;

use crate::errors::EvalErrorKind;
use crate::operators::{evaluate_binary, values_equal};
use crate::types::Type;
use crate::value::Value;

fn eval(left: Value, op: BinaryOp, right: Value) -> Value {
    evaluate_binary(&left, &right, op).unwrap()
}

fn fails(left: Value, op: BinaryOp, right: Value) -> EvalErrorKind {
    evaluate_binary(&left, &right, op).unwrap_err().kind
}

#[test]
fn test_arithmetic_promotes_to_the_wider_kind() {
    assert_eq!(eval(Value::Byte(2), BinaryOp::Add, Value::Int(3)), Value::Int(5));
    assert_eq!(eval(Value::Int(2), BinaryOp::Multiply, Value::Long(4)), Value::Long(8));
    assert_eq!(eval(Value::Int(1), BinaryOp::Add, Value::Double(0.5)), Value::Double(1.5));
    assert_eq!(eval(Value::Int(7), BinaryOp::Divide, Value::Int(2)), Value::Int(3));
    assert_eq!(eval(Value::Int(7), BinaryOp::Modulus, Value::Int(2)), Value::Int(1));
}

#[test]
fn test_integral_arithmetic_wraps_in_its_kind() {
    assert_eq!(eval(Value::Byte(127), BinaryOp::Add, Value::Byte(1)), Value::Byte(-128));
    assert_eq!(
        eval(Value::Int(i32::MAX), BinaryOp::Add, Value::Int(1)),
        Value::Int(i32::MIN)
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        fails(Value::Int(1), BinaryOp::Divide, Value::Int(0)),
        EvalErrorKind::DivisionByZero
    );
    assert_eq!(
        fails(Value::Long(1), BinaryOp::Modulus, Value::Byte(0)),
        EvalErrorKind::DivisionByZero
    );
    // Floating point follows IEEE.
    assert_eq!(
        eval(Value::Double(1.0), BinaryOp::Divide, Value::Double(0.0)),
        Value::Double(f64::INFINITY)
    );
}

#[test]
fn test_mismatched_operands() {
    assert!(matches!(
        fails(Value::string("a"), BinaryOp::Subtract, Value::Int(1)),
        EvalErrorKind::InvalidLeftOperand { op: "-", .. }
    ));
    assert!(matches!(
        fails(Value::Int(1), BinaryOp::Add, Value::Bool(true)),
        EvalErrorKind::InvalidRightOperand { op: "+", .. }
    ));
}

#[test]
fn test_equality_is_ladder_aware() {
    assert!(values_equal(&Value::Byte(1), &Value::Long(1)));
    assert!(values_equal(&Value::Int(2), &Value::Double(2.0)));
    assert!(!values_equal(&Value::Int(1), &Value::string("1")));
    assert_eq!(
        eval(Value::Int(1), BinaryOp::NotEqual, Value::Int(2)),
        Value::Bool(true)
    );
}

#[test]
fn test_equality_with_empty_uses_the_predicate() {
    assert!(values_equal(&Value::Empty, &Value::Int(0)));
    assert!(values_equal(&Value::string(" "), &Value::Empty));
    assert!(values_equal(&Value::array(Type::INT, vec![]), &Value::Empty));
    assert!(!values_equal(&Value::Empty, &Value::Char('x')));
}

#[test]
fn test_structural_equality_of_arrays() {
    let a = Value::array(Type::INT, vec![Value::Int(1), Value::Int(2)]);
    let b = Value::array(Type::INT, vec![Value::Int(1), Value::Int(2)]);
    assert!(values_equal(&a, &b));
}

#[test]
fn test_comparisons() {
    assert_eq!(eval(Value::Int(1), BinaryOp::Less, Value::Long(2)), Value::Bool(true));
    assert_eq!(
        eval(Value::Double(2.5), BinaryOp::GreaterEqual, Value::Int(2)),
        Value::Bool(true)
    );
    assert_eq!(eval(Value::Char('a'), BinaryOp::Less, Value::Char('b')), Value::Bool(true));
    assert_eq!(
        eval(Value::string("apple"), BinaryOp::Greater, Value::string("apricot")),
        Value::Bool(false)
    );
    for op in [BinaryOp::Less, BinaryOp::LessEqual, BinaryOp::Greater, BinaryOp::GreaterEqual] {
        assert_eq!(eval(Value::Double(f64::NAN), op, Value::Double(1.0)), Value::Bool(false));
        assert_eq!(eval(Value::Int(1), op, Value::Float(f32::NAN)), Value::Bool(false));
    }
    assert_eq!(
        eval(Value::Double(f64::NAN), BinaryOp::Equal, Value::Double(1.0)),
        Value::Bool(false)
    );
    assert!(matches!(
        fails(Value::Bool(true), BinaryOp::Less, Value::Bool(false)),
        EvalErrorKind::InvalidLeftOperand { .. }
    ));
    assert!(matches!(
        fails(Value::string("a"), BinaryOp::Less, Value::Int(1)),
        EvalErrorKind::InvalidRightOperand { .. }
    ));
}

#[test]
fn test_concat_stringifies_both_sides() {
    assert_eq!(
        eval(Value::string("n = "), BinaryOp::Concat, Value::Int(3)),
        Value::string("n = 3")
    );
    assert_eq!(
        eval(Value::Bool(true), BinaryOp::Concat, Value::None),
        Value::string("truenone")
    );
}
