use std::rc::Rc;

use kb_ir::{BinaryOp, Expr, Param, PrimitiveType, Stmt, SubDef, TypeNode};
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;
use crate::library::EmptyLibrary;
use crate::print_handler::buffer_handler;

fn capturing() -> (Interpreter, SharedPrintHandler) {
    let handler = buffer_handler();
    let interpreter = Interpreter::builder()
        .print_handler(handler.clone())
        .build();
    (interpreter, handler)
}

fn print(text: &str, newline: bool) -> Stmt {
    let sub = if newline { "println" } else { "print" };
    Stmt::expr(Expr::invoke(sub, vec![Expr::string(text)]))
}

#[test]
fn test_outcomes() {
    let (mut interp, _) = capturing();
    assert_eq!(interp.run(&[]).ok(), Some(Outcome::Completed));
    assert_eq!(
        interp.run(&[Stmt::ret(), print("unreachable", true)]).ok(),
        Some(Outcome::Completed)
    );
    assert_eq!(
        interp.run(&[Stmt::yield_value(Expr::int(7))]).ok(),
        Some(Outcome::Yielded(Value::Int(7)))
    );
}

#[test]
fn test_print_goes_through_the_handler() {
    let (mut interp, handler) = capturing();
    let program = [print("a", false), print("b", true)];
    assert!(interp.run(&program).is_ok());
    assert_eq!(handler.output(), "ab\n");
}

#[test]
fn test_declarations_persist_across_runs() {
    let (mut interp, _) = capturing();
    assert!(interp
        .run(&[Stmt::decl("x", TypeNode::Inferred, Expr::int(1))])
        .is_ok());
    // Core declarations load once, so a second run does not redeclare them.
    assert_eq!(
        interp.run(&[Stmt::yield_value(Expr::name("x"))]).ok(),
        Some(Outcome::Yielded(Value::Int(1)))
    );
    assert_eq!(interp.value_of("x"), Some(Value::Int(1)));
    assert_eq!(interp.value_of("y"), None);
}

#[test]
fn test_eval_and_invoke_values() {
    let (mut interp, _) = capturing();
    let sum = Expr::binary(BinaryOp::Add, Expr::int(1), Expr::int(2));
    assert_eq!(interp.eval(&sum).ok(), Some(Value::Int(3)));

    let program = [Stmt::sub(SubDef::new(
        "square",
        vec![Param::new("n", PrimitiveType::Int)],
        PrimitiveType::Int,
        vec![Stmt::yield_value(Expr::binary(
            BinaryOp::Multiply,
            Expr::name("n"),
            Expr::name("n"),
        ))],
    ))];
    assert!(interp.run(&program).is_ok());
    assert_eq!(
        interp.invoke_values("square", vec![Value::Byte(4)]).ok(),
        Some(Value::Int(16))
    );
    assert_eq!(
        interp.invoke_values("abs", vec![Value::Int(-4)]).ok(),
        Some(Value::Int(4))
    );
}

#[test]
fn test_core_declarations_can_be_disabled() {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .core_declarations(false)
        .build();
    let result = interp.run(&[print("hi", true)]).map_err(|e| e.kind);
    assert_eq!(
        result,
        Err(EvalErrorKind::UndeclaredSub {
            name: "println".to_string()
        })
    );
}

#[test]
fn test_core_declarations_need_their_natives() {
    let mut interp = Interpreter::builder()
        .library(Rc::new(EmptyLibrary))
        .print_handler(buffer_handler())
        .build();
    let result = interp.run(&[]).map_err(|e| e.kind);
    assert_eq!(
        result,
        Err(EvalErrorKind::MissingBuiltin {
            signature: "print(any)".to_string()
        })
    );
}

#[test]
fn test_state_is_unwound_after_errors() {
    let (mut interp, _) = capturing();
    let failing = Stmt::sub(SubDef::new(
        "fail",
        vec![],
        PrimitiveType::Int,
        vec![Stmt::yield_value(Expr::binary(
            BinaryOp::Divide,
            Expr::int(1),
            Expr::int(0),
        ))],
    ));
    let program = [
        failing,
        Stmt::block(vec![Stmt::do_block(
            None,
            vec![Stmt::expr(Expr::invoke("fail", vec![]))],
        )]),
    ];
    assert!(interp.run(&program).is_err());
    assert_eq!(interp.env().depth(), 1);
    assert_eq!(interp.call_stack.depth(), 0);
    assert!(interp.return_types.is_empty());
}

#[test]
fn test_escaping_break_is_reported() {
    let (mut interp, _) = capturing();
    let err = interp.run(&[Stmt::break_to(Some("outer"))]).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::UnmatchedSignal {
            signal: "break outer".to_string()
        })
    );
}
