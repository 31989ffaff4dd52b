//! Crate-level tests: value-level operators plus whole programs run through
//! the interpreter with a capturing print handler.

mod control_tests;
mod data_tests;
mod operators_tests;

use kb_ir::{BinaryOp, Expr, Stmt};

use crate::errors::{EvalError, EvalErrorKind};
use crate::interpreter::{Interpreter, Outcome};
use crate::print_handler::buffer_handler;
use crate::value::Value;

/// Run a program; returns the outcome and everything it printed.
pub(crate) fn run(program: &[Stmt]) -> (Result<Outcome, EvalError>, String) {
    let handler = buffer_handler();
    let mut interpreter = Interpreter::builder()
        .print_handler(handler.clone())
        .build();
    let outcome = interpreter.run(program);
    (outcome, handler.output())
}

/// Output of a program that must succeed.
pub(crate) fn output(program: &[Stmt]) -> String {
    let (outcome, output) = run(program);
    if let Err(e) = outcome {
        panic!("program failed: {e}");
    }
    output
}

/// Value of a program's top-level `yield`.
pub(crate) fn yielded(program: &[Stmt]) -> Value {
    match run(program).0 {
        Ok(Outcome::Yielded(value)) => value,
        other => panic!("expected a yield, got {other:?}"),
    }
}

/// Kind of the error a program must fail with.
pub(crate) fn error(program: &[Stmt]) -> EvalErrorKind {
    match run(program).0 {
        Ok(outcome) => panic!("expected an error, got {outcome:?}"),
        Err(e) => e.kind,
    }
}

pub(crate) fn println(expr: Expr) -> Stmt {
    Stmt::expr(Expr::invoke("println", vec![expr]))
}

pub(crate) fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::binary(op, left, right)
}

pub(crate) fn concat(parts: Vec<Expr>) -> Expr {
    parts
        .into_iter()
        .reduce(|acc, part| Expr::binary(BinaryOp::Concat, acc, part))
        .unwrap_or_else(|| Expr::string(""))
}
