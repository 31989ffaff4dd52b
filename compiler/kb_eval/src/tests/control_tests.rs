//! Loops, blocks, switches and signal routing.

use kb_ir::{BinaryOp, Case, CaseKind, Expr, PrimitiveType, Stmt, SubDef, TypeNode};
use pretty_assertions::assert_eq;

use super::{binary, concat, error, output, println, run};
use crate::errors::EvalErrorKind;

fn name(n: &str) -> Expr {
    Expr::name(n)
}

fn if_then(test: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::if_else(vec![(test, body)], None)
}

#[test]
fn test_counting_loop_is_pre_test() {
    let program = [Stmt::for_counter(
        None,
        "i",
        Expr::int(0),
        Expr::int(5),
        None,
        vec![println(name("i"))],
    )];
    assert_eq!(output(&program), "0\n1\n2\n3\n4\n");

    let empty = [Stmt::for_counter(
        None,
        "i",
        Expr::int(5),
        Expr::int(5),
        None,
        vec![println(name("i"))],
    )];
    assert_eq!(output(&empty), "");
}

#[test]
fn test_counting_loop_with_step() {
    let program = [Stmt::for_counter(
        None,
        "i",
        Expr::int(0),
        Expr::int(5),
        Some(Expr::int(2)),
        vec![println(name("i"))],
    )];
    assert_eq!(output(&program), "0\n2\n4\n");
}

#[test]
fn test_counter_is_private_to_the_loop() {
    let program = [
        Stmt::for_counter(None, "i", Expr::int(0), Expr::int(1), None, vec![]),
        println(name("i")),
    ];
    assert_eq!(
        error(&program),
        EvalErrorKind::UndeclaredVariable {
            name: "i".to_string()
        }
    );
}

fn nested_loops(break_label: Option<&str>) -> [Stmt; 1] {
    [Stmt::for_counter(
        Some("outer"),
        "i",
        Expr::int(0),
        Expr::int(3),
        None,
        vec![Stmt::for_counter(
            None,
            "j",
            Expr::int(0),
            Expr::int(3),
            None,
            vec![
                if_then(
                    binary(name("j"), BinaryOp::Equal, Expr::int(1)),
                    vec![Stmt::break_to(break_label)],
                ),
                println(concat(vec![name("i"), Expr::string(","), name("j")])),
            ],
        )],
    )]
}

#[test]
fn test_labelled_break_skips_inner_loops() {
    assert_eq!(output(&nested_loops(Some("outer"))), "0,0\n");
}

#[test]
fn test_unlabelled_break_ends_only_the_innermost_loop() {
    assert_eq!(output(&nested_loops(None)), "0,0\n1,0\n2,0\n");
}

#[test]
fn test_next_in_while() {
    let program = [
        Stmt::decl("i", TypeNode::Inferred, Expr::int(0)),
        Stmt::while_loop(
            None,
            binary(name("i"), BinaryOp::Less, Expr::int(5)),
            vec![
                Stmt::expr(Expr::assign(
                    "i",
                    binary(name("i"), BinaryOp::Add, Expr::int(1)),
                )),
                if_then(
                    binary(
                        binary(name("i"), BinaryOp::Modulus, Expr::int(2)),
                        BinaryOp::Equal,
                        Expr::int(0),
                    ),
                    vec![Stmt::next_to(None)],
                ),
                println(name("i")),
            ],
        ),
    ];
    assert_eq!(output(&program), "1\n3\n5\n");
}

#[test]
fn test_until_runs_the_body_first() {
    let program = [
        Stmt::decl("n", TypeNode::Inferred, Expr::int(0)),
        Stmt::until_loop(
            None,
            binary(name("n"), BinaryOp::GreaterEqual, Expr::int(3)),
            vec![
                println(name("n")),
                Stmt::expr(Expr::assign(
                    "n",
                    binary(name("n"), BinaryOp::Add, Expr::int(1)),
                )),
            ],
        ),
        Stmt::until_loop(None, Expr::bool(true), vec![println(Expr::string("once"))]),
    ];
    assert_eq!(output(&program), "0\n1\n2\nonce\n");
}

#[test]
fn test_do_block_consumes_break() {
    let program = [
        Stmt::do_block(
            None,
            vec![
                println(Expr::string("a")),
                Stmt::break_to(None),
                println(Expr::string("b")),
            ],
        ),
        println(Expr::string("c")),
    ];
    assert_eq!(output(&program), "a\nc\n");
}

#[test]
fn test_labelled_do_block_catches_break_from_a_loop() {
    let program = [
        Stmt::do_block(
            Some("outer"),
            vec![
                Stmt::while_loop(None, Expr::bool(true), vec![Stmt::break_to(Some("outer"))]),
                println(Expr::string("skipped")),
            ],
        ),
        println(Expr::string("done")),
    ];
    assert_eq!(output(&program), "done\n");
}

fn values(exprs: Vec<Expr>, body: Vec<Stmt>) -> Case {
    Case {
        kind: CaseKind::Values(exprs),
        body,
    }
}

fn otherwise(body: Vec<Stmt>) -> Case {
    Case {
        kind: CaseKind::Else,
        body,
    }
}

#[test]
fn test_switch_runs_first_matching_case() {
    let program = [Stmt::switch(
        None,
        Expr::long(2),
        vec![
            values(vec![Expr::int(1)], vec![println(Expr::string("one"))]),
            values(
                vec![Expr::int(2), Expr::int(3)],
                vec![println(Expr::string("two or three"))],
            ),
            otherwise(vec![println(Expr::string("other"))]),
        ],
    )];
    assert_eq!(output(&program), "two or three\n");
}

#[test]
fn test_next_in_switch_keeps_matching() {
    let program = [Stmt::switch(
        None,
        Expr::int(2),
        vec![
            values(
                vec![Expr::int(2)],
                vec![println(Expr::string("two")), Stmt::next_to(None)],
            ),
            values(vec![Expr::int(5)], vec![println(Expr::string("five"))]),
            otherwise(vec![println(Expr::string("else"))]),
        ],
    )];
    assert_eq!(output(&program), "two\nelse\n");
}

#[test]
fn test_switch_on_type() {
    let program = [Stmt::switch(
        None,
        Expr::string("s"),
        vec![
            Case {
                kind: CaseKind::Type {
                    ty: PrimitiveType::Int.into(),
                    inverted: false,
                },
                body: vec![println(Expr::string("int"))],
            },
            Case {
                kind: CaseKind::Type {
                    ty: PrimitiveType::Bool.into(),
                    inverted: true,
                },
                body: vec![println(Expr::string("not bool"))],
            },
        ],
    )];
    assert_eq!(output(&program), "not bool\n");
}

#[test]
fn test_bare_break_in_switch_leaves_the_loop() {
    let program = [Stmt::for_counter(
        None,
        "i",
        Expr::int(0),
        Expr::int(3),
        None,
        vec![
            Stmt::switch(
                Some("sw"),
                name("i"),
                vec![values(vec![Expr::int(1)], vec![Stmt::break_to(None)])],
            ),
            println(name("i")),
        ],
    )];
    assert_eq!(output(&program), "0\n");
}

#[test]
fn test_escaping_signals_are_errors() {
    assert_eq!(
        error(&[Stmt::break_to(None)]),
        EvalErrorKind::UnmatchedSignal {
            signal: "break".to_string()
        }
    );
    assert_eq!(
        error(&[Stmt::next_to(Some("nowhere"))]),
        EvalErrorKind::UnmatchedSignal {
            signal: "next nowhere".to_string()
        }
    );

    let program = [
        Stmt::sub(SubDef::new("f", vec![], TypeNode::Inferred, vec![Stmt::break_to(None)])),
        Stmt::expr(Expr::invoke("f", vec![])),
    ];
    assert_eq!(
        error(&program),
        EvalErrorKind::UnmatchedSignal {
            signal: "break".to_string()
        }
    );
}

#[test]
fn test_test_expressions_must_be_bool() {
    let program = [if_then(Expr::int(1), vec![])];
    assert_eq!(
        error(&program),
        EvalErrorKind::InvalidTestExpression {
            type_name: "int".to_string()
        }
    );
}

#[test]
fn test_else_if_chain() {
    let program = [
        Stmt::decl("x", TypeNode::Inferred, Expr::int(7)),
        Stmt::if_else(
            vec![
                (
                    binary(name("x"), BinaryOp::Less, Expr::int(5)),
                    vec![println(Expr::string("small"))],
                ),
                (
                    binary(name("x"), BinaryOp::Less, Expr::int(10)),
                    vec![println(Expr::string("medium"))],
                ),
            ],
            Some(vec![println(Expr::string("large"))]),
        ),
    ];
    assert_eq!(output(&program), "medium\n");
}

#[test]
fn test_block_scoping_and_shadowing() {
    let program = [
        Stmt::decl("x", TypeNode::Inferred, Expr::int(1)),
        Stmt::block(vec![
            Stmt::decl("x", TypeNode::Inferred, Expr::int(2)),
            println(name("x")),
        ]),
        println(name("x")),
    ];
    assert_eq!(output(&program), "2\n1\n");

    let duplicate = [
        Stmt::decl("x", TypeNode::Inferred, Expr::int(1)),
        Stmt::decl("x", TypeNode::Inferred, Expr::int(2)),
    ];
    assert_eq!(
        error(&duplicate),
        EvalErrorKind::AlreadyDeclaredVariable {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_for_each_over_strings_and_pairs() {
    let chars = [Stmt::for_iterate(
        None,
        "c",
        Expr::string("abc"),
        vec![println(name("c"))],
    )];
    assert_eq!(output(&chars), "a\nb\nc\n");

    let pairs = Expr::array(vec![
        Expr::array(vec![Expr::int(1), Expr::int(2)]),
        Expr::array(vec![Expr::int(3), Expr::int(4)]),
    ]);
    let program = [Stmt::for_iterate_each(
        None,
        &["a", "b"],
        pairs.clone(),
        vec![println(concat(vec![name("a"), Expr::string("-"), name("b")]))],
    )];
    assert_eq!(output(&program), "1-2\n3-4\n");

    let wrong_arity = [Stmt::for_iterate_each(None, &["a", "b", "c"], pairs, vec![])];
    assert_eq!(
        error(&wrong_arity),
        EvalErrorKind::NonPartitionedType {
            expected: 3,
            got: 2
        }
    );

    let not_iterable = [Stmt::for_iterate(None, "x", Expr::int(3), vec![])];
    assert_eq!(
        error(&not_iterable),
        EvalErrorKind::NonIterableType {
            type_name: "int".to_string()
        }
    );
}

#[test]
fn test_errors_record_the_statements_they_unwind_through() {
    let program = [
        Stmt::decl("x", TypeNode::Inferred, Expr::int(0)),
        Stmt::while_loop(
            None,
            Expr::bool(true),
            vec![Stmt::expr(Expr::assign(
                "x",
                binary(Expr::int(1), BinaryOp::Divide, name("x")),
            ))],
        ),
    ];
    let Err(e) = run(&program).0 else {
        panic!("expected division by zero");
    };
    assert_eq!(e.kind, EvalErrorKind::DivisionByZero);
    let trace: Vec<_> = e.trace.iter().map(|t| t.what).collect();
    assert_eq!(trace, vec!["expression", "while loop"]);
}
