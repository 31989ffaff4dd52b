//! Data declarations, member access, operator subs and enums.

use kb_ir::{
    BinaryOp, DataField, EnumEntryDef, Expr, Param, PrimitiveType as P, Stmt, SubDef, TypeNode,
    UnaryOp,
};
use pretty_assertions::assert_eq;

use super::{binary, concat, error, output, println};
use crate::errors::EvalErrorKind;

fn name(n: &str) -> Expr {
    Expr::name(n)
}

fn member(target: &str, field: &str) -> Expr {
    Expr::get_member(name(target), field)
}

fn point_decl() -> Stmt {
    Stmt::data(
        "Point",
        vec![
            DataField::new("x", P::Int),
            DataField::new("y", P::Int).with_default(Expr::int(5)),
        ],
    )
}

fn point(name: &str, elements: Vec<Expr>) -> Stmt {
    Stmt::decl(
        name,
        TypeNode::named("Point"),
        Expr::instantiate(None, elements),
    )
}

#[test]
fn test_missing_elements_take_defaults() {
    let program = [
        point_decl(),
        point("p", vec![Expr::int(1)]),
        point("q", vec![]),
        println(Expr::unary(UnaryOp::Unwrap, name("p"))),
        println(name("q")),
    ];
    assert_eq!(output(&program), "[1, 5]\nPoint{0, 5}\n");
}

#[test]
fn test_member_and_index_access() {
    let program = [
        point_decl(),
        point("p", vec![Expr::int(1), Expr::int(2)]),
        Stmt::expr(Expr::set_member(name("p"), "x", Expr::int(7))),
        println(member("p", "x")),
        println(binary(name("p"), BinaryOp::Dot, name("y"))),
        println(Expr::get_index(name("p"), Expr::int(1))),
        Stmt::expr(Expr::set_index(name("p"), Expr::int(1), Expr::int(3))),
        println(name("p")),
    ];
    assert_eq!(output(&program), "7\n2\n2\nPoint{7, 3}\n");
}

#[test]
fn test_instances_are_shared_between_variables() {
    let program = [
        point_decl(),
        point("p", vec![Expr::int(1)]),
        Stmt::decl("q", TypeNode::Inferred, name("p")),
        Stmt::expr(Expr::set_member(name("q"), "x", Expr::int(9))),
        println(member("p", "x")),
    ];
    assert_eq!(output(&program), "9\n");
}

#[test]
fn test_explicit_target() {
    let program = [
        point_decl(),
        Stmt::decl(
            "p",
            TypeNode::Inferred,
            Expr::instantiate(
                Some(TypeNode::named("Point")),
                vec![Expr::int(3), Expr::int(4)],
            ),
        ),
        println(name("p")),
    ];
    assert_eq!(output(&program), "Point{3, 4}\n");
}

#[test]
fn test_instantiation_errors() {
    let too_many = [
        point_decl(),
        point("p", vec![Expr::int(1), Expr::int(2), Expr::int(3)]),
    ];
    assert_eq!(
        error(&too_many),
        EvalErrorKind::NonPartitionedType {
            expected: 2,
            got: 3
        }
    );

    let wrong_type = [point_decl(), point("p", vec![Expr::string("a")])];
    assert_eq!(
        error(&wrong_type),
        EvalErrorKind::MismatchedType {
            expected: "int".to_string(),
            got: "string".to_string()
        }
    );

    let untargeted = [Stmt::decl(
        "p",
        TypeNode::Inferred,
        Expr::instantiate(None, vec![Expr::int(1)]),
    )];
    assert_eq!(error(&untargeted), EvalErrorKind::CannotInferType);

    assert_eq!(
        error(&[point_decl(), point_decl()]),
        EvalErrorKind::AlreadyDeclaredData {
            name: "Point".to_string()
        }
    );
}

#[test]
fn test_member_errors() {
    let missing = [
        point_decl(),
        point("p", vec![]),
        println(member("p", "z")),
    ];
    assert_eq!(
        error(&missing),
        EvalErrorKind::NoMember {
            target: "Point".to_string(),
            member: "z".to_string()
        }
    );

    let constant = [
        Stmt::data(
            "Account",
            vec![
                DataField::new("id", P::Int).constant(),
                DataField::new("balance", P::Double),
            ],
        ),
        Stmt::decl(
            "a",
            TypeNode::named("Account"),
            Expr::instantiate(None, vec![Expr::int(1)]),
        ),
        Stmt::expr(Expr::set_member(name("a"), "balance", Expr::int(10))),
        Stmt::expr(Expr::set_member(name("a"), "id", Expr::int(2))),
    ];
    assert_eq!(
        error(&constant),
        EvalErrorKind::ReassignedConstant {
            name: "id".to_string()
        }
    );

    let not_composite = [
        Stmt::decl("n", TypeNode::Inferred, Expr::int(1)),
        println(member("n", "x")),
    ];
    assert_eq!(
        error(&not_composite),
        EvalErrorKind::NonAccessedType {
            type_name: "int".to_string()
        }
    );
}

fn point_sub(name: &str, params: Vec<Param>, returns: impl Into<TypeNode>, value: Expr) -> Stmt {
    Stmt::sub(SubDef::new(name, params, returns, vec![Stmt::yield_value(value)]))
}

#[test]
fn test_operator_subs() {
    let program = [
        point_decl(),
        point_sub(
            "add",
            vec![
                Param::new("a", TypeNode::named("Point")),
                Param::new("b", TypeNode::named("Point")),
            ],
            TypeNode::named("Point"),
            Expr::instantiate(
                None,
                vec![
                    binary(member("a", "x"), BinaryOp::Add, member("b", "x")),
                    binary(member("a", "y"), BinaryOp::Add, member("b", "y")),
                ],
            ),
        ),
        point_sub(
            "stringify",
            vec![Param::new("p", TypeNode::named("Point"))],
            P::String,
            concat(vec![
                Expr::string("("),
                member("p", "x"),
                Expr::string(", "),
                member("p", "y"),
                Expr::string(")"),
            ]),
        ),
        point("p", vec![Expr::int(1), Expr::int(2)]),
        point("q", vec![Expr::int(3), Expr::int(4)]),
        println(Expr::unary(
            UnaryOp::Stringify,
            binary(name("p"), BinaryOp::Add, name("q")),
        )),
    ];
    assert_eq!(output(&program), "(4, 6)\n");
}

#[test]
fn test_stringify_falls_back_to_display() {
    let program = [
        point_decl(),
        point("p", vec![Expr::int(1)]),
        println(Expr::unary(UnaryOp::Stringify, name("p"))),
    ];
    assert_eq!(output(&program), "Point{1, 5}\n");
}

fn color_decl() -> Stmt {
    Stmt::basic_enum(
        "Color",
        TypeNode::Inferred,
        vec![
            EnumEntryDef::new("Red", vec![]),
            EnumEntryDef::new("Green", vec![]),
            EnumEntryDef::new("Blue", vec![Expr::int(10)]),
        ],
    )
}

#[test]
fn test_basic_enum_entries() {
    let program = [
        color_decl(),
        println(Expr::enum_entry("Color", "Green")),
        println(Expr::get_member(Expr::enum_entry("Color", "Green"), "ordinal")),
        println(Expr::get_member(Expr::enum_entry("Color", "Red"), "value")),
        println(Expr::unary(UnaryOp::Unwrap, Expr::enum_entry("Color", "Blue"))),
        println(Expr::get_member(Expr::enum_entry("Color", "Blue"), "name")),
    ];
    assert_eq!(output(&program), "Green\n1\n0\n10\nBlue\n");
}

#[test]
fn test_enum_default_iteration_and_equality() {
    let program = [
        color_decl(),
        Stmt::decl("c", TypeNode::named("Color"), Expr::empty()),
        println(name("c")),
        println(binary(
            name("c"),
            BinaryOp::Equal,
            Expr::enum_entry("Color", "Red"),
        )),
        Stmt::for_iterate(
            None,
            "each",
            Expr::ty(TypeNode::named("Color")),
            vec![println(name("each"))],
        ),
    ];
    assert_eq!(output(&program), "Red\ntrue\nRed\nGreen\nBlue\n");
}

#[test]
fn test_typed_enum_values() {
    let program = [
        Stmt::basic_enum(
            "Greeting",
            P::String,
            vec![
                EnumEntryDef::new("Hello", vec![Expr::string("hi")]),
                EnumEntryDef::new("Bye", vec![]),
            ],
        ),
        Stmt::basic_enum(
            "Level",
            P::Byte,
            vec![EnumEntryDef::new("Low", vec![]), EnumEntryDef::new("High", vec![])],
        ),
        println(Expr::unary(UnaryOp::Unwrap, Expr::enum_entry("Greeting", "Hello"))),
        println(Expr::unary(
            UnaryOp::Length,
            Expr::unary(UnaryOp::Unwrap, Expr::enum_entry("Greeting", "Bye")),
        )),
        println(Expr::unary(UnaryOp::Unwrap, Expr::enum_entry("Level", "High"))),
    ];
    assert_eq!(output(&program), "hi\n0\n1\n");
}

#[test]
fn test_data_enum() {
    let program = [
        Stmt::data(
            "Planet",
            vec![
                DataField::new("mass", P::Double),
                DataField::new("radius", P::Double),
            ],
        ),
        Stmt::data_enum(
            "Planets",
            "Planet",
            vec![
                EnumEntryDef::new("Earth", vec![Expr::double(5.97), Expr::double(6.37)]),
                EnumEntryDef::new("Mars", vec![Expr::double(0.642)]),
            ],
        ),
        println(Expr::unary(UnaryOp::Unwrap, Expr::enum_entry("Planets", "Mars"))),
        println(Expr::get_member(
            Expr::unary(UnaryOp::Unwrap, Expr::enum_entry("Planets", "Earth")),
            "radius",
        )),
    ];
    assert_eq!(output(&program), "Planet{0.642, 0}\n6.37\n");
}

#[test]
fn test_enum_errors() {
    assert_eq!(
        error(&[color_decl(), println(Expr::enum_entry("Color", "Purple"))]),
        EvalErrorKind::NoMember {
            target: "Color".to_string(),
            member: "Purple".to_string()
        }
    );
    assert_eq!(
        error(&[println(Expr::enum_entry("Shade", "Red"))]),
        EvalErrorKind::UndeclaredEnum {
            name: "Shade".to_string()
        }
    );
    assert_eq!(
        error(&[
            color_decl(),
            Stmt::expr(Expr::set_member(
                Expr::enum_entry("Color", "Red"),
                "ordinal",
                Expr::int(3)
            )),
        ]),
        EvalErrorKind::ReassignedConstant {
            name: "ordinal".to_string()
        }
    );
}
