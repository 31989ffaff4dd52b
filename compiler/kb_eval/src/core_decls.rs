//! The fixed core statement list.
//!
//! Runs once in the global scope before the first program, declaring the
//! `builtin` subs that bind to [`StandardLibrary`](crate::library::StandardLibrary).

use kb_ir::{Param, PrimitiveType, Stmt, SubDef, TypeNode};

fn builtin(name: &str, params: &[(&str, TypeNode)], returns: PrimitiveType) -> Stmt {
    let params = params
        .iter()
        .map(|(name, ty)| Param::new(name, ty.clone()))
        .collect();
    Stmt::sub(SubDef::builtin(name, params, returns))
}

/// Builtin sub declarations for the standard natives.
pub fn core_declarations() -> Vec<Stmt> {
    use PrimitiveType as P;

    vec![
        builtin("print", &[("value", P::Any.into())], P::None),
        builtin("println", &[("value", P::Any.into())], P::None),
        builtin("abs", &[("n", P::Int.into())], P::Int),
        builtin("abs", &[("n", P::Double.into())], P::Double),
        builtin("sqrt", &[("n", P::Double.into())], P::Double),
        builtin("floor", &[("n", P::Double.into())], P::Double),
        builtin("upper", &[("text", P::String.into())], P::String),
        builtin("lower", &[("text", P::String.into())], P::String),
        builtin("ord", &[("c", P::Char.into())], P::Int),
        builtin("chr", &[("code", P::Int.into())], P::Char),
        builtin("size", &[("items", TypeNode::array(P::Any.into()))], P::Int),
    ]
}
