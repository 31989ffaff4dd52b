//! Registered subroutine overloads.

use std::fmt;
use std::rc::Rc;

use kb_ir::{Expr, Name, SubDef};

use crate::environment::{Scope, WeakScope};
use crate::library::Builtin;
use crate::types::Type;

/// A parameter with its type resolved in the declaring scope.
#[derive(Clone, Debug)]
pub struct ParamSlot {
    pub name: Name,
    pub ty: Type,
    pub default: Option<Expr>,
}

impl ParamSlot {
    pub fn is_vararg(&self) -> bool {
        matches!(self.ty, Type::Vararg(_))
    }
}

/// One overload as stored in a scope.
pub struct Subroutine {
    pub def: Rc<SubDef>,
    pub params: Vec<ParamSlot>,
    pub returns: Type,
    /// Normalized `name(type,type)`, lowercase.
    pub signature: String,
    /// Scope the sub was declared in; calls push a scope parented to it.
    pub scope: WeakScope<Scope>,
    /// Bound native for `builtin` subs.
    pub native: Option<Builtin>,
}

impl Subroutine {
    pub fn name(&self) -> &Name {
        &self.def.name
    }

    /// The trailing vararg parameter, if any.
    pub fn vararg(&self) -> Option<&ParamSlot> {
        self.params.last().filter(|p| p.is_vararg())
    }

    /// Parameters bound positionally (everything but a vararg tail).
    pub fn fixed_params(&self) -> &[ParamSlot] {
        match self.params.split_last() {
            Some((last, rest)) if last.is_vararg() => rest,
            _ => &self.params,
        }
    }
}

/// Build the normalized signature used for duplicate detection and for
/// native lookup.
pub fn signature(name: &str, params: &[ParamSlot]) -> String {
    let types = params
        .iter()
        .map(|p| p.ty.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}({types})", name.to_lowercase())
}

impl fmt::Debug for Subroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subroutine")
            .field("signature", &self.signature)
            .field("returns", &self.returns)
            .field("native", &self.native.is_some())
            .finish_non_exhaustive()
    }
}
