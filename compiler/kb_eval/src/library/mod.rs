//! The native function capability.
//!
//! `builtin` subs never carry a body: at declaration time their normalized
//! signature is looked up in the interpreter's [`Library`], and calls go
//! straight to the bound [`NativeFn`].

mod standard;

use std::rc::Rc;

use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::types::Type;
use crate::value::Value;

pub use standard::StandardLibrary;

/// A native function. Arguments arrive already resolved and conformed to
/// the declared parameter types.
pub type NativeFn = fn(&mut Interpreter, Vec<Value>) -> EvalResult;

/// A native bound to a signature.
#[derive(Clone)]
pub struct Builtin {
    pub function: NativeFn,
    /// The type the native promises to return. Must equal the declaring
    /// sub's return type.
    pub returns: Type,
}

impl Builtin {
    pub fn new(function: NativeFn, returns: Type) -> Self {
        Builtin { function, returns }
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Resolves builtin signatures (`name(type,type)`, lowercase) to natives.
pub trait Library {
    fn lookup(&self, signature: &str) -> Option<Builtin>;
}

/// Library handle owned by the interpreter.
pub type SharedLibrary = Rc<dyn Library>;

/// A library with no natives at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyLibrary;

impl Library for EmptyLibrary {
    fn lookup(&self, _signature: &str) -> Option<Builtin> {
        None
    }
}
