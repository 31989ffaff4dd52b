//! RAII-style scope guards for Interpreter environment management.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`, so
//! everything the interpreter can do is available through it. Dropping the
//! guard pops the scope, including while a signal or error propagates and
//! during unwinding.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::{LocalScope, Scope};

/// RAII guard that pops one environment scope on drop.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push a block scope parented to the current one.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Push a scope with an explicit lexical parent.
    ///
    /// Sub bodies, parameter defaults and field defaults evaluate below the
    /// scope they were declared in, not below the caller.
    pub fn scoped_in(&mut self, parent: LocalScope<Scope>) -> ScopedInterpreter<'_> {
        self.env.push_scope_with_parent(parent);
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` in a fresh block scope.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` in a fresh scope parented to `parent`.
    pub fn with_scope_in<T, F>(&mut self, parent: LocalScope<Scope>, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
    {
        let mut scoped = self.scoped_in(parent);
        f(&mut scoped)
    }
}

#[cfg(test)]
mod tests;
