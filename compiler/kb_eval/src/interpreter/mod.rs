//! Tree-walking interpreter for KB.
//!
//! # Architecture
//!
//! Statements go through [`Interpreter::exec_stmt`] (`exec.rs`) and return a
//! [`Flow`]; expressions go through [`Interpreter::eval_expr`] (`eval.rs`).
//! Helper modules:
//!
//! - `call` - argument evaluation, two-phase overload resolution, invocation
//! - `declare` - sub, data, enum and alias registration
//! - `types` - type resolution, defaults, instantiation, iteration
//! - `scope_guard` - RAII scope push/pop
//!
//! Every scope push goes through the guard, so scopes are popped on normal
//! completion, on signals and on errors alike.

mod builder;
mod call;
mod declare;
mod eval;
mod exec;
mod scope_guard;
mod types;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use kb_ir::{Expr, Stmt};

use crate::core_decls::core_declarations;
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::errors::{unmatched_signal, EvalError, EvalResult};
use crate::exec::{Flow, Signal};
use crate::library::SharedLibrary;
use crate::print_handler::SharedPrintHandler;
use crate::types::Type;
use crate::value::Value;

/// How a program finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Fell off the end, or hit a top-level `return`.
    Completed,
    /// A top-level `yield`.
    Yielded(Value),
}

/// The tree-walking interpreter.
pub struct Interpreter {
    pub(crate) env: Environment,
    library: SharedLibrary,
    print_handler: SharedPrintHandler,
    pub(crate) call_stack: CallStack,
    /// Return types of the subs being executed, innermost last. Gives
    /// `yield` a target type for composite literals.
    pub(crate) return_types: Vec<Type>,
    core_enabled: bool,
    core_loaded: bool,
}

impl Interpreter {
    /// An interpreter with the standard library printing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn library(&self) -> &SharedLibrary {
        &self.library
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run a program in the global scope.
    ///
    /// The core declarations run first, once per interpreter. Declarations
    /// made by the program stay in the global scope for later runs.
    pub fn run(&mut self, program: &[Stmt]) -> Result<Outcome, EvalError> {
        self.load_core()?;
        match self.exec_block(program)? {
            Flow::Normal | Flow::Signal(Signal::Return) => Ok(Outcome::Completed),
            Flow::Signal(Signal::Yield(value)) => Ok(Outcome::Yielded(value)),
            Flow::Signal(signal) => {
                tracing::warn!(%signal, "signal escaped the program");
                Err(unmatched_signal(&signal.to_string()))
            }
        }
    }

    /// Evaluate a single expression in the current scope.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        self.load_core()?;
        self.eval_expr(expr)
    }

    /// Current value of a visible variable.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        self.env.resolve(name).map(|r| r.get())
    }

    fn load_core(&mut self) -> Result<(), EvalError> {
        if self.core_enabled && !self.core_loaded {
            self.core_loaded = true;
            let core = core_declarations();
            self.exec_block(&core)?;
            tracing::debug!(count = core.len(), "loaded core declarations");
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
