//! KB Eval - tree-walking runtime for KB programs.
//!
//! Receives an already-parsed [`kb_ir`] tree and executes it: structural
//! type checks at every typed boundary, lexically scoped typed storage,
//! two-phase overload resolution and labelled non-local control flow.
//!
//! # Architecture
//!
//! - `value` / `types`: the closed value union and the runtime type model
//!   (`filter`, `coerce`, `cast`, defaults)
//! - `environment`: scopes, typed references and the scope stack
//! - `exec`: control-flow signals and how constructs consume them
//! - `interpreter`: statement execution, expression evaluation, calls
//! - `operators` / `unary_operators`: value-level operator semantics
//! - `library`: the native function capability `builtin` subs bind to
//! - `print_handler`: the Print capability natives write through

mod core_decls;
mod diagnostics;
mod environment;
pub mod errors;
pub mod exec;
pub mod interpreter;
pub mod library;
mod operators;
mod print_handler;
mod stack;
mod subroutine;
pub mod types;
mod unary_operators;
pub mod value;

pub use core_decls::core_declarations;
pub use diagnostics::{CallFrame, CallStack};
pub use environment::{Environment, LocalScope, PutResult, Reference, Scope, WeakScope};
pub use errors::{EvalBacktrace, EvalError, EvalErrorKind, EvalResult, TraceEntry};
pub use exec::{ExecResult, Flow, Signal};
pub use interpreter::{Interpreter, InterpreterBuilder, Outcome, ScopedInterpreter};
pub use library::{Builtin, EmptyLibrary, Library, NativeFn, SharedLibrary, StandardLibrary};
pub use operators::{evaluate_binary, values_equal};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use stack::ensure_sufficient_stack;
pub use subroutine::{ParamSlot, Subroutine};
pub use types::{Mismatch, Type};
pub use unary_operators::evaluate_unary;
pub use value::{ArrayInstance, DataInstance, EnumEntry, Value};

#[cfg(test)]
mod tests;
