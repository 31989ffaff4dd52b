//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::rc::Rc;

use super::Interpreter;
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::library::{SharedLibrary, StandardLibrary};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for creating Interpreter instances.
///
/// Defaults: the [`StandardLibrary`], stdout printing, core declarations
/// enabled and no call-depth limit.
pub struct InterpreterBuilder {
    library: Option<SharedLibrary>,
    print_handler: Option<SharedPrintHandler>,
    core_declarations: bool,
    max_call_depth: Option<usize>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            library: None,
            print_handler: None,
            core_declarations: true,
            max_call_depth: None,
        }
    }

    /// Set the library `builtin` subs bind to.
    #[must_use]
    pub fn library(mut self, library: SharedLibrary) -> Self {
        self.library = Some(library);
        self
    }

    /// Set the print handler for the Print capability.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Whether the core declarations run before the first program.
    ///
    /// Turn this off when the library does not provide the standard natives.
    #[must_use]
    pub fn core_declarations(mut self, enabled: bool) -> Self {
        self.core_declarations = enabled;
        self
    }

    /// Fail with `StackOverflow` once this many sub calls are active.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            env: Environment::new(),
            library: self
                .library
                .unwrap_or_else(|| Rc::new(StandardLibrary::new())),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            call_stack: CallStack::new(self.max_call_depth),
            return_types: Vec::new(),
            core_enabled: self.core_declarations,
            core_loaded: false,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
