//! Subroutine calls.
//!
//! Arguments are evaluated exactly once, left to right, before any overload
//! is looked at. Resolution then runs in two phases over every visible
//! overload of the name:
//!
//! 1. positions: does the argument count fit the parameter list (defaults
//!    and a trailing vararg included)?
//! 2. types: do the arguments conform to the parameter types?
//!
//! Survivors of phase 1 are tried in order of parameter count (fewest
//! first, collection order on ties); the first that binds wins. Parameter
//! defaults are evaluated only for the winner.

use std::rc::Rc;

use kb_ir::{Argument, Expr, ExprKind, Name, Span};
use smallvec::SmallVec;

use super::types::{conform, hint};
use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::environment::Reference;
use crate::errors::{
    already_declared_variable, mismatched_builtin_type, mismatched_return_type,
    non_iterable_type, no_yield, unmatched_signal, unresolved_positions, unresolved_types,
    undeclared_sub, EvalError, EvalErrorKind, EvalResult,
};
use crate::exec::{Flow, Signal};
use crate::library::Builtin;
use crate::subroutine::{ParamSlot, Subroutine};
use crate::types::Type;
use crate::value::Value;

/// An argument after the caller-side evaluation pass.
enum Pending<'e> {
    Ready(Value),
    /// A composite literal without a target: evaluated per candidate,
    /// against the parameter type.
    Deferred(&'e Expr),
}

type Arguments<'e> = SmallVec<[Pending<'e>; 4]>;

/// Phase 1: argument count against the parameter list.
fn positions_fit(sub: &Subroutine, count: usize) -> bool {
    let fixed = sub.fixed_params();
    if count > fixed.len() && sub.vararg().is_none() {
        return false;
    }
    fixed
        .iter()
        .skip(count)
        .all(|param| param.default.is_some())
}

impl Interpreter {
    /// Call the overload of `name` that accepts `args`.
    ///
    /// The entry point for hosts and for operator dispatch on composites.
    pub fn invoke_values(&mut self, name: &str, args: Vec<Value>) -> EvalResult {
        let args: Arguments<'_> = args.into_iter().map(Pending::Ready).collect();
        self.call(name, &args, Span::DUMMY)
    }

    /// Evaluate call arguments, then resolve and invoke.
    ///
    /// `receiver` is the left side of a uniform call (`a.f(b)` is `f(a, b)`).
    pub(crate) fn eval_invoke(
        &mut self,
        name: &Name,
        args: &[Argument],
        receiver: Option<Value>,
        span: Span,
    ) -> EvalResult {
        let mut pending: Arguments<'_> = SmallVec::new();
        pending.extend(receiver.map(Pending::Ready));
        for arg in args {
            if arg.spread {
                let value = self.eval_expr(&arg.expr)?;
                let elements = value
                    .elements()
                    .ok_or_else(|| non_iterable_type(&value).or_span(arg.expr.span))?;
                pending.extend(elements.into_iter().map(Pending::Ready));
            } else if matches!(arg.expr.kind, ExprKind::Instantiate { target: None, .. }) {
                pending.push(Pending::Deferred(&arg.expr));
            } else {
                pending.push(Pending::Ready(self.eval_expr(&arg.expr)?));
            }
        }
        self.call(name.as_str(), &pending, span)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    fn call(&mut self, name: &str, args: &Arguments<'_>, span: Span) -> EvalResult {
        let (sub, bound) = self.resolve_overload(name, args)?;
        self.invoke_sub(&sub, bound, span)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %name, args = args.len()))]
    fn resolve_overload(
        &mut self,
        name: &str,
        args: &Arguments<'_>,
    ) -> Result<(Rc<Subroutine>, Vec<Value>), EvalError> {
        let mut candidates = Vec::new();
        self.env.current()?.borrow().collect_subs(name, &mut candidates);
        if candidates.is_empty() {
            return Err(undeclared_sub(name));
        }

        candidates.retain(|sub| positions_fit(sub, args.len()));
        if candidates.is_empty() {
            return Err(unresolved_positions(name));
        }

        // Stable: ties keep collection order.
        candidates.sort_by_key(|sub| sub.params.len());
        for sub in candidates {
            match self.bind_arguments(&sub, args) {
                Ok(slots) => {
                    tracing::debug!(signature = %sub.signature, "resolved overload");
                    let bound = self.fill_defaults(&sub, slots)?;
                    return Ok((sub, bound));
                }
                Err(e) if e.kind.is_type_error() => {
                    tracing::trace!(signature = %sub.signature, error = %e.message, "rejected overload");
                }
                Err(e) => return Err(e),
            }
        }
        Err(unresolved_types(name))
    }

    /// Phase 2: conform every supplied argument to its parameter. Vararg
    /// arguments are packed into one array of the element type. Slots left
    /// to their default come back as `None`.
    fn bind_arguments(
        &mut self,
        sub: &Subroutine,
        args: &Arguments<'_>,
    ) -> Result<Vec<Option<Value>>, EvalError> {
        let fixed = sub.fixed_params();
        let mut slots = Vec::with_capacity(sub.params.len());
        for (i, param) in fixed.iter().enumerate() {
            let value = match args.get(i) {
                Some(arg) => self.argument_value(param, &param.ty, arg)?,
                None => None,
            };
            slots.push(value.map(|v| conform(&param.ty, v)).transpose()?);
        }
        if let Some(vararg) = sub.vararg() {
            let element_type = vararg.ty.element_type().cloned().unwrap_or(Type::ANY);
            let mut rest = Vec::with_capacity(args.len().saturating_sub(fixed.len()));
            for arg in args.iter().skip(fixed.len()) {
                let value = self
                    .argument_value(vararg, &element_type, arg)?
                    .unwrap_or(Value::Empty);
                rest.push(conform(&element_type, value)?);
            }
            slots.push(Some(Value::array(element_type, rest)));
        }
        Ok(slots)
    }

    /// An explicit `empty` argument stands for "not supplied".
    fn argument_value(
        &mut self,
        param: &ParamSlot,
        ty: &Type,
        arg: &Pending<'_>,
    ) -> Result<Option<Value>, EvalError> {
        match arg {
            Pending::Ready(Value::Empty) if !param.is_vararg() => Ok(None),
            Pending::Ready(value) => Ok(Some(value.clone())),
            Pending::Deferred(expr) => self.eval_hinted(expr, hint(ty)).map(Some),
        }
    }

    /// Evaluate the defaults of the resolved overload. A default that does
    /// not conform is an error of the call, not a rejection of the overload.
    fn fill_defaults(
        &mut self,
        sub: &Subroutine,
        slots: Vec<Option<Value>>,
    ) -> Result<Vec<Value>, EvalError> {
        let mut bound = Vec::with_capacity(slots.len());
        for (param, slot) in sub.params.iter().zip(slots) {
            let value = match slot {
                Some(value) => value,
                None => {
                    let value = self.default_argument(sub, param)?;
                    conform(&param.ty, value)?
                }
            };
            bound.push(value);
        }
        Ok(bound)
    }

    /// Parameter default, evaluated below the sub's declaring scope; the
    /// type's default when the parameter has none.
    fn default_argument(&mut self, sub: &Subroutine, param: &ParamSlot) -> EvalResult {
        match &param.default {
            Some(expr) => {
                let scope = sub.scope.live()?;
                self.with_scope_in(scope, |s| s.eval_hinted(expr, hint(&param.ty)))
            }
            None => self.default_value(&param.ty),
        }
    }

    /// Run a resolved overload with its bound arguments.
    fn invoke_sub(&mut self, sub: &Rc<Subroutine>, bound: Vec<Value>, span: Span) -> EvalResult {
        self.call_stack
            .push(CallFrame {
                signature: sub.signature.clone(),
                call_span: span,
            })
            .map_err(|e| e.or_span(span))?;
        let result = match &sub.native {
            Some(native) => self.call_native(sub, native, bound),
            None => self.run_body(sub, bound),
        };
        let result = result.map_err(|e| e.with_backtrace(self.call_stack.capture()));
        self.call_stack.pop();
        result
    }

    /// Native results are checked, never coerced.
    fn call_native(&mut self, sub: &Subroutine, native: &Builtin, bound: Vec<Value>) -> EvalResult {
        let value = (native.function)(self, bound)?;
        match sub.returns.check(&value) {
            Ok(()) => Ok(value),
            Err(_) => Err(mismatched_builtin_type(
                &sub.signature,
                &sub.returns,
                &value.type_name(),
            )),
        }
    }

    fn run_body(&mut self, sub: &Rc<Subroutine>, bound: Vec<Value>) -> EvalResult {
        let scope = sub.scope.live()?;
        self.with_scope_in(scope, |scoped| {
            let current = scoped.env.current()?;
            for (param, value) in sub.params.iter().zip(bound) {
                current
                    .borrow_mut()
                    .declare(param.name.clone(), Reference::new(param.ty.clone(), value, false))
                    .map_err(|_| already_declared_variable(param.name.as_str()))?;
            }

            // The implicit result slot, named after the sub.
            let initial = match scoped.default_value(&sub.returns) {
                Ok(value) => value,
                Err(e) if matches!(e.kind, EvalErrorKind::NoDefaultValue { .. }) => Value::Empty,
                Err(e) => return Err(e),
            };
            let slot = current
                .borrow_mut()
                .declare(
                    sub.name().clone(),
                    Reference::new(sub.returns.clone(), initial, false),
                )
                .map_err(|_| already_declared_variable(sub.name().as_str()))?;

            scoped.return_types.push(sub.returns.clone());
            let flow = scoped.exec_block(&sub.def.body);
            scoped.return_types.pop();

            match flow? {
                Flow::Normal | Flow::Signal(Signal::Return) => match slot.get() {
                    Value::Empty => Err(no_yield(sub.name().as_str())),
                    value => Ok(value),
                },
                Flow::Signal(Signal::Yield(value)) => {
                    let shown = value.clone();
                    sub.returns
                        .conform(value)
                        .map_err(|_| mismatched_return_type(sub.name().as_str(), &sub.returns, &shown))
                }
                Flow::Signal(signal) => Err(unmatched_signal(&signal.to_string())),
            }
        })
    }
}
