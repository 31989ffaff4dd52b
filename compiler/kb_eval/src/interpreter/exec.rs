//! Statement execution.
//!
//! Each executor returns a [`Flow`]. Loops, `do` blocks and switches consume
//! the `break`/`next` signals aimed at them; everything else travels up to
//! the enclosing construct.

use kb_ir::{BinaryOp, Case, CaseKind, Expr, ExprKind, Name, Stmt, StmtKind, TypeNode};

use super::types::hint;
use super::Interpreter;
use crate::errors::{
    cannot_infer_type, invalid_test_expression, non_iterable_type, non_partitioned_type,
    EvalError,
};
use crate::exec::control::{block_flow, case_action, loop_action, CaseAction, LoopAction};
use crate::exec::{ExecResult, Flow, Signal};
use crate::operators::values_equal;
use crate::stack::ensure_sufficient_stack;
use crate::types::Type;
use crate::value::Value;

impl Interpreter {
    /// Execute one statement.
    ///
    /// An error leaving the statement records its kind and span.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        ensure_sufficient_stack(|| self.exec_inner(stmt))
            .map_err(|e| e.traced(stmt.kind.describe(), stmt.span))
    }

    /// Execute statements in the current scope, stopping at the first signal.
    pub fn exec_block(&mut self, body: &[Stmt]) -> ExecResult {
        for stmt in body {
            if let flow @ Flow::Signal(_) = self.exec_stmt(stmt)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute statements in a fresh scope.
    fn exec_scoped(&mut self, body: &[Stmt]) -> ExecResult {
        self.with_env_scope(|scoped| scoped.exec_block(body))
    }

    fn exec_inner(&mut self, stmt: &Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::None => Ok(Flow::Normal),
            StmtKind::Expression(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Decl {
                name,
                ty,
                init,
                constant,
            } => {
                self.exec_decl(name, ty, init, *constant)?;
                Ok(Flow::Normal)
            }
            StmtKind::DeclEach {
                names,
                init,
                constant,
            } => {
                let value = self.eval_expr(init)?;
                let elements = value.elements().ok_or_else(|| non_iterable_type(&value))?;
                self.bind_each(names, elements, *constant)?;
                Ok(Flow::Normal)
            }
            StmtKind::Block(body) => self.exec_scoped(body),
            StmtKind::Do { label, body } => Ok(block_flow(self.exec_scoped(body)?, label.as_ref())),
            StmtKind::If {
                branches,
                otherwise,
            } => {
                for (test, body) in branches {
                    if self.eval_test(test)? {
                        return self.exec_scoped(body);
                    }
                }
                match otherwise {
                    Some(body) => self.exec_scoped(body),
                    None => Ok(Flow::Normal),
                }
            }
            StmtKind::Switch {
                label,
                subject,
                cases,
            } => self.exec_switch(label.as_ref(), subject, cases),
            StmtKind::While { label, test, body } => {
                while self.eval_test(test)? {
                    match loop_action(self.exec_scoped(body)?, label.as_ref()) {
                        LoopAction::Continue => {}
                        LoopAction::Break => break,
                        LoopAction::Propagate(signal) => return Ok(Flow::Signal(signal)),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Until { label, test, body } => {
                loop {
                    match loop_action(self.exec_scoped(body)?, label.as_ref()) {
                        LoopAction::Continue => {}
                        LoopAction::Break => break,
                        LoopAction::Propagate(signal) => return Ok(Flow::Signal(signal)),
                    }
                    if self.eval_test(test)? {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::ForCounter {
                label,
                name,
                ty,
                from,
                to,
                step,
                body,
            } => self.exec_for_counter(label.as_ref(), name, ty, from, to, step.as_ref(), body),
            StmtKind::ForIterate {
                label,
                name,
                ty,
                iterable,
                body,
            } => {
                let ty = self.resolve_type(ty)?;
                let values = self.iteration_values(iterable)?;
                for value in values {
                    let flow = self.with_env_scope(|scoped| {
                        scoped.bind(name, ty.clone(), value, false)?;
                        scoped.exec_block(body)
                    })?;
                    match loop_action(flow, label.as_ref()) {
                        LoopAction::Continue => {}
                        LoopAction::Break => break,
                        LoopAction::Propagate(signal) => return Ok(Flow::Signal(signal)),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::ForIterateEach {
                label,
                names,
                iterable,
                body,
            } => {
                let values = self.iteration_values(iterable)?;
                for value in values {
                    let elements = value.elements().ok_or_else(|| non_iterable_type(&value))?;
                    let flow = self.with_env_scope(|scoped| {
                        scoped.bind_each(names, elements, false)?;
                        scoped.exec_block(body)
                    })?;
                    match loop_action(flow, label.as_ref()) {
                        LoopAction::Continue => {}
                        LoopAction::Break => break,
                        LoopAction::Propagate(signal) => return Ok(Flow::Signal(signal)),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Data { name, fields } => {
                self.declare_data(name, fields)?;
                Ok(Flow::Normal)
            }
            StmtKind::Sub(def) => {
                self.declare_sub(def)?;
                Ok(Flow::Normal)
            }
            StmtKind::TypeAlias { name, ty } => {
                self.declare_alias(name, ty)?;
                Ok(Flow::Normal)
            }
            StmtKind::Enum {
                name,
                kind,
                entries,
            } => {
                self.declare_enum(name, kind, entries)?;
                Ok(Flow::Normal)
            }
            StmtKind::Break(label) => Ok(Flow::Signal(Signal::Break(label.clone()))),
            StmtKind::Next(label) => Ok(Flow::Signal(Signal::Next(label.clone()))),
            StmtKind::Return => Ok(Flow::Signal(Signal::Return)),
            StmtKind::Yield(expr) => {
                let expected = self.return_types.last().cloned();
                let value = self.eval_hinted(expr, expected.as_ref().and_then(hint))?;
                Ok(Flow::Signal(Signal::Yield(value)))
            }
        }
    }

    /// A test expression must be a `bool`.
    fn eval_test(&mut self, test: &Expr) -> Result<bool, EvalError> {
        match self.eval_expr(test)? {
            Value::Bool(b) => Ok(b),
            other => Err(invalid_test_expression(&other).or_span(test.span)),
        }
    }

    fn exec_decl(
        &mut self,
        name: &Name,
        ty: &TypeNode,
        init: &Expr,
        constant: bool,
    ) -> Result<(), EvalError> {
        let ty = self.resolve_type(ty)?;
        let value = match self.eval_hinted(init, hint(&ty))? {
            Value::Empty if ty == Type::Inferred => return Err(cannot_infer_type().or_span(init.span)),
            Value::Empty => self.default_value(&ty)?,
            value => value,
        };
        self.bind(name, ty, value, constant)?;
        Ok(())
    }

    /// Positional destructuring into several declarations.
    fn bind_each(
        &mut self,
        names: &[(Name, TypeNode)],
        elements: Vec<Value>,
        constant: bool,
    ) -> Result<(), EvalError> {
        if names.len() != elements.len() {
            return Err(non_partitioned_type(names.len(), elements.len()));
        }
        for ((name, node), value) in names.iter().zip(elements) {
            let ty = self.resolve_type(node)?;
            self.bind(name, ty, value, constant)?;
        }
        Ok(())
    }

    fn exec_switch(&mut self, label: Option<&Name>, subject: &Expr, cases: &[Case]) -> ExecResult {
        let subject = self.eval_expr(subject)?;
        for case in cases {
            if !self.case_matches(&subject, &case.kind)? {
                continue;
            }
            match case_action(self.exec_scoped(&case.body)?, label) {
                CaseAction::Done => return Ok(Flow::Normal),
                CaseAction::Fallthrough => {}
                CaseAction::Propagate(signal) => return Ok(Flow::Signal(signal)),
            }
        }
        Ok(Flow::Normal)
    }

    fn case_matches(&mut self, subject: &Value, kind: &CaseKind) -> Result<bool, EvalError> {
        match kind {
            CaseKind::Values(values) => {
                for expr in values {
                    let value = self.eval_expr(expr)?;
                    if values_equal(subject, &value) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            CaseKind::Type { ty, inverted } => {
                let ty = self.resolve_type(ty)?;
                Ok(ty.check(subject).is_ok() != *inverted)
            }
            CaseKind::Else => Ok(true),
        }
    }

    /// Counting loop: `name < to` is tested before every body execution and
    /// `name = name + step` runs after it. Both are ordinary expressions
    /// evaluated in the loop's private scope.
    #[allow(clippy::too_many_arguments, reason = "mirrors the statement's fields")]
    fn exec_for_counter(
        &mut self,
        label: Option<&Name>,
        name: &Name,
        ty: &TypeNode,
        from: &Expr,
        to: &Expr,
        step: Option<&Expr>,
        body: &[Stmt],
    ) -> ExecResult {
        let counter = Expr::synthetic(ExprKind::Name(name.clone()));
        let test = Expr::binary(BinaryOp::Less, counter.clone(), to.clone()).at(to.span);
        let step = step.cloned().unwrap_or_else(|| Expr::int(1));
        let increment = Expr::binary(
            BinaryOp::Assign,
            counter.clone(),
            Expr::binary(BinaryOp::Add, counter, step),
        )
        .at(from.span);

        self.with_env_scope(|scoped| {
            let ty = scoped.resolve_type(ty)?;
            let start = scoped.eval_hinted(from, hint(&ty))?;
            scoped.bind(name, ty, start, false)?;
            while scoped.eval_test(&test)? {
                match loop_action(scoped.exec_scoped(body)?, label) {
                    LoopAction::Continue => {}
                    LoopAction::Break => break,
                    LoopAction::Propagate(signal) => return Ok(Flow::Signal(signal)),
                }
                scoped.eval_expr(&increment)?;
            }
            Ok(Flow::Normal)
        })
    }
}
