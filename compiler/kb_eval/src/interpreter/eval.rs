//! Expression evaluation.

use std::rc::Rc;

use kb_ir::{BinaryOp, Expr, ExprKind, Literal, Name, UnaryOp};

use super::types::{conform, hint};
use super::Interpreter;
use crate::environment::{PutResult, Reference};
use crate::errors::{
    assigned_empty, assigned_to_non_reference, cannot_infer_type, invalid_cast, invalid_index,
    invalid_left_operand, invalid_right_operand, mismatched_type, no_member, non_accessed_type,
    non_indexed_type, reassigned_constant, rejected, undeclared_enum, undeclared_variable,
    EvalError, EvalResult,
};
use crate::operators::evaluate_binary;
use crate::stack::ensure_sufficient_stack;
use crate::types::Type;
use crate::unary_operators::evaluate_unary;
use crate::value::Value;

fn literal(literal: &Literal) -> Value {
    match literal {
        Literal::None => Value::None,
        Literal::Bool(v) => Value::Bool(*v),
        Literal::Byte(v) => Value::Byte(*v),
        Literal::Short(v) => Value::Short(*v),
        Literal::Int(v) => Value::Int(*v),
        Literal::Long(v) => Value::Long(*v),
        Literal::Float(v) => Value::Float(*v),
        Literal::Double(v) => Value::Double(*v),
        Literal::Char(v) => Value::Char(*v),
        Literal::String(v) => Value::string(v),
    }
}

/// Index as a position, for strings, arrays and composites.
fn position(index: &Value) -> Result<usize, EvalError> {
    index
        .as_integral()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid_index(index))
}

impl Interpreter {
    /// Evaluate an expression.
    ///
    /// Errors carry the span of the innermost failing node.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr)).map_err(|e| e.or_span(expr.span))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Empty => Ok(Value::Empty),
            ExprKind::Value(lit) => Ok(literal(lit)),
            ExprKind::Name(name) => self
                .env
                .resolve(name.as_str())
                .map(|r| r.get())
                .ok_or_else(|| undeclared_variable(name.as_str())),
            ExprKind::Type(node) => {
                let ty = self.resolve_type(node)?;
                self.default_value(&ty)
            }
            ExprKind::Array(elements) => self.eval_array(elements, None),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::GetIndex { target, index } => {
                let target = self.eval_expr(target)?;
                let index = self.eval_expr(index)?;
                self.get_index(&target, &index)
            }
            ExprKind::SetIndex {
                target,
                index,
                value,
            } => self.set_index(target, index, value),
            ExprKind::GetMember { target, member } => {
                let target = self.eval_expr(target)?;
                get_member(&target, member)
            }
            ExprKind::SetMember {
                target,
                member,
                value,
            } => self.set_member(target, member, value),
            ExprKind::Invoke { name, args } => self.eval_invoke(name, args, None, expr.span),
            ExprKind::Instantiate {
                target: Some(node),
                elements,
            } => {
                let ty = self.resolve_type(node)?;
                self.instantiate(&ty, elements)
            }
            ExprKind::Instantiate { target: None, .. } => Err(cannot_infer_type()),
            ExprKind::GetEnumEntry { target, entry } => {
                let decl = self
                    .env
                    .current()?
                    .borrow()
                    .resolve_enum(target.as_str())
                    .ok_or_else(|| undeclared_enum(target.as_str()))?;
                decl.entry(entry.as_str())
                    .cloned()
                    .map(Value::Enum)
                    .ok_or_else(|| no_member(target.as_str(), entry.as_str()))
            }
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult {
        let value = self.eval_expr(operand)?;
        if let (Value::Data(_), Some(sub)) = (&value, op.operator_sub_name()) {
            // `stringify` falls back to the display form when not declared.
            if op != UnaryOp::Stringify || self.env.current()?.borrow().has_sub(sub) {
                return self.invoke_values(sub, vec![value]);
            }
        }
        evaluate_unary(&value, op)
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        match op {
            BinaryOp::Assign => {
                let ExprKind::Name(name) = &left.kind else {
                    return Err(assigned_to_non_reference().or_span(left.span));
                };
                let reference = self.reference(name)?;
                let value = self.eval_hinted(right, hint(reference.ty()))?;
                store(&reference, name.as_str(), value)
            }
            BinaryOp::Swap => self.swap(left, right),
            BinaryOp::And | BinaryOp::Or => {
                let symbol = op.as_symbol();
                let decided = match self.eval_expr(left)? {
                    Value::Bool(b) => b == (op == BinaryOp::Or),
                    other => return Err(invalid_left_operand(symbol, &other).or_span(left.span)),
                };
                if decided {
                    return Ok(Value::Bool(op == BinaryOp::Or));
                }
                match self.eval_expr(right)? {
                    Value::Bool(b) => Ok(Value::Bool(b)),
                    other => Err(invalid_right_operand(symbol, &other).or_span(right.span)),
                }
            }
            BinaryOp::Is | BinaryOp::IsNot => {
                let value = self.eval_expr(left)?;
                let ty = self.type_operand(op, right)?;
                Ok(Value::Bool(ty.check(&value).is_ok() == (op == BinaryOp::Is)))
            }
            BinaryOp::As => {
                let value = self.eval_expr(left)?;
                let ty = self.type_operand(op, right)?;
                ty.cast(&value).ok_or_else(|| invalid_cast(&value, &ty))
            }
            BinaryOp::Dot => {
                let target = self.eval_expr(left)?;
                match &right.kind {
                    ExprKind::Invoke { name, args } => {
                        self.eval_invoke(name, args, Some(target), right.span)
                    }
                    ExprKind::Name(member) => get_member(&target, member),
                    _ => {
                        let other = self.eval_expr(right)?;
                        Err(invalid_right_operand(op.as_symbol(), &other).or_span(right.span))
                    }
                }
            }
            _ => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                if let (Value::Data(_), Some(sub)) = (&l, op.operator_sub_name()) {
                    return self.invoke_values(sub, vec![l, r]);
                }
                evaluate_binary(&l, &r, op)
            }
        }
    }

    /// The right side of `is`/`as` must be a type expression.
    fn type_operand(&mut self, op: BinaryOp, right: &Expr) -> Result<Type, EvalError> {
        match &right.kind {
            ExprKind::Type(node) => self.resolve_type(node).map_err(|e| e.or_span(right.span)),
            _ => {
                let other = self.eval_expr(right)?;
                Err(invalid_right_operand(op.as_symbol(), &other).or_span(right.span))
            }
        }
    }

    fn reference(&self, name: &Name) -> Result<Rc<Reference>, EvalError> {
        self.env
            .resolve(name.as_str())
            .ok_or_else(|| undeclared_variable(name.as_str()))
    }

    /// Exchange two variables through their typed `put`.
    fn swap(&mut self, left: &Expr, right: &Expr) -> EvalResult {
        let (ExprKind::Name(a), ExprKind::Name(b)) = (&left.kind, &right.kind) else {
            return Err(assigned_to_non_reference());
        };
        let (ra, rb) = (self.reference(a)?, self.reference(b)?);
        let (va, vb) = (ra.get(), rb.get());
        let stored = store(&ra, a.as_str(), vb)?;
        if let Err(e) = store(&rb, b.as_str(), va.clone()) {
            // Undo the first half; `va` was already accepted by `ra`.
            let _ = ra.put(va);
            return Err(e);
        }
        Ok(stored)
    }

    fn get_index(&self, target: &Value, index: &Value) -> EvalResult {
        match target {
            Value::String(s) => {
                let i = position(index)?;
                s.chars()
                    .nth(i)
                    .map(Value::Char)
                    .ok_or_else(|| invalid_index(index))
            }
            Value::Array(array) => array.get(position(index)?).ok_or_else(|| invalid_index(index)),
            Value::Data(data) => data
                .field_at(position(index)?)
                .map(|r| r.get())
                .ok_or_else(|| invalid_index(index)),
            other => Err(non_indexed_type(other)),
        }
    }

    fn set_index(&mut self, target_expr: &Expr, index: &Expr, value: &Expr) -> EvalResult {
        let target = self.eval_expr(target_expr)?;
        let index_value = self.eval_expr(index)?;
        match &target {
            Value::Array(array) => {
                let i = position(&index_value)?;
                let element_type = array.element_type();
                let value = self.eval_hinted(value, hint(&element_type))?;
                let value = conform(&element_type, value)?;
                if array.set(i, value.clone()) {
                    Ok(value)
                } else {
                    Err(invalid_index(&index_value))
                }
            }
            Value::Data(data) => {
                let i = position(&index_value)?;
                let reference = data
                    .field_at(i)
                    .cloned()
                    .ok_or_else(|| invalid_index(&index_value))?;
                let field = data
                    .decl()
                    .fields
                    .get(i)
                    .map(|f| f.name.clone())
                    .ok_or_else(|| invalid_index(&index_value))?;
                let value = self.eval_hinted(value, hint(reference.ty()))?;
                store(&reference, field.as_str(), value)
            }
            Value::String(s) => {
                // Strings are immutable: rebuild and store back into the variable.
                let ExprKind::Name(name) = &target_expr.kind else {
                    return Err(assigned_to_non_reference().or_span(target_expr.span));
                };
                let i = position(&index_value)?;
                let replacement = match self.eval_expr(value)? {
                    Value::Char(c) => c,
                    other => return Err(mismatched_type(&Type::CHAR, &other)),
                };
                let mut chars: Vec<char> = s.chars().collect();
                let Some(slot) = chars.get_mut(i) else {
                    return Err(invalid_index(&index_value));
                };
                *slot = replacement;
                let rebuilt: String = chars.into_iter().collect();
                let reference = self.reference(name)?;
                store(&reference, name.as_str(), Value::string(&rebuilt))?;
                Ok(Value::Char(replacement))
            }
            other => Err(non_indexed_type(other)),
        }
    }

    fn set_member(&mut self, target: &Expr, member: &Name, value: &Expr) -> EvalResult {
        match self.eval_expr(target)? {
            Value::Data(data) => {
                let reference = data
                    .field(member.as_str())
                    .cloned()
                    .ok_or_else(|| no_member(data.name().as_str(), member.as_str()))?;
                let value = self.eval_hinted(value, hint(reference.ty()))?;
                store(&reference, member.as_str(), value)
            }
            Value::Enum(entry) => match member.as_str() {
                "name" | "ordinal" | "value" => Err(reassigned_constant(member.as_str())),
                _ => Err(no_member(entry.enum_name().as_str(), member.as_str())),
            },
            other => Err(non_accessed_type(&other)),
        }
    }
}

/// Member read: composite fields by name, enum entry `name`/`ordinal`/`value`.
fn get_member(target: &Value, member: &Name) -> EvalResult {
    match target {
        Value::Data(data) => data
            .field(member.as_str())
            .map(|r| r.get())
            .ok_or_else(|| no_member(data.name().as_str(), member.as_str())),
        Value::Enum(entry) => match member.as_str() {
            "name" => Ok(Value::string(entry.name().as_str())),
            "ordinal" => Ok(Value::Int(
                i32::try_from(entry.ordinal()).unwrap_or(i32::MAX),
            )),
            "value" => Ok(entry.value().clone()),
            _ => Err(no_member(entry.enum_name().as_str(), member.as_str())),
        },
        other => Err(non_accessed_type(other)),
    }
}

/// Typed store into a reference, with the assignment error mapping.
fn store(reference: &Reference, name: &str, value: Value) -> EvalResult {
    if matches!(value, Value::Empty) {
        return Err(assigned_empty());
    }
    match reference.put(value.clone()) {
        PutResult::Stored(stored) => Ok(stored),
        PutResult::Rejected(mismatch) => Err(rejected(reference.ty(), &value, mismatch)),
        PutResult::Constant => Err(reassigned_constant(name)),
    }
}
