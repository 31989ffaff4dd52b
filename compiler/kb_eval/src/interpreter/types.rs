//! Type resolution, default values, instantiation and iteration.

use std::rc::Rc;

use kb_ir::{Expr, ExprKind, PrimitiveType, TypeNode};

use super::Interpreter;
use crate::environment::{NamedType, Reference};
use crate::errors::{
    cannot_infer_type, cannot_instantiate, mismatched_array_size, mismatched_type,
    no_default_value, non_iterable_type, non_partitioned_type, rejected, undeclared_data,
    undeclared_enum, undeclared_type, EvalError, EvalResult,
};
use crate::types::Type;
use crate::value::numeric::{self, NumericKind};
use crate::value::{DataInstance, Value};

/// Run the boundary pipeline, turning a mismatch into the matching error.
pub(crate) fn conform(ty: &Type, value: Value) -> EvalResult {
    let shown = value.clone();
    ty.conform(value).map_err(|m| rejected(ty, &shown, m))
}

/// The target type a composite literal may take from its context.
pub(crate) fn hint(ty: &Type) -> Option<&Type> {
    if ty.accepts_anything() {
        None
    } else {
        Some(ty)
    }
}

impl Interpreter {
    /// Resolve a parsed annotation in the current scope.
    pub fn resolve_type(&mut self, node: &TypeNode) -> Result<Type, EvalError> {
        match node {
            TypeNode::Inferred => Ok(Type::Inferred),
            TypeNode::Primitive(p) => Ok(Type::Primitive(*p)),
            TypeNode::Array { sub, size } => {
                let sub = self.resolve_type(sub)?;
                let size = match size {
                    Some(expr) => self.array_size(expr)?,
                    None => None,
                };
                Ok(Type::array(sub, size))
            }
            TypeNode::Vararg(sub) => Ok(Type::vararg(self.resolve_type(sub)?)),
            TypeNode::Named(name) => {
                let named = self.env.current()?.borrow().resolve_named(name.as_str());
                match named {
                    Some(NamedType::Data(decl)) => Ok(Type::Data(decl.name.clone())),
                    Some(NamedType::Enum(decl)) => Ok(Type::Enum(decl.name.clone())),
                    Some(NamedType::Alias(ty)) => Ok(ty),
                    None => Err(undeclared_type(name.as_str())),
                }
            }
        }
    }

    /// A negative size means "any size".
    fn array_size(&mut self, expr: &Expr) -> Result<Option<usize>, EvalError> {
        let value = self.eval_expr(expr)?;
        let Some(n) = value.as_integral() else {
            return Err(mismatched_type(&Type::INT, &value));
        };
        Ok(usize::try_from(n).ok())
    }

    /// Zero-equivalent value of a type.
    pub fn default_value(&mut self, ty: &Type) -> EvalResult {
        match ty {
            Type::Inferred => Err(no_default_value(ty)),
            Type::Primitive(p) => Ok(match p {
                PrimitiveType::Any | PrimitiveType::None => Value::None,
                PrimitiveType::Bool => Value::Bool(false),
                PrimitiveType::Char => Value::Char('\0'),
                PrimitiveType::String => Value::string(""),
                numeric => match NumericKind::of_primitive(*numeric) {
                    Some(kind) => numeric::from_i64(0, kind),
                    None => return Err(no_default_value(ty)),
                },
            }),
            Type::Array { sub, size } => {
                let len = size.unwrap_or(0);
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(self.default_value(sub)?);
                }
                Ok(Value::array((**sub).clone(), values))
            }
            Type::Vararg(sub) => Ok(Value::array((**sub).clone(), Vec::new())),
            Type::Data(_) => self.instantiate(ty, &[]),
            Type::Enum(name) => {
                let decl = self
                    .env
                    .current()?
                    .borrow()
                    .resolve_enum(name.as_str())
                    .ok_or_else(|| undeclared_enum(name.as_str()))?;
                decl.entry_at(0)
                    .cloned()
                    .map(Value::Enum)
                    .ok_or_else(|| no_default_value(ty))
            }
        }
    }

    /// Evaluate `expr` where a value of type `expected` is wanted.
    ///
    /// Target-less composite literals take `expected` as their target and
    /// array literals pass its element type on to their elements.
    pub(crate) fn eval_hinted(&mut self, expr: &Expr, expected: Option<&Type>) -> EvalResult {
        match (&expr.kind, expected) {
            (ExprKind::Instantiate { target: None, elements }, Some(ty)) => self
                .instantiate(ty, elements)
                .map_err(|e| e.or_span(expr.span)),
            (ExprKind::Instantiate { target: None, .. }, None) => {
                Err(cannot_infer_type().or_span(expr.span))
            }
            (ExprKind::Array(elements), Some(ty)) => self
                .eval_array(elements, ty.element_type().and_then(hint))
                .map_err(|e| e.or_span(expr.span)),
            _ => self.eval_expr(expr),
        }
    }

    /// Build a composite or array from positional elements.
    pub(crate) fn instantiate(&mut self, target: &Type, elements: &[Expr]) -> EvalResult {
        match target {
            Type::Data(name) => self.instantiate_data(name.as_str(), elements),
            Type::Array { sub, size } => {
                if let Some(expected) = *size {
                    if elements.len() > expected {
                        return Err(mismatched_array_size(expected, elements.len()));
                    }
                }
                let mut values = Vec::with_capacity(size.unwrap_or(elements.len()));
                for element in elements {
                    let value = self.eval_hinted(element, hint(sub))?;
                    values.push(conform(sub, value)?);
                }
                while size.is_some_and(|n| values.len() < n) {
                    values.push(self.default_value(sub)?);
                }
                Ok(Value::array((**sub).clone(), values))
            }
            Type::Vararg(sub) => self.instantiate(&Type::array((**sub).clone(), None), elements),
            other => Err(cannot_instantiate(other)),
        }
    }

    fn instantiate_data(&mut self, name: &str, elements: &[Expr]) -> EvalResult {
        let decl = self
            .env
            .current()?
            .borrow()
            .resolve_data(name)
            .ok_or_else(|| undeclared_data(name))?;
        if elements.len() > decl.fields.len() {
            return Err(non_partitioned_type(decl.fields.len(), elements.len()));
        }
        let mut fields = Vec::with_capacity(decl.fields.len());
        for (i, field) in decl.fields.iter().enumerate() {
            let supplied = match elements.get(i) {
                Some(element) => self.eval_hinted(element, hint(&field.ty))?,
                None => Value::Empty,
            };
            let value = match (supplied, &field.default) {
                (Value::Empty, Some(default)) => {
                    let scope = decl.scope.live()?;
                    self.with_scope_in(scope, |s| s.eval_hinted(default, hint(&field.ty)))?
                }
                (Value::Empty, None) => self.default_value(&field.ty)?,
                (value, _) => value,
            };
            let value = conform(&field.ty, value)?;
            fields.push(Rc::new(Reference::new(field.ty.clone(), value, field.constant)));
        }
        Ok(Value::Data(DataInstance::new(decl, fields)))
    }

    /// Evaluate an array literal, tagging it with the common element type.
    pub(crate) fn eval_array(&mut self, elements: &[Expr], expected: Option<&Type>) -> EvalResult {
        let mut values = Vec::with_capacity(elements.len());
        let mut common: Option<Type> = None;
        for element in elements {
            let value = self.eval_hinted(element, expected)?;
            let ty = value.infer_type().ok_or_else(cannot_infer_type)?;
            common = Some(match common {
                Some(current) => Type::common(&current, &ty),
                None => ty,
            });
            values.push(value);
        }
        let element_type = common.unwrap_or(Type::ANY);
        let values = values
            .into_iter()
            .map(|v| conform(&element_type, v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(element_type, values))
    }

    /// The element sequence `for ... in` walks.
    ///
    /// A type expression naming an enum yields its entries.
    pub(crate) fn iteration_values(&mut self, iterable: &Expr) -> Result<Vec<Value>, EvalError> {
        if let ExprKind::Type(node) = &iterable.kind {
            if let Type::Enum(name) = self.resolve_type(node)? {
                let decl = self
                    .env
                    .current()?
                    .borrow()
                    .resolve_enum(name.as_str())
                    .ok_or_else(|| undeclared_enum(name.as_str()))?;
                return Ok(decl.values());
            }
        }
        let value = self.eval_expr(iterable)?;
        value.elements().ok_or_else(|| non_iterable_type(&value))
    }
}
