//! Registration of subs, data types, enums and aliases.

use std::rc::Rc;

use kb_ir::{DataField, EnumEntryDef, EnumKind, Name, SubDef, TypeNode};

use super::types::{conform, hint};
use super::Interpreter;
use crate::environment::Reference;
use crate::errors::{
    already_declared_alias, already_declared_data, already_declared_enum, already_declared_sub,
    already_declared_variable, cannot_infer_type, mismatched_builtin_type, missing_builtin,
    EvalError,
};
use crate::subroutine::{signature, ParamSlot, Subroutine};
use crate::types::Type;
use crate::value::numeric::{self, NumericKind};
use crate::value::{DataDecl, EnumDecl, EnumEntry, FieldDecl, Value};

impl Interpreter {
    /// Declare a variable in the current scope.
    ///
    /// An `Inferred` type takes the value's structural type; the value then
    /// runs through the boundary pipeline.
    pub(crate) fn bind(
        &mut self,
        name: &Name,
        ty: Type,
        value: Value,
        constant: bool,
    ) -> Result<Rc<Reference>, EvalError> {
        let ty = match ty {
            Type::Inferred => value.infer_type().ok_or_else(cannot_infer_type)?,
            ty => ty,
        };
        let value = conform(&ty, value)?;
        self.env
            .current()?
            .borrow_mut()
            .declare(name.clone(), Reference::new(ty, value, constant))
            .map_err(|_| already_declared_variable(name.as_str()))
    }

    /// Register one sub overload, capturing the current scope.
    pub(crate) fn declare_sub(&mut self, def: &Rc<SubDef>) -> Result<(), EvalError> {
        let params = def
            .params
            .iter()
            .map(|p| {
                Ok(ParamSlot {
                    name: p.name.clone(),
                    ty: self.resolve_type(&p.ty)?,
                    default: p.default.clone(),
                })
            })
            .collect::<Result<Vec<_>, EvalError>>()?;
        let returns = match &def.returns {
            TypeNode::Inferred => Type::NONE,
            node => self.resolve_type(node)?,
        };
        let signature = signature(def.name.as_str(), &params);

        let native = if def.builtin {
            let builtin = self
                .library()
                .lookup(&signature)
                .ok_or_else(|| missing_builtin(&signature))?;
            if builtin.returns != returns {
                return Err(mismatched_builtin_type(
                    &signature,
                    &returns,
                    &builtin.returns.to_string(),
                ));
            }
            Some(builtin)
        } else {
            None
        };

        let scope = self.env.current()?;
        let sub = Rc::new(Subroutine {
            def: Rc::clone(def),
            params,
            returns,
            signature: signature.clone(),
            scope: scope.downgrade(),
            native,
        });
        scope
            .borrow_mut()
            .declare_sub(sub)
            .map_err(|_| already_declared_sub(&signature))?;
        tracing::debug!(%signature, builtin = def.builtin, "declared sub");
        Ok(())
    }

    pub(crate) fn declare_data(&mut self, name: &Name, fields: &[DataField]) -> Result<(), EvalError> {
        let fields = fields
            .iter()
            .map(|f| {
                Ok(FieldDecl {
                    name: f.name.clone(),
                    ty: self.resolve_type(&f.ty)?,
                    constant: f.constant,
                    default: f.default.clone(),
                })
            })
            .collect::<Result<Vec<_>, EvalError>>()?;
        let scope = self.env.current()?;
        let decl = Rc::new(DataDecl {
            name: name.clone(),
            fields,
            scope: scope.downgrade(),
        });
        scope
            .borrow_mut()
            .declare_data(decl)
            .map_err(|_| already_declared_data(name.as_str()))?;
        tracing::debug!(%name, "declared data");
        Ok(())
    }

    pub(crate) fn declare_alias(&mut self, name: &Name, node: &TypeNode) -> Result<(), EvalError> {
        let ty = self.resolve_type(node)?;
        tracing::debug!(%name, %ty, "declared alias");
        self.env
            .current()?
            .borrow_mut()
            .declare_alias(name.clone(), ty)
            .map_err(|_| already_declared_alias(name.as_str()))
    }

    pub(crate) fn declare_enum(
        &mut self,
        name: &Name,
        kind: &EnumKind,
        entries: &[EnumEntryDef],
    ) -> Result<(), EvalError> {
        let ty = match kind {
            EnumKind::Basic(node) => self.resolve_type(node)?,
            EnumKind::Data(data) => self.resolve_type(&TypeNode::Named(data.clone()))?,
        };
        let mut built = Vec::with_capacity(entries.len());
        for (ordinal, entry) in entries.iter().enumerate() {
            let value = match kind {
                EnumKind::Basic(_) => self.basic_entry_value(&ty, ordinal, entry)?,
                EnumKind::Data(_) => self.instantiate(&ty, &entry.elements)?,
            };
            built.push(EnumEntry::new(name.clone(), entry.name.clone(), ordinal, value));
        }
        let decl = Rc::new(EnumDecl {
            name: name.clone(),
            ty,
            entries: built,
        });
        self.env
            .current()?
            .borrow_mut()
            .declare_enum(decl)
            .map_err(|_| already_declared_enum(name.as_str()))?;
        tracing::debug!(%name, entries = entries.len(), "declared enum");
        Ok(())
    }

    /// An entry without a value gets its ordinal when the type is integral
    /// (or inferred), otherwise the type's default.
    fn basic_entry_value(
        &mut self,
        ty: &Type,
        ordinal: usize,
        entry: &EnumEntryDef,
    ) -> Result<Value, EvalError> {
        let ordinal = i64::try_from(ordinal).unwrap_or(i64::MAX);
        let value = match entry.elements.first() {
            Some(expr) => self.eval_hinted(expr, hint(ty))?,
            None => match ty {
                Type::Inferred => numeric::from_i64(ordinal, NumericKind::Int),
                ty => match ty.numeric_kind() {
                    Some(kind) if kind.is_integral() => numeric::from_i64(ordinal, kind),
                    _ => self.default_value(ty)?,
                },
            },
        };
        match ty {
            Type::Inferred if matches!(value, Value::Empty) => Err(cannot_infer_type()),
            Type::Inferred => Ok(value),
            ty => conform(ty, value),
        }
    }
}
