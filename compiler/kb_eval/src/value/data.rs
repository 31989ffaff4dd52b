//! Nominal composites (`data` declarations and their instances).

use std::fmt;
use std::rc::Rc;

use kb_ir::{Expr, Name};

use super::Value;
use crate::environment::{Reference, Scope, WeakScope};
use crate::types::Type;

/// A field of a data declaration, with its type already resolved.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: Type,
    pub constant: bool,
    /// Evaluated at instantiation when no element is supplied.
    pub default: Option<Expr>,
}

/// A registered `data` declaration.
pub struct DataDecl {
    pub name: Name,
    pub fields: Vec<FieldDecl>,
    /// Scope the declaration appeared in; field defaults evaluate below it.
    pub scope: WeakScope<Scope>,
}

impl DataDecl {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name.as_str() == name)
    }
}

impl fmt::Debug for DataDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataDecl")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// An instance of a data declaration.
///
/// One reference per field, in declaration order. Cloning shares the fields.
#[derive(Clone)]
pub struct DataInstance {
    decl: Rc<DataDecl>,
    fields: Rc<[Rc<Reference>]>,
}

impl DataInstance {
    /// `fields` must line up with `decl.fields`.
    pub fn new(decl: Rc<DataDecl>, fields: Vec<Rc<Reference>>) -> Self {
        DataInstance {
            decl,
            fields: fields.into(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.decl.name
    }

    pub fn decl(&self) -> &Rc<DataDecl> {
        &self.decl
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field reference by name.
    pub fn field(&self, name: &str) -> Option<&Rc<Reference>> {
        self.decl.field_index(name).and_then(|i| self.fields.get(i))
    }

    /// Field reference by position.
    pub fn field_at(&self, index: usize) -> Option<&Rc<Reference>> {
        self.fields.get(index)
    }

    /// Field values in declaration order (the composite's dereferenced form).
    pub fn field_values(&self) -> Vec<Value> {
        self.fields.iter().map(|r| r.get()).collect()
    }
}

impl PartialEq for DataInstance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
            || (self.decl.name == other.decl.name && self.field_values() == other.field_values())
    }
}

impl fmt::Debug for DataInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.decl.name, self.field_values())
    }
}

impl fmt::Display for DataInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.decl.name)?;
        for (i, value) in self.field_values().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("}")
    }
}
