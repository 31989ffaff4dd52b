//! Runtime values.
//!
//! `Value` is a closed tagged union. Scalars are stored inline; strings are
//! immutable shared slices; arrays and composites are shared handles with
//! interior mutability; enum entries are immutable shared records.

mod array;
mod data;
mod enums;
pub mod numeric;

use std::fmt;
use std::rc::Rc;

use kb_ir::PrimitiveType;

pub use array::ArrayInstance;
pub use data::{DataDecl, DataInstance, FieldDecl};
pub use enums::{EnumDecl, EnumEntry};
pub use numeric::NumericKind;

use crate::types::Type;

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// "No value supplied": resolved to a default or inferred at the boundary.
    Empty,
    None,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(Rc<str>),
    Array(ArrayInstance),
    Data(DataInstance),
    Enum(EnumEntry),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    pub fn array(element_type: Type, values: Vec<Value>) -> Self {
        Value::Array(ArrayInstance::new(element_type, values))
    }

    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            Value::Byte(_) => Some(NumericKind::Byte),
            Value::Short(_) => Some(NumericKind::Short),
            Value::Int(_) => Some(NumericKind::Int),
            Value::Long(_) => Some(NumericKind::Long),
            Value::Float(_) => Some(NumericKind::Float),
            Value::Double(_) => Some(NumericKind::Double),
            _ => None,
        }
    }

    /// Integral value widened to `i64`, for indices and sizes.
    pub fn as_integral(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(i64::from(v)),
            Value::Short(v) => Some(i64::from(v)),
            Value::Int(v) => Some(i64::from(v)),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// The is-empty predicate used by `== empty`.
    #[allow(clippy::float_cmp, reason = "exact zero test")]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty | Value::None => true,
            Value::Bool(b) => !b,
            Value::Byte(v) => *v == 0,
            Value::Short(v) => *v == 0,
            Value::Int(v) => *v == 0,
            Value::Long(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Double(v) => *v == 0.0,
            Value::Char(c) => *c == '\0',
            Value::String(s) => s.trim().is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Data(d) => d.field_values().iter().all(Value::is_empty),
            Value::Enum(e) => e.value().is_empty(),
        }
    }

    /// Structural type of this value. `Empty` has none.
    pub fn infer_type(&self) -> Option<Type> {
        let primitive = match self {
            Value::Empty => return None,
            Value::None => PrimitiveType::None,
            Value::Bool(_) => PrimitiveType::Bool,
            Value::Byte(_) => PrimitiveType::Byte,
            Value::Short(_) => PrimitiveType::Short,
            Value::Int(_) => PrimitiveType::Int,
            Value::Long(_) => PrimitiveType::Long,
            Value::Float(_) => PrimitiveType::Float,
            Value::Double(_) => PrimitiveType::Double,
            Value::Char(_) => PrimitiveType::Char,
            Value::String(_) => PrimitiveType::String,
            Value::Array(a) => return Some(Type::array(a.element_type(), None)),
            Value::Data(d) => return Some(Type::Data(d.name().clone())),
            Value::Enum(e) => return Some(Type::Enum(e.enum_name().clone())),
        };
        Some(Type::Primitive(primitive))
    }

    /// Short type description for error messages.
    pub fn type_name(&self) -> String {
        match self.infer_type() {
            Some(ty) => ty.to_string(),
            None => "empty".to_string(),
        }
    }

    /// Elements of a sequence-like value: string chars, array elements or
    /// composite field values.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::String(s) => Some(s.chars().map(Value::Char).collect()),
            Value::Array(a) => Some(a.values()),
            Value::Data(d) => Some(d.field_values()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "structural equality is exact")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) | (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Data(a), Value::Data(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("empty"),
            Value::None => f.write_str("none"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::String(s) => f.write_str(s),
            Value::Array(a) => write!(f, "{a}"),
            Value::Data(d) => write!(f, "{d}"),
            Value::Enum(e) => write!(f, "{e}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

#[cfg(test)]
mod tests;
