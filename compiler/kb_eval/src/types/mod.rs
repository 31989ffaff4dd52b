//! Runtime type descriptors.
//!
//! A [`Type`] is a resolved [`kb_ir::TypeNode`]: named types have been looked
//! up and array sizes evaluated. Every typed boundary runs
//! [`Type::conform`], which is [`Type::coerce`] followed by [`Type::check`].

use std::fmt;

use kb_ir::{Name, PrimitiveType};

use crate::value::numeric::{self, NumericKind};
use crate::value::{ArrayInstance, Value};

/// Resolved type.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// No annotation: accepts any non-empty value.
    Inferred,
    Primitive(PrimitiveType),
    /// `size: None` accepts any length.
    Array { sub: Box<Type>, size: Option<usize> },
    /// Trailing variadic parameter; holds an array of `sub`.
    Vararg(Box<Type>),
    Data(Name),
    Enum(Name),
}

/// Why a value failed a type check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    Type,
    ArraySize { expected: usize, got: usize },
}

enum Coerced {
    Same,
    Changed(Value),
    Failed,
}

impl Type {
    pub const ANY: Type = Type::Primitive(PrimitiveType::Any);
    pub const NONE: Type = Type::Primitive(PrimitiveType::None);
    pub const BOOL: Type = Type::Primitive(PrimitiveType::Bool);
    pub const BYTE: Type = Type::Primitive(PrimitiveType::Byte);
    pub const SHORT: Type = Type::Primitive(PrimitiveType::Short);
    pub const INT: Type = Type::Primitive(PrimitiveType::Int);
    pub const LONG: Type = Type::Primitive(PrimitiveType::Long);
    pub const FLOAT: Type = Type::Primitive(PrimitiveType::Float);
    pub const DOUBLE: Type = Type::Primitive(PrimitiveType::Double);
    pub const CHAR: Type = Type::Primitive(PrimitiveType::Char);
    pub const STRING: Type = Type::Primitive(PrimitiveType::String);

    pub fn array(sub: Type, size: Option<usize>) -> Self {
        Type::Array {
            sub: Box::new(sub),
            size,
        }
    }

    pub fn vararg(sub: Type) -> Self {
        Type::Vararg(Box::new(sub))
    }

    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            Type::Primitive(p) => NumericKind::of_primitive(*p),
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        self.numeric_kind().is_some_and(NumericKind::is_integral)
    }

    /// Element type of array and vararg types.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array { sub, .. } | Type::Vararg(sub) => Some(sub),
            _ => None,
        }
    }

    /// `Inferred` and `any` accept every non-empty value unchanged.
    pub fn accepts_anything(&self) -> bool {
        matches!(self, Type::Inferred | Type::Primitive(PrimitiveType::Any))
    }

    /// Structural membership test. Never converts.
    pub fn check(&self, value: &Value) -> Result<(), Mismatch> {
        if matches!(value, Value::Empty) {
            return Err(Mismatch::Type);
        }
        let ok = match (self, value) {
            (Type::Inferred | Type::Primitive(PrimitiveType::Any), _) => true,
            (Type::Primitive(p), v) => primitive_matches(*p, v),
            (Type::Array { sub, size }, Value::Array(array)) => {
                if let Some(expected) = *size {
                    if array.len() != expected {
                        return Err(Mismatch::ArraySize {
                            expected,
                            got: array.len(),
                        });
                    }
                }
                return check_elements(sub, array);
            }
            (Type::Vararg(sub), Value::Array(array)) => return check_elements(sub, array),
            (Type::Data(name), Value::Data(data)) => data.name() == name,
            (Type::Enum(name), Value::Enum(entry)) => entry.enum_name() == name,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(Mismatch::Type)
        }
    }

    /// `check` as a filter: the value unchanged on success.
    pub fn filter(&self, value: &Value) -> Option<Value> {
        self.check(value).ok().map(|()| value.clone())
    }

    /// Implicit widening along the numeric ladder (and `char` to `int`/`long`).
    ///
    /// Arrays coerce element-wise; a new array is built only when an element
    /// or the element tag changes, so conforming arrays keep their identity.
    /// Narrowing yields `None`. Everything else passes through.
    pub fn coerce(&self, value: Value) -> Option<Value> {
        match self.coerce_ref(&value) {
            Coerced::Same => Some(value),
            Coerced::Changed(v) => Some(v),
            Coerced::Failed => None,
        }
    }

    fn coerce_ref(&self, value: &Value) -> Coerced {
        match self {
            Type::Primitive(p) => {
                let Some(kind) = NumericKind::of_primitive(*p) else {
                    return Coerced::Same;
                };
                if let Some(from) = value.numeric_kind() {
                    return match from.cmp(&kind) {
                        std::cmp::Ordering::Equal => Coerced::Same,
                        std::cmp::Ordering::Less => numeric::widen(value, kind)
                            .map_or(Coerced::Failed, Coerced::Changed),
                        std::cmp::Ordering::Greater => Coerced::Failed,
                    };
                }
                match (value, kind) {
                    (Value::Char(c), NumericKind::Int) => i32::try_from(u32::from(*c))
                        .map_or(Coerced::Failed, |n| Coerced::Changed(Value::Int(n))),
                    (Value::Char(c), NumericKind::Long) => {
                        Coerced::Changed(Value::Long(i64::from(u32::from(*c))))
                    }
                    _ => Coerced::Same,
                }
            }
            Type::Array { sub, .. } | Type::Vararg(sub) => match value {
                Value::Array(array) => coerce_array(sub, array),
                _ => Coerced::Same,
            },
            _ => Coerced::Same,
        }
    }

    /// The boundary pipeline: coerce, then check.
    pub fn conform(&self, value: Value) -> Result<Value, Mismatch> {
        let value = self.coerce(value).ok_or(Mismatch::Type)?;
        self.check(&value)?;
        Ok(value)
    }

    /// Explicit conversion (`as`).
    pub fn cast(&self, value: &Value) -> Option<Value> {
        if matches!(value, Value::Empty) {
            return None;
        }
        match self {
            Type::Primitive(p) => cast_primitive(*p, value),
            Type::Array { sub, .. } | Type::Vararg(sub) => {
                let elements = match value {
                    Value::String(s) => s.chars().map(Value::Char).collect(),
                    Value::Array(array) => array.values(),
                    _ => return self.filter(value),
                };
                let cast = elements
                    .iter()
                    .map(|e| sub.cast(e))
                    .collect::<Option<Vec<_>>>()?;
                self.filter(&Value::array((**sub).clone(), cast))
            }
            _ => self.filter(value),
        }
    }

    /// The type two values can both be widened into.
    ///
    /// Used to tag array literals: equal types, the wider numeric kind,
    /// arrays of a common element type, otherwise `any`.
    pub fn common(a: &Type, b: &Type) -> Type {
        if a == b {
            return a.clone();
        }
        if let (Some(ka), Some(kb)) = (a.numeric_kind(), b.numeric_kind()) {
            return if ka >= kb { a.clone() } else { b.clone() };
        }
        match (a, b) {
            (Type::Array { sub: sa, .. }, Type::Array { sub: sb, .. }) => {
                Type::array(Type::common(sa, sb), None)
            }
            _ => Type::ANY,
        }
    }
}

fn primitive_matches(primitive: PrimitiveType, value: &Value) -> bool {
    matches!(
        (primitive, value),
        (PrimitiveType::Any, _)
            | (PrimitiveType::None, Value::None)
            | (PrimitiveType::Bool, Value::Bool(_))
            | (PrimitiveType::Byte, Value::Byte(_))
            | (PrimitiveType::Short, Value::Short(_))
            | (PrimitiveType::Int, Value::Int(_))
            | (PrimitiveType::Long, Value::Long(_))
            | (PrimitiveType::Float, Value::Float(_))
            | (PrimitiveType::Double, Value::Double(_))
            | (PrimitiveType::Char, Value::Char(_))
            | (PrimitiveType::String, Value::String(_))
    )
}

fn check_elements(sub: &Type, array: &ArrayInstance) -> Result<(), Mismatch> {
    if sub.accepts_anything() {
        return Ok(());
    }
    array.values().iter().try_for_each(|e| sub.check(e))
}

fn coerce_array(sub: &Type, array: &ArrayInstance) -> Coerced {
    if sub.accepts_anything() {
        return Coerced::Same;
    }
    let values = array.values();
    let mut changed = array.element_type() != *sub;
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        match sub.coerce_ref(&value) {
            Coerced::Same => out.push(value),
            Coerced::Changed(v) => {
                changed = true;
                out.push(v);
            }
            Coerced::Failed => return Coerced::Failed,
        }
    }
    if changed {
        Coerced::Changed(Value::array(sub.clone(), out))
    } else {
        Coerced::Same
    }
}

fn cast_primitive(primitive: PrimitiveType, value: &Value) -> Option<Value> {
    if let Some(kind) = NumericKind::of_primitive(primitive) {
        return match value {
            Value::Char(c) => Some(numeric::from_i64(i64::from(u32::from(*c)), kind)),
            Value::Bool(b) => Some(numeric::from_i64(i64::from(*b), kind)),
            Value::String(s) if kind.is_integral() => s
                .trim()
                .parse::<i64>()
                .ok()
                .map(|n| numeric::from_i64(n, kind)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|n| numeric::convert(&Value::Double(n), kind)),
            other => numeric::convert(other, kind),
        };
    }
    match (primitive, value) {
        (PrimitiveType::Any, v) => Some(v.clone()),
        (PrimitiveType::String, v) => Some(Value::string(&v.to_string())),
        (PrimitiveType::Bool, Value::String(s)) => match s.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (PrimitiveType::Bool, v) if v.numeric_kind().is_some() => {
            Some(Value::Bool(!v.is_empty()))
        }
        (PrimitiveType::Char, Value::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        (PrimitiveType::Char, v) => match v.as_integral() {
            Some(n) => u32::try_from(n)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char),
            None => Type::Primitive(primitive).filter(v),
        },
        (p, v) => Type::Primitive(p).filter(v),
    }
}

impl From<PrimitiveType> for Type {
    fn from(primitive: PrimitiveType) -> Self {
        Type::Primitive(primitive)
    }
}

/// Lowercase signature form: `int`, `int[]`, `int[3]`, `int*`, `point`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Inferred => f.write_str("any"),
            Type::Primitive(p) => f.write_str(p.name()),
            Type::Array { sub, size: None } => write!(f, "{sub}[]"),
            Type::Array {
                sub,
                size: Some(n),
            } => write!(f, "{sub}[{n}]"),
            Type::Vararg(sub) => write!(f, "{sub}*"),
            Type::Data(name) | Type::Enum(name) => f.write_str(&name.to_lowercase()),
        }
    }
}
