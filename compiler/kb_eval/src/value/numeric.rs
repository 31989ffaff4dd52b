//! The numeric promotion ladder.
//!
//! `byte < short < int < long < float < double`. Binary arithmetic and
//! comparison promote both operands to the wider kind; implicit coercion only
//! ever moves a value up the ladder.

use kb_ir::PrimitiveType;

use super::Value;

/// Tag of the six numeric value kinds, ordered by width.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum NumericKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl NumericKind {
    /// The numeric kind of a primitive type keyword.
    pub const fn of_primitive(primitive: PrimitiveType) -> Option<Self> {
        match primitive {
            PrimitiveType::Byte => Some(Self::Byte),
            PrimitiveType::Short => Some(Self::Short),
            PrimitiveType::Int => Some(Self::Int),
            PrimitiveType::Long => Some(Self::Long),
            PrimitiveType::Float => Some(Self::Float),
            PrimitiveType::Double => Some(Self::Double),
            _ => None,
        }
    }

    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }
}

/// Move a numeric value up the ladder to `kind`.
///
/// Returns `None` for non-numeric values and for narrowing requests.
pub fn widen(value: &Value, kind: NumericKind) -> Option<Value> {
    let from = value.numeric_kind()?;
    if from > kind {
        return None;
    }
    convert(value, kind)
}

/// Convert between numeric kinds with `as` semantics (truncating/wrapping).
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "explicit casts follow `as` conversion rules"
)]
pub fn convert(value: &Value, kind: NumericKind) -> Option<Value> {
    // Everything goes through i64 or f64 first.
    let (int, float) = match *value {
        Value::Byte(v) => (Some(i64::from(v)), f64::from(v)),
        Value::Short(v) => (Some(i64::from(v)), f64::from(v)),
        Value::Int(v) => (Some(i64::from(v)), f64::from(v)),
        Value::Long(v) => (Some(v), v as f64),
        Value::Float(v) => (None, f64::from(v)),
        Value::Double(v) => (None, v),
        _ => return None,
    };
    let as_int = || int.unwrap_or(float as i64);
    Some(match kind {
        NumericKind::Byte => Value::Byte(as_int() as i8),
        NumericKind::Short => Value::Short(as_int() as i16),
        NumericKind::Int => Value::Int(as_int() as i32),
        NumericKind::Long => Value::Long(as_int()),
        NumericKind::Float => Value::Float(match int {
            Some(i) => i as f32,
            None => float as f32,
        }),
        NumericKind::Double => Value::Double(float),
    })
}

/// Build a value of `kind` from an integer, wrapping as needed.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "explicit casts follow `as` conversion rules"
)]
pub fn from_i64(n: i64, kind: NumericKind) -> Value {
    match kind {
        NumericKind::Byte => Value::Byte(n as i8),
        NumericKind::Short => Value::Short(n as i16),
        NumericKind::Int => Value::Int(n as i32),
        NumericKind::Long => Value::Long(n),
        NumericKind::Float => Value::Float(n as f32),
        NumericKind::Double => Value::Double(n as f64),
    }
}
