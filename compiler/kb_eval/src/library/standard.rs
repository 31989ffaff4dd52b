//! Natives bound by the core declarations.

use rustc_hash::FxHashMap;

use super::{Builtin, Library, NativeFn};
use crate::errors::{EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::types::Type;
use crate::value::Value;

/// The natives every interpreter ships with.
///
/// Hosts extend it with [`StandardLibrary::register`] to bind their own
/// `builtin` subs.
pub struct StandardLibrary {
    natives: FxHashMap<String, Builtin>,
}

impl StandardLibrary {
    pub fn new() -> Self {
        let mut library = StandardLibrary {
            natives: FxHashMap::default(),
        };
        library.register("print(any)", print, Type::NONE);
        library.register("println(any)", println, Type::NONE);
        library.register("abs(int)", abs_int, Type::INT);
        library.register("abs(double)", abs_double, Type::DOUBLE);
        library.register("sqrt(double)", sqrt, Type::DOUBLE);
        library.register("floor(double)", floor, Type::DOUBLE);
        library.register("upper(string)", upper, Type::STRING);
        library.register("lower(string)", lower, Type::STRING);
        library.register("ord(char)", ord, Type::INT);
        library.register("chr(int)", chr, Type::CHAR);
        library.register("size(any[])", size, Type::INT);
        library
    }

    /// Bind `signature` to a native, replacing any previous binding.
    pub fn register(&mut self, signature: &str, function: NativeFn, returns: Type) {
        self.natives
            .insert(signature.to_string(), Builtin::new(function, returns));
    }

    pub fn len(&self) -> usize {
        self.natives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.natives.is_empty()
    }
}

impl Default for StandardLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl Library for StandardLibrary {
    fn lookup(&self, signature: &str) -> Option<Builtin> {
        self.natives.get(signature).cloned()
    }
}

fn single(args: Vec<Value>) -> Result<Value, EvalError> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(EvalError::new("expected exactly one argument")),
    }
}

fn print(interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let value = single(args)?;
    interpreter.print_handler().print(&value.to_string());
    Ok(Value::None)
}

fn println(interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let value = single(args)?;
    interpreter.print_handler().println(&value.to_string());
    Ok(Value::None)
}

fn abs_int(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
        other => Err(EvalError::new(format!("abs: unexpected {}", other.type_name()))),
    }
}

fn abs_double(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Double(n) => Ok(Value::Double(n.abs())),
        other => Err(EvalError::new(format!("abs: unexpected {}", other.type_name()))),
    }
}

fn sqrt(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Double(n) => Ok(Value::Double(n.sqrt())),
        other => Err(EvalError::new(format!("sqrt: unexpected {}", other.type_name()))),
    }
}

fn floor(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Double(n) => Ok(Value::Double(n.floor())),
        other => Err(EvalError::new(format!("floor: unexpected {}", other.type_name()))),
    }
}

fn upper(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::String(s) => Ok(Value::string(&s.to_uppercase())),
        other => Err(EvalError::new(format!("upper: unexpected {}", other.type_name()))),
    }
}

fn lower(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::String(s) => Ok(Value::string(&s.to_lowercase())),
        other => Err(EvalError::new(format!("lower: unexpected {}", other.type_name()))),
    }
}

fn ord(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Char(c) => i32::try_from(u32::from(c))
            .map(Value::Int)
            .map_err(|_| EvalError::new("ord: code point out of range")),
        other => Err(EvalError::new(format!("ord: unexpected {}", other.type_name()))),
    }
}

fn chr(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Int(n) => u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| EvalError::new(format!("chr: {n} is not a code point"))),
        other => Err(EvalError::new(format!("chr: unexpected {}", other.type_name()))),
    }
}

fn size(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    match single(args)? {
        Value::Array(array) => i32::try_from(array.len())
            .map(Value::Int)
            .map_err(|_| EvalError::new("size: array too large")),
        other => Err(EvalError::new(format!("size: unexpected {}", other.type_name()))),
    }
}
