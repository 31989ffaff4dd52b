//! Error types and constructors for the runtime.
//!
//! `EvalErrorKind` is the typed category; factory functions below are the
//! only place errors get built, so the message always equals
//! `kind.to_string()`.
//!
//! Errors are fatal. While unwinding, every statement executor they pass
//! through appends a [`TraceEntry`], and the first subroutine boundary
//! attaches a call-stack snapshot.

use std::fmt;

use kb_ir::Span;

use crate::types::{Mismatch, Type};
use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Declaration
    #[error("variable `{name}` is already declared in this scope")]
    AlreadyDeclaredVariable { name: String },
    #[error("undeclared variable `{name}`")]
    UndeclaredVariable { name: String },
    #[error("data `{name}` is already declared in this scope")]
    AlreadyDeclaredData { name: String },
    #[error("undeclared data `{name}`")]
    UndeclaredData { name: String },
    #[error("sub `{signature}` is already declared in this scope")]
    AlreadyDeclaredSub { signature: String },
    #[error("undeclared sub `{name}`")]
    UndeclaredSub { name: String },
    #[error("alias `{name}` is already declared in this scope")]
    AlreadyDeclaredAlias { name: String },
    #[error("enum `{name}` is already declared in this scope")]
    AlreadyDeclaredEnum { name: String },
    #[error("undeclared enum `{name}`")]
    UndeclaredEnum { name: String },
    #[error("undeclared type `{name}`")]
    UndeclaredType { name: String },

    // Types
    #[error("mismatched type: expected `{expected}`, got `{got}`")]
    MismatchedType { expected: String, got: String },
    #[error("mismatched array size: expected {expected} elements, got {got}")]
    MismatchedArraySize { expected: usize, got: usize },
    #[error("sub `{name}` yielded `{got}` but returns `{expected}`")]
    MismatchedReturnType {
        name: String,
        expected: String,
        got: String,
    },
    #[error("builtin `{signature}` returns `{got}`, declared `{expected}`")]
    MismatchedBuiltinType {
        signature: String,
        expected: String,
        got: String,
    },
    #[error("cannot cast `{from}` to `{to}`")]
    InvalidCast { from: String, to: String },
    #[error("cannot infer a type from an empty value")]
    CannotInferType,
    #[error("sub `{name}` finished without a result")]
    NoYield { name: String },

    // Access
    #[error("`{target}` has no member `{member}`")]
    NoMember { target: String, member: String },
    #[error("`{type_name}` cannot be indexed")]
    NonIndexedType { type_name: String },
    #[error("`{type_name}` has no members")]
    NonAccessedType { type_name: String },
    #[error("`{type_name}` is not iterable")]
    NonIterableType { type_name: String },
    #[error("expected {expected} elements, got {got}")]
    NonPartitionedType { expected: usize, got: usize },
    #[error("invalid index `{index}`")]
    InvalidIndex { index: String },

    // Calls
    #[error("no overload of `{name}` accepts the given number of arguments")]
    UnresolvedPositions { name: String },
    #[error("no overload of `{name}` accepts the given argument types")]
    UnresolvedTypes { name: String },
    #[error("no native function registered for `{signature}`")]
    MissingBuiltin { signature: String },
    #[error("maximum call depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },

    // Mutation
    #[error("only variables can be assigned to")]
    AssignedToNonReference,
    #[error("cannot reassign constant `{name}`")]
    ReassignedConstant { name: String },
    #[error("cannot assign an empty value")]
    AssignedEmpty,

    // Structure
    #[error("no active scope")]
    NoActiveScope,
    #[error("type `{type_name}` has no default value")]
    NoDefaultValue { type_name: String },

    // Evaluation
    #[error("test expression must be `bool`, got `{type_name}`")]
    InvalidTestExpression { type_name: String },
    #[error("operator `{op}` cannot take a left operand of type `{type_name}`")]
    InvalidLeftOperand { op: &'static str, type_name: String },
    #[error("operator `{op}` cannot take a right operand of type `{type_name}`")]
    InvalidRightOperand { op: &'static str, type_name: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("`{signal}` has no enclosing target")]
    UnmatchedSignal { signal: String },

    /// Raised by native functions.
    #[error("{message}")]
    Custom { message: String },
}

impl EvalErrorKind {
    /// Errors that mean "this value does not fit that type".
    ///
    /// Overload resolution treats these as a reason to drop a candidate
    /// rather than to abort the call.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::MismatchedType { .. }
                | Self::MismatchedArraySize { .. }
                | Self::NonPartitionedType { .. }
                | Self::CannotInferType
        )
    }
}

/// One statement the error unwound through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub what: &'static str,
    pub span: Span,
}

/// A single frame in a call-stack snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Sub signature.
    pub name: String,
    /// Call site.
    pub span: Span,
}

/// Snapshot of the call stack at the error site, innermost call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call stack:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {} at {}", frame.name, frame.span)?;
        }
        Ok(())
    }
}

/// Runtime error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Innermost node that failed.
    pub span: Option<Span>,
    /// Statements unwound through, innermost first.
    pub trace: Vec<TraceEntry>,
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    /// Error raised by a native function.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom { message })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            trace: Vec::new(),
            backtrace: None,
        }
    }

    /// Attach the span of the failing node unless one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// Record one statement the error is unwinding through.
    #[must_use]
    pub fn traced(mut self, what: &'static str, span: Span) -> Self {
        self.trace.push(TraceEntry { what, span });
        self
    }

    /// Attach a call-stack snapshot unless one is already present.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() && !backtrace.is_empty() {
            self.backtrace = Some(backtrace);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        for entry in &self.trace {
            write!(f, "\n  in {} at {}", entry.what, entry.span)?;
        }
        if let Some(backtrace) = &self.backtrace {
            write!(f, "\n{backtrace}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Declaration errors

#[cold]
pub fn already_declared_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDeclaredVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undeclared_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn already_declared_data(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDeclaredData {
        name: name.to_string(),
    })
}

#[cold]
pub fn undeclared_data(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredData {
        name: name.to_string(),
    })
}

#[cold]
pub fn already_declared_sub(signature: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDeclaredSub {
        signature: signature.to_string(),
    })
}

#[cold]
pub fn undeclared_sub(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredSub {
        name: name.to_string(),
    })
}

#[cold]
pub fn already_declared_alias(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDeclaredAlias {
        name: name.to_string(),
    })
}

#[cold]
pub fn already_declared_enum(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDeclaredEnum {
        name: name.to_string(),
    })
}

#[cold]
pub fn undeclared_enum(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredEnum {
        name: name.to_string(),
    })
}

#[cold]
pub fn undeclared_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredType {
        name: name.to_string(),
    })
}

// Type errors

#[cold]
pub fn mismatched_type(expected: &Type, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MismatchedType {
        expected: expected.to_string(),
        got: got.type_name(),
    })
}

#[cold]
pub fn mismatched_array_size(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MismatchedArraySize { expected, got })
}

/// Turn a failed boundary check into the matching error.
#[cold]
pub fn rejected(expected: &Type, got: &Value, mismatch: Mismatch) -> EvalError {
    match mismatch {
        Mismatch::Type => mismatched_type(expected, got),
        Mismatch::ArraySize { expected, got } => mismatched_array_size(expected, got),
    }
}

#[cold]
pub fn mismatched_return_type(name: &str, expected: &Type, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MismatchedReturnType {
        name: name.to_string(),
        expected: expected.to_string(),
        got: got.type_name(),
    })
}

#[cold]
pub fn mismatched_builtin_type(signature: &str, expected: &Type, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MismatchedBuiltinType {
        signature: signature.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn invalid_cast(from: &Value, to: &Type) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidCast {
        from: from.type_name(),
        to: to.to_string(),
    })
}

/// A composite literal aimed at something that is neither data nor array.
#[cold]
pub fn cannot_instantiate(target: &Type) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MismatchedType {
        expected: "data or array type".to_string(),
        got: target.to_string(),
    })
}

#[cold]
pub fn cannot_infer_type() -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotInferType)
}

#[cold]
pub fn no_yield(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoYield {
        name: name.to_string(),
    })
}

// Access errors

#[cold]
pub fn no_member(target: &str, member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMember {
        target: target.to_string(),
        member: member.to_string(),
    })
}

#[cold]
pub fn non_indexed_type(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonIndexedType {
        type_name: value.type_name(),
    })
}

#[cold]
pub fn non_accessed_type(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonAccessedType {
        type_name: value.type_name(),
    })
}

#[cold]
pub fn non_iterable_type(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonIterableType {
        type_name: value.type_name(),
    })
}

#[cold]
pub fn non_partitioned_type(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonPartitionedType { expected, got })
}

#[cold]
pub fn invalid_index(index: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidIndex {
        index: index.to_string(),
    })
}

// Call errors

#[cold]
pub fn unresolved_positions(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnresolvedPositions {
        name: name.to_string(),
    })
}

#[cold]
pub fn unresolved_types(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnresolvedTypes {
        name: name.to_string(),
    })
}

#[cold]
pub fn missing_builtin(signature: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingBuiltin {
        signature: signature.to_string(),
    })
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

// Mutation errors

#[cold]
pub fn assigned_to_non_reference() -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssignedToNonReference)
}

#[cold]
pub fn reassigned_constant(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReassignedConstant {
        name: name.to_string(),
    })
}

#[cold]
pub fn assigned_empty() -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssignedEmpty)
}

// Structural errors

#[cold]
pub fn no_active_scope() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoActiveScope)
}

#[cold]
pub fn no_default_value(ty: &Type) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoDefaultValue {
        type_name: ty.to_string(),
    })
}

// Evaluation errors

#[cold]
pub fn invalid_test_expression(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidTestExpression {
        type_name: value.type_name(),
    })
}

#[cold]
pub fn invalid_left_operand(op: &'static str, value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidLeftOperand {
        op,
        type_name: value.type_name(),
    })
}

#[cold]
pub fn invalid_right_operand(op: &'static str, value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidRightOperand {
        op,
        type_name: value.type_name(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn unmatched_signal(signal: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnmatchedSignal {
        signal: signal.to_string(),
    })
}
