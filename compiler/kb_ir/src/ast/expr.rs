//! Expression Types
//!
//! Core expression nodes and variants, plus constructor helpers used by the
//! runtime's synthesized code (core declarations, counting-loop tests) and by
//! hosts that build trees without a parser.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use super::types::TypeNode;
use crate::{Name, Span, Spanned};

/// Literal constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
}

/// One argument of an `Invoke`.
///
/// A spread argument expands the elements of its value into separate
/// positional arguments instead of passing the container itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub spread: bool,
    pub expr: Expr,
}

impl Argument {
    /// A plain positional argument.
    pub fn positional(expr: Expr) -> Self {
        Argument {
            spread: false,
            expr,
        }
    }

    /// A spread argument.
    pub fn spread(expr: Expr) -> Self {
        Argument { spread: true, expr }
    }
}

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// The "no value supplied" sentinel.
    Empty,
    /// A literal.
    Value(Literal),
    /// Variable read.
    Name(Name),
    /// A type in expression position (`x is int`, `x as long`, `for c in Color`).
    Type(TypeNode),
    /// Array literal.
    Array(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    GetIndex {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    SetIndex {
        target: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },
    GetMember {
        target: Box<Expr>,
        member: Name,
    },
    SetMember {
        target: Box<Expr>,
        member: Name,
        value: Box<Expr>,
    },
    /// Subroutine call.
    Invoke { name: Name, args: Vec<Argument> },
    /// Composite or array construction. A missing target is inferred from
    /// the type expected at the surrounding boundary.
    Instantiate {
        target: Option<TypeNode>,
        elements: Vec<Expr>,
    },
    /// `Enum.Entry`.
    GetEnumEntry { target: Name, entry: Name },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Node without a source location.
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::DUMMY,
        }
    }

    /// Replace the span.
    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn empty() -> Self {
        Self::synthetic(ExprKind::Empty)
    }

    pub fn literal(literal: Literal) -> Self {
        Self::synthetic(ExprKind::Value(literal))
    }

    pub fn none() -> Self {
        Self::literal(Literal::None)
    }

    pub fn bool(value: bool) -> Self {
        Self::literal(Literal::Bool(value))
    }

    pub fn byte(value: i8) -> Self {
        Self::literal(Literal::Byte(value))
    }

    pub fn short(value: i16) -> Self {
        Self::literal(Literal::Short(value))
    }

    pub fn int(value: i32) -> Self {
        Self::literal(Literal::Int(value))
    }

    pub fn long(value: i64) -> Self {
        Self::literal(Literal::Long(value))
    }

    pub fn float(value: f32) -> Self {
        Self::literal(Literal::Float(value))
    }

    pub fn double(value: f64) -> Self {
        Self::literal(Literal::Double(value))
    }

    pub fn char(value: char) -> Self {
        Self::literal(Literal::Char(value))
    }

    pub fn string(value: &str) -> Self {
        Self::literal(Literal::String(value.to_string()))
    }

    pub fn name(name: &str) -> Self {
        Self::synthetic(ExprKind::Name(Name::new(name)))
    }

    pub fn ty(node: impl Into<TypeNode>) -> Self {
        Self::synthetic(ExprKind::Type(node.into()))
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Array(elements))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::synthetic(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::synthetic(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `name = value`.
    pub fn assign(name: &str, value: Expr) -> Self {
        Self::binary(BinaryOp::Assign, Self::name(name), value)
    }

    pub fn get_index(target: Expr, index: Expr) -> Self {
        Self::synthetic(ExprKind::GetIndex {
            target: Box::new(target),
            index: Box::new(index),
        })
    }

    pub fn set_index(target: Expr, index: Expr, value: Expr) -> Self {
        Self::synthetic(ExprKind::SetIndex {
            target: Box::new(target),
            index: Box::new(index),
            value: Box::new(value),
        })
    }

    pub fn get_member(target: Expr, member: &str) -> Self {
        Self::synthetic(ExprKind::GetMember {
            target: Box::new(target),
            member: Name::new(member),
        })
    }

    pub fn set_member(target: Expr, member: &str, value: Expr) -> Self {
        Self::synthetic(ExprKind::SetMember {
            target: Box::new(target),
            member: Name::new(member),
            value: Box::new(value),
        })
    }

    /// Call with plain positional arguments.
    pub fn invoke(name: &str, args: Vec<Expr>) -> Self {
        Self::invoke_with(name, args.into_iter().map(Argument::positional).collect())
    }

    /// Call with explicit argument markers.
    pub fn invoke_with(name: &str, args: Vec<Argument>) -> Self {
        Self::synthetic(ExprKind::Invoke {
            name: Name::new(name),
            args,
        })
    }

    pub fn instantiate(target: Option<TypeNode>, elements: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Instantiate { target, elements })
    }

    pub fn enum_entry(target: &str, entry: &str) -> Self {
        Self::synthetic(ExprKind::GetEnumEntry {
            target: Name::new(target),
            entry: Name::new(entry),
        })
    }

    /// Whether this is the `Empty` sentinel expression.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ExprKind::Empty)
    }
}
