//! Type syntax.
//!
//! `TypeNode` is what the parser saw. The runtime resolves it into its own
//! type descriptor at the point of use, because named types (data, enum,
//! alias) and array sizes depend on the scope the node is evaluated in.

use std::fmt;

use super::expr::Expr;
use crate::Name;

/// The built-in type keywords.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveType {
    Any,
    None,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
}

impl PrimitiveType {
    /// Lowercase keyword, as used in normalized signatures.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::None => "none",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed type annotation.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeNode {
    /// No annotation: infer from the value.
    Inferred,
    /// A type keyword.
    Primitive(PrimitiveType),
    /// `sub[size]`. A missing size, or a size evaluating to a negative
    /// number, means "any size".
    Array {
        sub: Box<TypeNode>,
        size: Option<Box<Expr>>,
    },
    /// `sub*`, only meaningful as the last parameter of a sub.
    Vararg(Box<TypeNode>),
    /// A data type, enum or alias name.
    Named(Name),
}

impl TypeNode {
    /// Unsized array of `sub`.
    pub fn array(sub: TypeNode) -> Self {
        TypeNode::Array {
            sub: Box::new(sub),
            size: None,
        }
    }

    /// Array of `sub` with a literal static size.
    pub fn sized_array(sub: TypeNode, size: i32) -> Self {
        TypeNode::Array {
            sub: Box::new(sub),
            size: Some(Box::new(Expr::int(size))),
        }
    }

    /// Vararg of `sub`.
    pub fn vararg(sub: TypeNode) -> Self {
        TypeNode::Vararg(Box::new(sub))
    }

    /// Named type.
    pub fn named(name: &str) -> Self {
        TypeNode::Named(Name::new(name))
    }

    /// Whether this is the `Inferred` placeholder.
    pub fn is_inferred(&self) -> bool {
        matches!(self, TypeNode::Inferred)
    }
}

impl From<PrimitiveType> for TypeNode {
    fn from(primitive: PrimitiveType) -> Self {
        TypeNode::Primitive(primitive)
    }
}
