//! KB IR - the statement/expression tree consumed by the KB runtime.
//!
//! The tree is produced by an external parser; this crate only defines its
//! shape plus small constructor helpers so that hosts (and tests) can build
//! programs directly.
//!
//! # Module Structure
//!
//! - `name`: Cheap-to-clone identifiers
//! - `span`: Source context attached to every node (used for errors only)
//! - `ast`: Statements, expressions, type syntax and operators

pub mod ast;
mod name;
mod span;

pub use ast::{
    Argument, BinaryOp, Case, CaseKind, DataField, EnumEntryDef, EnumKind, Expr, ExprKind,
    Literal, Param, PrimitiveType, Stmt, StmtKind, SubDef, TypeNode, UnaryOp,
};
pub use name::Name;
pub use span::Span;

/// Trait for types that carry a source span.
pub trait Spanned {
    /// Get the span of this node.
    fn span(&self) -> Span;
}
