//! Tree AST for KB programs.
//!
//! Nodes own their children (`Box`/`Vec`), since the tree is handed over
//! whole by the parser and walked directly by the runtime.
//!
//! # Module Structure
//!
//! - `expr`: Core expression types (Expr, `ExprKind`, `Literal`, `Argument`)
//! - `operators`: Binary and unary operators
//! - `stmt`: Statement types and declaration payloads
//! - `types`: Type annotations (`TypeNode`, `PrimitiveType`)

mod expr;
mod operators;
mod stmt;
mod types;

pub use expr::{Argument, Expr, ExprKind, Literal};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Case, CaseKind, DataField, EnumEntryDef, EnumKind, Param, Stmt, StmtKind, SubDef};
pub use types::{PrimitiveType, TypeNode};
