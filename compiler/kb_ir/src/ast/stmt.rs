//! Statement Types
//!
//! Statement node and variants, plus the declaration payloads (subroutine,
//! data and enum definitions).

use std::fmt;
use std::rc::Rc;

use super::expr::Expr;
use super::types::TypeNode;
use crate::{Name, Span, Spanned};

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    None,
    Decl {
        name: Name,
        ty: TypeNode,
        init: Expr,
        constant: bool,
    },
    /// Positional destructuring declaration.
    DeclEach {
        names: Vec<(Name, TypeNode)>,
        init: Expr,
        constant: bool,
    },
    Block(Vec<Stmt>),
    /// A block that `break`/`next` can target.
    Do {
        label: Option<Name>,
        body: Vec<Stmt>,
    },
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        otherwise: Option<Vec<Stmt>>,
    },
    Switch {
        label: Option<Name>,
        subject: Expr,
        cases: Vec<Case>,
    },
    While {
        label: Option<Name>,
        test: Expr,
        body: Vec<Stmt>,
    },
    Until {
        label: Option<Name>,
        test: Expr,
        body: Vec<Stmt>,
    },
    ForCounter {
        label: Option<Name>,
        name: Name,
        ty: TypeNode,
        from: Expr,
        to: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    ForIterate {
        label: Option<Name>,
        name: Name,
        ty: TypeNode,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    ForIterateEach {
        label: Option<Name>,
        names: Vec<(Name, TypeNode)>,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    Data {
        name: Name,
        fields: Vec<DataField>,
    },
    Sub(Rc<SubDef>),
    Break(Option<Name>),
    Next(Option<Name>),
    Return,
    Yield(Expr),
    TypeAlias {
        name: Name,
        ty: TypeNode,
    },
    Enum {
        name: Name,
        kind: EnumKind,
        entries: Vec<EnumEntryDef>,
    },
    Expression(Expr),
}

impl StmtKind {
    /// Short description used in error traces.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::None => "empty statement",
            Self::Decl { .. } => "declaration",
            Self::DeclEach { .. } => "destructuring declaration",
            Self::Block(_) => "block",
            Self::Do { .. } => "do block",
            Self::If { .. } => "if",
            Self::Switch { .. } => "switch",
            Self::While { .. } => "while loop",
            Self::Until { .. } => "until loop",
            Self::ForCounter { .. } => "for loop",
            Self::ForIterate { .. } | Self::ForIterateEach { .. } => "for-each loop",
            Self::Data { .. } => "data declaration",
            Self::Sub(_) => "sub declaration",
            Self::Break(_) => "break",
            Self::Next(_) => "next",
            Self::Return => "return",
            Self::Yield(_) => "yield",
            Self::TypeAlias { .. } => "type alias",
            Self::Enum { .. } => "enum declaration",
            Self::Expression(_) => "expression",
        }
    }
}

/// One `case` of a switch.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub kind: CaseKind,
    pub body: Vec<Stmt>,
}

/// How a case decides whether it matches the switch subject.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseKind {
    /// Matches when the subject equals any of the listed values.
    Values(Vec<Expr>),
    /// Matches when the subject conforms to the type (or does not, if inverted).
    Type { ty: TypeNode, inverted: bool },
    /// Always matches.
    Else,
}

/// A field of a data declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct DataField {
    pub name: Name,
    pub ty: TypeNode,
    pub constant: bool,
    /// Evaluated at instantiation when no element is supplied for the field.
    pub default: Option<Expr>,
}

impl DataField {
    pub fn new(name: &str, ty: impl Into<TypeNode>) -> Self {
        DataField {
            name: Name::new(name),
            ty: ty.into(),
            constant: false,
            default: None,
        }
    }

    #[must_use]
    pub fn constant(mut self) -> Self {
        self.constant = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A subroutine parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: TypeNode,
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: &str, ty: impl Into<TypeNode>) -> Self {
        Param {
            name: Name::new(name),
            ty: ty.into(),
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A subroutine definition.
///
/// Shared (`Rc`) so the runtime can keep the body alive in its overload
/// table after the declaring statement has executed.
#[derive(Clone, Debug, PartialEq)]
pub struct SubDef {
    pub name: Name,
    pub params: Vec<Param>,
    /// `Inferred` means the sub returns `none`.
    pub returns: TypeNode,
    pub body: Vec<Stmt>,
    /// Bound to a native function from the library instead of running `body`.
    pub builtin: bool,
}

impl SubDef {
    pub fn new(name: &str, params: Vec<Param>, returns: impl Into<TypeNode>, body: Vec<Stmt>) -> Self {
        SubDef {
            name: Name::new(name),
            params,
            returns: returns.into(),
            body,
            builtin: false,
        }
    }

    /// A sub whose implementation comes from the native library.
    pub fn builtin(name: &str, params: Vec<Param>, returns: impl Into<TypeNode>) -> Self {
        SubDef {
            name: Name::new(name),
            params,
            returns: returns.into(),
            body: Vec::new(),
            builtin: true,
        }
    }
}

/// The two enum flavours.
#[derive(Clone, Debug, PartialEq)]
pub enum EnumKind {
    /// Entries carry values of the given type.
    Basic(TypeNode),
    /// Entries carry an instance of the named data type.
    Data(Name),
}

/// An enum entry definition.
///
/// For basic enums `elements` holds at most one value expression; for data
/// enums it holds the instantiation elements.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumEntryDef {
    pub name: Name,
    pub elements: Vec<Expr>,
}

impl EnumEntryDef {
    pub fn new(name: &str, elements: Vec<Expr>) -> Self {
        EnumEntryDef {
            name: Name::new(name),
            elements,
        }
    }
}

fn label(label: Option<&str>) -> Option<Name> {
    label.map(Name::new)
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    /// Node without a source location.
    pub fn synthetic(kind: StmtKind) -> Self {
        Stmt {
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

    pub fn expr(expr: Expr) -> Self {
        Self::synthetic(StmtKind::Expression(expr))
    }

    /// `var name as ty = init`.
    pub fn decl(name: &str, ty: impl Into<TypeNode>, init: Expr) -> Self {
        Self::synthetic(StmtKind::Decl {
            name: Name::new(name),
            ty: ty.into(),
            init,
            constant: false,
        })
    }

    /// `let name as ty = init`.
    pub fn constant(name: &str, ty: impl Into<TypeNode>, init: Expr) -> Self {
        Self::synthetic(StmtKind::Decl {
            name: Name::new(name),
            ty: ty.into(),
            init,
            constant: true,
        })
    }

    pub fn decl_each(names: &[&str], init: Expr) -> Self {
        Self::synthetic(StmtKind::DeclEach {
            names: names
                .iter()
                .map(|n| (Name::new(n), TypeNode::Inferred))
                .collect(),
            init,
            constant: false,
        })
    }

    pub fn block(body: Vec<Stmt>) -> Self {
        Self::synthetic(StmtKind::Block(body))
    }

    pub fn do_block(label_name: Option<&str>, body: Vec<Stmt>) -> Self {
        Self::synthetic(StmtKind::Do {
            label: label(label_name),
            body,
        })
    }

    pub fn if_else(branches: Vec<(Expr, Vec<Stmt>)>, otherwise: Option<Vec<Stmt>>) -> Self {
        Self::synthetic(StmtKind::If {
            branches,
            otherwise,
        })
    }

    pub fn switch(label_name: Option<&str>, subject: Expr, cases: Vec<Case>) -> Self {
        Self::synthetic(StmtKind::Switch {
            label: label(label_name),
            subject,
            cases,
        })
    }

    pub fn while_loop(label_name: Option<&str>, test: Expr, body: Vec<Stmt>) -> Self {
        Self::synthetic(StmtKind::While {
            label: label(label_name),
            test,
            body,
        })
    }

    pub fn until_loop(label_name: Option<&str>, test: Expr, body: Vec<Stmt>) -> Self {
        Self::synthetic(StmtKind::Until {
            label: label(label_name),
            test,
            body,
        })
    }

    /// `for name = from to to [step step]`.
    pub fn for_counter(
        label_name: Option<&str>,
        name: &str,
        from: Expr,
        to: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    ) -> Self {
        Self::synthetic(StmtKind::ForCounter {
            label: label(label_name),
            name: Name::new(name),
            ty: TypeNode::Inferred,
            from,
            to,
            step,
            body,
        })
    }

    pub fn for_iterate(label_name: Option<&str>, name: &str, iterable: Expr, body: Vec<Stmt>) -> Self {
        Self::synthetic(StmtKind::ForIterate {
            label: label(label_name),
            name: Name::new(name),
            ty: TypeNode::Inferred,
            iterable,
            body,
        })
    }

    pub fn for_iterate_each(
        label_name: Option<&str>,
        names: &[&str],
        iterable: Expr,
        body: Vec<Stmt>,
    ) -> Self {
        Self::synthetic(StmtKind::ForIterateEach {
            label: label(label_name),
            names: names
                .iter()
                .map(|n| (Name::new(n), TypeNode::Inferred))
                .collect(),
            iterable,
            body,
        })
    }

    pub fn data(name: &str, fields: Vec<DataField>) -> Self {
        Self::synthetic(StmtKind::Data {
            name: Name::new(name),
            fields,
        })
    }

    pub fn sub(def: SubDef) -> Self {
        Self::synthetic(StmtKind::Sub(Rc::new(def)))
    }

    pub fn break_to(label_name: Option<&str>) -> Self {
        Self::synthetic(StmtKind::Break(label(label_name)))
    }

    pub fn next_to(label_name: Option<&str>) -> Self {
        Self::synthetic(StmtKind::Next(label(label_name)))
    }

    pub fn ret() -> Self {
        Self::synthetic(StmtKind::Return)
    }

    pub fn yield_value(value: Expr) -> Self {
        Self::synthetic(StmtKind::Yield(value))
    }

    pub fn alias(name: &str, ty: impl Into<TypeNode>) -> Self {
        Self::synthetic(StmtKind::TypeAlias {
            name: Name::new(name),
            ty: ty.into(),
        })
    }

    pub fn basic_enum(name: &str, ty: impl Into<TypeNode>, entries: Vec<EnumEntryDef>) -> Self {
        Self::synthetic(StmtKind::Enum {
            name: Name::new(name),
            kind: EnumKind::Basic(ty.into()),
            entries,
        })
    }

    pub fn data_enum(name: &str, data: &str, entries: Vec<EnumEntryDef>) -> Self {
        Self::synthetic(StmtKind::Enum {
            name: Name::new(name),
            kind: EnumKind::Data(Name::new(data)),
            entries,
        })
    }
}
