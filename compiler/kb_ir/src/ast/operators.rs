//! Binary and Unary Operators
//!
//! All operator types used in expressions.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Mutation
    Assign,
    Swap,

    // Logical
    Or,
    And,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Type tests
    Is,
    IsNot,

    // String
    Concat,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,

    // Other
    As,
    Dot,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Swap => "<>",
            Self::Or => "or",
            Self::And => "and",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Concat => "&",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulus => "%",
            Self::As => "as",
            Self::Dot => ".",
        }
    }

    /// Name of the user sub a composite left operand dispatches to.
    ///
    /// Only the arithmetic operators are overloadable.
    pub const fn operator_sub_name(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("add"),
            Self::Subtract => Some("subtract"),
            Self::Multiply => Some("multiply"),
            Self::Divide => Some("divide"),
            Self::Modulus => Some("modulus"),
            _ => None,
        }
    }

    /// Whether this is a comparison operator (`<`, `<=`, `>`, `>=`).
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual
        )
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Negate,
    Not,
    Length,
    Stringify,
    Unwrap,
}

impl UnaryOp {
    /// Returns the source-level spelling for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "not",
            Self::Length => "length",
            Self::Stringify => "stringify",
            Self::Unwrap => "unwrap",
        }
    }

    /// Name of the user sub a composite operand dispatches to.
    pub const fn operator_sub_name(self) -> Option<&'static str> {
        match self {
            Self::Negate => Some("negate"),
            Self::Length => Some("length"),
            Self::Stringify => Some("stringify"),
            Self::Not | Self::Unwrap => None,
        }
    }
}
