use std::fmt;

use kb_ir::Name;

use crate::errors::EvalError;
use crate::value::Value;

/// Non-local control transfer raised by `break`, `next`, `return` and `yield`.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Break(Option<Name>),
    Next(Option<Name>),
    /// Leave the sub; the result is whatever the implicit return slot holds.
    Return,
    Yield(Value),
}

impl Signal {
    /// Whether a construct labelled `label` should handle this signal.
    ///
    /// An unlabelled signal targets the innermost construct; a labelled one
    /// only the construct carrying that label.
    pub fn targets(signal_label: Option<&Name>, label: Option<&Name>) -> bool {
        match signal_label {
            None => true,
            Some(wanted) => label == Some(wanted),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Break(None) => f.write_str("break"),
            Signal::Break(Some(label)) => write!(f, "break {label}"),
            Signal::Next(None) => f.write_str("next"),
            Signal::Next(Some(label)) => write!(f, "next {label}"),
            Signal::Return => f.write_str("return"),
            Signal::Yield(_) => f.write_str("yield"),
        }
    }
}

/// How a statement finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Normal,
    Signal(Signal),
}

/// Result of executing a statement.
pub type ExecResult = Result<Flow, EvalError>;
