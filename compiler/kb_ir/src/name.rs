//! Identifiers.
//!
//! Names are reference-counted strings: cloning one is a pointer copy, which
//! matters because the runtime stores names in every scope, reference and
//! declaration it creates.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// An identifier (variable, subroutine, data type, enum, alias or label).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Rc<str>);

impl Name {
    /// Create a name from a string slice.
    pub fn new(name: &str) -> Self {
        Name(Rc::from(name))
    }

    /// Get the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form, used for signatures and operator sub lookup.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Name::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Name(Rc::from(name))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
