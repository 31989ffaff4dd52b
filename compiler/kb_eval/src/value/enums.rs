//! Enum declarations and entries.

use std::fmt;
use std::rc::Rc;

use kb_ir::Name;

use super::Value;
use crate::types::Type;

struct EntryData {
    enum_name: Name,
    name: Name,
    ordinal: usize,
    value: Value,
}

/// One entry of an enum. Immutable; cloning shares it.
#[derive(Clone)]
pub struct EnumEntry(Rc<EntryData>);

impl EnumEntry {
    pub fn new(enum_name: Name, name: Name, ordinal: usize, value: Value) -> Self {
        EnumEntry(Rc::new(EntryData {
            enum_name,
            name,
            ordinal,
            value,
        }))
    }

    pub fn enum_name(&self) -> &Name {
        &self.0.enum_name
    }

    pub fn name(&self) -> &Name {
        &self.0.name
    }

    pub fn ordinal(&self) -> usize {
        self.0.ordinal
    }

    /// The underlying value (primitive or composite).
    pub fn value(&self) -> &Value {
        &self.0.value
    }
}

impl PartialEq for EnumEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.enum_name == other.0.enum_name && self.0.ordinal == other.0.ordinal
    }
}

impl fmt::Debug for EnumEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}#{}({:?})",
            self.0.enum_name, self.0.name, self.0.ordinal, self.0.value
        )
    }
}

impl fmt::Display for EnumEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name.as_str())
    }
}

/// A registered enum: an ordered, immutable list of entries.
#[derive(Debug)]
pub struct EnumDecl {
    pub name: Name,
    /// Type of the entries' underlying values.
    pub ty: Type,
    pub entries: Vec<EnumEntry>,
}

impl EnumDecl {
    pub fn entry(&self, name: &str) -> Option<&EnumEntry> {
        self.entries.iter().find(|e| e.name().as_str() == name)
    }

    pub fn entry_at(&self, ordinal: usize) -> Option<&EnumEntry> {
        self.entries.get(ordinal)
    }

    /// All entries in ordinal order, as values.
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().cloned().map(Value::Enum).collect()
    }
}
