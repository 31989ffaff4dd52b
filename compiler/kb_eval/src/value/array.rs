//! Shared, homogeneously typed arrays.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::types::Type;

struct ArrayData {
    element_type: Type,
    values: Vec<Value>,
}

/// An array value.
///
/// Cloning shares the storage: aliases observe element stores. Element
/// stores are checked by the caller against [`ArrayInstance::element_type`].
#[derive(Clone)]
pub struct ArrayInstance(Rc<RefCell<ArrayData>>);

impl ArrayInstance {
    pub fn new(element_type: Type, values: Vec<Value>) -> Self {
        ArrayInstance(Rc::new(RefCell::new(ArrayData {
            element_type,
            values,
        })))
    }

    pub fn element_type(&self) -> Type {
        self.0.borrow().element_type.clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().values.get(index).cloned()
    }

    /// Overwrite an element. Returns `false` when out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.borrow_mut().values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the elements.
    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().values.clone()
    }

    /// Whether both handles point at the same storage.
    pub fn ptr_eq(&self, other: &ArrayInstance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ArrayInstance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.borrow().values == other.0.borrow().values
    }
}

impl fmt::Debug for ArrayInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        write!(f, "Array<{}>{:?}", data.element_type, data.values)
    }
}

impl fmt::Display for ArrayInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.borrow().values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
