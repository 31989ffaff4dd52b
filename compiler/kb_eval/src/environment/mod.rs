//! Scope chain and typed storage.
//!
//! A [`Scope`] owns variables ([`Reference`]s), sub overloads and named type
//! declarations, and links to its lexical parent. The [`Environment`] keeps
//! the stack of active scopes; scopes pushed for subroutine calls are
//! parented to the sub's declaring scope rather than to the caller.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use kb_ir::Name;

use crate::errors::{no_active_scope, EvalError};
use crate::subroutine::Subroutine;
use crate::types::{Mismatch, Type};
use crate::value::{DataDecl, EnumDecl, Value};

/// A single-threaded shared handle with interior mutability.
///
/// All scope allocations go through [`LocalScope::new`]. Not thread-safe:
/// the runtime is single-threaded.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A non-owning handle to the same allocation.
    pub fn downgrade(&self) -> WeakScope<T> {
        WeakScope(Rc::downgrade(&self.0))
    }
}

/// Non-owning counterpart of [`LocalScope`].
///
/// Declarations point back at the scope that owns them through this handle,
/// so a scope and its subs do not keep each other alive.
pub struct WeakScope<T>(Weak<RefCell<T>>);

impl<T> WeakScope<T> {
    /// The scope, if it is still alive.
    #[inline]
    pub fn upgrade(&self) -> Option<LocalScope<T>> {
        self.0.upgrade().map(LocalScope)
    }

    /// Like [`WeakScope::upgrade`], failing with `NoActiveScope`.
    pub fn live(&self) -> Result<LocalScope<T>, EvalError> {
        self.upgrade().ok_or_else(no_active_scope)
    }
}

impl<T> Clone for WeakScope<T> {
    fn clone(&self) -> Self {
        WeakScope(Weak::clone(&self.0))
    }
}

impl<T> fmt::Debug for WeakScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakScope")
            .field(&self.0.strong_count())
            .finish()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Outcome of [`Reference::put`].
#[derive(Clone, Debug, PartialEq)]
pub enum PutResult {
    /// Stored; carries the value after coercion.
    Stored(Value),
    Rejected(Mismatch),
    Constant,
}

/// A typed storage cell: variables, parameters and composite fields.
#[derive(Debug)]
pub struct Reference {
    constant: bool,
    ty: Type,
    value: RefCell<Value>,
}

impl Reference {
    /// The value is stored as given; callers conform it first.
    pub fn new(ty: Type, value: Value, constant: bool) -> Self {
        Reference {
            constant,
            ty,
            value: RefCell::new(value),
        }
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Coerce and check `value` against the declared type, then store it.
    pub fn put(&self, value: Value) -> PutResult {
        if self.constant {
            return PutResult::Constant;
        }
        match self.ty.conform(value) {
            Ok(value) => {
                *self.value.borrow_mut() = value.clone();
                PutResult::Stored(value)
            }
            Err(mismatch) => PutResult::Rejected(mismatch),
        }
    }
}

/// Returned when a name is already taken in the target scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlreadyDeclared;

/// A data, enum or alias declaration found by name.
#[derive(Clone, Debug)]
pub enum NamedType {
    Data(Rc<DataDecl>),
    Enum(Rc<EnumDecl>),
    Alias(Type),
}

/// One lexical scope.
#[derive(Default)]
pub struct Scope {
    references: FxHashMap<Name, Rc<Reference>>,
    subs: FxHashMap<Name, Vec<Rc<Subroutine>>>,
    datas: FxHashMap<Name, Rc<DataDecl>>,
    enums: FxHashMap<Name, Rc<EnumDecl>>,
    aliases: FxHashMap<Name, Type>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            parent: Some(parent),
            ..Scope::default()
        }
    }

    pub fn parent(&self) -> Option<&LocalScope<Scope>> {
        self.parent.as_ref()
    }

    /// Register a variable in this scope.
    pub fn declare(
        &mut self,
        name: Name,
        reference: Reference,
    ) -> Result<Rc<Reference>, AlreadyDeclared> {
        if self.references.contains_key(&name) {
            return Err(AlreadyDeclared);
        }
        let reference = Rc::new(reference);
        self.references.insert(name, Rc::clone(&reference));
        Ok(reference)
    }

    /// Variable lookup walking parent links.
    pub fn resolve(&self, name: &str) -> Option<Rc<Reference>> {
        if let Some(reference) = self.references.get(name) {
            return Some(Rc::clone(reference));
        }
        self.parent.as_ref()?.borrow().resolve(name)
    }

    /// Register an overload. Fails when the signature is already taken here.
    pub fn declare_sub(&mut self, sub: Rc<Subroutine>) -> Result<(), AlreadyDeclared> {
        let overloads = self.subs.entry(sub.name().clone()).or_default();
        if overloads.iter().any(|s| s.signature == sub.signature) {
            return Err(AlreadyDeclared);
        }
        overloads.push(sub);
        Ok(())
    }

    /// All overloads of `name`, innermost scope first, declaration order
    /// within a scope.
    pub fn collect_subs(&self, name: &str, out: &mut Vec<Rc<Subroutine>>) {
        if let Some(overloads) = self.subs.get(name) {
            out.extend(overloads.iter().cloned());
        }
        if let Some(parent) = &self.parent {
            parent.borrow().collect_subs(name, out);
        }
    }

    /// Whether any overload of `name` is visible.
    pub fn has_sub(&self, name: &str) -> bool {
        self.subs.contains_key(name)
            || self
                .parent
                .as_ref()
                .is_some_and(|p| p.borrow().has_sub(name))
    }

    pub fn declare_data(&mut self, decl: Rc<DataDecl>) -> Result<(), AlreadyDeclared> {
        if self.datas.contains_key(&decl.name) {
            return Err(AlreadyDeclared);
        }
        self.datas.insert(decl.name.clone(), decl);
        Ok(())
    }

    pub fn declare_enum(&mut self, decl: Rc<EnumDecl>) -> Result<(), AlreadyDeclared> {
        if self.enums.contains_key(&decl.name) {
            return Err(AlreadyDeclared);
        }
        self.enums.insert(decl.name.clone(), decl);
        Ok(())
    }

    pub fn declare_alias(&mut self, name: Name, ty: Type) -> Result<(), AlreadyDeclared> {
        if self.aliases.contains_key(&name) {
            return Err(AlreadyDeclared);
        }
        self.aliases.insert(name, ty);
        Ok(())
    }

    pub fn resolve_data(&self, name: &str) -> Option<Rc<DataDecl>> {
        if let Some(decl) = self.datas.get(name) {
            return Some(Rc::clone(decl));
        }
        self.parent.as_ref()?.borrow().resolve_data(name)
    }

    pub fn resolve_enum(&self, name: &str) -> Option<Rc<EnumDecl>> {
        if let Some(decl) = self.enums.get(name) {
            return Some(Rc::clone(decl));
        }
        self.parent.as_ref()?.borrow().resolve_enum(name)
    }

    /// Named type lookup: data, then enum, then alias at each level.
    pub fn resolve_named(&self, name: &str) -> Option<NamedType> {
        if let Some(decl) = self.datas.get(name) {
            return Some(NamedType::Data(Rc::clone(decl)));
        }
        if let Some(decl) = self.enums.get(name) {
            return Some(NamedType::Enum(Rc::clone(decl)));
        }
        if let Some(ty) = self.aliases.get(name) {
            return Some(NamedType::Alias(ty.clone()));
        }
        self.parent.as_ref()?.borrow().resolve_named(name)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("references", &self.references.keys().collect::<Vec<_>>())
            .field("subs", &self.subs.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish_non_exhaustive()
    }
}

/// The stack of active scopes.
pub struct Environment {
    /// Stack of scopes, with current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
    /// Global scope (always at the bottom).
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    /// The innermost active scope.
    #[inline]
    pub fn current(&self) -> Result<LocalScope<Scope>, EvalError> {
        self.scopes.last().cloned().ok_or_else(no_active_scope)
    }

    /// Push a block scope parented to the current one.
    pub fn push_scope(&mut self) {
        let parent = self.scopes.last().unwrap_or(&self.global).clone();
        self.push_scope_with_parent(parent);
    }

    /// Push a scope with an explicit lexical parent (subroutine calls).
    pub fn push_scope_with_parent(&mut self, parent: LocalScope<Scope>) {
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
        tracing::trace!(depth = self.scopes.len(), "push scope");
    }

    /// Pop the current scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            tracing::trace!(depth = self.scopes.len(), "pop scope");
        }
    }

    /// Variable lookup from the current scope outwards.
    pub fn resolve(&self, name: &str) -> Option<Rc<Reference>> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .resolve(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
