//! Lexical scope chain.
//!
//! Each block body and function call gets its own [`Scope`] whose parent is
//! the enclosing scope. Scopes are shared through [`LocalScope`] handles: the
//! evaluator holds one while a block runs, and every closure created inside
//! holds another, so the scope outlives the block when captured.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use mgn_ir::Name;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Error returned by `Scope::assign_nonlocal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// No scope in the chain binds the name.
    Undefined,
}

/// Single-threaded shared handle to a scope.
///
/// Wraps `Rc<RefCell<T>>`; all allocations go through [`LocalScope::new`].
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

    /// Whether both handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &LocalScope<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
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

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Name to value bindings plus an optional parent.
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// A scope with no parent.
    pub fn root() -> LocalScope<Scope> {
        LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            parent: None,
        })
    }

    /// A fresh scope whose lookups fall through to `parent`.
    pub fn child(parent: &LocalScope<Scope>) -> LocalScope<Scope> {
        LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent.clone()),
        })
    }

    /// Look `name` up here, then in each ancestor.
    pub fn get(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => None,
        }
    }

    /// Create or overwrite `name` in this scope only.
    #[inline]
    pub fn bind(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Overwrite the nearest existing binding of `name`; never creates one.
    pub fn assign_nonlocal(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign_nonlocal(name, value),
            None => Err(AssignError::Undefined),
        }
    }

    pub fn parent(&self) -> Option<&LocalScope<Scope>> {
        self.parent.as_ref()
    }
}

impl fmt::Debug for Scope {
    // Bound closures point back at their scope; print names only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<Name> = self.bindings.keys().copied().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
