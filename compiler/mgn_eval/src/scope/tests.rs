#![allow(clippy::unwrap_used, reason = "tests can panic")]

use mgn_ir::StringInterner;

use super::*;

#[test]
fn test_get_walks_parents() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let root = Scope::root();
    root.borrow_mut().bind(x, Value::Int(1));
    let inner = Scope::child(&Scope::child(&root));

    assert_eq!(inner.borrow().get(x), Some(Value::Int(1)));
    assert!(inner.borrow().get(interner.intern("y")).is_none());
}

#[test]
fn test_bind_shadows_without_touching_parent() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let root = Scope::root();
    root.borrow_mut().bind(x, Value::Int(1));
    let inner = Scope::child(&root);

    inner.borrow_mut().bind(x, Value::Int(2));

    assert_eq!(inner.borrow().get(x), Some(Value::Int(2)));
    assert_eq!(root.borrow().get(x), Some(Value::Int(1)));
}

#[test]
fn test_assign_nonlocal_updates_nearest_binding() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let root = Scope::root();
    root.borrow_mut().bind(x, Value::Int(1));
    let middle = Scope::child(&root);
    middle.borrow_mut().bind(x, Value::Int(2));
    let inner = Scope::child(&middle);

    inner.borrow_mut().assign_nonlocal(x, Value::Int(3)).unwrap();

    assert_eq!(middle.borrow().get(x), Some(Value::Int(3)));
    assert_eq!(root.borrow().get(x), Some(Value::Int(1)));
}

#[test]
fn test_assign_nonlocal_never_creates() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let scope = Scope::child(&Scope::root());

    let result = scope.borrow_mut().assign_nonlocal(x, Value::Null);

    assert_eq!(result, Err(AssignError::Undefined));
    assert!(scope.borrow().get(x).is_none());
}

#[test]
fn test_local_scope_identity() {
    let root = Scope::root();
    let alias = root.clone();
    let child = Scope::child(&root);

    assert!(root.ptr_eq(&alias));
    assert!(!root.ptr_eq(&child));
    assert!(child.borrow().parent().unwrap().ptr_eq(&root));
}
