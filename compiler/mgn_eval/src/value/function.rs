//! Callable values: user closures and native builtins.

use std::fmt;
use std::rc::Rc;

use mgn_ir::{ExprId, Name, ParamRange, SharedArena};

use crate::errors::EvalError;
use crate::scope::{LocalScope, Scope};
use crate::value::Value;

/// A closure: a function definition plus the scope it was evaluated in.
///
/// The captured scope is held by reference, so later nonlocal assignments
/// in that scope are visible when the closure runs.
#[derive(Clone)]
pub struct FunctionValue {
    name: Name,
    params: ParamRange,
    body: ExprId,
    /// The function literal node this closure was created from.
    def: ExprId,
    arena: SharedArena,
    scope: LocalScope<Scope>,
}

impl FunctionValue {
    pub fn new(
        def: ExprId,
        name: Name,
        params: ParamRange,
        body: ExprId,
        arena: SharedArena,
        scope: LocalScope<Scope>,
    ) -> Self {
        FunctionValue {
            name,
            params,
            body,
            def,
            arena,
            scope,
        }
    }

    /// `Name::EMPTY` for anonymous functions.
    pub fn name(&self) -> Name {
        self.name
    }

    pub fn params(&self) -> ParamRange {
        self.params
    }

    pub fn body(&self) -> ExprId {
        self.body
    }

    pub fn definition(&self) -> ExprId {
        self.def
    }

    /// Arena holding the body and parameter names.
    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    pub fn captured_scope(&self) -> &LocalScope<Scope> {
        &self.scope
    }

    /// Same definition evaluated in the same scope.
    pub fn same_closure(&self, other: &FunctionValue) -> bool {
        self.def == other.def
            && self.arena.ptr_eq(&other.arena)
            && self.scope.ptr_eq(&other.scope)
    }
}

impl fmt::Debug for FunctionValue {
    // The captured scope may contain this function; never print it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("def", &self.def)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Signature of a native function.
pub type BuiltinFn = dyn Fn(&[Value]) -> Result<Value, EvalError>;

/// Native function registered by the host, typically the standard library.
#[derive(Clone)]
pub struct BuiltinFunction {
    name: &'static str,
    func: Rc<BuiltinFn>,
}

impl BuiltinFunction {
    pub fn new(
        name: &'static str,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) -> Self {
        BuiltinFunction {
            name,
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(args)
    }

    /// Same registered callable.
    pub fn same_builtin(&self, other: &BuiltinFunction) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFunction({})", self.name)
    }
}
