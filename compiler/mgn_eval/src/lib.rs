//! Magnolia Eval - tree-walking evaluator for Magnolia programs.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Scope` / `LocalScope`: lexical scope chain shared by blocks and closures
//! - `evaluate_binary`: direct enum-based binary operator dispatch
//! - `evaluate_unary`: direct enum-based unary operator dispatch
//! - `exec`: indexing, key conversion and parameter binding on plain values
//! - `Interpreter`: walks an [`mgn_ir::ExprArena`] node by node
//! - `Context`: root scope, builtins and error reporting for a host
//!
//! Runtime errors are [`EvalError`]s carrying a typed [`EvalErrorKind`], the
//! failing span and a backtrace. A malformed tree is an [`InternalFault`].
//! Both travel as a [`Failure`].

mod context;
pub mod diagnostics;
pub mod errors;
mod eval_mode;
pub mod exec;
pub mod interpreter;
mod logging;
mod operators;
mod scope;
mod unary_operators;
mod value;

pub use context::Context;
pub use diagnostics::{BacktraceFrame, CallFrame, CallStack, EvalBacktrace};
pub use errors::{EvalError, EvalErrorKind, EvalResult, Failure, InternalFault};
pub use eval_mode::EvalMode;
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use logging::init_tracing;
pub use operators::evaluate_binary;
pub use scope::{AssignError, LocalScope, Scope};
pub use unary_operators::evaluate_unary;
pub use value::{BuiltinFn, BuiltinFunction, FunctionValue, Heap, ObjectMap, Value, ValueDisplay};

pub use mgn_stack::ensure_sufficient_stack;

#[cfg(test)]
mod tests;
