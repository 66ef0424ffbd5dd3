//! Flat AST types using arena allocation.
//!
//! - `expr`: expression nodes (`Expr`, `ExprKind`)
//! - `operators`: binary and unary operators
//! - `ranges`: side-table range types
//! - `collections`: object entries and match branches

mod collections;
mod expr;
mod operators;
mod ranges;

pub use collections::{MatchBranch, ObjectEntry};
pub use expr::{AssignMode, Expr, ExprKind};
pub use operators::{BinaryOp, UnaryOp};
pub use ranges::{BranchRange, ObjectEntryRange, ParamRange};
