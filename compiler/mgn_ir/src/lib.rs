//! Magnolia IR: the data the evaluator consumes.
//!
//! This crate holds everything the parser hands to the evaluator:
//! - Spans for source locations
//! - Names for interned identifiers, atoms and string literals
//! - The flat AST (`Expr`, `ExprKind`) stored in an [`ExprArena`]
//! - An [`AstBuilder`] for constructing programs node by node
//!
//! # Design
//!
//! - **Intern everything**: identifiers, atoms and literals become `Name(u32)`
//! - **Flatten everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//!   and variable-length children are `(start, len)` ranges into side tables
//!
//! Float literals are stored as `u64` bits so every node is `Copy + Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod builder;
mod expr_id;
mod interner;
mod name;
mod span;

pub use arena::{ExprArena, SharedArena};
pub use ast::{
    AssignMode, BinaryOp, BranchRange, Expr, ExprKind, MatchBranch, ObjectEntry,
    ObjectEntryRange, ParamRange, UnaryOp,
};
pub use builder::AstBuilder;
pub use expr_id::{ExprId, ExprRange};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::Span;
