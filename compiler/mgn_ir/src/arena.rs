//! Arena storage for one parsed program.
//!
//! Nodes are appended to `exprs` and never removed; variable-length children
//! live in side tables addressed by range types. Lookups return `Option` so a
//! malformed tree surfaces as an evaluator fault rather than a panic.

use std::sync::Arc;

use crate::ast::{
    BranchRange, Expr, ExprKind, MatchBranch, ObjectEntry, ObjectEntryRange, ParamRange,
};
use crate::{ExprId, ExprRange, Name, Span};

/// Convert a table length to a `(start, len)` pair.
///
/// # Panics
/// Panics if the table outgrows `u32` indices or a single run exceeds
/// `u16::MAX` children; the parser rejects such programs before this point.
fn range_bounds(start: usize, len: usize) -> (u32, u16) {
    let start = u32::try_from(start)
        .unwrap_or_else(|_| panic!("arena side table exceeded u32::MAX entries"));
    let len = u16::try_from(len)
        .unwrap_or_else(|_| panic!("node has {len} children, max is {}", u16::MAX));
    (start, len)
}

fn slice<T>(table: &[T], start: u32, len: u16) -> Option<&[T]> {
    let start = start as usize;
    table.get(start..start.checked_add(usize::from(len))?)
}

/// Flat storage for every node of a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    params: Vec<Name>,
    entries: Vec<ObjectEntry>,
    branches: Vec<MatchBranch>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Allocate a node.
    ///
    /// # Panics
    /// Panics past `u32::MAX - 1` nodes.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("expression arena exceeded u32::MAX nodes"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(ids);
        let (start, len) = range_bounds(start, self.expr_lists.len() - start);
        ExprRange::new(start, len)
    }

    pub fn alloc_params(&mut self, names: impl IntoIterator<Item = Name>) -> ParamRange {
        let start = self.params.len();
        self.params.extend(names);
        let (start, len) = range_bounds(start, self.params.len() - start);
        ParamRange::new(start, len)
    }

    pub fn alloc_entries(
        &mut self,
        entries: impl IntoIterator<Item = ObjectEntry>,
    ) -> ObjectEntryRange {
        let start = self.entries.len();
        self.entries.extend(entries);
        let (start, len) = range_bounds(start, self.entries.len() - start);
        ObjectEntryRange::new(start, len)
    }

    pub fn alloc_branches(
        &mut self,
        branches: impl IntoIterator<Item = MatchBranch>,
    ) -> BranchRange {
        let start = self.branches.len();
        self.branches.extend(branches);
        let (start, len) = range_bounds(start, self.branches.len() - start);
        BranchRange::new(start, len)
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> Option<&[ExprId]> {
        slice(&self.expr_lists, range.start, range.len)
    }

    #[inline]
    pub fn params(&self, range: ParamRange) -> Option<&[Name]> {
        slice(&self.params, range.start, range.len)
    }

    #[inline]
    pub fn entries(&self, range: ObjectEntryRange) -> Option<&[ObjectEntry]> {
        slice(&self.entries, range.start, range.len)
    }

    #[inline]
    pub fn branches(&self, range: BranchRange) -> Option<&[MatchBranch]> {
        slice(&self.branches, range.start, range.len)
    }

    /// Rewrite `with call callback` into a plain call.
    ///
    /// `with f(a, b) fn ...` becomes `f(a, b, fn ...)`. When `call` is not a
    /// call expression it is treated as the callee: `with g fn ...` becomes
    /// `g(fn ...)`. The original call node is left in place, unreferenced.
    pub fn desugar_with(&mut self, call: ExprId, callback: ExprId, span: Span) -> ExprId {
        let existing = self.expr(call).and_then(|expr| match expr.kind {
            ExprKind::Call { func, args } => self
                .expr_list(args)
                .map(|args| (func, args.to_vec())),
            _ => None,
        });

        let (func, mut args) = existing.unwrap_or((call, Vec::new()));
        args.push(callback);
        let args = self.alloc_expr_list(args);
        self.alloc_expr(Expr::new(ExprKind::Call { func, args }, span))
    }
}

/// Immutable, cheaply cloneable handle to a finished arena.
///
/// Function values keep one of these so a closure can run after the program
/// that defined it has finished evaluating.
#[derive(Clone, Debug)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }

    /// Whether both handles point at the same arena.
    pub fn ptr_eq(&self, other: &SharedArena) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ExprArena> for SharedArena {
    fn from(arena: ExprArena) -> Self {
        SharedArena::new(arena)
    }
}

impl std::ops::Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
