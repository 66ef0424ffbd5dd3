//! Expression nodes.
//!
//! Magnolia is expression-only: a program is a block, and every construct
//! (assignment, function literal, match) produces a value.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use super::ranges::{BranchRange, ObjectEntryRange, ParamRange};
use crate::{ExprId, ExprRange, Name, Span};

/// Expression node: a kind plus the source range it was parsed from.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// How an assignment binds an identifier target.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignMode {
    /// `:=` creates or overwrites a binding in the current scope.
    Local,
    /// `<-` overwrites the nearest existing binding up the scope chain.
    Nonlocal,
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// `_`, the wildcard that equals every value.
    Empty,
    /// `?`
    Null,
    /// String literal; the contents are interned.
    Str(Name),
    Int(i64),
    /// Float literal stored as bits for `Eq`/`Hash`.
    Float(u64),
    Bool(bool),
    /// `:name`
    Atom(Name),

    /// `[a, b, c]`, also a destructuring pattern on the left of `:=`.
    List(ExprRange),
    /// `{key: value, ...}`, also a destructuring pattern.
    Object(ObjectEntryRange),
    /// `fn name(params) body`; `name` is `Name::EMPTY` for anonymous functions.
    Function {
        name: Name,
        params: ParamRange,
        body: ExprId,
    },

    Ident(Name),
    Assign {
        target: ExprId,
        value: ExprId,
        mode: AssignMode,
    },
    /// `receiver.key`. The parser lowers `.name` to a string literal key, so
    /// `key` is always evaluated.
    Property {
        receiver: ExprId,
        key: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Call {
        func: ExprId,
        args: ExprRange,
    },
    /// `if subject { pattern -> body, ... }`
    IfMatch {
        subject: ExprId,
        branches: BranchRange,
    },
    /// `{ e1, e2, ... }` or `( e1, e2, ... )`; the program root is a block too.
    Block(ExprRange),
}

impl ExprKind {
    /// Float literal node from an `f64`.
    pub fn float(value: f64) -> Self {
        ExprKind::Float(value.to_bits())
    }
}
