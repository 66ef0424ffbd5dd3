//! Node-by-node program construction.
//!
//! The parser and hand-written programs (tests, embedders) build trees through
//! [`AstBuilder`]. Methods take `&self` so children can be built inline:
//!
//! ```text
//! let b = AstBuilder::new(&interner);
//! let sum = b.binary(BinaryOp::Add, b.int(1), b.ident("x"));
//! let root = b.block([b.assign(b.ident("x"), b.int(2)), sum]);
//! let arena = b.finish();
//! ```

use std::cell::{Cell, RefCell};

use crate::ast::{AssignMode, BinaryOp, Expr, ExprKind, MatchBranch, ObjectEntry, UnaryOp};
use crate::{ExprArena, ExprId, StringInterner, Span};

/// Interning, allocating front end to an [`ExprArena`].
pub struct AstBuilder<'i> {
    arena: RefCell<ExprArena>,
    interner: &'i StringInterner,
    span: Cell<Span>,
}

impl<'i> AstBuilder<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        AstBuilder {
            arena: RefCell::new(ExprArena::new()),
            interner,
            span: Cell::new(Span::DUMMY),
        }
    }

    /// Use `span` for every node allocated from now on.
    pub fn at(&self, span: Span) -> &Self {
        self.span.set(span);
        self
    }

    pub fn finish(self) -> ExprArena {
        self.arena.into_inner()
    }

    fn alloc(&self, kind: ExprKind) -> ExprId {
        let span = self.span.get();
        self.arena.borrow_mut().alloc_expr(Expr::new(kind, span))
    }

    fn alloc_list(&self, ids: impl IntoIterator<Item = ExprId>) -> crate::ExprRange {
        let ids: Vec<ExprId> = ids.into_iter().collect();
        self.arena.borrow_mut().alloc_expr_list(ids)
    }

    pub fn empty(&self) -> ExprId {
        self.alloc(ExprKind::Empty)
    }

    pub fn null(&self) -> ExprId {
        self.alloc(ExprKind::Null)
    }

    pub fn string(&self, contents: &str) -> ExprId {
        self.alloc(ExprKind::Str(self.interner.intern(contents)))
    }

    pub fn int(&self, value: i64) -> ExprId {
        self.alloc(ExprKind::Int(value))
    }

    pub fn float(&self, value: f64) -> ExprId {
        self.alloc(ExprKind::float(value))
    }

    pub fn bool(&self, value: bool) -> ExprId {
        self.alloc(ExprKind::Bool(value))
    }

    pub fn atom(&self, name: &str) -> ExprId {
        self.alloc(ExprKind::Atom(self.interner.intern(name)))
    }

    pub fn ident(&self, name: &str) -> ExprId {
        self.alloc(ExprKind::Ident(self.interner.intern(name)))
    }

    pub fn list(&self, elements: impl IntoIterator<Item = ExprId>) -> ExprId {
        let elements = self.alloc_list(elements);
        self.alloc(ExprKind::List(elements))
    }

    /// Object literal or pattern from `(key, value)` node pairs.
    pub fn object(&self, entries: impl IntoIterator<Item = (ExprId, ExprId)>) -> ExprId {
        // Collect before borrowing: the iterator may allocate nodes itself.
        let entries: Vec<_> = entries
            .into_iter()
            .map(|(key, value)| ObjectEntry { key, value })
            .collect();
        let entries = self.arena.borrow_mut().alloc_entries(entries);
        self.alloc(ExprKind::Object(entries))
    }

    /// Function literal; `name: None` makes it anonymous.
    pub fn function(&self, name: Option<&str>, params: &[&str], body: ExprId) -> ExprId {
        let name = name.map_or(crate::Name::EMPTY, |n| self.interner.intern(n));
        let params: Vec<_> = params.iter().map(|p| self.interner.intern(p)).collect();
        let params = self.arena.borrow_mut().alloc_params(params);
        self.alloc(ExprKind::Function { name, params, body })
    }

    /// `target := value`
    pub fn assign(&self, target: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assign {
            target,
            value,
            mode: AssignMode::Local,
        })
    }

    /// `target <- value`
    pub fn assign_nonlocal(&self, target: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assign {
            target,
            value,
            mode: AssignMode::Nonlocal,
        })
    }

    pub fn property(&self, receiver: ExprId, key: ExprId) -> ExprId {
        self.alloc(ExprKind::Property { receiver, key })
    }

    /// `receiver.name`, with the key lowered to a string literal.
    pub fn dot(&self, receiver: ExprId, name: &str) -> ExprId {
        let key = self.string(name);
        self.property(receiver, key)
    }

    pub fn unary(&self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn binary(&self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right })
    }

    pub fn call(&self, func: ExprId, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let args = self.alloc_list(args);
        self.alloc(ExprKind::Call { func, args })
    }

    /// `with call callback`, desugared on the spot.
    pub fn with_callback(&self, call: ExprId, callback: ExprId) -> ExprId {
        let span = self.span.get();
        self.arena
            .borrow_mut()
            .desugar_with(call, callback, span)
    }

    /// `if subject { pattern -> body, ... }` from `(pattern, body)` pairs.
    pub fn if_match(
        &self,
        subject: ExprId,
        branches: impl IntoIterator<Item = (ExprId, ExprId)>,
    ) -> ExprId {
        let branches: Vec<_> = branches
            .into_iter()
            .map(|(pattern, body)| MatchBranch { pattern, body })
            .collect();
        let branches = self.arena.borrow_mut().alloc_branches(branches);
        self.alloc(ExprKind::IfMatch { subject, branches })
    }

    pub fn block(&self, exprs: impl IntoIterator<Item = ExprId>) -> ExprId {
        let exprs = self.alloc_list(exprs);
        self.alloc(ExprKind::Block(exprs))
    }
}
