//! Tree-walking interpreter.
//!
//! [`Interpreter::evaluate`] dispatches on the node kind; assignment and calls
//! live in their own submodules. Scopes are passed explicitly rather than
//! kept on a stack, so a closure body simply runs in a child of the scope it
//! captured.
//!
//! The interpreter always points at the arena of the code it is running. A
//! call into a closure defined by another program switches to that closure's
//! arena for the duration of the body.

mod assignment;
mod builder;
mod function_call;

pub use builder::InterpreterBuilder;

use mgn_ir::{
    BranchRange, Expr, ExprArena, ExprId, ExprKind, ExprRange, MatchBranch, Name, ObjectEntry,
    ObjectEntryRange, ParamRange, SharedArena, StringInterner,
};
use mgn_stack::ensure_sufficient_stack;

use crate::diagnostics::CallStack;
use crate::errors::{undefined_variable, EvalResult, Failure, InternalFault};
use crate::exec;
use crate::operators::evaluate_binary;
use crate::scope::{LocalScope, Scope};
use crate::unary_operators::evaluate_unary;
use crate::value::{FunctionValue, ObjectMap, Value};

/// Arena lookups that report a dangling id or range as an internal fault.
pub(crate) trait ArenaExt {
    fn node(&self, id: ExprId) -> Result<&Expr, InternalFault>;
    fn node_list(&self, range: ExprRange) -> Result<&[ExprId], InternalFault>;
    fn param_list(&self, range: ParamRange) -> Result<&[Name], InternalFault>;
    fn entry_list(&self, range: ObjectEntryRange) -> Result<&[ObjectEntry], InternalFault>;
    fn branch_list(&self, range: BranchRange) -> Result<&[MatchBranch], InternalFault>;
}

impl ArenaExt for ExprArena {
    fn node(&self, id: ExprId) -> Result<&Expr, InternalFault> {
        self.expr(id)
            .ok_or(InternalFault::DanglingExpr { index: id.raw() })
    }

    fn node_list(&self, range: ExprRange) -> Result<&[ExprId], InternalFault> {
        self.expr_list(range).ok_or(InternalFault::DanglingRange {
            table: "expression list",
            start: range.start,
            len: range.len,
        })
    }

    fn param_list(&self, range: ParamRange) -> Result<&[Name], InternalFault> {
        self.params(range).ok_or(InternalFault::DanglingRange {
            table: "parameter",
            start: range.start,
            len: range.len,
        })
    }

    fn entry_list(&self, range: ObjectEntryRange) -> Result<&[ObjectEntry], InternalFault> {
        self.entries(range).ok_or(InternalFault::DanglingRange {
            table: "object entry",
            start: range.start,
            len: range.len,
        })
    }

    fn branch_list(&self, range: BranchRange) -> Result<&[MatchBranch], InternalFault> {
        self.branches(range).ok_or(InternalFault::DanglingRange {
            table: "match branch",
            start: range.start,
            len: range.len,
        })
    }
}

/// Evaluates nodes of one arena against explicit scopes.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: SharedArena,
    pub(crate) call_stack: CallStack,
}

impl<'a> Interpreter<'a> {
    /// Interpreter in the default `Interpret` mode.
    pub fn new(interner: &'a StringInterner, arena: SharedArena) -> Self {
        InterpreterBuilder::new(interner, arena).build()
    }

    /// Number of user function calls currently active.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    /// Evaluate node `id` in `scope`.
    pub fn evaluate(&mut self, id: ExprId, scope: &LocalScope<Scope>) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id, scope))
    }

    #[tracing::instrument(level = "trace", skip(self, scope))]
    fn eval_inner(&mut self, id: ExprId, scope: &LocalScope<Scope>) -> EvalResult {
        let expr = *self.arena.node(id)?;
        self.eval_kind(id, expr, scope)
            .map_err(|failure| failure.or_span(expr.span))
    }

    fn eval_kind(&mut self, id: ExprId, expr: Expr, scope: &LocalScope<Scope>) -> EvalResult {
        match expr.kind {
            ExprKind::Empty => Ok(Value::Empty),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Str(contents) => Ok(Value::string(self.interner.lookup(contents))),
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Float(bits) => Ok(Value::Float(f64::from_bits(bits))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Atom(name) => Ok(Value::Atom(name)),
            ExprKind::List(elements) => self.eval_list(elements, scope),
            ExprKind::Object(entries) => self.eval_object(entries, scope),
            ExprKind::Function { name, params, body } => {
                Ok(self.eval_function(id, name, params, body, scope))
            }
            ExprKind::Ident(name) => self.eval_ident(name, scope),
            ExprKind::Assign {
                target,
                value,
                mode,
            } => self.eval_assign(target, value, mode, scope),
            ExprKind::Property { receiver, key } => {
                let base = self.evaluate(receiver, scope)?;
                let key = self.evaluate(key, scope)?;
                Ok(exec::read_property(&base, &key, self.interner)?)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.evaluate(operand, scope)?;
                Ok(evaluate_unary(&value, op)?)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.evaluate(left, scope)?;
                let right = self.evaluate(right, scope)?;
                Ok(evaluate_binary(&left, &right, op)?)
            }
            ExprKind::Call { func, args } => self.eval_call(func, args, expr.span, scope),
            ExprKind::IfMatch { subject, branches } => {
                self.eval_if_match(subject, branches, scope)
            }
            ExprKind::Block(exprs) => self.eval_block(exprs, scope),
        }
    }

    fn eval_list(&mut self, elements: ExprRange, scope: &LocalScope<Scope>) -> EvalResult {
        let arena = self.arena.clone();
        let ids = arena.node_list(elements)?;
        let mut items = Vec::with_capacity(ids.len());
        for &id in ids {
            items.push(self.evaluate(id, scope)?);
        }
        Ok(Value::list(items))
    }

    fn eval_object(&mut self, entries: ObjectEntryRange, scope: &LocalScope<Scope>) -> EvalResult {
        let arena = self.arena.clone();
        let entries = arena.entry_list(entries)?;
        let mut map = ObjectMap::default();
        map.reserve(entries.len());
        for entry in entries {
            let key = self.object_key(entry.key, scope)?;
            let value = self.evaluate(entry.value, scope)?;
            map.insert(key, value);
        }
        Ok(Value::object(map))
    }

    /// Key of an object literal or object pattern entry.
    ///
    /// A bare identifier names the key itself; anything else is evaluated and
    /// must be a string or number.
    pub(crate) fn object_key(&mut self, key: ExprId, scope: &LocalScope<Scope>) -> EvalResult<String> {
        let key_expr = *self.arena.node(key)?;
        if let ExprKind::Ident(name) = key_expr.kind {
            return Ok(self.interner.lookup(name).to_string());
        }
        let value = self.evaluate(key, scope)?;
        exec::literal_key(&value, self.interner)
            .map_err(|err| Failure::from(err).or_span(key_expr.span))
    }

    fn eval_function(
        &mut self,
        def: ExprId,
        name: Name,
        params: ParamRange,
        body: ExprId,
        scope: &LocalScope<Scope>,
    ) -> Value {
        let func = Value::Function(FunctionValue::new(
            def,
            name,
            params,
            body,
            self.arena.clone(),
            scope.clone(),
        ));
        // Bound before returning so the body can call itself by name.
        if !name.is_empty() {
            scope.borrow_mut().bind(name, func.clone());
        }
        func
    }

    fn eval_ident(&self, name: Name, scope: &LocalScope<Scope>) -> EvalResult {
        let found = scope.borrow().get(name);
        found.ok_or_else(|| undefined_variable(self.interner.lookup(name)).into())
    }

    /// First branch whose pattern equals the subject; later patterns are never
    /// evaluated.
    fn eval_if_match(
        &mut self,
        subject: ExprId,
        branches: BranchRange,
        scope: &LocalScope<Scope>,
    ) -> EvalResult {
        let subject = self.evaluate(subject, scope)?;
        let arena = self.arena.clone();
        for branch in arena.branch_list(branches)? {
            let pattern = self.evaluate(branch.pattern, scope)?;
            if subject.equals(&pattern) {
                return self.evaluate(branch.body, scope);
            }
        }
        Ok(Value::Null)
    }

    fn eval_block(&mut self, exprs: ExprRange, scope: &LocalScope<Scope>) -> EvalResult {
        let block_scope = Scope::child(scope);
        let arena = self.arena.clone();
        let mut last = Value::Null;
        for &id in arena.node_list(exprs)? {
            last = self.evaluate(id, &block_scope)?;
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests;
