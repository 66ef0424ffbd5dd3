//! Assignment: identifier binding, destructuring and property writes.

use mgn_ir::{AssignMode, ExprId, ExprKind, ExprRange, Name, ObjectEntryRange};

use super::{ArenaExt, Interpreter};
use crate::errors::{
    destructure_arity, expected_type, invalid_assignment_target, undefined_variable, EvalResult,
};
use crate::exec;
use crate::scope::{LocalScope, Scope};
use crate::value::Value;

/// How an unassignable node reads in an error message.
fn describe_target(kind: ExprKind) -> &'static str {
    match kind {
        ExprKind::Null => "a null literal",
        ExprKind::Str(_) => "a string literal",
        ExprKind::Int(_) | ExprKind::Float(_) => "a number literal",
        ExprKind::Bool(_) => "a boolean literal",
        ExprKind::Atom(_) => "an atom",
        ExprKind::Function { .. } => "a function literal",
        ExprKind::Assign { .. } => "an assignment",
        ExprKind::Unary { .. } | ExprKind::Binary { .. } => "an operator expression",
        ExprKind::Call { .. } => "a function call",
        ExprKind::IfMatch { .. } => "an if expression",
        ExprKind::Block(_) => "a block",
        ExprKind::Empty
        | ExprKind::List(_)
        | ExprKind::Object(_)
        | ExprKind::Ident(_)
        | ExprKind::Property { .. } => "this expression",
    }
}

impl Interpreter<'_> {
    /// `target := value` / `target <- value`. Evaluates to the assigned value.
    pub(super) fn eval_assign(
        &mut self,
        target: ExprId,
        value: ExprId,
        mode: AssignMode,
        scope: &LocalScope<Scope>,
    ) -> EvalResult {
        let value = self.evaluate(value, scope)?;
        self.assign_to(target, &value, mode, scope)?;
        Ok(value)
    }

    /// Assign `value` to the pattern rooted at `target`.
    fn assign_to(
        &mut self,
        target: ExprId,
        value: &Value,
        mode: AssignMode,
        scope: &LocalScope<Scope>,
    ) -> EvalResult<()> {
        let target_expr = *self.arena.node(target)?;
        let result = match target_expr.kind {
            ExprKind::Ident(name) => self.assign_name(name, value.clone(), mode, scope),
            // `_` discards the value.
            ExprKind::Empty => Ok(()),
            ExprKind::List(patterns) => self.destructure_list(patterns, value, mode, scope),
            ExprKind::Object(entries) => self.destructure_object(entries, value, mode, scope),
            ExprKind::Property { receiver, key } => {
                let base = self.evaluate(receiver, scope)?;
                let key = self.evaluate(key, scope)?;
                exec::write_property(&base, &key, value.clone(), self.interner)?;
                Ok(())
            }
            other => Err(invalid_assignment_target(describe_target(other)).into()),
        };
        result.map_err(|failure| failure.or_span(target_expr.span))
    }

    fn assign_name(
        &self,
        name: Name,
        value: Value,
        mode: AssignMode,
        scope: &LocalScope<Scope>,
    ) -> EvalResult<()> {
        match mode {
            AssignMode::Local => {
                scope.borrow_mut().bind(name, value);
                Ok(())
            }
            AssignMode::Nonlocal => scope
                .borrow_mut()
                .assign_nonlocal(name, value)
                .map_err(|_| undefined_variable(self.interner.lookup(name)).into()),
        }
    }

    /// `[a, b, [c, _]] := list`: lengths must match exactly.
    fn destructure_list(
        &mut self,
        patterns: ExprRange,
        value: &Value,
        mode: AssignMode,
        scope: &LocalScope<Scope>,
    ) -> EvalResult<()> {
        let Value::List(items) = value else {
            return Err(expected_type("list", value.type_name()).into());
        };
        // Snapshot: nested property targets may mutate the list being read.
        let items = items.borrow().clone();
        let arena = self.arena.clone();
        let patterns = arena.node_list(patterns)?;
        if patterns.len() != items.len() {
            return Err(destructure_arity(patterns.len(), items.len()).into());
        }
        for (&pattern, item) in patterns.iter().zip(&items) {
            self.assign_to(pattern, item, mode, scope)?;
        }
        Ok(())
    }

    /// `{name: pattern, ...} := object`: missing keys assign `?`.
    fn destructure_object(
        &mut self,
        entries: ObjectEntryRange,
        value: &Value,
        mode: AssignMode,
        scope: &LocalScope<Scope>,
    ) -> EvalResult<()> {
        let Value::Object(map) = value else {
            return Err(expected_type("object", value.type_name()).into());
        };
        let arena = self.arena.clone();
        for entry in arena.entry_list(entries)? {
            let key = self.object_key(entry.key, scope)?;
            let item = map.borrow().get(&key).cloned().unwrap_or(Value::Null);
            self.assign_to(entry.value, &item, mode, scope)?;
        }
        Ok(())
    }
}
