//! Function call evaluation.

use mgn_ir::{ExprId, ExprRange, Span};

use super::{ArenaExt, Interpreter};
use crate::diagnostics::CallFrame;
use crate::errors::{not_callable, EvalResult, Failure};
use crate::exec::bind_parameters;
use crate::scope::{LocalScope, Scope};
use crate::value::{FunctionValue, Value};

impl Interpreter<'_> {
    /// `func(args...)`: callee first, then arguments left to right.
    pub(super) fn eval_call(
        &mut self,
        func: ExprId,
        args: ExprRange,
        call_span: Span,
        scope: &LocalScope<Scope>,
    ) -> EvalResult {
        let callee = self.evaluate(func, scope)?;
        if !matches!(callee, Value::Function(_) | Value::Builtin(_)) {
            return Err(not_callable(callee.type_name()).into());
        }

        let arena = self.arena.clone();
        let arg_ids = arena.node_list(args)?;
        let mut values = Vec::with_capacity(arg_ids.len());
        for &arg in arg_ids {
            values.push(self.evaluate(arg, scope)?);
        }
        self.call_value(&callee, &values, call_span)
    }

    /// Call an already-evaluated function value.
    pub fn call_value(&mut self, callee: &Value, args: &[Value], call_span: Span) -> EvalResult {
        match callee {
            Value::Function(func) => self.call_function(func, args, call_span),
            Value::Builtin(builtin) => Ok(builtin.call(args)?),
            other => Err(not_callable(other.type_name()).into()),
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(function = self.interner.lookup(func.name()), args = args.len())
    )]
    fn call_function(&mut self, func: &FunctionValue, args: &[Value], call_span: Span) -> EvalResult {
        self.call_stack.push(CallFrame {
            name: func.name(),
            call_span,
        })?;

        let result = self.run_body(func, args).map_err(|failure| match failure {
            Failure::Runtime(err) => Failure::Runtime(Box::new(
                self.call_stack.attach_backtrace(*err, self.interner),
            )),
            internal @ Failure::Internal(_) => internal,
        });

        self.call_stack.pop();
        result
    }

    /// Bind parameters in a child of the captured scope and run the body in
    /// the closure's own arena.
    fn run_body(&mut self, func: &FunctionValue, args: &[Value]) -> EvalResult {
        let call_scope = Scope::child(func.captured_scope());
        let params = func.arena().param_list(func.params())?;
        bind_parameters(&mut call_scope.borrow_mut(), params, args);

        let caller_arena = std::mem::replace(&mut self.arena, func.arena().clone());
        let result = self.evaluate(func.body(), &call_scope);
        self.arena = caller_arena;
        result
    }
}
