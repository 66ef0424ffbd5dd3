//! Execution context: the root scope plus where the program came from.
//!
//! A [`Context`] outlives individual evaluations. The host registers its
//! builtins once, then evaluates one or more parsed programs against the same
//! root scope; the working directory and source path are only used to
//! render errors.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use mgn_ir::{ExprId, SharedArena, SharedInterner, Span};

use crate::errors::{EvalError, EvalResult, Failure};
use crate::eval_mode::EvalMode;
use crate::interpreter::InterpreterBuilder;
use crate::scope::{LocalScope, Scope};
use crate::value::Value;

/// Root scope and reporting metadata for one program run.
pub struct Context {
    cwd: PathBuf,
    source_path: PathBuf,
    interner: SharedInterner,
    scope: LocalScope<Scope>,
    mode: EvalMode,
}

impl Context {
    /// Context with a fresh interner and an empty root scope.
    pub fn new(source_path: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Context {
            cwd: cwd.into(),
            source_path: source_path.into(),
            interner: SharedInterner::new(),
            scope: Scope::root(),
            mode: EvalMode::default(),
        }
    }

    /// Share the parser's interner so names in the AST resolve.
    #[must_use]
    pub fn with_interner(mut self, interner: SharedInterner) -> Self {
        self.interner = interner;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn root_scope(&self) -> &LocalScope<Scope> {
        &self.scope
    }

    /// Bind `name` in the root scope.
    pub fn define(&self, name: &str, value: Value) {
        let name = self.interner.intern(name);
        self.scope.borrow_mut().bind(name, value);
    }

    /// Look `name` up in the root scope.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let name = self.interner.intern(name);
        self.scope.borrow().get(name)
    }

    /// Register a native function under `name` in the root scope.
    pub fn register_builtin(
        &self,
        name: &'static str,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) {
        self.define(name, Value::builtin(name, func));
    }

    /// Evaluate `root` (normally the program's top-level block).
    pub fn eval(&self, arena: &SharedArena, root: ExprId) -> EvalResult {
        tracing::debug!(
            source = %self.source_path.display(),
            nodes = arena.len(),
            "evaluating program"
        );
        let mut interpreter = InterpreterBuilder::new(&self.interner, arena.clone())
            .mode(self.mode)
            .build();
        let result = interpreter.evaluate(root, &self.scope);
        match &result {
            Ok(_) => tracing::debug!("program finished"),
            Err(failure) => tracing::debug!(%failure, "program failed"),
        }
        result
    }

    /// Call a function value from the host, e.g. an exported callback.
    pub fn call(&self, callee: &Value, args: &[Value]) -> EvalResult {
        let arena = match callee {
            Value::Function(func) => func.arena().clone(),
            _ => SharedArena::new(mgn_ir::ExprArena::new()),
        };
        InterpreterBuilder::new(&self.interner, arena)
            .mode(self.mode)
            .build()
            .call_value(callee, args, Span::DUMMY)
    }

    /// Render a value the way the language prints it.
    pub fn format(&self, value: &Value) -> String {
        value.display(&self.interner).to_string()
    }

    /// Render a failure for the user: message, location and backtrace.
    ///
    /// `source` is the program text, used to turn spans into line/column
    /// positions; without it spans are shown as byte ranges.
    pub fn report(&self, failure: &Failure, source: Option<&str>) -> String {
        let path = self
            .source_path
            .strip_prefix(&self.cwd)
            .unwrap_or(&self.source_path)
            .display()
            .to_string();
        let location = |span: Span| match source {
            Some(text) => {
                let (line, col) = span.line_col(text);
                format!("{path}:{line}:{col}")
            }
            None => format!("{path}@{span}"),
        };

        match failure {
            Failure::Runtime(err) => {
                let mut out = format!("runtime error: {}", err.message);
                if let Some(span) = err.span {
                    let _ = write!(out, "\n  --> {}", location(span));
                }
                if let Some(backtrace) = &err.backtrace {
                    out.push('\n');
                    out.push_str(backtrace.to_string().trim_end());
                }
                out
            }
            Failure::Internal(fault) => format!("internal error in {path}: {fault}"),
        }
    }
}
