//! `InterpreterBuilder` for configuring Interpreter instances.

use mgn_ir::{SharedArena, StringInterner};

use super::Interpreter;
use crate::diagnostics::CallStack;
use crate::eval_mode::EvalMode;

/// Builder for [`Interpreter`].
///
/// The default mode is `EvalMode::Interpret`.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: SharedArena,
    mode: EvalMode,
    call_stack: Option<CallStack>,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: SharedArena) -> Self {
        Self {
            interner,
            arena,
            mode: EvalMode::default(),
            call_stack: None,
        }
    }

    /// Set the evaluation mode, which fixes the call depth limit.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Start from an existing call stack instead of an empty one sized by
    /// the mode. Its frames appear at the bottom of every backtrace.
    #[must_use]
    pub fn call_stack(mut self, call_stack: CallStack) -> Self {
        self.call_stack = Some(call_stack);
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        let mode = self.mode;
        Interpreter {
            interner: self.interner,
            arena: self.arena,
            call_stack: self
                .call_stack
                .unwrap_or_else(|| CallStack::new(mode.max_recursion_depth())),
        }
    }
}
