//! Call stack tracking and backtraces.
//!
//! The interpreter pushes a [`CallFrame`] for every user function call and
//! pops it on return. When a runtime error escapes a call, the live stack is
//! snapshotted into an [`EvalBacktrace`] and stored on the error.

use std::fmt;

use mgn_ir::{Name, Span, StringLookup};

use crate::errors::{recursion_limit_exceeded, EvalError};

/// Frame name shown for anonymous functions.
pub const ANONYMOUS_FN: &str = "<anonymous fn>";

/// A single frame in the live call stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    /// Function name; `Name::EMPTY` for anonymous functions.
    pub name: Name,
    /// Source location of the call expression (not the definition).
    pub call_span: Span,
}

/// Live call stack for the interpreter.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited depth.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot the stack, most recent call first.
    pub fn capture<I: StringLookup + ?Sized>(&self, interner: &I) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|frame| BacktraceFrame {
                name: if frame.name.is_empty() {
                    ANONYMOUS_FN.to_string()
                } else {
                    interner.lookup(frame.name).to_string()
                },
                span: frame.call_span,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Stamp `err` with the current stack unless an inner call already did.
    pub fn attach_backtrace<I: StringLookup + ?Sized>(
        &self,
        mut err: EvalError,
        interner: &I,
    ) -> EvalError {
        if err.backtrace.is_none() && !self.frames.is_empty() {
            tracing::debug!(depth = self.frames.len(), "capturing backtrace");
            err.backtrace = Some(self.capture(interner));
        }
        err
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}

/// One call in a captured backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    /// Where the call was made.
    pub span: Span,
}

/// Immutable snapshot of the call stack at an error site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Frame names, most recent first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|frame| frame.name.as_str())
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if !frame.span.is_dummy() {
                write!(f, " at {}", frame.span)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
