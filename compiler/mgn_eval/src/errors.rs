//! Error types for evaluation.
//!
//! Evaluation fails in one of two tiers:
//!
//! - [`EvalError`]: a runtime error the user program caused (an undefined
//!   variable, calling a number, a bad destructuring). Carries a structured
//!   [`EvalErrorKind`], the span of the failing node and a backtrace.
//! - [`InternalFault`]: the tree handed to the evaluator is inconsistent (a
//!   node id or child range that does not resolve). Never a user mistake and
//!   never recoverable.
//!
//! Every evaluation step returns [`EvalResult`], whose error is the sum
//! [`Failure`]. Factory functions (e.g. `undefined_variable()`) are the public
//! way to build runtime errors; they fill both `kind` and `message`.

use std::fmt;

use mgn_ir::{BinaryOp, Span, UnaryOp};

use crate::diagnostics::EvalBacktrace;
use crate::value::Value;

/// Result of evaluating one node.
pub type EvalResult<T = Value> = Result<T, Failure>;

/// Typed runtime error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("{name} is not defined")]
    UndefinedVariable { name: String },

    #[error("{type_name} is not a function and cannot be called")]
    NotCallable { type_name: String },

    #[error("cannot index into a value of type {type_name}")]
    NotIndexable { type_name: String },

    #[error("invalid index: {detail}")]
    IndexTypeError { detail: String },

    #[error("object keys must be strings or numbers, got {type_name}")]
    InvalidKeyType { type_name: String },

    #[error("cannot assign to {target}")]
    InvalidAssignmentTarget { target: String },

    #[error("cannot destructure a list of {got} values into {expected} names")]
    DestructureArityError { expected: usize, got: usize },

    #[error("type mismatch: {detail}")]
    TypeMismatch { detail: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("maximum call depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },

    /// Raised by builtin functions through [`EvalError::new`].
    #[error("{message}")]
    Native { message: String },
}

/// Runtime error raised by a user program.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Innermost node that failed.
    pub span: Option<Span>,
    /// Call stack at the innermost user function the error escaped from.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    /// Error with a free-form message, for builtin functions.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Native {
            message: message.into(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            backtrace: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// Inconsistency in the tree being evaluated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InternalFault {
    #[error("expression {index} is not in the arena")]
    DanglingExpr { index: u32 },

    #[error("{table} range {start}+{len} is out of bounds")]
    DanglingRange {
        table: &'static str,
        start: u32,
        len: u16,
    },
}

/// Why an evaluation step did not produce a value.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Failure {
    #[error("runtime error: {0}")]
    Runtime(Box<EvalError>),
    #[error("internal error: {0}")]
    Internal(#[from] InternalFault),
}

impl Failure {
    /// The runtime error, if this is one.
    pub fn as_runtime(&self) -> Option<&EvalError> {
        match self {
            Failure::Runtime(err) => Some(err),
            Failure::Internal(_) => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Failure::Internal(_))
    }

    /// Attach `span` to a runtime error that has none yet.
    #[must_use]
    pub(crate) fn or_span(mut self, span: Span) -> Self {
        if let Failure::Runtime(err) = &mut self {
            if err.span.is_none() && !span.is_dummy() {
                err.span = Some(span);
            }
        }
        self
    }
}

impl From<EvalError> for Failure {
    fn from(err: EvalError) -> Self {
        Failure::Runtime(Box::new(err))
    }
}

// Factory functions

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

pub fn not_indexable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        type_name: type_name.to_string(),
    })
}

/// Non-integer index into a string or list.
pub fn non_integer_index(receiver: &str, index_type: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexTypeError {
        detail: format!("cannot index into {receiver} with {index_type}, expected int"),
    })
}

/// Integer index outside the assignable range of a string or list.
pub fn index_out_of_range(receiver: &str, index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexTypeError {
        detail: format!("index {index} out of range for {receiver} of length {len}"),
    })
}

pub fn invalid_key_type(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidKeyType {
        type_name: type_name.to_string(),
    })
}

pub fn invalid_assignment_target(target: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget {
        target: target.to_string(),
    })
}

pub fn destructure_arity(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DestructureArityError { expected, got })
}

/// A value of the wrong type where one specific type is required.
pub fn expected_type(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        detail: format!("expected {expected}, got {got}"),
    })
}

pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        detail: format!(
            "operator `{}` cannot be applied to {left} and {right}",
            op.as_symbol()
        ),
    })
}

pub fn unary_type_mismatch(op: UnaryOp, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        detail: format!("operator `{}` cannot be applied to {operand}", op.as_symbol()),
    })
}

pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}
