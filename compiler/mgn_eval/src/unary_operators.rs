//! Unary operator implementations for the evaluator.

use mgn_ir::UnaryOp;

use crate::errors::{integer_overflow, unary_type_mismatch, EvalError};
use crate::value::Value;

/// Evaluate a unary operation on an already-evaluated operand.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(unary_type_mismatch(op, value.type_name())),
    }
}
