//! Binary operator implementations for the evaluator.
//!
//! Direct enum dispatch over operand pairs. `=`, `!=` and `<<` accept any
//! operands and are handled before the typed dispatch; everything else is
//! defined per operand type, with an `int` promoted to `float` only when the
//! other operand is a `float`.

use std::cmp::Ordering;

use mgn_ir::BinaryOp;

use crate::errors::{binary_type_mismatch, division_by_zero, integer_overflow, EvalError};
use crate::value::{Heap, Value};

type OpResult = Result<Value, EvalError>;

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> OpResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Checked division or remainder with a zero guard.
#[inline]
fn checked_div(divisor: i64, op: impl FnOnce() -> Option<i64>, op_name: &'static str) -> OpResult {
    if divisor == 0 {
        Err(division_by_zero())
    } else {
        checked_arith(op(), op_name)
    }
}

#[inline]
#[allow(
    clippy::cast_precision_loss,
    reason = "int to float promotion is lossy above 2^53 by definition"
)]
fn promote(n: i64) -> f64 {
    n as f64
}

#[inline]
fn compare(ordering: Option<Ordering>, op: BinaryOp) -> Option<Value> {
    let result = match op {
        BinaryOp::Less => ordering == Some(Ordering::Less),
        BinaryOp::LessEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Greater => ordering == Some(Ordering::Greater),
        BinaryOp::GreaterEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => return None,
    };
    Some(Value::Bool(result))
}

/// Evaluate a binary operation on already-evaluated operands.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> OpResult {
    let mismatch = || binary_type_mismatch(op, left.type_name(), right.type_name());

    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left.equals(right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!left.equals(right))),
        BinaryOp::Push => {
            return match left {
                Value::Str(_) | Value::List(_) => left.append(right),
                _ => Err(mismatch()),
            };
        }
        _ => {}
    }

    let result = match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op)?,
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Int(a), Value::Float(b)) => eval_float_binary(promote(*a), *b, op),
        (Value::Float(a), Value::Int(b)) => eval_float_binary(*a, promote(*b), op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        _ => None,
    };
    result.ok_or_else(mismatch)
}

/// `None` when `op` is not defined on ints.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> Result<Option<Value>, EvalError> {
    let value = match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition")?,
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction")?,
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication")?,
        BinaryOp::Div => checked_div(b, || a.checked_div(b), "division")?,
        BinaryOp::Mod => checked_div(b, || a.checked_rem(b), "remainder")?,
        BinaryOp::And => Value::Int(a & b),
        BinaryOp::Or => Value::Int(a | b),
        BinaryOp::Xor => Value::Int(a ^ b),
        _ => return Ok(compare(Some(a.cmp(&b)), op)),
    };
    Ok(Some(value))
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> Option<Value> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        _ => return compare(a.partial_cmp(&b), op),
    };
    Some(Value::Float(value))
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> Option<Value> {
    match op {
        BinaryOp::And => Some(Value::Bool(a && b)),
        BinaryOp::Or => Some(Value::Bool(a || b)),
        BinaryOp::Xor => Some(Value::Bool(a != b)),
        _ => None,
    }
}

fn eval_string_binary(a: &Heap<Vec<u8>>, b: &Heap<Vec<u8>>, op: BinaryOp) -> Option<Value> {
    match op {
        BinaryOp::Add => {
            let mut joined = a.borrow().clone();
            joined.extend_from_slice(&b.borrow());
            Some(Value::string(joined))
        }
        _ => compare(Some(a.borrow().as_slice().cmp(b.borrow().as_slice())), op),
    }
}
