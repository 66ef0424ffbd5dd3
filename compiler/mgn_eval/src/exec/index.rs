//! Property reads and writes on strings, lists and objects.
//!
//! Strings and lists take `int` indices. Reads outside `[0, len)` produce
//! `?`; writes may also target `len` itself, which appends. Objects take any
//! key, converted with [`Value::to_key`].

use mgn_ir::StringLookup;

use crate::errors::{
    expected_type, index_out_of_range, invalid_key_type, non_integer_index, not_indexable,
    EvalError,
};
use crate::value::Value;

fn int_index(base: &Value, key: &Value) -> Result<i64, EvalError> {
    match key {
        Value::Int(n) => Ok(*n),
        _ => Err(non_integer_index(base.type_name(), key.type_name())),
    }
}

/// `base.key` as an expression.
pub fn read_property<I: StringLookup + ?Sized>(
    base: &Value,
    key: &Value,
    interner: &I,
) -> Result<Value, EvalError> {
    match base {
        Value::Str(bytes) => {
            let index = int_index(base, key)?;
            let byte = usize::try_from(index)
                .ok()
                .and_then(|i| bytes.borrow().get(i).copied());
            Ok(byte.map_or(Value::Null, |b| Value::string(vec![b])))
        }
        Value::List(items) => {
            let index = int_index(base, key)?;
            let item = usize::try_from(index)
                .ok()
                .and_then(|i| items.borrow().get(i).cloned());
            Ok(item.unwrap_or(Value::Null))
        }
        Value::Object(entries) => {
            let key = key.to_key(interner);
            Ok(entries.borrow().get(&key).cloned().unwrap_or(Value::Null))
        }
        _ => Err(not_indexable(base.type_name())),
    }
}

/// `base.key := value`, mutating `base` in place.
///
/// A string write overwrites bytes starting at the index with the assigned
/// string's bytes, growing the string when they run past its end.
pub fn write_property<I: StringLookup + ?Sized>(
    base: &Value,
    key: &Value,
    value: Value,
    interner: &I,
) -> Result<(), EvalError> {
    match base {
        Value::List(items) => {
            let index = int_index(base, key)?;
            let mut items = items.borrow_mut();
            let len = items.len();
            match usize::try_from(index) {
                Ok(i) if i < len => items[i] = value,
                Ok(i) if i == len => items.push(value),
                _ => return Err(index_out_of_range("list", index, len)),
            }
        }
        Value::Object(entries) => {
            let key = key.to_key(interner);
            entries.borrow_mut().insert(key, value);
        }
        Value::Str(bytes) => {
            let index = int_index(base, key)?;
            let Value::Str(patch) = &value else {
                return Err(expected_type("string", value.type_name()));
            };
            let patch = patch.borrow().clone();
            let mut bytes = bytes.borrow_mut();
            let len = bytes.len();
            let start = usize::try_from(index)
                .ok()
                .filter(|&i| i <= len)
                .ok_or_else(|| index_out_of_range("string", index, len))?;
            let end = start + patch.len();
            if end > len {
                bytes.resize(end, 0);
            }
            bytes[start..end].copy_from_slice(&patch);
        }
        _ => return Err(not_indexable(base.type_name())),
    }
    Ok(())
}

/// Key of a computed object literal entry: strings and numbers only.
pub fn literal_key<I: StringLookup + ?Sized>(
    key: &Value,
    interner: &I,
) -> Result<String, EvalError> {
    match key {
        Value::Str(_) | Value::Int(_) | Value::Float(_) => Ok(key.to_key(interner)),
        _ => Err(invalid_key_type(key.type_name())),
    }
}
