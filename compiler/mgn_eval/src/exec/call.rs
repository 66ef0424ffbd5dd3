//! Argument binding for user function calls.

use mgn_ir::Name;

use crate::scope::Scope;
use crate::value::Value;

/// Bind `args` to `params` positionally in a call scope.
///
/// Missing arguments bind `Null`; extra arguments are dropped.
pub fn bind_parameters(scope: &mut Scope, params: &[Name], args: &[Value]) {
    for (i, &param) in params.iter().enumerate() {
        scope.bind(param, args.get(i).cloned().unwrap_or(Value::Null));
    }
}
