//! Fixed-shape children stored in the arena's side tables.

use crate::ExprId;

/// One `key: value` entry of an object literal or object pattern.
///
/// A bare identifier `key` names the property itself; any other key node is
/// evaluated.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectEntry {
    pub key: ExprId,
    pub value: ExprId,
}

/// One `pattern -> body` branch of an `if` match.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MatchBranch {
    pub pattern: ExprId,
    pub body: ExprId,
}
