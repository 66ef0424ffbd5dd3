//! Runtime values.
//!
//! `Value` is a closed enum; every operation over it matches exhaustively.
//! Strings, lists and objects live behind [`Heap`] handles, so assigning them
//! to another name or passing them to a function aliases rather than copies.
//!
//! # Equality
//!
//! [`Value::equals`] is the language's `=`: `Empty` (the `_` wildcard) equals
//! every value, on either side. Everything else compares structurally within
//! its own variant, with no numeric promotion and no identity shortcut for
//! lists or objects. `PartialEq` is the same comparison without the wildcard.
//! Both terminate on self-referential lists and objects.

mod function;
mod heap;

use std::cell::RefCell;
use std::fmt;

use mgn_ir::{Name, StringLookup};
use mgn_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

pub use function::{BuiltinFn, BuiltinFunction, FunctionValue};
pub use heap::Heap;

use crate::errors::{expected_type, EvalError};

/// Which rule `Value::compare` applies to `Empty`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Equality {
    /// `_` matches anything, on either side.
    Language,
    /// `_` equals only itself.
    Structural,
}

/// Backing map of an object value.
pub type ObjectMap = FxHashMap<String, Value>;

/// A Magnolia runtime value.
#[derive(Clone)]
pub enum Value {
    /// `_`
    Empty,
    /// `?`
    Null,
    /// Mutable byte string.
    Str(Heap<Vec<u8>>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Atom(Name),
    List(Heap<Vec<Value>>),
    Object(Heap<ObjectMap>),
    Function(FunctionValue),
    Builtin(BuiltinFunction),
}

impl Value {
    /// Fresh, unaliased string.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Str(Heap::new(bytes.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    pub fn object(entries: ObjectMap) -> Self {
        Value::Object(Heap::new(entries))
    }

    pub fn empty_object() -> Self {
        Value::object(ObjectMap::default())
    }

    pub fn builtin(
        name: &'static str,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) -> Self {
        Value::Builtin(BuiltinFunction::new(name, func))
    }

    /// Name of this value's type, as shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Atom(_) => "atom",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Function(_) | Value::Builtin(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Language equality (`=`).
    pub fn equals(&self, other: &Value) -> bool {
        self.compare(other, Equality::Language, &mut Vec::new())
    }

    /// Shared core of `equals` and `PartialEq`.
    ///
    /// `open` holds the container pairs currently being compared; meeting a
    /// pair again means both sides cycle back the same way, which counts as
    /// equal.
    fn compare(
        &self,
        other: &Value,
        mode: Equality,
        open: &mut Vec<(*const (), *const ())>,
    ) -> bool {
        match (self, other) {
            (Value::Empty, _) | (_, Value::Empty) if mode == Equality::Language => true,
            (Value::Empty, Value::Empty) | (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => *a.borrow() == *b.borrow(),
            (Value::Int(a), Value::Int(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "language equality is exact")]
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                let pair = (a.as_ptr(), b.as_ptr());
                if open.contains(&pair) {
                    return true;
                }
                open.push(pair);
                let equal = ensure_sufficient_stack(|| {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                        && a.iter().zip(b.iter()).all(|(x, y)| x.compare(y, mode, open))
                });
                open.pop();
                equal
            }
            (Value::Object(a), Value::Object(b)) => {
                let pair = (a.as_ptr(), b.as_ptr());
                if open.contains(&pair) {
                    return true;
                }
                open.push(pair);
                let equal = ensure_sufficient_stack(|| {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                        && a.iter()
                            .all(|(key, x)| b.get(key).is_some_and(|y| x.compare(y, mode, open)))
                });
                open.pop();
                equal
            }
            (Value::Function(a), Value::Function(b)) => a.same_closure(b),
            (Value::Builtin(a), Value::Builtin(b)) => a.same_builtin(b),
            _ => false,
        }
    }

    /// Append `item` to a string or list in place (`<<`).
    ///
    /// Returns the receiver, so every alias of it observes the change.
    pub fn append(&self, item: &Value) -> Result<Value, EvalError> {
        match self {
            Value::Str(bytes) => {
                let Value::Str(tail) = item else {
                    return Err(expected_type("string", item.type_name()));
                };
                // Copy first: `s << s` borrows the same cell twice.
                let tail = tail.borrow().clone();
                bytes.borrow_mut().extend_from_slice(&tail);
                Ok(self.clone())
            }
            Value::List(items) => {
                items.borrow_mut().push(item.clone());
                Ok(self.clone())
            }
            _ => Err(expected_type("string or list", self.type_name())),
        }
    }

    /// Key under which this value indexes an object.
    ///
    /// String contents are used as-is; every other value uses its display
    /// form, so `obj.(1)` and `obj.1` address the same entry.
    pub fn to_key<I: StringLookup + ?Sized>(&self, interner: &I) -> String {
        match self {
            Value::Str(bytes) => String::from_utf8_lossy(&bytes.borrow()).into_owned(),
            other => other.display(interner).to_string(),
        }
    }

    /// Format for output, resolving atom and function names through `interner`.
    pub fn display<'a, I: StringLookup + ?Sized>(&'a self, interner: &'a I) -> ValueDisplay<'a, I> {
        ValueDisplay {
            value: self,
            interner,
        }
    }
}

/// Structural equality: `Empty` equals only `Empty`.
///
/// The wildcard rule of [`Value::equals`] is not transitive, so it stays out
/// of the trait.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other, Equality::Structural, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = RefCell::new(Vec::new());
        fmt::Debug::fmt(&DebugValue { value: self, open: &open }, f)
    }
}

/// Debug view that prints a container already being printed as `[...]` or
/// `{...}`.
struct DebugValue<'a> {
    value: &'a Value,
    open: &'a RefCell<Vec<*const ()>>,
}

impl DebugValue<'_> {
    fn nested<'b>(&'b self, value: &'b Value) -> DebugValue<'b> {
        DebugValue {
            value,
            open: self.open,
        }
    }

    /// Run `body` with `ptr` marked open, or print `cycle` if it already is.
    fn guarded(
        &self,
        f: &mut fmt::Formatter<'_>,
        ptr: *const (),
        cycle: &str,
        body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        if self.open.borrow().contains(&ptr) {
            return f.write_str(cycle);
        }
        self.open.borrow_mut().push(ptr);
        let result = body(f);
        self.open.borrow_mut().pop();
        result
    }
}

impl fmt::Debug for DebugValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Empty => write!(f, "Empty"),
            Value::Null => write!(f, "Null"),
            Value::Str(bytes) => write!(f, "Str({:?})", String::from_utf8_lossy(&bytes.borrow())),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Atom(name) => write!(f, "Atom({name:?})"),
            Value::List(items) => self.guarded(f, items.as_ptr(), "[...]", |f| {
                f.debug_list()
                    .entries(items.borrow().iter().map(|item| self.nested(item)))
                    .finish()
            }),
            Value::Object(entries) => self.guarded(f, entries.as_ptr(), "{...}", |f| {
                f.debug_map()
                    .entries(
                        entries
                            .borrow()
                            .iter()
                            .map(|(key, value)| (key, self.nested(value))),
                    )
                    .finish()
            }),
            Value::Function(func) => fmt::Debug::fmt(func, f),
            Value::Builtin(builtin) => fmt::Debug::fmt(builtin, f),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

/// [`Value`] paired with the interner needed to print it.
///
/// A list or object that contains itself prints the inner occurrence as
/// `[...]` or `{...}`.
pub struct ValueDisplay<'a, I: ?Sized> {
    value: &'a Value,
    interner: &'a I,
}

impl<I: StringLookup + ?Sized> ValueDisplay<'_, I> {
    fn write(
        &self,
        value: &Value,
        f: &mut fmt::Formatter<'_>,
        open: &mut Vec<*const ()>,
    ) -> fmt::Result {
        match value {
            Value::Empty => write!(f, "_"),
            Value::Null => write!(f, "?"),
            Value::Str(bytes) => write!(f, "'{}'", String::from_utf8_lossy(&bytes.borrow())),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => f.write_str(&format_float(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Atom(name) => write!(f, ":{}", self.interner.lookup(*name)),
            Value::List(items) => {
                let ptr = items.as_ptr();
                if open.contains(&ptr) {
                    return f.write_str("[...]");
                }
                open.push(ptr);
                let result = ensure_sufficient_stack(|| {
                    write!(f, "[")?;
                    for (i, item) in items.borrow().iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        self.write(item, f, open)?;
                    }
                    write!(f, "]")
                });
                open.pop();
                result
            }
            Value::Object(entries) => {
                let ptr = entries.as_ptr();
                if open.contains(&ptr) {
                    return f.write_str("{...}");
                }
                open.push(ptr);
                let result = ensure_sufficient_stack(|| {
                    let entries = entries.borrow();
                    let mut keys: Vec<&String> = entries.keys().collect();
                    keys.sort();
                    write!(f, "{{")?;
                    for (i, key) in keys.into_iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{key}: ")?;
                        if let Some(value) = entries.get(key) {
                            self.write(value, f, open)?;
                        }
                    }
                    write!(f, "}}")
                });
                open.pop();
                result
            }
            Value::Function(func) => {
                write!(f, "fn")?;
                if !func.name().is_empty() {
                    write!(f, " {}", self.interner.lookup(func.name()))?;
                }
                write!(f, "(")?;
                match func.arena().params(func.params()) {
                    Some(params) => {
                        for (i, &param) in params.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", self.interner.lookup(param))?;
                        }
                    }
                    None => write!(f, "...")?,
                }
                write!(f, ")")
            }
            Value::Builtin(builtin) => write!(f, "fn {} {{ native }}", builtin.name()),
        }
    }
}

impl<I: StringLookup + ?Sized> fmt::Display for ValueDisplay<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(self.value, f, &mut Vec::new())
    }
}

/// Shortest round-trip form, switching to an exponent below `1e-4` and from
/// `1e6` up: `2.5`, `100000`, `1e+06`, `1.5e-07`, `+Inf`, `NaN`.
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let scientific = format!("{n:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    if (-4..6).contains(&exponent) {
        return format!("{n}");
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}
