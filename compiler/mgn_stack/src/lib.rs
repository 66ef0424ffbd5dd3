//! Stack growth for deeply recursive evaluation.
//!
//! The Magnolia evaluator walks the AST recursively and user programs recurse
//! through ordinary function calls, so a long-running recursive program would
//! exhaust the native thread stack long before it hit any interpreter limit.
//! [`ensure_sufficient_stack`] grows the stack on demand instead.
//!
//! On wasm targets the call is a plain passthrough and the evaluator relies on
//! a call depth limit instead.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
