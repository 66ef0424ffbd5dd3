//! Evaluation modes.
//!
//! The mode fixes the call depth policy for an interpreter. `Interpret` leans
//! on native stack growth and imposes no limit; `Bounded` caps the number of
//! nested user function calls, for embedders that run untrusted programs or
//! targets without stack growth.

/// Call depth policy for an interpreter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Standard mode: unlimited depth on native targets.
    #[default]
    Interpret,
    /// At most `max_call_depth` nested user function calls.
    Bounded { max_call_depth: usize },
}

/// Depth limit applied to `Interpret` on wasm, which cannot grow its stack.
const WASM_MAX_CALL_DEPTH: usize = 200;

impl EvalMode {
    /// Maximum call depth, or `None` for unlimited.
    #[inline]
    pub fn max_recursion_depth(self) -> Option<usize> {
        match self {
            Self::Interpret => {
                if cfg!(target_arch = "wasm32") {
                    Some(WASM_MAX_CALL_DEPTH)
                } else {
                    None
                }
            }
            Self::Bounded { max_call_depth } => Some(max_call_depth),
        }
    }
}
