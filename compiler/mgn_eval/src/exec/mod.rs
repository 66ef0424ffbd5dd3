//! Value-level helpers used by the tree walker.
//!
//! Nothing here evaluates nodes; these functions take already-evaluated
//! values, so they can be tested without building a program.

pub mod call;
pub mod index;

pub use call::bind_parameters;
pub use index::{literal_key, read_property, write_property};
