//! Compile time classification of element types.
//!
//! Containers use these to skip work that is provably a no-op: destroying values that have no drop
//! glue, or constructing plain-old-data with a single memory copy instead of a loop.

mod type_traits;

pub use type_traits::*;
