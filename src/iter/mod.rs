//! Capability tiers for raw positions and the generic algorithms that pick an implementation based
//! on them.
//!
//! Safe iteration over every collection goes through ordinary [`Iterator`]s, which act as the
//! single-pass input tier. The cursor traits here describe the multi-pass positions that the
//! collections hand out for O(1) positional operations and use internally to move elements around.

mod algo;
mod category;
mod tests;

pub use algo::*;
pub use category::*;
