//! A module containing [`UnorderedSet`] and associated types.
//!
//! The set operations themselves are provided through the [`Set`](crate::collections::traits::Set)
//! trait, whose iterators work over any set type.
//!
//! As a note, there is no mutable iterator over the elements of a set because mutating the entries
//! in place would cause a logic error.
//!
//! [`UnorderedSet`] is also re-exported under the parent module.

mod iter;
mod tests;
mod unordered_set;

pub use iter::*;
pub use unordered_set::*;
