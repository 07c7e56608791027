//! Hash-based collections, built around a separately chained [`HashTable`].
//!
//! The table itself is generic over what part of a value is its key (see [`ExtractKey`]) and can
//! either reject or keep duplicate keys, so that sets, maps and their multi- variants can all be
//! thin layers over it. Bucket counts are taken from a fixed table of primes, see [`next_prime`].
//!
//! [`HashTable`] is also re-exported under this module, along with [`UnorderedSet`] when the
//! `adapters` feature is enabled.

mod extract;
mod primes;
#[cfg(feature = "adapters")]
pub mod set;
pub mod table;

pub use extract::*;
pub use primes::{max_prime, next_prime};
#[cfg(feature = "adapters")]
#[doc(inline)]
pub use set::UnorderedSet;
#[doc(inline)]
pub use table::{HashPosition, HashTable};
