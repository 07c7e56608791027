//! The containers, and the thin adapters built on top of them.
//!
//! # Purpose
//! Each container owns its storage outright and requests it from an
//! [`Allocator`](crate::memory::Allocator). They differ in how that storage is shaped:
//! - [`Vector`]: one contiguous allocation, grown by reallocating.
//! - [`Deque`]: fixed size buffers indexed by a central map, growing at both ends.
//! - [`LinkedList`]: one node per element, linked in both directions around a sentinel.
//! - [`HashTable`]: one node per element, chained into a prime number of buckets.
//!
//! # Adapters
//! With the `adapters` feature (enabled by default), [`Stack`](adapters::Stack),
//! [`Queue`](adapters::Queue), [`ByteString`](adapters::ByteString) and
//! [`UnorderedSet`](hash::UnorderedSet) restrict these containers to narrower interfaces,
//! forwarding every call.

#[cfg(feature = "adapters")]
pub mod adapters;
pub mod contiguous;
pub mod deque;
pub mod hash;
pub mod linked;
pub mod traits;

#[doc(inline)]
pub use contiguous::Vector;
#[doc(inline)]
pub use deque::Deque;
#[doc(inline)]
pub use hash::HashTable;
#[doc(inline)]
pub use linked::LinkedList;
