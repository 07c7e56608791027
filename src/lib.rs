//! This crate is a from-scratch take on the container half of a standard library: a growable
//! [`Vector`](collections::contiguous::Vector), a block-mapped [`Deque`](collections::deque::Deque),
//! a sentinel-based [`LinkedList`](collections::linked::LinkedList) and a separately chained
//! [`HashTable`](collections::hash::HashTable), along with the allocation and construction layers
//! that they all share.
//!
//! # Purpose
//! Every container here manages its own memory. Storage is requested from an [`Allocator`], values
//! are constructed into that storage one at a time and destroyed again before the storage is
//! released. The interesting part is keeping that bookkeeping correct when user code panics half way
//! through a bulk operation, which is why most of the [`memory`] module is about rolling back.
//!
//! # Layers
//! Dependencies only point downwards:
//! 1. [`traits`] classifies element types (trivial destruction, plain-old-data).
//! 2. [`memory`] allocates raw storage, constructs and destroys values in it and provides the
//!    commit-or-rollback uninitialized algorithms.
//! 3. [`iter`] classifies raw positions by capability and selects copy/move algorithms from that.
//! 4. [`collections`] builds the containers (and a few thin adapters) on top of the above.
//!
//! # Error Handling
//! Most methods panic on failure, because being forced to handle a capacity overflow on every push
//! isn't a pleasant API. Where failure is reasonable to recover from, a `try_` variant returns a
//! strongly typed error instead. Running out of memory goes through
//! [`handle_alloc_error`](std::alloc::handle_alloc_error).
//!
//! A panicking [`Clone`] or closure is this crate's equivalent of a throwing constructor. Each
//! operation documents whether it provides the strong guarantee (no effect) or only the basic one
//! (still valid, but changed) when that happens.
//!
//! # Threads
//! None of the containers synchronize internally. Raw positions ([`DequeCursor`],
//! [`ListPosition`], [`HashPosition`]) are non-owning back references: using one after its
//! container has been mutated in a way that invalidates it, or dropped, is undefined behaviour and
//! isn't checked.
//!
//! [`Allocator`]: memory::Allocator
//! [`DequeCursor`]: collections::deque::DequeCursor
//! [`ListPosition`]: collections::linked::ListPosition
//! [`HashPosition`]: collections::hash::HashPosition

// #![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;
pub mod iter;
pub mod memory;
pub mod traits;

pub(crate) mod util;
