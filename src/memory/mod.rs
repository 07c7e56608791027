//! Raw storage and the construction of values within it.
//!
//! The layers here don't know anything about collections. An [`Allocator`] hands out uninitialized
//! storage, [`construct`] and [`destroy`] manage the lifetime of single values in that storage, and
//! the `uninitialized_*` algorithms fill whole ranges with commit-or-rollback semantics: either
//! every value is constructed or, if user code panics part way, every value that was constructed is
//! destroyed again before the panic continues.

mod allocator;
mod construct;
mod raw_buf;
mod tests;
mod uninit;

pub use allocator::*;
pub use construct::*;
pub(crate) use raw_buf::*;
pub use uninit::*;

#[doc(inline)]
pub use crate::util::error::{AllocError, CapacityOverflow, OutOfMemory};
