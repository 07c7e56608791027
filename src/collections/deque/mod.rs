//! A module containing [`Deque`], its raw position type [`DequeCursor`] and iterators.
//!
//! [`Deque`] stores its elements in equally sized buffers, which are tracked by a map of buffer
//! pointers. The map is kept centered, so that either end can grow without moving any elements.

mod cursor;
mod deque;
mod iter;
mod tests;

pub use cursor::DequeCursor;
pub(crate) use cursor::Buffer;
pub use deque::*;
pub use iter::*;
