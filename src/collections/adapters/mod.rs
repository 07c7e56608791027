//! Restricted interfaces over other sequences. A [`Stack`] only exposes its top, a [`Queue`] only
//! pushes at its back and pops from its front, and a [`ByteString`] keeps a [`Vector`] of bytes
//! NUL terminated. None of them has any algorithmic content of its own; every call is forwarded to
//! the underlying sequence.
//!
//! [`Vector`]: crate::collections::contiguous::Vector

mod queue;
mod stack;
mod string;

pub use queue::*;
pub use stack::*;
pub use string::*;
