//! Traits shared between collections, which the adapters are generic over.

pub mod sequence;
pub mod set;

#[doc(inline)]
pub use sequence::{BackSequence, FrontSequence};
#[doc(inline)]
pub use set::Set;
