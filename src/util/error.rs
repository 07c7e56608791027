use std::alloc::{self, Layout};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// The platform allocator couldn't satisfy a request for `layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory {
    pub layout: Layout,
}

impl Display for OutOfMemory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to allocate {} bytes with alignment {}!",
            self.layout.size(),
            self.layout.align(),
        )
    }
}

impl Error for OutOfMemory {}

/// Any of the ways that requesting storage from an [`Allocator`](crate::memory::Allocator) can
/// fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, IsVariant)]
pub enum AllocError {
    CapacityOverflow(CapacityOverflow),
    OutOfMemory(OutOfMemory),
}

impl AllocError {
    /// Diverges in the way that the infallible collection methods report allocation failure:
    /// overflows panic and exhausted memory is passed to [`alloc::handle_alloc_error`].
    ///
    /// # Panics
    /// Panics if self is a [`CapacityOverflow`].
    pub fn handle(self) -> ! {
        match self {
            AllocError::CapacityOverflow(error) => panic!("{}", error),
            AllocError::OutOfMemory(OutOfMemory { layout }) => alloc::handle_alloc_error(layout),
        }
    }
}

/// A maximum load factor that is negative, zero or not a number was provided to a hash-based
/// collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidLoadFactor {
    pub value: f32,
}

impl Display for InvalidLoadFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid maximum load factor!", self.value)
    }
}

impl Error for InvalidLoadFactor {}
