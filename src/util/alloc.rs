#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::memory::{AllocError, Allocator, Global, OutOfMemory, array_layout};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeroSizedType;

#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// A value whose [`Clone`] implementation panics when it is poisoned, standing in for a throwing
/// copy constructor.
#[derive(Debug)]
pub struct Fragile {
    pub value: i32,
    pub poisoned: bool,
}

impl Fragile {
    pub const fn new(value: i32) -> Fragile {
        Fragile {
            value,
            poisoned: false,
        }
    }

    pub const fn poisoned(value: i32) -> Fragile {
        Fragile {
            value,
            poisoned: true,
        }
    }
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if self.poisoned {
            panic!("Fragile({}) refused to be cloned", self.value);
        }
        Fragile::new(self.value)
    }
}

impl PartialEq for Fragile {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

#[derive(Debug, Default)]
pub struct AllocStats {
    pub allocations: Cell<usize>,
    pub deallocations: Cell<usize>,
    /// The number of further allocations that will succeed, or None for no limit.
    pub remaining: Cell<Option<usize>>,
}

/// An allocator that forwards to [`Global`], counting requests and optionally failing once a
/// budget runs out.
#[derive(Debug, Default, Clone)]
pub struct CountingAllocator(pub Rc<AllocStats>);

impl CountingAllocator {
    pub fn new() -> CountingAllocator {
        CountingAllocator::default()
    }

    pub fn allocations(&self) -> usize {
        self.0.allocations.get()
    }

    pub fn deallocations(&self) -> usize {
        self.0.deallocations.get()
    }

    pub fn live(&self) -> usize {
        self.allocations() - self.deallocations()
    }

    pub fn fail_after(&self, count: usize) {
        self.0.remaining.set(Some(count));
    }
}

impl PartialEq for CountingAllocator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Allocator for CountingAllocator {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        if size_of::<T>() == 0 || count == 0 {
            return Global.allocate(count);
        }

        match self.0.remaining.get() {
            Some(0) => {
                return Err(AllocError::OutOfMemory(OutOfMemory {
                    layout: array_layout::<T>(count)?,
                }));
            },
            Some(remaining) => self.0.remaining.set(Some(remaining - 1)),
            None => {},
        }

        let ptr = Global.allocate(count)?;
        self.0.allocations.set(self.0.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        if size_of::<T>() != 0 && count != 0 {
            self.0.deallocations.set(self.0.deallocations.get() + 1);
        }
        // SAFETY: The caller upholds the contract of deallocate, and all allocations were forwarded
        // to Global.
        unsafe { Global.deallocate(ptr, count) }
    }
}
