use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use log::trace;

use super::{AllocError, Allocator, max_count};

/// The exclusive owner of a single allocation of `cap` slots for `T`, none of which are assumed to
/// be initialized. Dropping a RawBuf releases the allocation without dropping any values; that is
/// the job of whoever tracks which slots are live.
pub(crate) struct RawBuf<T, A: Allocator> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T, A: Allocator> RawBuf<T, A> {
    /// Creates a RawBuf with capacity 0, without allocating.
    pub(crate) const fn new_in(alloc: A) -> RawBuf<T, A> {
        RawBuf {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a RawBuf with exactly `cap` uninitialized slots.
    ///
    /// # Errors
    /// Propagates any failure from the allocator.
    pub(crate) fn try_with_cap_in(cap: usize, alloc: A) -> Result<RawBuf<T, A>, AllocError> {
        let ptr = alloc.allocate(cap)?;
        Ok(RawBuf {
            ptr,
            cap,
            alloc,
            _phantom: PhantomData,
        })
    }

    pub(crate) const fn cap(&self) -> usize {
        self.cap
    }

    pub(crate) fn max_cap(&self) -> usize {
        self.alloc.max_size::<T>().min(max_count::<T>())
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// # Safety
    /// `index` must be less than or equal to the capacity.
    pub(crate) const unsafe fn slot(&self, index: usize) -> NonNull<T> {
        // SAFETY: Forwarded to the caller, the result is at most one past the end.
        unsafe { self.ptr.add(index) }
    }

    /// Allocates a fresh buffer with `new_cap` slots, moves the first `len` values across and
    /// releases the old allocation. Nothing changes if the allocation fails.
    ///
    /// # Errors
    /// Propagates any failure from the allocator.
    ///
    /// # Safety
    /// The first `len` slots must be live and `len` must fit in `new_cap`.
    pub(crate) unsafe fn try_relocate(&mut self, len: usize, new_cap: usize) -> Result<(), AllocError> {
        if new_cap == self.cap {
            return Ok(());
        }

        let new_buf = RawBuf::try_with_cap_in(new_cap, self.alloc.clone())?;
        trace!("relocating {len} values from a buffer of {} to {new_cap}", self.cap);

        // SAFETY: Distinct allocations can't overlap and both have room for len values. Moving is
        // a bitwise copy, so the old slots are simply forgotten.
        unsafe { self.ptr.copy_to_nonoverlapping(new_buf.ptr, len) };

        // The old buffer, now holding no live values, is released as it drops.
        drop(mem::replace(self, new_buf));
        Ok(())
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by this allocator for exactly cap values. Any live values are the
        // responsibility of the owner and have already been dealt with.
        unsafe { self.alloc.deallocate(self.ptr, self.cap) }
    }
}
