use std::mem;
use std::ptr::{self, NonNull};

use super::construct::destroy_range;
use crate::iter::RawCursor;
use crate::traits::{Pod, TypeTraits};

/// Tracks how many values a bulk construction has produced, destroying all of them if the
/// construction unwinds before [`commit`](Rollback::commit) is called.
///
/// The count is tracked separately from the cursor so that zero-sized values, which all share one
/// address, are destroyed the right number of times.
pub(crate) struct Rollback<C: RawCursor> {
    pub(crate) first: C,
    pub(crate) count: usize,
}

impl<C: RawCursor> Rollback<C> {
    pub(crate) const fn new(first: C) -> Rollback<C> {
        Rollback {
            first,
            count: 0,
        }
    }

    /// Disarms the guard, leaving every constructed value live.
    pub(crate) fn commit(self) -> usize {
        let count = self.count;
        mem::forget(self);
        count
    }
}

impl<C: RawCursor> Drop for Rollback<C> {
    fn drop(&mut self) {
        if TypeTraits::<C::Item>::HAS_TRIVIAL_DESTRUCTOR {
            return;
        }

        if C::CONTIGUOUS {
            if let Some(first) = NonNull::new(self.first.ptr()) {
                // SAFETY: The first count values from first were constructed by the operation that
                // owns this guard and haven't been committed.
                unsafe { destroy_range(first, self.count) };
            }
            return;
        }

        let mut curr = self.first;
        for _ in 0..self.count {
            // SAFETY: Same as above, stepping one constructed value at a time.
            unsafe {
                let value = curr.ptr();
                curr.step();
                ptr::drop_in_place(value);
            }
        }
    }
}

/// Constructs a clone of each value produced by `src` into the uninitialized slots starting at
/// `dest`, returning the position after the last value constructed.
///
/// # Panics
/// Commit or rollback: if a clone panics, every value already constructed by this call is
/// destroyed before the panic continues, leaving the destination with no live values.
///
/// # Safety
/// The destination must have uninitialized room for every value that `src` produces.
pub unsafe fn uninitialized_copy<'a, T, I, C>(src: I, dest: C) -> C
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a T>,
    C: RawCursor<Item = T>,
{
    let mut guard = Rollback::new(dest);
    let mut curr = dest;

    for value in src {
        // SAFETY: The caller ensures that curr has room. If clone panics, nothing is written and
        // the guard destroys the values before it.
        unsafe {
            curr.ptr().write(value.clone());
            curr.step();
        }
        guard.count += 1;
    }

    guard.commit();
    curr
}

/// Copies the plain-old-data in `src` into the uninitialized slots starting at `dest` with a single
/// memory copy, returning the position after the last value. This can't partially fail.
///
/// # Safety
/// The destination must have uninitialized room for `src.len()` values and must not overlap `src`.
pub unsafe fn uninitialized_copy_pod<T: Pod>(src: &[T], dest: NonNull<T>) -> NonNull<T> {
    // SAFETY: Forwarded to the caller.
    unsafe {
        ptr::copy_nonoverlapping(src.as_ptr(), dest.as_ptr(), src.len());
        dest.add(src.len())
    }
}

/// Constructs a clone of `value` into every uninitialized slot in `[first, last)`.
///
/// # Panics
/// Commit or rollback, see [`uninitialized_copy`].
///
/// # Safety
/// `last` must be reachable from `first` and every slot in between must be uninitialized storage.
pub unsafe fn uninitialized_fill<C>(first: C, last: C, value: &C::Item)
where
    C: RawCursor,
    C::Item: Clone,
{
    let mut guard = Rollback::new(first);
    let mut curr = first;

    while curr != last {
        // SAFETY: curr is an uninitialized slot within the range.
        unsafe {
            curr.ptr().write(value.clone());
            curr.step();
        }
        guard.count += 1;
    }

    guard.commit();
}

/// Constructs a clone of `value` into `count` uninitialized slots starting at `first`, returning
/// the position after the last value constructed.
///
/// # Panics
/// Commit or rollback, see [`uninitialized_copy`].
///
/// # Safety
/// The destination must have uninitialized room for `count` values.
pub unsafe fn uninitialized_fill_n<C>(first: C, count: usize, value: &C::Item) -> C
where
    C: RawCursor,
    C::Item: Clone,
{
    // SAFETY: Forwarded to the caller.
    unsafe { uninitialized_fill_with(first, count, || value.clone()) }
}

/// Constructs `count` values produced by `f` into the uninitialized slots starting at `first`,
/// returning the position after the last value constructed.
///
/// # Panics
/// Commit or rollback, see [`uninitialized_copy`].
///
/// # Safety
/// The destination must have uninitialized room for `count` values.
pub unsafe fn uninitialized_fill_with<C, F>(first: C, count: usize, mut f: F) -> C
where
    C: RawCursor,
    F: FnMut() -> C::Item,
{
    let mut guard = Rollback::new(first);
    let mut curr = first;

    for _ in 0..count {
        // SAFETY: curr is an uninitialized slot within the range. If f panics, nothing is written.
        unsafe {
            curr.ptr().write(f());
            curr.step();
        }
        guard.count += 1;
    }

    guard.commit();
    curr
}

/// Fills `count` uninitialized slots starting at `dest` with copies of the plain-old-data `value`,
/// using a memory set for single byte types. This can't partially fail.
///
/// # Safety
/// The destination must have uninitialized room for `count` values.
pub unsafe fn uninitialized_fill_pod<T: Pod>(dest: NonNull<T>, count: usize, value: T) -> NonNull<T> {
    if size_of::<T>() == 1 {
        // SAFETY: T is exactly one byte, which can be read as a u8.
        let byte: u8 = unsafe { mem::transmute_copy(&value) };
        // SAFETY: Forwarded to the caller.
        unsafe { dest.as_ptr().cast::<u8>().write_bytes(byte, count) };
    } else {
        for i in 0..count {
            // SAFETY: Forwarded to the caller.
            unsafe { dest.add(i).write(value) };
        }
    }
    // SAFETY: Forwarded to the caller, the result is one past the end.
    unsafe { dest.add(count) }
}

/// Moves `count` live values starting at `src` into the uninitialized slots starting at `dest`,
/// returning the position after the last value moved. The source slots are left logically
/// uninitialized. Moving is a bitwise copy, so this can't partially fail.
///
/// # Safety
/// The source must hold `count` live values, the destination must have room for them and the two
/// ranges must not overlap.
pub unsafe fn uninitialized_move<T>(src: NonNull<T>, count: usize, dest: NonNull<T>) -> NonNull<T> {
    // SAFETY: Forwarded to the caller.
    unsafe {
        src.copy_to_nonoverlapping(dest, count);
        dest.add(count)
    }
}
