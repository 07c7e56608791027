use std::ptr::{self, NonNull};

use crate::iter::RawCursor;
use crate::traits::TypeTraits;

/// Constructs `value` in place at `ptr`, without reading or dropping whatever was there before.
///
/// # Safety
/// `ptr` must be properly aligned and valid for writes. Any live value at `ptr` is leaked.
pub unsafe fn construct<T>(ptr: NonNull<T>, value: T) {
    // SAFETY: Forwarded to the caller.
    unsafe { ptr.write(value) }
}

/// Constructs the value produced by `f` in place at `ptr`.
///
/// `f` runs before anything is written, so if it panics, `ptr` doesn't hold a live value.
///
/// # Safety
/// See [`construct`].
pub unsafe fn construct_with<T, F: FnOnce() -> T>(ptr: NonNull<T>, f: F) {
    let value = f();
    // SAFETY: Forwarded to the caller.
    unsafe { ptr.write(value) }
}

/// Destroys the value at `ptr` in place. This compiles to nothing for types without drop glue.
///
/// # Safety
/// `ptr` must hold a live value, which must be treated as uninitialized afterwards.
pub unsafe fn destroy<T>(ptr: NonNull<T>) {
    if TypeTraits::<T>::HAS_TRIVIAL_DESTRUCTOR {
        return;
    }
    // SAFETY: Forwarded to the caller.
    unsafe { ptr::drop_in_place(ptr.as_ptr()) }
}

/// Destroys `count` contiguous values starting at `first`. This compiles to nothing for types
/// without drop glue.
///
/// If one of the destructors panics, the remaining values are still destroyed before the panic
/// continues.
///
/// # Safety
/// All `count` values must be live, and must be treated as uninitialized afterwards.
pub unsafe fn destroy_range<T>(first: NonNull<T>, count: usize) {
    if TypeTraits::<T>::HAS_TRIVIAL_DESTRUCTOR || count == 0 {
        return;
    }
    // SAFETY: The slice covers exactly the live values, as required by the caller.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first.as_ptr(), count)) }
}

/// Destroys every value in `[first, last)`. This compiles to nothing for types without drop glue,
/// and to a single slice drop for contiguous cursors.
///
/// If one of the destructors panics, the remaining values are still destroyed before the panic
/// continues.
///
/// # Safety
/// `last` must be reachable from `first` and every value in between must be live. They must all be
/// treated as uninitialized afterwards.
pub unsafe fn destroy_between<C: RawCursor>(first: C, last: C) {
    if TypeTraits::<C::Item>::HAS_TRIVIAL_DESTRUCTOR {
        return;
    }

    if C::CONTIGUOUS {
        // SAFETY: Contiguous cursors describe a single slice of live values.
        unsafe {
            let count = first.distance_to(&last);
            if let Some(first) = NonNull::new(first.ptr()) {
                destroy_range(first, count);
            }
        }
        return;
    }

    let mut rest = DropRest {
        curr: first,
        last,
    };
    while rest.curr != rest.last {
        let value = rest.curr.ptr();
        // SAFETY: curr refers to a live value, which is stepped over before it is dropped so that a
        // panic doesn't drop it a second time.
        unsafe {
            rest.curr.step();
            ptr::drop_in_place(value);
        }
    }
}

/// Drops whatever is left of a range if one of the destructors in [`destroy_between`] panics.
struct DropRest<C: RawCursor> {
    curr: C,
    last: C,
}

impl<C: RawCursor> Drop for DropRest<C> {
    fn drop(&mut self) {
        while self.curr != self.last {
            let value = self.curr.ptr();
            // SAFETY: Same as the loop in destroy_between.
            unsafe {
                self.curr.step();
                ptr::drop_in_place(value);
            }
        }
    }
}
