use std::ptr::NonNull;

/// The capability tier of a position type, from weakest to strongest. Each tier supports everything
/// that the tiers before it do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Single pass, read once. Represented by [`Iterator`] rather than a cursor.
    Input,
    /// Multi-pass, can only step forward. See [`RawCursor`].
    Forward,
    /// Can also step backwards. See [`BidirectionalCursor`].
    Bidirectional,
    /// Can jump by any offset and measure distances in `O(1)`. See [`RandomAccessCursor`].
    RandomAccess,
}

/// A raw, copyable position within some storage, advertising its capability tier.
///
/// Cursors are non-owning back references. They don't borrow the storage that they point into, so
/// nothing prevents them from outliving it or from observing it after it has been mutated. This is
/// why most methods are unsafe.
///
/// The default implementations of [`advance_by`](RawCursor::advance_by) and
/// [`distance_to`](RawCursor::distance_to) step one element at a time. Stronger tiers override them
/// with constant time arithmetic, which is how generic algorithms get the fast version without
/// naming it.
///
/// # Safety
/// Implementors must ensure that [`CATEGORY`](RawCursor::CATEGORY) matches the traits that are
/// actually implemented and that [`CONTIGUOUS`](RawCursor::CONTIGUOUS) is only true if stepping
/// forward always moves to the directly adjacent memory location.
pub unsafe trait RawCursor: Copy + PartialEq {
    type Item;

    const CATEGORY: Category;

    /// Whether the elements between two positions form a single contiguous slice, allowing bulk
    /// memory operations.
    const CONTIGUOUS: bool = false;

    /// Returns a pointer to the element at this position. The pointer is only valid to dereference
    /// if the position refers to a live element.
    fn ptr(&self) -> *mut Self::Item;

    /// Moves to the next position.
    ///
    /// # Safety
    /// The cursor must currently refer to an element (rather than an end position) of storage
    /// that is still alive.
    unsafe fn step(&mut self);

    /// Moves forward by `count` positions.
    ///
    /// # Safety
    /// All positions stepped over must be valid, as with [`step`](RawCursor::step).
    unsafe fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            // SAFETY: The caller ensures that every intermediate position is valid.
            unsafe { self.step() }
        }
    }

    /// Returns the number of steps from self to `last`.
    ///
    /// # Safety
    /// `last` must be reachable from self by stepping forward.
    unsafe fn distance_to(&self, last: &Self) -> usize {
        let mut curr = *self;
        let mut count = 0;
        while curr != *last {
            // SAFETY: last is reachable, so curr isn't an end position yet.
            unsafe { curr.step() }
            count += 1;
        }
        count
    }
}

/// A cursor that can also step backwards.
///
/// # Safety
/// See [`RawCursor`].
pub unsafe trait BidirectionalCursor: RawCursor {
    /// Moves to the previous position.
    ///
    /// # Safety
    /// The cursor must not be at the first position of its storage.
    unsafe fn step_back(&mut self);

    /// Moves backward by `count` positions.
    ///
    /// # Safety
    /// All positions stepped over must be valid, as with [`step_back`](Self::step_back).
    unsafe fn retreat_by(&mut self, count: usize) {
        for _ in 0..count {
            // SAFETY: The caller ensures that every intermediate position is valid.
            unsafe { self.step_back() }
        }
    }
}

/// A cursor that can jump by arbitrary offsets and measure distances in constant time.
///
/// # Safety
/// See [`RawCursor`]. Additionally, [`distance_to`](RawCursor::distance_to) must agree with
/// [`diff`](RandomAccessCursor::diff).
pub unsafe trait RandomAccessCursor: BidirectionalCursor {
    /// Moves by `count` positions, backwards if `count` is negative.
    ///
    /// # Safety
    /// The resulting position must be within (or one past the end of) the same storage.
    unsafe fn jump(&mut self, count: isize);

    /// Returns the signed number of positions from `origin` to self (`self - origin`).
    ///
    /// # Safety
    /// Both positions must be within the same storage.
    unsafe fn diff(&self, origin: &Self) -> isize;
}

// SAFETY: Pointers into a single allocation are the definition of contiguous random access.
unsafe impl<T> RawCursor for NonNull<T> {
    type Item = T;

    const CATEGORY: Category = Category::RandomAccess;

    const CONTIGUOUS: bool = true;

    fn ptr(&self) -> *mut T {
        NonNull::as_ptr(*self)
    }

    unsafe fn step(&mut self) {
        // SAFETY: The caller ensures that the next position is within the allocation.
        *self = unsafe { NonNull::add(*self, 1) };
    }

    unsafe fn advance_by(&mut self, count: usize) {
        // SAFETY: The caller ensures that the resulting position is within the allocation.
        *self = unsafe { NonNull::add(*self, count) };
    }

    unsafe fn distance_to(&self, last: &Self) -> usize {
        // SAFETY: Same allocation, as required by the caller. For zero-sized types, every position
        // is the same address, which is why counted operations are used for them instead.
        unsafe { RandomAccessCursor::diff(last, self) as usize }
    }
}

// SAFETY: See the RawCursor implementation.
unsafe impl<T> BidirectionalCursor for NonNull<T> {
    unsafe fn step_back(&mut self) {
        // SAFETY: The caller ensures that the previous position is within the allocation.
        *self = unsafe { NonNull::sub(*self, 1) };
    }

    unsafe fn retreat_by(&mut self, count: usize) {
        // SAFETY: The caller ensures that the resulting position is within the allocation.
        *self = unsafe { NonNull::sub(*self, count) };
    }
}

// SAFETY: See the RawCursor implementation.
unsafe impl<T> RandomAccessCursor for NonNull<T> {
    unsafe fn jump(&mut self, count: isize) {
        // SAFETY: The caller ensures that the resulting position is within the allocation.
        *self = unsafe { NonNull::offset(*self, count) };
    }

    unsafe fn diff(&self, origin: &Self) -> isize {
        if size_of::<T>() == 0 {
            return 0;
        }
        // SAFETY: Both pointers are derived from the same allocation, as required by the caller.
        unsafe { NonNull::offset_from(*self, *origin) }
    }
}

/// Returns the capability tier advertised by the cursor type `C`.
pub const fn category_of<C: RawCursor>() -> Category {
    C::CATEGORY
}
