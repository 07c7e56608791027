use std::borrow::{Borrow, BorrowMut};
use std::cmp::{self, Ordering};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut, RangeBounds};
use std::ptr::{self, NonNull};
use std::slice;

use log::trace;

use crate::iter;
use crate::memory::{
    self, AllocError, Allocator, CapacityOverflow, Global, RawBuf, uninitialized_copy,
    uninitialized_copy_pod, uninitialized_fill_n, uninitialized_fill_with, uninitialized_move,
};
use crate::traits::{Pod, TypeTraits};
#[doc(inline)]
pub use crate::util::error::IndexOutOfBounds;
use crate::util::fmt::DebugIter;
use crate::util::range::resolve_range;
use crate::util::result::{AllocResultExtension, ResultExtension};

const GROWTH_FACTOR: usize = 2;

/// A variable size contiguous collection, storing its elements in a single allocation from `A`.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items being inserted or removed.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)` |
/// | `insert_slice` | `O(n-i+m)` |
/// | `remove` | `O(n-i)` |
/// | `swap_remove` | `O(1)` |
/// | `erase_range` | `O(n-i)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `shrink_to_fit` | `O(n)` |
/// | `append` | `O(m)`* |
///
/// \* If the Vector doesn't have enough capacity for the new elements, it will reallocate, which
/// takes `O(n)`. Capacity grows to `max(2 * len, len + m)`, so pushing is amortized `O(1)`.
///
/// \** If the Vector has enough capacity for the additional items already, `reserve` is `O(1)`.
///
/// # Panics and Rollback
/// Inserting clones or closure results (`insert_slice`, `insert_n`, `resize`, [`Clone`]) is
/// commit-or-rollback: if a clone panics, the Vector is left exactly as it was before the call,
/// including its capacity. This holds both when the Vector has to reallocate and when it shifts its
/// elements in place, because moving an element can never fail.
///
/// # Invalidation
/// Any operation that reallocates invalidates every pointer into the Vector. Pointers to elements
/// before the modified index remain valid across in place insertion and removal.
pub struct Vector<T, A: Allocator = Global> {
    pub(crate) buf: RawBuf<T, A>,
    pub(crate) len: usize,
}

impl<T> Vector<T> {
    /// Creates a new Vector with length and capacity 0. Memory will be allocated when the capacity
    /// changes.
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub const fn new() -> Vector<T> {
        Vector::new_in(Global)
    }

    /// Creates a new Vector with capacity exactly equal to the provided value, allowing values to
    /// be added without reallocation.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// vec.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> Vector<T> {
        Vector::with_cap_in(cap, Global)
    }

    /// Creates a Vector holding `count` clones of `value`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`], or if cloning panics (in which case
    /// every clone made so far is dropped).
    pub fn from_elem(value: &T, count: usize) -> Vector<T>
    where
        T: Clone,
    {
        let mut vec = Vector::with_cap(count);
        // SAFETY: The Vector has room for count values, which are committed by setting len.
        unsafe { uninitialized_fill_n(vec.buf.ptr, count, value) };
        vec.len = count;
        vec
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Creates a new, empty Vector which will allocate from `alloc` once it needs storage.
    pub const fn new_in(alloc: A) -> Vector<T, A> {
        Vector {
            buf: RawBuf::new_in(alloc),
            len: 0,
        }
    }

    /// Creates a new Vector in `alloc`, with capacity exactly equal to `cap`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn with_cap_in(cap: usize, alloc: A) -> Vector<T, A> {
        Vector::try_with_cap_in(cap, alloc).or_handle()
    }

    /// Creates a new Vector in `alloc`, with capacity exactly equal to `cap`.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the allocator can't provide the storage.
    pub fn try_with_cap_in(cap: usize, alloc: A) -> Result<Vector<T, A>, AllocError> {
        if TypeTraits::<T>::IS_ZERO_SIZED {
            return Ok(Vector::new_in(alloc));
        }

        Ok(Vector {
            buf: RawBuf::try_with_cap_in(cap, alloc)?,
            len: 0,
        })
    }

    /// Returns the length of the Vector.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Vector contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the Vector. The capacity is exactly the value provided to
    /// [`with_cap`](Vector::with_cap), [`reserve_exact`](Vector::reserve_exact) or
    /// [`shrink_to_fit`](Vector::shrink_to_fit), if one of those was the last to change it.
    ///
    /// Zero sized types never need storage, so their capacity is always [`usize::MAX`].
    pub const fn cap(&self) -> usize {
        if TypeTraits::<T>::IS_ZERO_SIZED {
            usize::MAX
        } else {
            self.buf.cap()
        }
    }

    /// Returns the largest length that the Vector could ever reach.
    pub fn max_size(&self) -> usize {
        self.buf.max_cap()
    }

    /// Returns a reference to the allocator that the Vector allocates from.
    pub const fn allocator(&self) -> &A {
        &self.buf.alloc
    }

    /// Returns a pointer to the first element. The pointer is dangling if no storage has been
    /// allocated.
    pub const fn as_ptr(&self) -> *const T {
        self.buf.ptr.as_ptr().cast_const()
    }

    /// Returns a mutable pointer to the first element. The pointer is dangling if no storage has
    /// been allocated.
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr.as_ptr()
    }

    /// Returns the contents of the Vector as a slice.
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// Returns the contents of the Vector as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` isn't less than the length.
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.check_index(index)?;
        // SAFETY: index < len, so the slot holds a live value.
        Ok(unsafe { self.buf.slot(index).as_ref() })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` isn't less than the length.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        self.check_index(index)?;
        // SAFETY: index < len, so the slot holds a live value.
        Ok(unsafe { self.buf.slot(index).as_mut() })
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::<u8>::new();
    /// for i in 1..=5 {
    ///     vec.push(i);
    /// }
    /// assert_eq!(&*vec, &[1, 2, 3, 4, 5]);
    /// assert!(vec.cap() >= 5);
    /// ```
    pub fn push(&mut self, value: T) {
        if self.len == self.cap() {
            self.grow(1);
        }
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough capacity
    /// to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the Vector has enough capacity to add the provided
    /// value, using methods like [`reserve`](Vector::reserve) or [`with_cap`](Vector::with_cap) to
    /// do so. Using this method on a Vector without enough capacity is undefined behavior.
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: It is up to the caller to ensure that the Vector has enough capacity for this
        // push, leading to the pointer write being in bounds of the allocation.
        unsafe { memory::construct(self.buf.slot(self.len), value) };
        self.len += 1;
    }

    /// Constructs the value returned by `f` at the end of the Vector, returning a reference to it.
    /// If `f` panics, the Vector is unchanged.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn emplace_back<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        self.push(f());
        // SAFETY: A value has just been pushed, so len - 1 is a live slot.
        unsafe { self.buf.slot(self.len - 1).as_mut() }
    }

    /// Pops the last value off the end of the Vector, returning an owned value if the Vector has
    /// length greater than 0.
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = (0..5).collect();
    /// for i in (0..vec.len()).rev() {
    ///     assert_eq!(vec.pop(), Some(i));
    /// }
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        // Decrement len before reading, so that the slot is no longer considered live.
        self.len -= 1;
        // SAFETY: The slot at the old len - 1 held a live value, which is moved out here.
        Some(unsafe { self.buf.slot(self.len).read() })
    }

    /// Inserts the provided value at the given index, growing and moving items as necessary.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = (0..3).collect();
    /// vec.insert(1, 100);
    /// vec.insert(1, 200);
    /// vec.insert(5, 300);
    /// assert_eq!(&*vec, &[0, 200, 100, 1, 2, 300]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        // SAFETY: Writing a single owned value constructs exactly one value and can't panic.
        unsafe { self.insert_with(index, 1, |dest| memory::construct(dest, value)) }
    }

    /// Constructs the value returned by `f` at `index`, returning a reference to it. If `f`
    /// panics, the Vector is unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    pub fn emplace<F: FnOnce() -> T>(&mut self, index: usize, f: F) -> &mut T {
        // SAFETY: construct_with writes nothing if f panics.
        unsafe {
            self.insert_with(index, 1, |dest| memory::construct_with(dest, f));
            self.buf.slot(index).as_mut()
        }
    }

    /// Inserts every value produced by `iter` at `index`, preserving their order.
    ///
    /// The values are collected before the Vector is modified, so a panicking iterator leaves the
    /// Vector unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) {
        self.check_pos(index);

        let mut staged = Vector::new_in(self.buf.alloc.clone());
        staged.extend(iter);

        let count = staged.len;
        // SAFETY: The staged values are moved bitwise into the gap, which can't fail. Setting the
        // staged len to 0 afterwards ensures that they aren't dropped twice.
        unsafe {
            self.insert_with(index, count, |dest| {
                uninitialized_move(staged.buf.ptr, count, dest);
            });
        }
        staged.len = 0;
    }

    /// Removes the element at the provided index, moving all following values to fill in the gap.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = "Hello world!".chars().collect();
    /// assert_eq!(vec.remove(1), 'e');
    /// assert_eq!(vec.remove(4), ' ');
    /// assert_eq!(vec, "Hlloworld!".chars().collect());
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        self.check_index(index).throw();

        // SAFETY: index < len so the slot holds a live value, which is read before the tail is
        // moved down over it.
        unsafe {
            let value = self.buf.slot(index).read();
            ptr::copy(
                self.buf.slot(index + 1).as_ptr(),
                self.buf.slot(index).as_ptr(),
                self.len - index - 1,
            );
            self.len -= 1;
            value
        }
    }

    /// Removes the element at the provided index and replaces it with the last element, which is
    /// `O(1)` but doesn't preserve order.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.check_index(index).throw();

        self.len -= 1;
        // SAFETY: Both index and the old last slot hold live values. The last slot is considered
        // uninitialized once len is decremented.
        unsafe {
            let value = self.buf.slot(index).read();
            if index != self.len {
                self.buf.slot(self.len).copy_to_nonoverlapping(self.buf.slot(index), 1);
            }
            value
        }
    }

    /// Replaces the element at the provided index with `new_value`, returning the old value.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.check_index(index).throw();
        // SAFETY: index < len and all values < len are initialized.
        unsafe { mem::replace(self.buf.slot(index).as_mut(), new_value) }
    }

    /// Removes every element in `range`, moving the following elements down to fill the gap.
    ///
    /// If one of the destructors panics, the rest of the range is still dropped and the gap is
    /// still closed before the panic continues.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = (0..10).collect();
    /// vec.erase_range(2..8);
    /// assert_eq!(&*vec, &[0, 1, 8, 9]);
    /// ```
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = resolve_range(range, self.len);
        let count = range.len();
        if count == 0 {
            return;
        }

        let tail = self.len - range.end;
        // Nothing in the gap is live anymore, even if a destructor unwinds.
        self.len = range.start;
        let gap = CloseGap {
            base: self.buf.ptr,
            start: range.start,
            end: range.end,
            tail,
            len: &mut self.len,
        };

        // SAFETY: Every slot in the range holds a live value. The guard closes the gap afterwards.
        unsafe { memory::destroy_range(gap.base.add(range.start), count) };
    }

    /// Shortens the Vector to `len`, dropping the elements after it. Does nothing if the Vector is
    /// already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.erase_range(len..);
        }
    }

    /// Drops every element, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensures that the Vector has capacity to hold an additional `extra` elements. After invoking
    /// this method, the capacity will be >= len + extra. Growth follows the same amortized policy
    /// as [`push`](Vector::push).
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn reserve(&mut self, extra: usize) {
        self.try_reserve(extra).or_handle()
    }

    /// Ensures that the Vector has capacity to hold an additional `extra` elements.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the new capacity overflows or the allocator fails, in which
    /// case the Vector is unchanged.
    pub fn try_reserve(&mut self, extra: usize) -> Result<(), AllocError> {
        if self.cap() - self.len >= extra {
            return Ok(());
        }

        let new_cap = self.grown_cap(extra)?;
        self.try_realloc(new_cap)
    }

    /// Ensures that the capacity is at least len + extra, allocating exactly that much if it isn't.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn reserve_exact(&mut self, extra: usize) {
        if self.cap() - self.len >= extra {
            return;
        }

        let new_cap = self.len.checked_add(extra).ok_or(CapacityOverflow).throw();
        self.try_realloc(new_cap).or_handle()
    }

    /// Shrinks the Vector so that its capacity is equal to its length.
    pub fn shrink_to_fit(&mut self) {
        if self.cap() != self.len {
            self.try_realloc(self.len).or_handle()
        }
    }

    /// Resizes the Vector to `new_len`, either dropping elements from the end or appending clones
    /// of `value`. Growing is commit-or-rollback.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
        } else {
            self.insert_n(self.len, new_len - self.len, &value);
        }
    }

    /// Resizes the Vector to `new_len`, either dropping elements from the end or appending values
    /// returned by `f`. Growing is commit-or-rollback.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        if new_len <= self.len {
            self.truncate(new_len);
        } else {
            let count = new_len - self.len;
            // SAFETY: uninitialized_fill_with constructs count values or rolls back.
            unsafe {
                self.insert_with(self.len, count, |dest| {
                    uninitialized_fill_with(dest, count, f);
                });
            }
        }
    }

    /// Appends all elements from `other` to self, leaving `other` empty but keeping its capacity.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn append<B: Allocator>(&mut self, other: &mut Vector<T, B>) {
        let count = other.len;
        // SAFETY: Moving bitwise can't fail, and other forgets the moved values straight after.
        unsafe {
            self.insert_with(self.len, count, |dest| {
                uninitialized_move(other.buf.ptr, count, dest);
            });
        }
        other.len = 0;
    }

    /// Opens a gap of `count` slots at `index` and calls `construct` to fill it, reallocating
    /// first if required.
    ///
    /// If `construct` panics, the Vector is restored to exactly its previous state: a new buffer
    /// is released without being used, and a gap opened in place is closed again.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    ///
    /// # Safety
    /// `construct` must either construct exactly `count` values starting at the pointer that it
    /// is given, or panic having left none of them live.
    pub(crate) unsafe fn insert_with<F: FnOnce(NonNull<T>)>(
        &mut self,
        index: usize,
        count: usize,
        construct: F,
    ) {
        self.check_pos(index);
        let tail = self.len - index;

        if self.cap() - self.len < count {
            let new_cap = self.grown_cap(count).or_handle();
            let new_buf = RawBuf::try_with_cap_in(new_cap, self.buf.alloc.clone()).or_handle();
            trace!("reallocating Vector from {} to {new_cap} to insert {count} values", self.cap());

            // SAFETY: The new buffer has room for len + count values. If construct panics, it
            // leaves nothing live and new_buf only releases its storage as it unwinds. The old
            // buffer hasn't been touched yet at that point.
            unsafe {
                construct(new_buf.slot(index));
                uninitialized_move(self.buf.ptr, index, new_buf.ptr);
                uninitialized_move(self.buf.slot(index), tail, new_buf.slot(index + count));
            }

            // The old buffer holds no live values anymore and is released as it drops.
            self.buf = new_buf;
            self.len += count;
            return;
        }

        let shift = ShiftBack {
            base: self.buf.ptr,
            index,
            count,
            tail,
        };
        // SAFETY: There is room for count more values, so the tail can move up by count slots.
        // The guard moves it back down if construct panics.
        unsafe {
            ptr::copy(shift.base.add(index).as_ptr(), shift.base.add(index + count).as_ptr(), tail);
            construct(shift.base.add(index));
        }
        mem::forget(shift);
        self.len += count;
    }

    /// Returns the capacity to grow to in order to fit `extra` more values.
    fn grown_cap(&self, extra: usize) -> Result<usize, AllocError> {
        let required = self.len.checked_add(extra).ok_or(CapacityOverflow)?;
        let max = self.max_size();
        if required > max {
            return Err(CapacityOverflow.into());
        }

        Ok(cmp::max(self.len.saturating_mul(GROWTH_FACTOR), required).min(max))
    }

    /// Grows the storage to fit at least `extra` more values.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub(crate) fn grow(&mut self, extra: usize) {
        let new_cap = self.grown_cap(extra).or_handle();
        self.try_realloc(new_cap).or_handle()
    }

    /// Moves the elements into a new allocation with exactly `new_cap` slots.
    fn try_realloc(&mut self, new_cap: usize) -> Result<(), AllocError> {
        if TypeTraits::<T>::IS_ZERO_SIZED {
            return Ok(());
        }
        debug_assert!(new_cap >= self.len);
        // SAFETY: The first len slots are live and fit in new_cap.
        unsafe { self.buf.try_relocate(self.len, new_cap) }
    }

    /// Checks that the provided index refers to an element.
    pub(crate) fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index >= self.len {
            return Err(IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Checks that the provided index is a valid insertion point.
    ///
    /// # Panics
    /// Panics if `index > len`.
    fn check_pos(&self, index: usize) {
        if index > self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            }).throw()
        }
    }
}

impl<T: Clone, A: Allocator> Vector<T, A> {
    /// Inserts `count` clones of `value` at `index`. Commit-or-rollback: if a clone panics, the
    /// Vector is unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    pub fn insert_n(&mut self, index: usize, count: usize, value: &T) {
        // SAFETY: uninitialized_fill_n constructs count values or rolls back.
        unsafe {
            self.insert_with(index, count, |dest| {
                uninitialized_fill_n(dest, count, value);
            });
        }
    }

    /// Inserts a clone of every value in `values` at `index`. Commit-or-rollback: if a clone
    /// panics, the Vector is unchanged.
    ///
    /// Values are cloned one at a time. For [`Pod`] element types, [`insert_pod`](Vector::insert_pod)
    /// does the same with a single memory copy.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 5]);
    /// vec.insert_slice(1, &[2, 3, 4]);
    /// assert_eq!(&*vec, &[1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_slice(&mut self, index: usize, values: &[T]) {
        // SAFETY: uninitialized_copy constructs values.len() values or rolls back.
        unsafe {
            self.insert_with(index, values.len(), |dest| {
                uninitialized_copy(values, dest);
            });
        }
    }

    /// Appends a clone of every value in `values`. See also
    /// [`extend_from_pod`](Vector::extend_from_pod).
    ///
    /// # Panics
    /// See [`insert_slice`](Vector::insert_slice).
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.insert_slice(self.len, values);
    }

    /// Replaces the contents of the Vector with `count` clones of `value`.
    ///
    /// If this requires more capacity, the new contents are built in a new allocation first and a
    /// panicking clone leaves the Vector unchanged. Otherwise the existing elements are assigned
    /// over, and a panic leaves some of them replaced.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn assign(&mut self, count: usize, value: &T) {
        if count > self.cap() {
            let mut fresh = Vector::with_cap_in(count, self.buf.alloc.clone());
            fresh.insert_n(0, count, value);
            *self = fresh;
            return;
        }

        let kept = cmp::min(count, self.len);
        // SAFETY: The first kept slots hold live values.
        unsafe { iter::fill_n(self.buf.ptr, kept, value) };

        if count > self.len {
            self.insert_n(self.len, count - self.len, value);
        } else {
            self.truncate(count);
        }
    }

    /// Replaces the contents of the Vector with clones of `values`, with the same guarantees as
    /// [`assign`](Vector::assign). [`assign_pod`](Vector::assign_pod) copies plain-old-data in bulk.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn assign_slice(&mut self, values: &[T]) {
        if values.len() > self.cap() {
            let mut fresh = Vector::with_cap_in(values.len(), self.buf.alloc.clone());
            fresh.insert_slice(0, values);
            *self = fresh;
            return;
        }

        let kept = cmp::min(values.len(), self.len);
        let src = NonNull::from(values).cast::<T>();
        // SAFETY: Both ranges hold at least kept live values, and can't overlap because values is
        // borrowed while self is borrowed mutably.
        unsafe { iter::copy(src, src.add(kept), self.buf.ptr) };

        if values.len() > self.len {
            self.insert_slice(self.len, &values[kept..]);
        } else {
            self.truncate(values.len());
        }
    }
}

impl<T: Pod, A: Allocator> Vector<T, A> {
    /// Inserts a copy of `values` at `index` with a single memory copy.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    pub fn insert_pod(&mut self, index: usize, values: &[T]) {
        // SAFETY: Copying plain-old-data into the gap constructs values.len() values and can't
        // fail. A shared borrow of values can't overlap with the Vector.
        unsafe {
            self.insert_with(index, values.len(), |dest| {
                uninitialized_copy_pod(values, dest);
            });
        }
    }

    /// Appends a copy of `values` with a single memory copy.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn extend_from_pod(&mut self, values: &[T]) {
        self.insert_pod(self.len, values);
    }

    /// Replaces the contents of the Vector with a copy of `values`, reusing the current
    /// allocation if it is large enough.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn assign_pod(&mut self, values: &[T]) {
        self.clear();
        self.insert_pod(0, values);
    }
}

/// Moves the tail of a Vector back down over a gap opened for insertion, if filling the gap
/// panics.
struct ShiftBack<T> {
    base: NonNull<T>,
    index: usize,
    count: usize,
    tail: usize,
}

impl<T> Drop for ShiftBack<T> {
    fn drop(&mut self) {
        // SAFETY: The tail was moved up by count slots and the gap holds no live values.
        unsafe {
            ptr::copy(
                self.base.add(self.index + self.count).as_ptr(),
                self.base.add(self.index).as_ptr(),
                self.tail,
            );
        }
    }
}

/// Closes the gap left by [`Vector::erase_range`] once the erased values have been dropped, even
/// if dropping them panicked.
struct CloseGap<'a, T> {
    base: NonNull<T>,
    start: usize,
    end: usize,
    tail: usize,
    len: &'a mut usize,
}

impl<T> Drop for CloseGap<'_, T> {
    fn drop(&mut self) {
        // SAFETY: Everything in start..end has been dropped and the tail is live.
        unsafe {
            ptr::copy(
                self.base.add(self.end).as_ptr(),
                self.base.add(self.start).as_ptr(),
                self.tail,
            );
        }
        *self.len = self.start + self.tail;
    }
}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let mut vec = Vector::new();
        vec.extend(value);
        vec
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(value: [T; N]) -> Self {
        let mut vec = Vector::with_cap(N);
        for item in value {
            // SAFETY: vec has been created with the right capacity.
            unsafe { vec.push_unchecked(item) };
        }
        vec
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(value: &[T]) -> Self {
        let mut vec = Vector::with_cap(value.len());
        vec.insert_slice(0, value);
        vec
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // SAFETY: All values less than len are initialized and safe to drop. The storage itself is
        // released when buf drops.
        unsafe { memory::destroy_range(self.buf.ptr, self.len) }
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Vector is valid as a slice for len values, which are all initialized. The pointer
        // is nonnull, properly aligned and the range entirely contained within this Vector.
        unsafe { slice::from_raw_parts(self.buf.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, with exclusive access guaranteed by &mut self.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vector<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, A: Allocator> Borrow<[T]> for Vector<T, A> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for Vector<T, A> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

// SAFETY: Vectors, when used safely rely on unique pointers and are therefore safe for Send when T:
// Send.
unsafe impl<T: Send, A: Allocator + Send> Send for Vector<T, A> {}
// SAFETY: Vector's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs. This means that Vector<T> can safely implement Sync when T: Sync.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Vector<T, A> {}

impl<T: Clone, A: Allocator> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        let mut vec = Vector::with_cap_in(self.len, self.buf.alloc.clone());
        // SAFETY: The new Vector has room for len values. If a clone panics, the values cloned so
        // far are dropped and vec releases its storage.
        unsafe { uninitialized_copy(self.iter(), vec.buf.ptr) };
        vec.len = self.len;
        vec
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for Vector<T, A> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug, A: Allocator> Debug for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &DebugIter::new(self.iter()))
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug, A: Allocator> Display for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
