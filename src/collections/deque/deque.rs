use std::cmp;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut, RangeBounds};
use std::ptr::{self, NonNull};

use log::{debug, trace};

use super::{Buffer, DequeCursor, Iter, IterMut};
use crate::collections::contiguous::Vector;
use crate::iter::{BidirectionalCursor, RandomAccessCursor, RawCursor, relocate, relocate_backward};
use crate::memory::{
    self, AllocError, Allocator, CapacityOverflow, Global, uninitialized_copy, uninitialized_fill_n,
    uninitialized_fill_with,
};
#[doc(inline)]
pub use crate::util::error::IndexOutOfBounds;
use crate::util::fmt::DebugIter;
use crate::util::range::resolve_range;
use crate::util::result::{AllocResultExtension, ResultExtension};

const INITIAL_MAP_SIZE: usize = 8;

/// A double-ended queue, storing its elements in fixed size buffers which are tracked by a growable
/// map of buffer pointers.
///
/// Each buffer holds `512 / size_of::<T>()` elements (or one, for large types). Growing at either
/// end only ever allocates a new buffer and, occasionally, a new map. Elements are never moved by
/// growth, and reallocating the map copies buffer pointers rather than elements.
///
/// Buffers emptied by popping are kept as spares for later pushes, until
/// [`shrink_to_fit`](Deque::shrink_to_fit) is called.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Deque.
/// - `i`: The index of the item in question.
/// - `m`: The number of items being inserted or removed.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push_front/back` | `O(1)`* |
/// | `pop_front/back` | `O(1)` |
/// | `insert` | `O(min(i, n-i))` |
/// | `insert_slice` | `O(min(i, n-i)+m)` |
/// | `remove` | `O(min(i, n-i))` |
/// | `erase_range` | `O(min(i, n-i)+m)` |
///
/// \* Amortized, the map occasionally has to be reallocated, which takes `O(n / buffer size)`.
///
/// # Panics and Rollback
/// Inserting in the middle shifts whichever side of the insertion point is shorter. If a clone
/// panics while filling the gap, the shifted elements are moved back and the Deque holds exactly
/// the elements it did before the call. Buffers allocated for the insertion are kept as spares.
///
/// # Zero Sized Types
/// The buffer size is undefined for zero sized types, so using a Deque of one is a compile time
/// error.
pub struct Deque<T, A: Allocator = Global> {
    pub(crate) map: NonNull<*mut T>,
    pub(crate) map_size: usize,
    pub(crate) start: DequeCursor<T>,
    pub(crate) finish: DequeCursor<T>,
    /// The number of allocated buffers directly before start's buffer.
    pub(crate) spare_front: usize,
    /// The number of allocated buffers directly after finish's buffer.
    pub(crate) spare_back: usize,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> Deque<T> {
    /// Creates a new, empty Deque. No memory is allocated until the first element is added.
    pub const fn new() -> Deque<T> {
        Deque::new_in(Global)
    }

    /// Creates a new Deque which can hold at least `cap` elements before allocating again.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn with_cap(cap: usize) -> Deque<T> {
        Deque::with_cap_in(cap, Global)
    }

    /// Creates a Deque holding `count` clones of `value`.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`], or if a clone panics.
    pub fn from_elem(value: &T, count: usize) -> Deque<T>
    where
        T: Clone,
    {
        let mut deque = Deque::new();
        deque.insert_n(0, count, value);
        deque
    }
}

impl<T, A: Allocator> Deque<T, A> {
    /// Creates a new, empty Deque in `alloc`. No memory is allocated until the first element is
    /// added.
    pub const fn new_in(alloc: A) -> Deque<T, A> {
        Deque {
            map: NonNull::dangling(),
            map_size: 0,
            start: DequeCursor::null(),
            finish: DequeCursor::null(),
            spare_front: 0,
            spare_back: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a new Deque in `alloc` which can hold at least `cap` elements before allocating
    /// again.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn with_cap_in(cap: usize, alloc: A) -> Deque<T, A> {
        let mut deque = Deque::new_in(alloc);
        if cap > 0 {
            deque.try_initialize_map(cap).or_handle();
        }
        deque
    }

    /// Returns the number of elements in the Deque.
    pub fn len(&self) -> usize {
        if self.map_size == 0 {
            return 0;
        }
        // SAFETY: Both cursors are positions in the same map, with start first.
        unsafe { self.finish.diff(&self.start) as usize }
    }

    /// Returns true if the Deque contains no elements.
    pub fn is_empty(&self) -> bool {
        self.start == self.finish
    }

    /// Returns the number of elements that the Deque can hold without allocating another buffer,
    /// counting free slots at both ends.
    pub fn cap(&self) -> usize {
        if self.map_size == 0 {
            return 0;
        }
        self.len() + self.front_room() + self.back_room()
    }

    /// Returns the largest number of elements that the Deque could ever hold.
    pub fn max_size(&self) -> usize {
        self.alloc.max_size::<T>()
    }

    /// Returns a reference to the allocator that the Deque allocates from.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns a cursor to the first element, or the end position if the Deque is empty.
    pub const fn begin(&self) -> DequeCursor<T> {
        self.start
    }

    /// Returns a cursor to the position after the last element.
    pub const fn end(&self) -> DequeCursor<T> {
        self.finish
    }

    /// Returns a reference to the element at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        // SAFETY: index < len, so the position holds a live value.
        Some(unsafe { &*self.cursor_at(index).cur })
    }

    /// Returns a mutable reference to the element at `index`, if it exists.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        // SAFETY: index < len, so the position holds a live value.
        Some(unsafe { &mut *self.cursor_at(index).cur })
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` isn't less than the length.
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        let len = self.len();
        self.get(index).ok_or(IndexOutOfBounds {
            index,
            len,
        })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` isn't less than the length.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        let len = self.len();
        self.get_mut(index).ok_or(IndexOutOfBounds {
            index,
            len,
        })
    }

    /// Returns a reference to the first element, if it exists.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the first element, if it exists.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns a reference to the last element, if it exists.
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns a mutable reference to the last element, if it exists.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len().checked_sub(1).and_then(|index| self.get_mut(index))
    }

    /// Adds the provided element to the back of the Deque.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::deque::Deque;
    /// let mut deque = Deque::from([1, 2, 3]);
    /// deque.push_front(0);
    /// deque.push_back(4);
    /// assert!(deque.iter().eq(&[0, 1, 2, 3, 4]));
    /// ```
    pub fn push_back(&mut self, value: T) {
        self.try_ensure_map().or_handle();

        if self.finish.cur != self.finish.last.wrapping_sub(1) {
            // SAFETY: finish isn't the last slot of its buffer, so it is free and the slot after
            // it is still within the buffer.
            unsafe {
                self.finish.cur.write(value);
                self.finish.cur = self.finish.cur.add(1);
            }
            return;
        }

        // Allocate the next buffer before writing anything, so that failing leaves no trace.
        self.try_reserve_elements_at_back(1).or_handle();

        // SAFETY: The last slot of finish's buffer is free and the following map slot now holds a
        // spare buffer.
        unsafe {
            self.finish.cur.write(value);
            let mut new_finish = self.finish;
            new_finish.set_node(self.finish.node.add(1));
            new_finish.cur = new_finish.first;
            self.set_finish(new_finish);
        }
    }

    /// Adds the provided element to the front of the Deque.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn push_front(&mut self, value: T) {
        self.try_ensure_map().or_handle();

        if self.start.cur != self.start.first {
            // SAFETY: start isn't the first slot of its buffer, so the slot before it is free.
            unsafe {
                self.start.cur = self.start.cur.sub(1);
                self.start.cur.write(value);
            }
            return;
        }

        self.try_reserve_elements_at_front(1).or_handle();

        // SAFETY: The preceding map slot now holds a spare buffer, whose last slot is free.
        unsafe {
            let mut new_start = self.start;
            new_start.set_node(self.start.node.sub(1));
            new_start.cur = new_start.last.sub(1);
            new_start.cur.write(value);
            self.set_start(new_start);
        }
    }

    /// Removes the last element and returns it, if the Deque isn't empty. The buffer that held it
    /// is kept as a spare if it becomes empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        // SAFETY: The Deque isn't empty, so the position before finish holds a live value, which
        // is no longer considered live once finish moves back.
        unsafe {
            let mut new_finish = self.finish;
            new_finish.step_back();
            let value = new_finish.cur.read();
            self.set_finish(new_finish);
            Some(value)
        }
    }

    /// Removes the first element and returns it, if the Deque isn't empty. The buffer that held it
    /// is kept as a spare if it becomes empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        // SAFETY: The Deque isn't empty, so start holds a live value, which is no longer considered
        // live once start moves forward.
        unsafe {
            let value = self.start.cur.read();
            let mut new_start = self.start;
            new_start.step();
            self.set_start(new_start);
            Some(value)
        }
    }

    /// Inserts the provided value at `index`, shifting whichever side of it is shorter.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the required memory layout exceeds [`isize::MAX`].
    pub fn insert(&mut self, index: usize, value: T) {
        self.check_pos(index);

        if index == 0 {
            self.push_front(value);
        } else if index == self.len() {
            self.push_back(value);
        } else {
            // SAFETY: Writing a single owned value constructs exactly one value and can't panic.
            unsafe { self.insert_with(index, 1, |dest| dest.cur.write(value)) }
        }
    }

    /// Inserts every value produced by `iter` at `index`, preserving their order. The values are
    /// collected before the Deque is modified.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the required memory layout exceeds [`isize::MAX`].
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) {
        self.check_pos(index);

        let mut staged: Vector<T, A> = Vector::new_in(self.alloc.clone());
        staged.extend(iter);

        let count = staged.len();
        let first = staged.buf.ptr;
        // SAFETY: The staged values are moved bitwise into the gap, which can't fail. Setting the
        // staged len to 0 afterwards ensures that they aren't dropped twice.
        unsafe {
            self.insert_with(index, count, |dest| {
                relocate(first, first.add(count), dest);
            });
        }
        staged.len = 0;
    }

    /// Removes and returns the element at `index`, shifting whichever side of it is shorter.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len();
        if index >= len {
            Err(IndexOutOfBounds {
                index,
                len,
            }).throw()
        }

        // SAFETY: index < len, so pos holds a live value. It is read out before the shorter side
        // is moved over it.
        unsafe {
            let pos = self.cursor_at(index);
            let value = pos.cur.read();

            if index < len / 2 {
                relocate_backward(self.start, pos, pos.offset(1));
                let mut new_start = self.start;
                new_start.step();
                self.set_start(new_start);
            } else {
                relocate(pos.offset(1), self.finish, pos);
                let mut new_finish = self.finish;
                new_finish.step_back();
                self.set_finish(new_finish);
            }

            value
        }
    }

    /// Removes every element in `range`, shifting whichever side of it is shorter to close the gap.
    ///
    /// If one of the destructors panics, the rest of the range is still dropped and the gap is
    /// still closed before the panic continues.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = resolve_range(range, self.len());
        let count = range.len();
        if count == 0 {
            return;
        }

        // SAFETY: The range is within the Deque, so every position in it holds a live value. The
        // guard closes the gap once they are dropped.
        unsafe {
            let first = self.cursor_at(range.start);
            let last = first.offset(count as isize);
            let _gap = CloseGap {
                deque: self,
                index: range.start,
                count,
            };
            memory::destroy_between(first, last);
        }
    }

    /// Shortens the Deque to `len`, dropping the elements after it. Does nothing if the Deque is
    /// already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.erase_range(len..);
        }
    }

    /// Drops every element. Buffers are kept as spares.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the Deque to `new_len`, either dropping elements from the back or appending values
    /// returned by `f`. Growing is commit-or-rollback.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
            return;
        }

        let count = new_len - len;
        // SAFETY: uninitialized_fill_with constructs count values or rolls back.
        unsafe {
            self.insert_with(len, count, |dest| {
                uninitialized_fill_with(dest, count, f);
            });
        }
    }

    /// Ensures that at least `extra` elements can be pushed onto the back without allocating.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn reserve_back(&mut self, extra: usize) {
        self.try_reserve_back(extra).or_handle()
    }

    /// Ensures that at least `extra` elements can be pushed onto the back without allocating.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the allocator fails. Buffers allocated before the failure are
    /// kept as spares.
    pub fn try_reserve_back(&mut self, extra: usize) -> Result<(), AllocError> {
        if extra == 0 {
            return Ok(());
        }
        self.check_new_len(extra)?;
        self.try_ensure_map()?;
        self.try_reserve_elements_at_back(extra)
    }

    /// Ensures that at least `extra` elements can be pushed onto the front without allocating.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn reserve_front(&mut self, extra: usize) {
        self.try_reserve_front(extra).or_handle()
    }

    /// Ensures that at least `extra` elements can be pushed onto the front without allocating.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the allocator fails. Buffers allocated before the failure are
    /// kept as spares.
    pub fn try_reserve_front(&mut self, extra: usize) -> Result<(), AllocError> {
        if extra == 0 {
            return Ok(());
        }
        self.check_new_len(extra)?;
        self.try_ensure_map()?;
        self.try_reserve_elements_at_front(extra)
    }

    /// Releases every spare buffer. If the Deque is empty, the map and remaining buffer are
    /// released too.
    pub fn shrink_to_fit(&mut self) {
        if self.map_size == 0 {
            return;
        }

        if self.is_empty() {
            // SAFETY: There are no live values, so all storage can be released.
            unsafe { self.release_storage() };
            self.map_size = 0;
            self.map = NonNull::dangling();
            self.start = DequeCursor::null();
            self.finish = DequeCursor::null();
            self.spare_front = 0;
            self.spare_back = 0;
            return;
        }

        // SAFETY: Spare slots hold buffers without live values, which are released and forgotten.
        unsafe {
            for i in 1..=self.spare_back {
                let slot = self.finish.node.add(i);
                self.free_buffer(*slot);
                *slot = ptr::null_mut();
            }
            for i in 1..=self.spare_front {
                let slot = self.start.node.sub(i);
                self.free_buffer(*slot);
                *slot = ptr::null_mut();
            }
        }
        trace!("released {} spare Deque buffers", self.spare_front + self.spare_back);
        self.spare_front = 0;
        self.spare_back = 0;
    }

    /// Swaps the elements at indices `a` and `b`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        let len = self.len();
        for index in [a, b] {
            if index >= len {
                Err(IndexOutOfBounds {
                    index,
                    len,
                }).throw()
            }
        }
        // SAFETY: Both indices are in bounds. ptr::swap allows a and b to be equal.
        unsafe { ptr::swap(self.cursor_at(a).cur, self.cursor_at(b).cur) }
    }

    /// Returns an iterator over references to the elements, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.start,
            back: self.finish,
            len: self.len(),
            _phantom: PhantomData,
        }
    }

    /// Returns an iterator over mutable references to the elements, front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.start,
            back: self.finish,
            len: self.len(),
            _phantom: PhantomData,
        }
    }

    /// Returns true if the Deque contains an element equal to `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|element| element == item)
    }

    /// Opens a gap of `count` slots at `index` by shifting the shorter side outwards, then calls
    /// `construct` to fill it. If `construct` panics, the shifted elements are moved back.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the required memory layout exceeds [`isize::MAX`].
    ///
    /// # Safety
    /// `construct` must either construct exactly `count` values starting at the cursor that it is
    /// given, or panic having left none of them live.
    pub(crate) unsafe fn insert_with<F: FnOnce(DequeCursor<T>)>(
        &mut self,
        index: usize,
        count: usize,
        construct: F,
    ) {
        self.check_pos(index);
        if count == 0 {
            return;
        }

        let len = self.len();
        self.check_new_len(count).or_handle();
        self.try_ensure_map().or_handle();

        if index < len / 2 {
            self.try_reserve_elements_at_front(count).or_handle();

            // SAFETY: The reservation guarantees count free slots before start. Moving the front
            // elements down can't fail, and the guard moves them back if construct panics.
            unsafe {
                let new_start = self.start.offset(-(count as isize));
                let pos = self.cursor_at(index);
                let gap = relocate(self.start, pos, new_start);

                let unshift = UnshiftFront {
                    new_start,
                    start: self.start,
                    before: index,
                };
                construct(gap);
                mem::forget(unshift);

                self.set_start(new_start);
            }
        } else {
            self.try_reserve_elements_at_back(count).or_handle();

            // SAFETY: The reservation guarantees count free slots after finish. Moving the back
            // elements up can't fail, and the guard moves them back if construct panics.
            unsafe {
                let new_finish = self.finish.offset(count as isize);
                let pos = self.cursor_at(index);
                relocate_backward(pos, self.finish, new_finish);

                let unshift = UnshiftBack {
                    pos,
                    gap_end: pos.offset(count as isize),
                    new_finish,
                };
                construct(pos);
                mem::forget(unshift);

                self.set_finish(new_finish);
            }
        }
    }

    /// Closes a gap of `count` slots at `index`, which hold no live values, by shifting the
    /// shorter side inwards.
    ///
    /// # Safety
    /// Every position in the gap must be treated as uninitialized. All other positions between
    /// start and finish must be live.
    unsafe fn close_gap(&mut self, index: usize, count: usize) {
        let len = self.len();

        // SAFETY: Every position is within the Deque, as required by the caller.
        unsafe {
            let first = self.cursor_at(index);
            let last = first.offset(count as isize);

            if index < len - index - count {
                relocate_backward(self.start, first, last);
                self.set_start(self.start.offset(count as isize));
            } else {
                relocate(last, self.finish, first);
                self.set_finish(self.finish.offset(-(count as isize)));
            }
        }
    }

    /// Returns a cursor to the position `index` elements after start.
    pub(crate) fn cursor_at(&self, index: usize) -> DequeCursor<T> {
        // SAFETY: Callers only request positions between start and finish.
        unsafe { self.start.offset(index as isize) }
    }

    /// Replaces start, keeping track of the spare buffers it moves over.
    ///
    /// # Safety
    /// `new_start` must be a position within the map, with every buffer between it and finish
    /// allocated.
    unsafe fn set_start(&mut self, new_start: DequeCursor<T>) {
        // SAFETY: Both nodes are slots within the map.
        let moved = unsafe { new_start.node.offset_from(self.start.node) };
        self.spare_front = self.spare_front.wrapping_add_signed(moved);
        self.start = new_start;
    }

    /// Replaces finish, keeping track of the spare buffers it moves over.
    ///
    /// # Safety
    /// `new_finish` must be a position within the map, with every buffer between start and it
    /// allocated.
    unsafe fn set_finish(&mut self, new_finish: DequeCursor<T>) {
        // SAFETY: Both nodes are slots within the map.
        let moved = unsafe { new_finish.node.offset_from(self.finish.node) };
        self.spare_back = self.spare_back.wrapping_add_signed(-moved);
        self.finish = new_finish;
    }

    /// The number of elements that can be pushed onto the front without allocating.
    fn front_room(&self) -> usize {
        // SAFETY: cur and first point into the same buffer.
        let in_buffer = unsafe { self.start.cur.offset_from(self.start.first) } as usize;
        in_buffer + self.spare_front * Buffer::<T>::SIZE
    }

    /// The number of elements that can be pushed onto the back without allocating. The last slot
    /// of finish's buffer doesn't count, because finish has to move into the next buffer once it
    /// is filled.
    fn back_room(&self) -> usize {
        // SAFETY: cur and last point into the same buffer.
        let in_buffer = unsafe { self.finish.last.offset_from(self.finish.cur) } as usize - 1;
        in_buffer + self.spare_back * Buffer::<T>::SIZE
    }

    fn try_ensure_map(&mut self) -> Result<(), AllocError> {
        if self.map_size == 0 {
            self.try_initialize_map(0)?;
        }
        Ok(())
    }

    /// Allocates a map and enough buffers for `num_elements`, with start and finish both at the
    /// beginning of the first buffer.
    fn try_initialize_map(&mut self, num_elements: usize) -> Result<(), AllocError> {
        debug_assert!(self.map_size == 0);

        let num_nodes = num_elements / Buffer::<T>::SIZE + 1;
        let map_size = cmp::max(
            INITIAL_MAP_SIZE,
            num_nodes.checked_add(2).ok_or(CapacityOverflow)?,
        );
        let map = self.alloc.allocate::<*mut T>(map_size)?;
        let first_node = (map_size - num_nodes) / 2;

        // SAFETY: The map has room for map_size pointers. Every allocated buffer is stored in it,
        // so they can be released if a later allocation fails.
        unsafe {
            for i in 0..map_size {
                map.add(i).write(ptr::null_mut());
            }

            for i in 0..num_nodes {
                match self.alloc.allocate::<T>(Buffer::<T>::SIZE) {
                    Ok(buffer) => map.add(first_node + i).write(buffer.as_ptr()),
                    Err(error) => {
                        for j in 0..i {
                            self.free_buffer(*map.add(first_node + j).as_ptr());
                        }
                        self.alloc.deallocate(map, map_size);
                        return Err(error);
                    },
                }
            }

            self.map = map;
            self.map_size = map_size;
            self.start.set_node(map.add(first_node).as_ptr());
            self.start.cur = self.start.first;
        }
        self.finish = self.start;
        self.spare_front = 0;
        self.spare_back = num_nodes - 1;

        trace!("allocated Deque map with {map_size} slots and {num_nodes} buffers");
        Ok(())
    }

    /// Allocates spare buffers after finish until at least `count` elements can be pushed onto
    /// the back.
    fn try_reserve_elements_at_back(&mut self, count: usize) -> Result<(), AllocError> {
        let vacancies = self.back_room();
        if count <= vacancies {
            return Ok(());
        }

        let new_nodes = (count - vacancies).div_ceil(Buffer::<T>::SIZE);
        self.try_reserve_map_at_back(new_nodes)?;

        for _ in 0..new_nodes {
            let buffer = self.alloc.allocate::<T>(Buffer::<T>::SIZE)?;
            // SAFETY: The map has room for new_nodes more slots after the last spare.
            unsafe { *self.finish.node.add(self.spare_back + 1) = buffer.as_ptr() };
            self.spare_back += 1;
        }
        Ok(())
    }

    /// Allocates spare buffers before start until at least `count` elements can be pushed onto
    /// the front.
    fn try_reserve_elements_at_front(&mut self, count: usize) -> Result<(), AllocError> {
        let vacancies = self.front_room();
        if count <= vacancies {
            return Ok(());
        }

        let new_nodes = (count - vacancies).div_ceil(Buffer::<T>::SIZE);
        self.try_reserve_map_at_front(new_nodes)?;

        for _ in 0..new_nodes {
            let buffer = self.alloc.allocate::<T>(Buffer::<T>::SIZE)?;
            // SAFETY: The map has room for new_nodes more slots before the first spare.
            unsafe { *self.start.node.sub(self.spare_front + 1) = buffer.as_ptr() };
            self.spare_front += 1;
        }
        Ok(())
    }

    fn try_reserve_map_at_back(&mut self, nodes_to_add: usize) -> Result<(), AllocError> {
        // SAFETY: The last spare is a slot within the map.
        let last_used = unsafe { self.finish.node.add(self.spare_back).offset_from(self.map.as_ptr()) };
        if nodes_to_add > self.map_size - last_used as usize - 1 {
            self.try_reallocate_map(nodes_to_add, false)?;
        }
        Ok(())
    }

    fn try_reserve_map_at_front(&mut self, nodes_to_add: usize) -> Result<(), AllocError> {
        // SAFETY: The first spare is a slot within the map.
        let first_used = unsafe { self.start.node.sub(self.spare_front).offset_from(self.map.as_ptr()) };
        if nodes_to_add > first_used as usize {
            self.try_reallocate_map(nodes_to_add, true)?;
        }
        Ok(())
    }

    /// Makes room in the map for `nodes_to_add` more buffers at one end, either by moving the used
    /// slots back to the center or by moving them into a larger map. Only buffer pointers are
    /// moved, never elements.
    fn try_reallocate_map(&mut self, nodes_to_add: usize, add_at_front: bool) -> Result<(), AllocError> {
        // SAFETY: Every slot touched is within the map, and the used slots are moved as a block,
        // so start and finish can be pointed at their new slots afterwards.
        unsafe {
            let first_used = self.start.node.sub(self.spare_front);
            let live_span = self.finish.node.offset_from(self.start.node) as usize;
            let used = live_span + 1 + self.spare_front + self.spare_back;
            let new_used = used.checked_add(nodes_to_add).ok_or(CapacityOverflow)?;
            let front_pad = if add_at_front { nodes_to_add } else { 0 };

            let new_first_used = if new_used.checked_mul(2).is_some_and(|twice| self.map_size > twice) {
                let offset = (self.map_size - new_used) / 2 + front_pad;
                let new_first_used = self.map.add(offset).as_ptr();
                ptr::copy(first_used, new_first_used, used);

                for i in (0..offset).chain(offset + used..self.map_size) {
                    self.map.add(i).write(ptr::null_mut());
                }

                trace!("recentered Deque map of {} slots", self.map_size);
                new_first_used
            } else {
                let new_map_size = self.map_size
                    .checked_add(cmp::max(self.map_size, nodes_to_add))
                    .and_then(|size| size.checked_add(2))
                    .ok_or(CapacityOverflow)?;
                let new_map = self.alloc.allocate::<*mut T>(new_map_size)?;
                for i in 0..new_map_size {
                    new_map.add(i).write(ptr::null_mut());
                }

                let new_first_used = new_map.add((new_map_size - new_used) / 2 + front_pad).as_ptr();
                ptr::copy_nonoverlapping(first_used, new_first_used, used);
                self.alloc.deallocate(self.map, self.map_size);

                debug!("grew Deque map from {} to {new_map_size} slots", self.map_size);
                self.map = new_map;
                self.map_size = new_map_size;
                new_first_used
            };

            let new_start_node = new_first_used.add(self.spare_front);
            self.start.set_node(new_start_node);
            self.finish.set_node(new_start_node.add(live_span));
        }
        Ok(())
    }

    /// Releases a single buffer.
    ///
    /// # Safety
    /// `buffer` must have been allocated by this Deque's allocator and hold no live values.
    unsafe fn free_buffer(&self, buffer: *mut T) {
        if let Some(buffer) = NonNull::new(buffer) {
            // SAFETY: Forwarded to the caller.
            unsafe { self.alloc.deallocate(buffer, Buffer::<T>::SIZE) }
        }
    }

    /// Releases every buffer and the map, without touching any values.
    ///
    /// # Safety
    /// The map must be allocated and no buffer may hold live values. The Deque must not be used
    /// again until it is reset.
    unsafe fn release_storage(&mut self) {
        // SAFETY: Every non-null slot holds a buffer from this allocator, as required by the
        // caller.
        unsafe {
            for i in 0..self.map_size {
                self.free_buffer(*self.map.add(i).as_ptr());
            }
            self.alloc.deallocate(self.map, self.map_size);
        }
    }

    /// Checks that `extra` more elements wouldn't exceed [`max_size`](Deque::max_size).
    fn check_new_len(&self, extra: usize) -> Result<(), AllocError> {
        match self.len().checked_add(extra) {
            Some(new_len) if new_len <= self.max_size() => Ok(()),
            _ => Err(CapacityOverflow.into()),
        }
    }

    fn check_pos(&self, index: usize) {
        let len = self.len();
        if index > len {
            Err(IndexOutOfBounds {
                index,
                len,
            }).throw()
        }
    }
}

impl<T: Clone, A: Allocator> Deque<T, A> {
    /// Inserts `count` clones of `value` at `index`. Commit-or-rollback: if a clone panics, the
    /// Deque holds the same elements as before.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the required memory layout exceeds [`isize::MAX`].
    pub fn insert_n(&mut self, index: usize, count: usize, value: &T) {
        // SAFETY: uninitialized_fill_n constructs count values or rolls back.
        unsafe {
            self.insert_with(index, count, |dest| {
                uninitialized_fill_n(dest, count, value);
            });
        }
    }

    /// Inserts a clone of every value in `values` at `index`. Commit-or-rollback: if a clone
    /// panics, the Deque holds the same elements as before.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the required memory layout exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::deque::Deque;
    /// let mut deque = Deque::from([1, 5]);
    /// deque.insert_slice(1, &[2, 3, 4]);
    /// assert!(deque.iter().eq(&[1, 2, 3, 4, 5]));
    /// ```
    pub fn insert_slice(&mut self, index: usize, values: &[T]) {
        // SAFETY: uninitialized_copy constructs values.len() values or rolls back.
        unsafe {
            self.insert_with(index, values.len(), |dest| {
                uninitialized_copy(values, dest);
            });
        }
    }

    /// Resizes the Deque to `new_len`, either dropping elements from the back or appending clones
    /// of `value`. Growing is commit-or-rollback.
    ///
    /// # Panics
    /// Panics if the required memory layout exceeds [`isize::MAX`].
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
        } else {
            self.insert_n(len, new_len - len, &value);
        }
    }
}

/// Moves the front elements back up if filling a gap opened by shifting them down panics.
struct UnshiftFront<T> {
    new_start: DequeCursor<T>,
    start: DequeCursor<T>,
    before: usize,
}

impl<T> Drop for UnshiftFront<T> {
    fn drop(&mut self) {
        // SAFETY: The before elements were moved from start to new_start and the gap after them
        // holds no live values.
        unsafe {
            let offset = self.before as isize;
            relocate_backward(self.new_start, self.new_start.offset(offset), self.start.offset(offset));
        }
    }
}

/// Moves the back elements down again if filling a gap opened by shifting them up panics.
struct UnshiftBack<T> {
    pos: DequeCursor<T>,
    gap_end: DequeCursor<T>,
    new_finish: DequeCursor<T>,
}

impl<T> Drop for UnshiftBack<T> {
    fn drop(&mut self) {
        // SAFETY: The elements after pos were moved to gap_end and the gap holds no live values.
        unsafe { relocate(self.gap_end, self.new_finish, self.pos) };
    }
}

/// Closes the gap left by [`Deque::erase_range`] once the erased values have been dropped, even if
/// dropping them panicked.
struct CloseGap<'a, T, A: Allocator> {
    deque: &'a mut Deque<T, A>,
    index: usize,
    count: usize,
}

impl<T, A: Allocator> Drop for CloseGap<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: The gap's values have all been dropped.
        unsafe { self.deque.close_gap(self.index, self.count) }
    }
}

/// Releases a Deque's storage once its values have been dropped, even if dropping them panicked.
struct ReleaseStorage<'a, T, A: Allocator>(&'a mut Deque<T, A>);

impl<T, A: Allocator> Drop for ReleaseStorage<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: The Deque is being dropped and its values have been.
        unsafe { self.0.release_storage() }
    }
}

impl<T, A: Allocator> Drop for Deque<T, A> {
    fn drop(&mut self) {
        if self.map_size == 0 {
            return;
        }

        let (start, finish) = (self.start, self.finish);
        let _release = ReleaseStorage(self);
        // SAFETY: Every position between start and finish holds a live value.
        unsafe { memory::destroy_between(start, finish) }
    }
}

impl<T, A: Allocator> Extend<T> for Deque<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Deque::new();
        deque.extend(iter);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    fn from(value: [T; N]) -> Self {
        let mut deque = Deque::with_cap(N);
        deque.extend(value);
        deque
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Index<usize> for Deque<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.at(index).throw()
    }
}

impl<T, A: Allocator> IndexMut<usize> for Deque<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.at_mut(index).throw()
    }
}

impl<T: Clone, A: Allocator> Clone for Deque<T, A> {
    fn clone(&self) -> Self {
        let len = self.len();
        let mut deque = Deque::with_cap_in(len, self.alloc.clone());
        if len == 0 {
            return deque;
        }

        // SAFETY: The new Deque has room for len values after finish. If a clone panics, the
        // values cloned so far are dropped and the empty Deque releases its storage.
        unsafe {
            let end = uninitialized_copy(self.iter(), deque.finish);
            deque.set_finish(end);
        }
        deque
    }
}

// SAFETY: A Deque exclusively owns its map and buffers, so it can be sent if its elements can.
unsafe impl<T: Send, A: Allocator + Send> Send for Deque<T, A> {}
// SAFETY: Deque's safe API obeys all rules of the borrow checker, so no interior mutability occurs.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Deque<T, A> {}

impl<T: PartialEq, A: Allocator> PartialEq for Deque<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for Deque<T, A> {}

impl<T: Hash, A: Allocator> Hash for Deque<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: Debug, A: Allocator> Debug for Deque<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deque")
            .field("contents", &DebugIter::new(self.iter()))
            .field("len", &self.len())
            .field("cap", &self.cap())
            .finish()
    }
}
