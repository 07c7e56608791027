use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::ptr;

use crate::iter::{BidirectionalCursor, Category, RandomAccessCursor, RawCursor};

/// The number of bytes that each Deque buffer aims to fill.
const BUFFER_BYTES: usize = 512;

/// The fixed number of elements in every buffer of a `Deque<T>`.
pub(crate) struct Buffer<T>(PhantomData<T>);

impl<T> Buffer<T> {
    pub(crate) const SIZE: usize = {
        assert!(size_of::<T>() != 0, "Deque doesn't support zero sized types");
        if size_of::<T>() < BUFFER_BYTES {
            BUFFER_BYTES / size_of::<T>()
        } else {
            1
        }
    };
}

/// A raw random access position within a [`Deque`](super::Deque).
///
/// A DequeCursor remembers the buffer that it points into (`first` and `last`) and the map slot
/// that refers to that buffer (`node`), so that stepping past either end of the buffer can move to
/// the neighbouring buffer through the map.
///
/// Like every cursor, this is a non-owning back reference. Any operation that reallocates the map
/// or moves elements invalidates it, and nothing checks that.
pub struct DequeCursor<T> {
    pub(crate) cur: *mut T,
    pub(crate) first: *mut T,
    pub(crate) last: *mut T,
    pub(crate) node: *mut *mut T,
}

impl<T> DequeCursor<T> {
    /// A cursor that doesn't point into any storage. Used before a Deque has allocated its map.
    pub(crate) const fn null() -> DequeCursor<T> {
        DequeCursor {
            cur: ptr::null_mut(),
            first: ptr::null_mut(),
            last: ptr::null_mut(),
            node: ptr::null_mut(),
        }
    }

    /// Moves to the buffer referenced by `new_node`, leaving `cur` untouched.
    ///
    /// # Safety
    /// `new_node` must be a slot within the map. The slot may be null, in which case the cursor
    /// can't be dereferenced until it moves again.
    pub(crate) unsafe fn set_node(&mut self, new_node: *mut *mut T) {
        self.node = new_node;
        // SAFETY: The caller ensures that new_node is a slot within the map.
        self.first = unsafe { *new_node };
        self.last = self.first.wrapping_add(Buffer::<T>::SIZE);
    }

    /// Returns the cursor moved by `count` positions.
    ///
    /// # Safety
    /// See [`RandomAccessCursor::jump`].
    pub(crate) unsafe fn offset(mut self, count: isize) -> DequeCursor<T> {
        // SAFETY: Forwarded to the caller.
        unsafe { self.jump(count) };
        self
    }
}

impl<T> Clone for DequeCursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DequeCursor<T> {}

impl<T> PartialEq for DequeCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl<T> Eq for DequeCursor<T> {}

impl<T> Debug for DequeCursor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DequeCursor")
            .field("cur", &self.cur)
            .field("first", &self.first)
            .field("last", &self.last)
            .field("node", &self.node)
            .finish()
    }
}

// SAFETY: Stepping moves between buffers, so the cursor isn't contiguous. All three tiers are
// implemented below.
unsafe impl<T> RawCursor for DequeCursor<T> {
    type Item = T;

    const CATEGORY: Category = Category::RandomAccess;

    fn ptr(&self) -> *mut T {
        self.cur
    }

    unsafe fn step(&mut self) {
        // SAFETY: The cursor refers to an element, so cur + 1 is at most the end of its buffer. If
        // it reaches the end, the next map slot holds the buffer of the following position.
        unsafe {
            self.cur = self.cur.add(1);
            if self.cur == self.last {
                self.set_node(self.node.add(1));
                self.cur = self.first;
            }
        }
    }

    unsafe fn advance_by(&mut self, count: usize) {
        // SAFETY: Forwarded to the caller.
        unsafe { self.jump(count as isize) }
    }

    unsafe fn distance_to(&self, last: &Self) -> usize {
        // SAFETY: Forwarded to the caller.
        unsafe { last.diff(self) as usize }
    }
}

// SAFETY: See the RawCursor implementation.
unsafe impl<T> BidirectionalCursor for DequeCursor<T> {
    unsafe fn step_back(&mut self) {
        // SAFETY: The cursor isn't at the first position, so if it is at the start of its buffer,
        // the previous map slot holds the buffer of the preceding position.
        unsafe {
            if self.cur == self.first {
                self.set_node(self.node.sub(1));
                self.cur = self.last;
            }
            self.cur = self.cur.sub(1);
        }
    }

    unsafe fn retreat_by(&mut self, count: usize) {
        // SAFETY: Forwarded to the caller.
        unsafe { self.jump(-(count as isize)) }
    }
}

// SAFETY: See the RawCursor implementation.
unsafe impl<T> RandomAccessCursor for DequeCursor<T> {
    unsafe fn jump(&mut self, count: isize) {
        if count == 0 {
            return;
        }

        let size = Buffer::<T>::SIZE as isize;
        // SAFETY: cur and first are within the same buffer.
        let offset = count + unsafe { self.cur.offset_from(self.first) };

        if (0..size).contains(&offset) {
            // SAFETY: The result stays within the current buffer.
            self.cur = unsafe { self.cur.offset(count) };
            return;
        }

        let node_offset = if offset > 0 {
            offset / size
        } else {
            -((-offset - 1) / size) - 1
        };
        // SAFETY: The caller ensures that the resulting position is within the Deque, so both the
        // map slot and the offset within its buffer are in bounds.
        unsafe {
            self.set_node(self.node.offset(node_offset));
            self.cur = self.first.offset(offset - node_offset * size);
        }
    }

    unsafe fn diff(&self, origin: &Self) -> isize {
        if self.cur == origin.cur {
            return 0;
        }

        // SAFETY: Both cursors point into buffers referenced by the same map, as required by the
        // caller.
        unsafe {
            if self.node == origin.node {
                return self.cur.offset_from(origin.cur);
            }

            Buffer::<T>::SIZE as isize * (self.node.offset_from(origin.node) - 1)
                + self.cur.offset_from(self.first)
                + origin.last.offset_from(origin.cur)
        }
    }
}
