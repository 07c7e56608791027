use std::fmt::{self, Debug, Formatter};

use super::NodePtr;
use crate::iter::{BidirectionalCursor, Category, RawCursor};

/// A raw bidirectional position within a [`LinkedList`](super::LinkedList), referring either to an
/// element or to the list's end.
///
/// Unlike positions in contiguous collections, a ListPosition stays valid across insertions,
/// removals and splices of other nodes, including splicing its own node into another list. It is
/// only invalidated when the node that it refers to is erased or its list is dropped, neither of
/// which is checked.
pub struct ListPosition<T> {
    pub(crate) node: NodePtr<T>,
}

impl<T> ListPosition<T> {
    pub(crate) const fn new(node: NodePtr<T>) -> ListPosition<T> {
        ListPosition { node }
    }

    /// Returns a reference to the element at this position.
    ///
    /// # Safety
    /// The position must refer to a live element (not the end) which isn't mutated for `'a`.
    pub unsafe fn get<'a>(self) -> &'a T {
        // SAFETY: Forwarded to the caller.
        unsafe { self.node.value() }
    }

    /// Returns a mutable reference to the element at this position.
    ///
    /// # Safety
    /// The position must refer to a live element (not the end) which isn't otherwise borrowed for
    /// `'a`.
    pub unsafe fn get_mut<'a>(self) -> &'a mut T {
        // SAFETY: Forwarded to the caller.
        unsafe { self.node.value_mut() }
    }
}

impl<T> Clone for ListPosition<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListPosition<T> {}

impl<T> PartialEq for ListPosition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for ListPosition<T> {}

impl<T> Debug for ListPosition<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListPosition").field(&self.node.0).finish()
    }
}

// SAFETY: Nodes are linked in both directions, but not contiguous.
unsafe impl<T> RawCursor for ListPosition<T> {
    type Item = T;

    const CATEGORY: Category = Category::Bidirectional;

    fn ptr(&self) -> *mut T {
        self.node.value_ptr()
    }

    unsafe fn step(&mut self) {
        // SAFETY: The caller ensures that the node is still allocated.
        self.node = unsafe { self.node.next() };
    }
}

// SAFETY: See the RawCursor implementation.
unsafe impl<T> BidirectionalCursor for ListPosition<T> {
    unsafe fn step_back(&mut self) {
        // SAFETY: The caller ensures that the node is still allocated.
        self.node = unsafe { self.node.prev() };
    }
}
