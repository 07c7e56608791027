use std::fmt::{self, Debug, Formatter};
use std::mem::{MaybeUninit, offset_of};
use std::ptr::NonNull;

/// A single link in a [`LinkedList`](super::LinkedList). The sentinel node shares this layout but
/// never holds a value.
pub(crate) struct Node<T> {
    pub(crate) prev: NodePtr<T>,
    pub(crate) next: NodePtr<T>,
    pub(crate) value: MaybeUninit<T>,
}

/// A non-owning pointer to a [`Node`]. Nodes are owned by their list, which frees them through its
/// allocator.
pub(crate) struct NodePtr<T>(pub(crate) NonNull<Node<T>>);

impl<T> NodePtr<T> {
    /// # Safety
    /// The node must be allocated.
    pub(crate) const unsafe fn next(self) -> NodePtr<T> {
        // SAFETY: The caller ensures that the node is allocated.
        unsafe { (*self.0.as_ptr()).next }
    }

    /// # Safety
    /// The node must be allocated.
    pub(crate) const unsafe fn prev(self) -> NodePtr<T> {
        // SAFETY: The caller ensures that the node is allocated.
        unsafe { (*self.0.as_ptr()).prev }
    }

    /// # Safety
    /// The node must be allocated.
    pub(crate) unsafe fn set_next(self, next: NodePtr<T>) {
        // SAFETY: The caller ensures that the node is allocated.
        unsafe { (*self.0.as_ptr()).next = next }
    }

    /// # Safety
    /// The node must be allocated.
    pub(crate) unsafe fn set_prev(self, prev: NodePtr<T>) {
        // SAFETY: The caller ensures that the node is allocated.
        unsafe { (*self.0.as_ptr()).prev = prev }
    }

    /// Returns a pointer to the node's value slot, without reading anything.
    pub(crate) const fn value_ptr(self) -> *mut T {
        self.0.as_ptr().cast::<u8>().wrapping_add(offset_of!(Node<T>, value)).cast()
    }

    /// # Safety
    /// The node must hold a live value, which must outlive `'a` without being mutated.
    pub(crate) const unsafe fn value<'a>(self) -> &'a T {
        // SAFETY: Forwarded to the caller.
        unsafe { &*self.value_ptr() }
    }

    /// # Safety
    /// The node must hold a live value, which must outlive `'a` without being aliased.
    pub(crate) const unsafe fn value_mut<'a>(self) -> &'a mut T {
        // SAFETY: Forwarded to the caller.
        unsafe { &mut *self.value_ptr() }
    }

    /// Links this node into a chain, directly before `next`.
    ///
    /// # Safety
    /// Both nodes must be allocated, and self must not currently be linked into any chain.
    pub(crate) unsafe fn link_before(self, next: NodePtr<T>) {
        // SAFETY: Forwarded to the caller.
        unsafe {
            let prev = next.prev();
            self.set_prev(prev);
            self.set_next(next);
            prev.set_next(self);
            next.set_prev(self);
        }
    }

    /// Removes this node from its chain, joining its neighbours. The node's own links are left
    /// dangling.
    ///
    /// # Safety
    /// The node must be linked into a chain.
    pub(crate) unsafe fn unlink(self) {
        // SAFETY: Forwarded to the caller.
        unsafe {
            let prev = self.prev();
            let next = self.next();
            prev.set_next(next);
            next.set_prev(prev);
        }
    }
}

/// Moves the nodes in `[first, last)` out of their chain and links them directly before `pos`.
/// Nothing is constructed, destroyed or allocated.
///
/// # Safety
/// All three nodes must be linked into circular chains, `last` must be reachable from `first` and
/// `pos` must not be within `[first, last)`.
pub(crate) unsafe fn transfer<T>(pos: NodePtr<T>, first: NodePtr<T>, last: NodePtr<T>) {
    if first == last || pos == last {
        return;
    }

    // SAFETY: Forwarded to the caller.
    unsafe {
        let last_included = last.prev();

        let before_first = first.prev();
        before_first.set_next(last);
        last.set_prev(before_first);

        let before_pos = pos.prev();
        before_pos.set_next(first);
        first.set_prev(before_pos);
        last_included.set_next(pos);
        pos.set_prev(last_included);
    }
}

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodePtr<T> {}

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for NodePtr<T> {}

impl<T> Debug for NodePtr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NodePtr({:?})", self.0)
    }
}
