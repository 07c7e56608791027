use std::fmt::{self, Debug, Formatter};
use std::ptr;

use super::{Link, bucket_index, value_ptr};
use crate::iter::{Category, RawCursor};

/// A raw forward position within a [`HashTable`](super::HashTable), referring either to an element
/// or to the table's end.
///
/// Stepping follows the current chain and then scans forward through the bucket array for the next
/// non-empty bucket. A HashPosition survives insertions that don't rehash and the removal of other
/// elements. Rehashing replaces the bucket array, which invalidates every position (including the
/// end) without this being checked.
pub struct HashPosition<V> {
    pub(crate) node: Link<V>,
    pub(crate) buckets: *const Link<V>,
    pub(crate) bucket_count: usize,
}

impl<V> HashPosition<V> {
    pub(crate) const fn new(
        node: Link<V>,
        buckets: *const Link<V>,
        bucket_count: usize,
    ) -> HashPosition<V> {
        HashPosition {
            node,
            buckets,
            bucket_count,
        }
    }

    /// Returns true if this is the end position, which doesn't refer to any element.
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns a reference to the element at this position.
    ///
    /// # Safety
    /// The position must refer to a live element (not the end) which isn't mutated for `'a`.
    pub unsafe fn get<'a>(self) -> &'a V {
        // SAFETY: Forwarded to the caller.
        unsafe { &*self.ptr() }
    }

    /// Returns a mutable reference to the element at this position. Changing the key of the
    /// element in a way that alters its hash or equality is a logic error.
    ///
    /// # Safety
    /// The position must refer to a live element (not the end) which isn't otherwise borrowed for
    /// `'a`.
    pub unsafe fn get_mut<'a>(self) -> &'a mut V {
        // SAFETY: Forwarded to the caller.
        unsafe { &mut *self.ptr() }
    }
}

impl<V> Clone for HashPosition<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for HashPosition<V> {}

impl<V> PartialEq for HashPosition<V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<V> Eq for HashPosition<V> {}

impl<V> Debug for HashPosition<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashPosition").field(&self.node).finish()
    }
}

// SAFETY: Chains only link forwards and nodes aren't contiguous.
unsafe impl<V> RawCursor for HashPosition<V> {
    type Item = V;

    const CATEGORY: Category = Category::Forward;

    fn ptr(&self) -> *mut V {
        match self.node {
            Some(node) => value_ptr(node),
            None => ptr::null_mut(),
        }
    }

    unsafe fn step(&mut self) {
        let Some(node) = self.node else { return };
        // SAFETY: The caller ensures that the node and the bucket array are still allocated.
        unsafe {
            self.node = (*node.as_ptr()).next;
            if self.node.is_some() {
                return;
            }

            let mut bucket = bucket_index((*node.as_ptr()).hash, self.bucket_count) + 1;
            while bucket < self.bucket_count {
                if let Some(head) = *self.buckets.add(bucket) {
                    self.node = Some(head);
                    return;
                }
                bucket += 1;
            }
        }
    }
}
