use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use super::{Iter, IterMut, ListPosition, Node, NodePtr, transfer};
use crate::collections::contiguous::Vector;
use crate::memory::{self, Allocator, Global};
#[doc(inline)]
pub use crate::util::error::IndexOutOfBounds;
use crate::util::fmt::DebugIter;
use crate::util::result::{AllocResultExtension, ResultExtension};

/// A circular list with links in both directions, anchored by a sentinel node which marks the end.
///
/// Every element lives in its own node, allocated from the list's [`Allocator`]. Because nodes
/// never move, a [`ListPosition`] stays valid until its own node is erased, and splicing between
/// lists is pure pointer surgery.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the LinkedList.
/// - `i`: The index of the item in question.
/// - `m`: The number of items in the other list.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)` |
/// | `pop_front/back` | `O(1)` |
/// | `insert_before/erase` | `O(1)` |
/// | `get` | `O(min(i, n-i))` |
/// | `insert` | `O(min(i, n-i))` |
/// | `remove` | `O(min(i, n-i))` |
/// | `append` | `O(1)` |
/// | `merge` | `O(n+m)` |
/// | `sort` | `O(n log n)` |
/// | `contains` | `O(n)` |
///
/// As a general note, modern computer architecture isn't kind to linked lists, (or more
/// importantly, favours contiguous collections) because all `O(i)` or `O(n)` operations will
/// consist primarily of cache misses. For this reason, [`Vector`] should be preferred for most
/// applications unless the position based `O(1)` methods are being heavily utilized.
pub struct LinkedList<T, A: Allocator = Global> {
    pub(crate) sentinel: NodePtr<T>,
    pub(crate) len: usize,
    pub(crate) alloc: A,
}

impl<T> LinkedList<T> {
    /// Creates a new LinkedList with no elements. Only the sentinel node is allocated.
    pub fn new() -> LinkedList<T> {
        LinkedList::new_in(Global)
    }
}

impl<T, A: Allocator> LinkedList<T, A> {
    /// Creates a new LinkedList with no elements, allocating from `alloc`.
    pub fn new_in(alloc: A) -> LinkedList<T, A> {
        let ptr = alloc.allocate::<Node<T>>(1).or_handle();
        // SAFETY: The node was just allocated. The sentinel links to itself and holds no value.
        unsafe {
            ptr.write(Node {
                prev: NodePtr(ptr),
                next: NodePtr(ptr),
                value: MaybeUninit::uninit(),
            });
        }

        LinkedList {
            sentinel: NodePtr(ptr),
            len: 0,
            alloc,
        }
    }

    /// Returns the length of the LinkedList.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the LinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the allocator that the LinkedList allocates nodes from.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: The list isn't empty, so the node after the sentinel holds a value.
        (!self.is_empty()).then(|| unsafe { self.sentinel.next().value() })
    }

    /// Returns a mutable reference to the first element in the list, if it exists.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: The list isn't empty, so the node after the sentinel holds a value.
        (!self.is_empty()).then(|| unsafe { self.sentinel.next().value_mut() })
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: The list isn't empty, so the node before the sentinel holds a value.
        (!self.is_empty()).then(|| unsafe { self.sentinel.prev().value() })
    }

    /// Returns a mutable reference to the last element in the list, if it exists.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: The list isn't empty, so the node before the sentinel holds a value.
        (!self.is_empty()).then(|| unsafe { self.sentinel.prev().value_mut() })
    }

    /// Add the provided element to the front of the LinkedList.
    pub fn push_front(&mut self, value: T) {
        // SAFETY: The position after the sentinel belongs to this list.
        unsafe { self.insert_before(self.begin(), value) };
    }

    /// Add the provided element to the back of the LinkedList.
    pub fn push_back(&mut self, value: T) {
        // SAFETY: The end position belongs to this list.
        unsafe { self.insert_before(self.end(), value) };
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: The list isn't empty, so the first position refers to an element.
        Some(unsafe { self.erase(self.begin()) })
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: The list isn't empty, so the node before the sentinel holds a value.
        Some(unsafe { self.erase(ListPosition::new(self.sentinel.prev())) })
    }

    /// Returns the position of the first element, or the end position if the list is empty.
    pub fn begin(&self) -> ListPosition<T> {
        // SAFETY: The sentinel is allocated for as long as the list is.
        ListPosition::new(unsafe { self.sentinel.next() })
    }

    /// Returns the end position, which refers to the sentinel rather than an element. It remains
    /// valid for the lifetime of the list.
    pub const fn end(&self) -> ListPosition<T> {
        ListPosition::new(self.sentinel)
    }

    /// Returns the position of the element at `index`, or the end position if `index == len`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index > len`.
    pub fn position(&self, index: usize) -> Result<ListPosition<T>, IndexOutOfBounds> {
        if index > self.len {
            return Err(IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(ListPosition::new(self.seek(index)))
    }

    /// Inserts `value` directly before `pos`, returning the position of the new element.
    ///
    /// # Safety
    /// `pos` must be a valid position within this list (the end position is allowed).
    pub unsafe fn insert_before(&mut self, pos: ListPosition<T>, value: T) -> ListPosition<T> {
        let node = self.create_node(value);
        // SAFETY: The new node is unlinked and pos is linked into this list.
        unsafe { node.link_before(pos.node) };
        self.len += 1;
        ListPosition::new(node)
    }

    /// Removes the element at `pos` and returns it. Every other position remains valid.
    ///
    /// # Safety
    /// `pos` must refer to an element of this list (not the end position).
    pub unsafe fn erase(&mut self, pos: ListPosition<T>) -> T {
        // SAFETY: pos refers to a linked node holding a value, as required by the caller.
        unsafe {
            pos.node.unlink();
            self.len -= 1;
            self.take_node(pos.node)
        }
    }

    /// Moves the elements in `[first, last)` from `other` into this list, directly before `pos`.
    /// No element is constructed or destroyed and positions to the moved elements stay valid.
    ///
    /// Both lengths are updated before this returns. Counting the moved elements takes
    /// `O(distance(first, last))`.
    ///
    /// # Safety
    /// `pos` must be a valid position in this list and `[first, last)` must be a valid range in
    /// `other`. The lists' allocators must be able to release each other's nodes. To move a range
    /// within one list, use [`splice_within`](Self::splice_within).
    pub unsafe fn splice(
        &mut self,
        pos: ListPosition<T>,
        other: &mut LinkedList<T, A>,
        first: ListPosition<T>,
        last: ListPosition<T>,
    ) {
        // SAFETY: Forwarded to the caller.
        unsafe {
            let count = crate::iter::distance(first, last);
            transfer(pos.node, first.node, last.node);
            other.len -= count;
            self.len += count;
        }
    }

    /// Moves the elements in `[first, last)` of this list directly before `pos`, relinking them in
    /// `O(1)`. The length is unchanged and every position stays valid.
    ///
    /// # Safety
    /// `pos` and `[first, last)` must be a valid position and range in this list, and `pos` must
    /// not be within `(first, last)`. `pos == first` or `pos == last` leaves the list unchanged.
    pub unsafe fn splice_within(
        &mut self,
        pos: ListPosition<T>,
        first: ListPosition<T>,
        last: ListPosition<T>,
    ) {
        if pos == first {
            return;
        }
        // SAFETY: Forwarded to the caller. The range is unlinked before being linked in front of
        // pos, which lies outside it.
        unsafe { transfer(pos.node, first.node, last.node) }
    }

    /// Moves every element of `other` into this list before `index`, leaving `other` empty.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn splice_all(&mut self, index: usize, other: &mut LinkedList<T, A>) {
        let pos = self.position(index).throw();
        // SAFETY: pos belongs to this list and other's whole range is moved, so pos can't be
        // within it.
        unsafe { transfer(pos.node, other.sentinel.next(), other.sentinel) };
        self.len += mem::take(&mut other.len);
    }

    /// Moves every element of `other` onto the back of this list, leaving `other` empty.
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::linked::LinkedList;
    /// let mut a: LinkedList<_> = [1, 2].into_iter().collect();
    /// let mut b: LinkedList<_> = [3, 4].into_iter().collect();
    /// a.append(&mut b);
    /// assert!(a.iter().eq(&[1, 2, 3, 4]));
    /// assert!(b.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut LinkedList<T, A>) {
        self.splice_all(self.len, other);
    }

    /// Splits the list at `index`, returning a new list holding the elements from `index` onwards.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn split_off(&mut self, index: usize) -> LinkedList<T, A> {
        let pos = self.position(index).throw();
        let mut tail = LinkedList::new_in(self.alloc.clone());
        // SAFETY: [pos, end) is a valid range of this list, moved into a different list.
        unsafe { transfer(tail.sentinel, pos.node, self.sentinel) };
        tail.len = self.len - index;
        self.len = index;
        tail
    }

    /// Returns a reference to the element at the provided `index`, panicking on a failure.
    ///
    /// The same functionality can be achieved using the [`Index`] operator.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the LinkedList.
    pub fn get(&self, index: usize) -> &T {
        self.try_get(index).throw()
    }

    /// Returns a reference to the element at the provided `index`, returning an [`Err`] on a
    /// failure rather than panicking.
    pub fn try_get(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        // SAFETY: The index is checked, so the node holds a value.
        Ok(unsafe { self.checked_seek(index)?.value() })
    }

    /// Returns a mutable reference to the element at the provided `index`, panicking on a failure.
    ///
    /// The same functionality can be achieved using the [`IndexMut`] operator.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the LinkedList.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.try_get_mut(index).throw()
    }

    /// Returns a mutable reference to the element at the provided `index`, returning an [`Err`] on
    /// a failure rather than panicking.
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        // SAFETY: The index is checked, so the node holds a value.
        Ok(unsafe { self.checked_seek(index)?.value_mut() })
    }

    /// Inserts `value` at `index`, so that it ends up at that index.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).throw()
    }

    /// Inserts `value` at `index`, returning an [`Err`] rather than panicking if `index > len`. The
    /// value is dropped in that case.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), IndexOutOfBounds> {
        let pos = self.position(index)?;
        // SAFETY: The position was just looked up in this list.
        unsafe { self.insert_before(pos, value) };
        Ok(())
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).throw()
    }

    /// Removes and returns the element at `index`, returning an [`Err`] rather than panicking if
    /// `index` is out of bounds.
    pub fn try_remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        let node = self.checked_seek(index)?;
        // SAFETY: The index is checked, so the node holds a value.
        Ok(unsafe { self.erase(ListPosition::new(node)) })
    }

    /// Replaces the element at `index` with `new_value`, returning the old one.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.try_replace(index, new_value).throw()
    }

    /// Replaces the element at `index` with `new_value`, returning the old one or an [`Err`] if
    /// `index` is out of bounds.
    pub fn try_replace(&mut self, index: usize, new_value: T) -> Result<T, IndexOutOfBounds> {
        Ok(mem::replace(self.try_get_mut(index)?, new_value))
    }

    /// Shortens the list to `len` by dropping elements from the back. Does nothing if the list is
    /// already shorter.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Drops every element. The sentinel stays allocated.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the list to `new_len`, either dropping elements from the back or appending values
    /// returned by `f`.
    ///
    /// # Panics
    /// If `f` panics, the elements appended before it remain in the list.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) {
        self.truncate(new_len);
        while self.len < new_len {
            let node = self.create_node_with(&mut f);
            // SAFETY: The new node is unlinked and the sentinel belongs to this list.
            unsafe { node.link_before(self.sentinel) };
            self.len += 1;
        }
    }

    /// Reverses the order of the elements by swapping the links of every node. No element is
    /// moved.
    pub fn reverse(&mut self) {
        let mut node = self.sentinel;
        loop {
            // SAFETY: Every node in the chain is allocated, including the sentinel.
            unsafe {
                let next = node.next();
                node.set_next(node.prev());
                node.set_prev(next);
                node = next;
            }
            if node == self.sentinel {
                break;
            }
        }
    }

    /// Removes every element for which `predicate` returns true.
    ///
    /// # Panics
    /// If `predicate` panics, the elements removed before it stay removed.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, mut predicate: F) {
        let mut pos = self.begin();
        while pos != self.end() {
            // SAFETY: pos refers to an element of this list. Its successor is read before it can
            // be erased.
            unsafe {
                let next = ListPosition::new(pos.node.next());
                if predicate(pos.get()) {
                    drop(self.erase(pos));
                }
                pos = next;
            }
        }
    }

    /// Removes every element equal to `value`.
    pub fn remove_value(&mut self, value: &T)
    where
        T: PartialEq,
    {
        self.remove_if(|item| item == value)
    }

    /// Removes consecutive elements for which `same` returns true, keeping the first of each run.
    /// `same` is called with the last kept element and the element being considered.
    ///
    /// # Examples
    /// ```
    /// # use raw_collections::collections::linked::LinkedList;
    /// let mut list: LinkedList<_> = [1, 1, 2, 3, 3, 3, 1].into_iter().collect();
    /// list.unique_by(|a, b| a == b);
    /// assert!(list.iter().eq(&[1, 2, 3, 1]));
    /// ```
    pub fn unique_by<F: FnMut(&T, &T) -> bool>(&mut self, mut same: F) {
        if self.len < 2 {
            return;
        }

        let mut kept = self.begin();
        // SAFETY: kept refers to an element, so its successor is a valid position.
        let mut pos = ListPosition::new(unsafe { kept.node.next() });
        while pos != self.end() {
            // SAFETY: Both positions refer to elements of this list. pos's successor is read
            // before it can be erased.
            unsafe {
                let next = ListPosition::new(pos.node.next());
                if same(kept.get(), pos.get()) {
                    drop(self.erase(pos));
                } else {
                    kept = pos;
                }
                pos = next;
            }
        }
    }

    /// Removes consecutive equal elements, keeping the first of each run.
    pub fn unique(&mut self)
    where
        T: PartialEq,
    {
        self.unique_by(|a, b| a == b)
    }

    /// Merges `other` into this list, assuming that both are sorted such that `less` never returns
    /// true for an element and one that precedes it. The result is sorted and stable: equal
    /// elements from this list come before those from `other`. `other` is left empty.
    ///
    /// Whenever an element of `other` belongs before the current element of this list, the whole
    /// run of such elements is moved in a single splice, so only `O(n+m)` comparisons and pointer
    /// updates happen.
    ///
    /// # Panics
    /// If `less` panics, every element is in exactly one of the two lists and both lengths are
    /// correct.
    pub fn merge_by<F: FnMut(&T, &T) -> bool>(&mut self, other: &mut LinkedList<T, A>, mut less: F) {
        let end = self.sentinel;
        let other_end = other.sentinel;

        // SAFETY: All nodes visited belong to one of the two lists, and values are only read from
        // nodes other than the sentinels.
        unsafe {
            let mut first = self.sentinel.next();
            let mut other_first = other.sentinel.next();

            while first != end && other_first != other_end {
                if less(other_first.value(), first.value()) {
                    let mut run_end = other_first.next();
                    let mut run = 1;
                    while run_end != other_end && less(run_end.value(), first.value()) {
                        run_end = run_end.next();
                        run += 1;
                    }

                    transfer(first, other_first, run_end);
                    other.len -= run;
                    self.len += run;
                    other_first = run_end;
                } else {
                    first = first.next();
                }
            }
        }

        self.append(other);
    }

    /// Merges `other` into this list, assuming that both are sorted in ascending order.
    pub fn merge(&mut self, other: &mut LinkedList<T, A>)
    where
        T: Ord,
    {
        self.merge_by(other, |a, b| a < b)
    }

    /// Sorts the list with `compare`, keeping equal elements in their original order. Only links
    /// are changed, so positions remain valid.
    ///
    /// # Panics
    /// If `compare` panics, the list is left unchanged.
    pub fn sort_by<F: FnMut(&T, &T) -> Ordering>(&mut self, mut compare: F) {
        if self.len < 2 {
            return;
        }

        let mut nodes: Vector<NodePtr<T>> = Vector::with_cap(self.len);
        // SAFETY: Every node other than the sentinel holds a value. The chain is only relinked
        // once sorting has finished, so a panic leaves it untouched.
        unsafe {
            let mut node = self.sentinel.next();
            while node != self.sentinel {
                nodes.push(node);
                node = node.next();
            }

            nodes.sort_by(|a, b| compare(a.value(), b.value()));

            let mut prev = self.sentinel;
            for &node in nodes.iter() {
                prev.set_next(node);
                node.set_prev(prev);
                prev = node;
            }
            prev.set_next(self.sentinel);
            self.sentinel.set_prev(prev);
        }
    }

    /// Sorts the list in ascending order, keeping equal elements in their original order.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }

    /// Returns the node at `index`, or the sentinel if `index == len`. Walks from whichever end is
    /// closer.
    pub(crate) fn seek(&self, index: usize) -> NodePtr<T> {
        debug_assert!(index <= self.len);

        // SAFETY: Every step stays within the circular chain.
        unsafe {
            if index < self.len / 2 {
                let mut node = self.sentinel.next();
                for _ in 0..index {
                    node = node.next();
                }
                node
            } else {
                let mut node = self.sentinel;
                for _ in index..self.len {
                    node = node.prev();
                }
                node
            }
        }
    }

    pub(crate) fn checked_seek(&self, index: usize) -> Result<NodePtr<T>, IndexOutOfBounds> {
        if index >= self.len {
            return Err(IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(self.seek(index))
    }

    /// Allocates an unlinked node holding `value`.
    fn create_node(&self, value: T) -> NodePtr<T> {
        let ptr = self.alloc.allocate::<Node<T>>(1).or_handle();
        // SAFETY: The node was just allocated.
        unsafe {
            ptr.write(Node {
                prev: NodePtr(ptr),
                next: NodePtr(ptr),
                value: MaybeUninit::new(value),
            });
        }
        NodePtr(ptr)
    }

    /// Allocates an unlinked node holding the value returned by `f`. If `f` panics, the node is
    /// released again.
    fn create_node_with<F: FnOnce() -> T>(&self, f: F) -> NodePtr<T> {
        let ptr = self.alloc.allocate::<Node<T>>(1).or_handle();
        let node = NodePtr(ptr);

        struct FreeNode<'a, T, A: Allocator> {
            alloc: &'a A,
            ptr: NonNull<Node<T>>,
        }

        impl<T, A: Allocator> Drop for FreeNode<'_, T, A> {
            fn drop(&mut self) {
                // SAFETY: The node was allocated from alloc and holds no value.
                unsafe { self.alloc.deallocate(self.ptr, 1) }
            }
        }

        let guard = FreeNode {
            alloc: &self.alloc,
            ptr,
        };
        // SAFETY: The value slot belongs to the freshly allocated node.
        unsafe { memory::construct_with(NonNull::new_unchecked(node.value_ptr()), f) };
        mem::forget(guard);

        // SAFETY: The node is allocated.
        unsafe {
            node.set_prev(node);
            node.set_next(node);
        }
        node
    }

    /// Moves the value out of an unlinked node and releases the node.
    ///
    /// # Safety
    /// The node must hold a value, be allocated by this list's allocator and no longer be linked.
    unsafe fn take_node(&self, node: NodePtr<T>) -> T {
        // SAFETY: Forwarded to the caller.
        unsafe {
            let value = node.value_ptr().read();
            self.alloc.deallocate(node.0, 1);
            value
        }
    }

    /// Checks that every link is mirrored by a link in the other direction and that the chain
    /// holds exactly len nodes.
    #[cfg(test)]
    pub(crate) fn verify_links(&self) {
        let mut count = 0;
        let mut node = self.sentinel;
        // SAFETY: Every node in the chain is allocated.
        unsafe {
            loop {
                let next = node.next();
                assert!(next.prev() == node, "Links should be mirrored.");
                node = next;
                if node == self.sentinel {
                    break;
                }
                count += 1;
            }
        }
        assert_eq!(count, self.len, "The chain should hold len elements.");
    }
}

impl<T: Clone, A: Allocator> LinkedList<T, A> {
    /// Resizes the list to `new_len`, either dropping elements from the back or appending clones of
    /// `value`.
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.resize_with(new_len, || value.clone())
    }
}

impl<T: PartialEq, A: Allocator> LinkedList<T, A> {
    /// Returns the index of the first element equal to `item`, if there is one.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|element| element == item)
    }

    /// Returns true if the list contains an element equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|element| element == item)
    }
}

/// Finishes dropping a list if one of its elements panics while being dropped, then releases the
/// sentinel.
struct DropGuard<'a, T, A: Allocator>(&'a mut LinkedList<T, A>);

impl<T, A: Allocator> Drop for DropGuard<'_, T, A> {
    fn drop(&mut self) {
        while self.0.pop_front().is_some() {}
        // SAFETY: The list is empty, so the sentinel is the only remaining node.
        unsafe { self.0.alloc.deallocate(self.0.sentinel.0, 1) }
    }
}

impl<T, A: Allocator> Drop for LinkedList<T, A> {
    fn drop(&mut self) {
        let guard = DropGuard(self);
        while guard.0.pop_front().is_some() {}
    }
}

impl<T, A: Allocator> Index<usize> for LinkedList<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
    }
}

impl<T, A: Allocator> IndexMut<usize> for LinkedList<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index)
    }
}

impl<T, A: Allocator> Extend<T> for LinkedList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for LinkedList<T> {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: Allocator> Clone for LinkedList<T, A> {
    fn clone(&self) -> Self {
        let mut list = LinkedList::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }
}

// SAFETY: A LinkedList exclusively owns its nodes, so it can be sent if its elements can.
unsafe impl<T: Send, A: Allocator + Send> Send for LinkedList<T, A> {}
// SAFETY: LinkedList's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for LinkedList<T, A> {}

impl<T: PartialEq, A: Allocator> PartialEq for LinkedList<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for LinkedList<T, A> {}

impl<T: Hash, A: Allocator> Hash for LinkedList<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for item in self.iter() {
            item.hash(state);
        }
        // Terminate variable length hashing sequence.
        0xFF.hash(state);
    }
}

impl<T: Debug, A: Allocator> Debug for LinkedList<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedList")
            .field("contents", &DebugIter::new(self.iter()))
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug, A: Allocator> Display for LinkedList<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})",
            self.iter()
                .map(|i| format!("{i:?}"))
                .collect::<Vector<String>>()
                .join(") -> (")
        )
    }
}
