use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{Deque, DequeCursor};
use crate::iter::{BidirectionalCursor, RawCursor};
use crate::memory::{Allocator, Global};

impl<T, A: Allocator> IntoIterator for Deque<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Deque<T, A> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Deque<T, A> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for owned iteration over a [`Deque`], popping values from either end. Buffers are
/// released when the iterator is dropped.
pub struct IntoIter<T, A: Allocator = Global>(pub(crate) Deque<T, A>);

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.len();
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_back()
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

/// A type for borrowed iteration over a [`Deque`]. See [`Deque::iter`].
pub struct Iter<'a, T> {
    pub(crate) front: DequeCursor<T>,
    pub(crate) back: DequeCursor<T>,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;

        // SAFETY: len > 0, so front refers to a live value that outlives the borrow of the Deque.
        unsafe {
            let item = &*self.front.ptr();
            self.front.step();
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;

        // SAFETY: len > 0, so the position before back refers to a live value.
        unsafe {
            self.back.step_back();
            Some(&*self.back.ptr())
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front,
            back: self.back,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

/// A type for mutable borrowed iteration over a [`Deque`]. See [`Deque::iter_mut`].
pub struct IterMut<'a, T> {
    pub(crate) front: DequeCursor<T>,
    pub(crate) back: DequeCursor<T>,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;

        // SAFETY: len > 0, so front refers to a live value. Each value is yielded only once.
        unsafe {
            let item = &mut *self.front.ptr();
            self.front.step();
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;

        // SAFETY: len > 0, so the position before back refers to a live value. Each value is
        // yielded only once.
        unsafe {
            self.back.step_back();
            Some(&mut *self.back.ptr())
        }
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
