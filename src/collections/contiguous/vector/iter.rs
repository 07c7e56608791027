use std::iter::FusedIterator;
use std::mem;
use std::slice;

use super::Vector;
use crate::memory::{self, Allocator, Global, RawBuf};

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let len = self.len;
        // SAFETY: The buffer is read out of self, which is then forgotten so that it isn't
        // released twice.
        let buf = unsafe { (&raw const self.buf).read() };
        mem::forget(self);

        IntoIter {
            buf,
            start: 0,
            end: len,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for owned iteration over a [`Vector`], which takes over its storage. See
/// [`Vector::into_iter`].
///
/// Borrowed iteration uses [`Iter`](std::slice::Iter) and [`IterMut`](std::slice::IterMut) from
/// [`std::slice`].
pub struct IntoIter<T, A: Allocator = Global> {
    pub(crate) buf: RawBuf<T, A>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// Returns the values that haven't been yielded yet as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Every slot in start..end holds a live value.
        unsafe { slice::from_raw_parts(self.buf.slot(self.start).as_ptr(), self.end - self.start) }
    }
}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: Every slot in start..end holds a live value. The storage is released when buf
        // drops.
        unsafe { memory::destroy_range(self.buf.slot(self.start), self.end - self.start) }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: start < end, so the slot holds a live value which is no longer considered live
        // once start is incremented.
        let value = unsafe { self.buf.slot(self.start).read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;
        // SAFETY: The slot at the old end - 1 held a live value.
        Some(unsafe { self.buf.slot(self.end).read() })
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}
