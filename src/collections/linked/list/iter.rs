use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{LinkedList, NodePtr};
use crate::memory::{Allocator, Global};

impl<T, A: Allocator> IntoIterator for LinkedList<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

pub struct IntoIter<T, A: Allocator = Global> {
    // There is no point me rewriting all of this when the iterator can just hold the list and call
    // pop front/back.
    pub(crate) list: LinkedList<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    fn len(&self) -> usize {
        self.list.len()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut LinkedList<T, A> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            // SAFETY: The sentinel is allocated for as long as the list is.
            head: unsafe { self.sentinel.next() },
            tail: self.sentinel,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

pub struct IterMut<'a, T> {
    // The iterator never modifies the nodes themselves and uses len to track the number of items
    // left to yield. tail is the position after the last item left.
    pub(crate) head: NodePtr<T>,
    pub(crate) tail: NodePtr<T>,
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

        // SAFETY: There are items left, so head holds a value. Each value is yielded only once.
        unsafe {
            let value = self.head.value_mut();
            self.head = self.head.next();
            Some(value)
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

        // SAFETY: There are items left, so the node before tail holds a value.
        unsafe {
            self.tail = self.tail.prev();
            Some(self.tail.value_mut())
        }
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<'a, T, A: Allocator> IntoIterator for &'a LinkedList<T, A> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            // SAFETY: The sentinel is allocated for as long as the list is.
            head: unsafe { self.sentinel.next() },
            tail: self.sentinel,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

pub struct Iter<'a, T> {
    pub(crate) head: NodePtr<T>,
    pub(crate) tail: NodePtr<T>,
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

        // SAFETY: There are items left, so head holds a value.
        unsafe {
            let value = self.head.value();
            self.head = self.head.next();
            Some(value)
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

        // SAFETY: There are items left, so the node before tail holds a value.
        unsafe {
            self.tail = self.tail.prev();
            Some(self.tail.value())
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}
