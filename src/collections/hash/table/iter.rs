use std::hash::BuildHasher;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{HashPosition, HashTable};
use crate::collections::hash::ExtractKey;
use crate::iter::RawCursor;
use crate::memory::Allocator;

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> IntoIterator for HashTable<V, X, B, A> {
    type Item = V;

    type IntoIter = IntoIter<V, X, B, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self,
            bucket: 0,
        }
    }
}

/// A type for owned iteration over a [`HashTable`]. Produces values of type `V`, emptying one
/// bucket at a time.
pub struct IntoIter<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> {
    pub(crate) table: HashTable<V, X, B, A>,
    pub(crate) bucket: usize,
}

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> Iterator for IntoIter<V, X, B, A> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket < self.table.buckets.len() {
            if let Some(node) = self.table.buckets[self.bucket] {
                // SAFETY: The node is linked, so it holds a value. It's unlinked before being
                // taken.
                unsafe {
                    self.table.buckets[self.bucket] = (*node.as_ptr()).next;
                    self.table.len -= 1;
                    return Some(self.table.take_node(node));
                }
            }
            self.bucket += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len, Some(self.table.len))
    }
}

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> ExactSizeIterator for IntoIter<V, X, B, A> {}

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> FusedIterator for IntoIter<V, X, B, A> {}

impl<'a, V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> IntoIterator
    for &'a HashTable<V, X, B, A>
{
    type Item = &'a V;

    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A type for borrowed iteration over a [`HashTable`]. Produces values of type `&V`.
///
/// See [`HashTable::iter`].
pub struct Iter<'a, V> {
    pub(crate) pos: HashPosition<V>,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<&'a V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: len elements remain, so pos refers to one of them, and the table is borrowed
        // for 'a.
        unsafe {
            let value = self.pos.get();
            self.pos.step();
            self.len -= 1;
            Some(value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> IntoIterator
    for &'a mut HashTable<V, X, B, A>
{
    type Item = &'a mut V;

    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for mutable iteration over a [`HashTable`]. Produces values of type `&mut V`.
///
/// See [`HashTable::iter_mut`].
pub struct IterMut<'a, V> {
    pub(crate) pos: HashPosition<V>,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<&'a mut V>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: len elements remain, so pos refers to one of them. Each element is yielded
        // once, and the table is mutably borrowed for 'a.
        unsafe {
            let value = self.pos.get_mut();
            self.pos.step();
            self.len -= 1;
            Some(value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}
