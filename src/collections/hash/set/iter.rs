use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use super::UnorderedSet;
use crate::collections::hash::{Identity, table};
use crate::memory::Global;

impl<T: Hash + Eq, B: BuildHasher> IntoIterator for UnorderedSet<T, B> {
    type Item = T;

    type IntoIter = IntoIter<T, B>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.inner.into_iter())
    }
}

/// A type for owned iteration over an [`UnorderedSet`]. Produces values of type `T`.
pub struct IntoIter<T: Hash + Eq, B: BuildHasher>(
    pub(crate) table::IntoIter<T, Identity, B, Global>,
);

impl<T: Hash + Eq, B: BuildHasher> Iterator for IntoIter<T, B> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T: Hash + Eq, B: BuildHasher> ExactSizeIterator for IntoIter<T, B> {}

impl<T: Hash + Eq, B: BuildHasher> FusedIterator for IntoIter<T, B> {}

impl<'a, T: Hash + Eq, B: BuildHasher> IntoIterator for &'a UnorderedSet<T, B> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A type for borrowed iteration over an [`UnorderedSet`]. Produces values of type `&T`.
///
/// See [`UnorderedSet::iter`].
pub struct Iter<'a, T>(pub(crate) table::Iter<'a, T>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}
