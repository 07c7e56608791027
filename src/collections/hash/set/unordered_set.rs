use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash, RandomState};
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

use super::Iter;
use crate::collections::contiguous::Vector;
use crate::collections::hash::{HashTable, Identity};
use crate::collections::traits::Set;
#[doc(inline)]
pub use crate::util::error::InvalidLoadFactor;
use crate::util::fmt::DebugRaw;

/// A set of distinct values with no defined order, stored in a [`HashTable`] that uses each value
/// as its own key.
pub struct UnorderedSet<T: Hash + Eq, B: BuildHasher = RandomState> {
    pub(crate) inner: HashTable<T, Identity, B>,
}

impl<T: Hash + Eq, B: BuildHasher + Default> UnorderedSet<T, B> {
    pub fn new() -> UnorderedSet<T, B> {
        UnorderedSet::with_hasher(B::default())
    }

    /// Creates a new UnorderedSet with room for `count` elements before it has to rehash.
    pub fn with_cap(count: usize) -> UnorderedSet<T, B> {
        UnorderedSet::with_cap_and_hasher(count, B::default())
    }
}

impl<T: Hash + Eq, B: BuildHasher> UnorderedSet<T, B> {
    pub fn with_hasher(hasher: B) -> UnorderedSet<T, B> {
        UnorderedSet {
            inner: HashTable::with_hasher(hasher),
        }
    }

    pub fn with_cap_and_hasher(count: usize, hasher: B) -> UnorderedSet<T, B> {
        let mut inner = HashTable::with_hasher(hasher);
        inner.reserve(count);
        UnorderedSet { inner }
    }

    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.inner.bucket_count()
    }

    pub fn load_factor(&self) -> f32 {
        self.inner.load_factor()
    }

    pub const fn max_load_factor(&self) -> f32 {
        self.inner.max_load_factor()
    }

    /// Sets the maximum load factor, rehashing if the set is now above it.
    ///
    /// # Errors
    /// Returns [`InvalidLoadFactor`] if `max_load_factor` is zero, negative, NaN or too small to
    /// hold the set within the largest possible bucket array. The set is left unchanged.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), InvalidLoadFactor> {
        self.inner.set_max_load_factor(max_load_factor)
    }

    pub const fn hasher(&self) -> &B {
        self.inner.hasher()
    }

    /// Inserts `item`, returning true if it wasn't already present. If it was, the set is left
    /// unchanged and `item` is dropped.
    pub fn insert(&mut self, item: T) -> bool {
        self.inner.insert_unique(item).1
    }

    /// Inserts `item`, replacing and returning an equal item if one was present.
    pub fn replace(&mut self, item: T) -> Option<T> {
        let previous = self.remove(&item);
        self.inner.insert_unique(item);
        previous
    }

    /// Returns a reference to the item in the set that is equal to `item`, if there is one.
    pub fn get<Q>(&self, item: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.find(item)
    }

    /// Removes and returns the item in the set that is equal to `item`, if there is one.
    pub fn remove<Q>(&mut self, item: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.inner.find_position(item);
        if pos.is_end() {
            return None;
        }
        // SAFETY: The position was just found in this table and refers to an element.
        Some(unsafe { self.inner.erase_at(pos) })
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains(item)
    }

    /// Retains only the items for which `keep` returns true.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.inner.retain(keep)
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Grows the set so that a total of `count` items fit without rehashing.
    pub fn reserve(&mut self, count: usize) {
        self.inner.reserve(count)
    }

    pub fn rehash(&mut self, buckets: usize) {
        self.inner.rehash(buckets)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.inner.iter())
    }
}

impl<T: Hash + Eq, B: BuildHasher> Set<T> for UnorderedSet<T, B> {
    type Iter<'a>
        = Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn contains(&self, item: &T) -> bool {
        self.inner.contains(item)
    }

    fn iter(&self) -> Self::Iter<'_> {
        Iter(self.inner.iter())
    }
}

impl<T: Hash + Eq, B: BuildHasher + Default> Default for UnorderedSet<T, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq, B: BuildHasher> Extend<T> for UnorderedSet<T, B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.insert_unique_iter(iter)
    }
}

impl<T: Hash + Eq, B: BuildHasher + Default> FromIterator<T> for UnorderedSet<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = UnorderedSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq, B: BuildHasher + Default, const N: usize> From<[T; N]> for UnorderedSet<T, B> {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Hash + Eq + Clone, B: BuildHasher + Clone> Clone for UnorderedSet<T, B> {
    fn clone(&self) -> Self {
        UnorderedSet {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Hash + Eq, B: BuildHasher> PartialEq for UnorderedSet<T, B> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|item| other.contains(item))
    }
}

impl<T: Hash + Eq, B: BuildHasher> Eq for UnorderedSet<T, B> {}

impl<T: Hash + Eq + Clone, B: BuildHasher + Default> BitOr for &UnorderedSet<T, B> {
    type Output = UnorderedSet<T, B>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs).cloned().collect()
    }
}

impl<T: Hash + Eq, B: BuildHasher> BitOrAssign for UnorderedSet<T, B> {
    fn bitor_assign(&mut self, rhs: Self) {
        self.reserve(self.len() + rhs.len());
        self.extend(rhs);
    }
}

impl<T: Hash + Eq + Clone, B: BuildHasher + Default> BitAnd for &UnorderedSet<T, B> {
    type Output = UnorderedSet<T, B>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs).cloned().collect()
    }
}

impl<T: Hash + Eq, B: BuildHasher> BitAndAssign for UnorderedSet<T, B> {
    fn bitand_assign(&mut self, rhs: Self) {
        self.retain(|item| rhs.contains(item));
    }
}

impl<T: Hash + Eq + Clone, B: BuildHasher + Default> BitXor for &UnorderedSet<T, B> {
    type Output = UnorderedSet<T, B>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.symmetric_difference(rhs).cloned().collect()
    }
}

impl<T: Hash + Eq, B: BuildHasher> BitXorAssign for UnorderedSet<T, B> {
    fn bitxor_assign(&mut self, rhs: Self) {
        for item in rhs {
            if self.remove(&item).is_none() {
                self.insert(item);
            }
        }
    }
}

impl<T: Hash + Eq + Clone, B: BuildHasher + Default> Sub for &UnorderedSet<T, B> {
    type Output = UnorderedSet<T, B>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs).cloned().collect()
    }
}

impl<T: Hash + Eq, B: BuildHasher> SubAssign for UnorderedSet<T, B> {
    fn sub_assign(&mut self, rhs: Self) {
        for item in rhs {
            self.remove(&item);
        }
    }
}

fn format_items<'a, T: 'a, I, F>(iter: I, mut format: F) -> String
where
    I: Iterator<Item = &'a T>,
    F: FnMut(&T) -> String,
{
    format!("#{{{}}}", iter.map(|item| format(item)).collect::<Vector<String>>().join(", "))
}

impl<T: Hash + Eq + Debug, B: BuildHasher + Debug> Debug for UnorderedSet<T, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnorderedSet")
            .field("contents", &DebugRaw(format_items(self.iter(), |item| format!("{item:?}"))))
            .field("len", &self.len())
            .field("bucket_count", &self.bucket_count())
            .field("hasher", self.hasher())
            .finish()
    }
}

impl<T: Hash + Eq + Display, B: BuildHasher> Display for UnorderedSet<T, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_items(self.iter(), |item| format!("{item}")))
    }
}
