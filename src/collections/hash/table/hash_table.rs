use std::borrow::Borrow;
use std::fmt::{self, Debug, Formatter};
use std::hash::{BuildHasher, Hash, RandomState};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use log::debug;

use super::{HashNode, HashPosition, Iter, IterMut, Link, bucket_index, value_ptr};
use crate::collections::contiguous::Vector;
use crate::collections::hash::{ExtractKey, primes};
use crate::iter::RawCursor;
use crate::memory::{self, AllocError, Allocator, CapacityOverflow, Global};
#[doc(inline)]
pub use crate::util::error::InvalidLoadFactor;
use crate::util::fmt::DebugIter;
use crate::util::result::AllocResultExtension;

const DEFAULT_MAX_LOAD_FACTOR: f32 = 1.0;

/// A hash table using separate chaining, the shared core of hash-based sets and maps.
///
/// Values are stored in individually allocated nodes, each chained into one of a prime number of
/// buckets. The part of a value that is hashed and compared is chosen by the extractor `X`:
/// [`Identity`](crate::collections::hash::Identity) for sets and
/// [`First`](crate::collections::hash::First) for maps of pairs. A table can either reject
/// duplicate keys (`insert_unique`) or keep them grouped together (`insert_equal`), depending on
/// which methods are used to populate it.
///
/// Before an insertion would push the load factor above [`max_load_factor`], the table grows to the
/// next bucket count in its prime table and relinks every node into the new bucket array. Hashes
/// are cached in the nodes, so rehashing never calls user code and either completes or, if the new
/// bucket array can't be allocated, leaves the table untouched. Bucket counts never shrink.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the HashTable.
/// - `b`: The number of buckets.
/// - `c`: The length of the chain that the key in question hashes to.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `find` | `O(c)` |
/// | `count` | `O(c)` |
/// | `insert_unique` | `O(c)`*, `O(n+b)` |
/// | `insert_equal` | `O(c)`*, `O(n+b)` |
/// | `erase` | `O(c)` |
/// | `rehash` | `O(n+b)` |
/// | `clear` | `O(n+b)` |
///
/// \* Average case, given a reasonable hasher and load factor. Insertions that trigger a rehash
/// take `O(n+b)`.
///
/// [`max_load_factor`]: HashTable::max_load_factor
pub struct HashTable<V, X, B = RandomState, A = Global>
where
    X: ExtractKey<V>,
    B: BuildHasher,
    A: Allocator,
{
    pub(crate) buckets: Vector<Link<V>, A>,
    pub(crate) len: usize,
    pub(crate) max_load_factor: f32,
    pub(crate) hasher: B,
    pub(crate) _phantom: PhantomData<(fn() -> X, HashNode<V>)>,
}

impl<V, X: ExtractKey<V>> HashTable<V, X> {
    /// Creates a new HashTable with the smallest bucket count and a randomly seeded hasher.
    pub fn new() -> HashTable<V, X> {
        HashTable::with_buckets_and_hasher_in(0, RandomState::new(), Global)
    }

    /// Creates a new HashTable with at least `buckets` buckets.
    pub fn with_buckets(buckets: usize) -> HashTable<V, X> {
        HashTable::with_buckets_and_hasher_in(buckets, RandomState::new(), Global)
    }
}

impl<V, X: ExtractKey<V>, B: BuildHasher> HashTable<V, X, B> {
    /// Creates a new HashTable which will use the provided hasher to hash keys.
    pub fn with_hasher(hasher: B) -> HashTable<V, X, B> {
        HashTable::with_buckets_and_hasher_in(0, hasher, Global)
    }

    /// Creates a new HashTable with at least `buckets` buckets, using the provided hasher.
    pub fn with_buckets_and_hasher(buckets: usize, hasher: B) -> HashTable<V, X, B> {
        HashTable::with_buckets_and_hasher_in(buckets, hasher, Global)
    }
}

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> HashTable<V, X, B, A> {
    /// Creates a new HashTable that allocates its buckets and nodes from `alloc`.
    pub fn with_hasher_in(hasher: B, alloc: A) -> HashTable<V, X, B, A> {
        HashTable::with_buckets_and_hasher_in(0, hasher, alloc)
    }

    /// Creates a new HashTable with the smallest tabulated prime number of buckets that is at
    /// least `buckets`.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated because its size would overflow.
    pub fn with_buckets_and_hasher_in(buckets: usize, hasher: B, alloc: A) -> HashTable<V, X, B, A> {
        HashTable {
            buckets: Self::try_create_buckets(primes::next_prime(buckets), alloc).or_handle(),
            len: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hasher,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of elements in the HashTable.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the HashTable contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets that elements are distributed between. Always prime.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the largest number of buckets that the HashTable could grow to.
    pub fn max_bucket_count(&self) -> usize {
        primes::max_prime().min(self.allocator().max_size::<Link<V>>())
    }

    /// Returns the theoretical maximum number of elements, limited by the number of nodes that the
    /// allocator could provide.
    pub fn max_size(&self) -> usize {
        self.allocator().max_size::<HashNode<V>>()
    }

    /// Returns the average number of elements per bucket.
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.buckets.len() as f32
    }

    /// Returns the load factor that the HashTable grows to stay under. Defaults to `1.0`.
    pub const fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the maximum load factor, growing the HashTable straight away if it's now above it.
    ///
    /// # Errors
    /// Returns [`InvalidLoadFactor`] if `max_load_factor` is zero, negative or NaN, if it is so
    /// small that even one element (or the current elements) would need more than
    /// [`max_bucket_count`](Self::max_bucket_count) buckets, or if the buckets it requires can't
    /// be allocated. The HashTable is left unchanged.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), InvalidLoadFactor> {
        let invalid = InvalidLoadFactor {
            value: max_load_factor,
        };
        if max_load_factor.is_nan() || max_load_factor <= 0.0 {
            return Err(invalid);
        }

        let required = (self.len.max(1) as f64 / max_load_factor as f64).ceil();
        if required > self.max_bucket_count() as f64 {
            return Err(invalid);
        }

        let previous = mem::replace(&mut self.max_load_factor, max_load_factor);
        if self.try_grow_for(0).is_err() {
            self.max_load_factor = previous;
            return Err(invalid);
        }
        Ok(())
    }

    /// Returns a reference to the hasher used by the HashTable.
    pub const fn hasher(&self) -> &B {
        &self.hasher
    }

    /// Returns a reference to the allocator that the HashTable allocates buckets and nodes from.
    pub const fn allocator(&self) -> &A {
        self.buckets.allocator()
    }

    /// Returns the index of the bucket that `key` belongs in.
    pub fn bucket<Q>(&self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.bucket_of(self.hash_key(key))
    }

    /// Returns the number of elements in the bucket at `index`.
    ///
    /// # Panics
    /// Panics if `index` is not less than [`bucket_count`](HashTable::bucket_count).
    pub fn bucket_size(&self, index: usize) -> usize {
        let mut count = 0;
        let mut curr = self.buckets[index];
        while let Some(node) = curr {
            count += 1;
            // SAFETY: Every linked node is allocated.
            curr = unsafe { (*node.as_ptr()).next };
        }
        count
    }

    /// Returns a reference to an element with a key equal to `key`, if there is one.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.find_node(self.hash_key(key), key)?;
        // SAFETY: Linked nodes hold a value, which is borrowed along with self.
        Some(unsafe { &*value_ptr(node) })
    }

    /// Returns a mutable reference to an element with a key equal to `key`, if there is one.
    /// Changing the key in a way that alters its hash or equality is a logic error.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.find_node(self.hash_key(key), key)?;
        // SAFETY: Linked nodes hold a value, which is mutably borrowed along with self.
        Some(unsafe { &mut *value_ptr(node) })
    }

    /// Returns the position of an element with a key equal to `key`, or the end position if there
    /// is none.
    pub fn find_position<Q>(&self, key: &Q) -> HashPosition<V>
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(self.find_node(self.hash_key(key), key))
    }

    /// Returns true if the HashTable contains an element with a key equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_node(self.hash_key(key), key).is_some()
    }

    /// Returns the number of elements with a key equal to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        let mut count = 0;
        let mut curr = self.buckets[self.bucket_of(hash)];
        while let Some(node) = curr {
            // SAFETY: Every linked node is allocated and holds a value.
            unsafe {
                if Self::node_matches(node, hash, key) {
                    count += 1;
                }
                curr = (*node.as_ptr()).next;
            }
        }
        count
    }

    /// Returns the range of positions holding elements with a key equal to `key`, for a table
    /// populated with [`insert_unique`](HashTable::insert_unique). The range holds at most one
    /// element, and is empty (with both ends at the end position) if there is none.
    pub fn equal_range_unique<Q>(&self, key: &Q) -> (HashPosition<V>, HashPosition<V>)
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let first = self.find_position(key);
        let mut last = first;
        // SAFETY: The position belongs to this table, which isn't mutated while stepping.
        unsafe { last.step() };
        (first, last)
    }

    /// Returns the range of positions holding all elements with a key equal to `key`, for a table
    /// populated with [`insert_equal`](HashTable::insert_equal), which keeps equal keys adjacent.
    pub fn equal_range_equal<Q>(&self, key: &Q) -> (HashPosition<V>, HashPosition<V>)
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        let Some(first) = self.find_node(hash, key) else {
            return (self.end(), self.end());
        };

        let mut last = first;
        // SAFETY: Every linked node is allocated and holds a value.
        unsafe {
            while let Some(next) = (*last.as_ptr()).next {
                if !Self::node_matches(next, hash, key) {
                    break;
                }
                last = next;
            }
        }

        let mut end = self.position(Some(last));
        // SAFETY: The position refers to an element of this table.
        unsafe { end.step() };
        (self.position(Some(first)), end)
    }

    /// Inserts `value` unless an element with an equal key is already present. Returns the
    /// position of the element with that key and whether `value` was inserted. A rejected value
    /// is dropped.
    ///
    /// # Panics
    /// Panics if the HashTable needs to grow and the size of its bucket array would overflow.
    pub fn insert_unique(&mut self, value: V) -> (HashPosition<V>, bool) {
        let hash = self.hash_key(X::key(&value));
        if let Some(existing) = self.find_node(hash, X::key(&value)) {
            return (self.position(Some(existing)), false);
        }

        self.try_grow_for(1).or_handle();
        let node = self.create_node(hash, value);
        // SAFETY: The node is unlinked and no element shares its key.
        unsafe { self.link(node, None) };
        (self.position(Some(node)), true)
    }

    /// Inserts `value`, keeping it directly after any elements with an equal key. Returns the
    /// position of the new element.
    ///
    /// # Panics
    /// Panics if the HashTable needs to grow and the size of its bucket array would overflow.
    pub fn insert_equal(&mut self, value: V) -> HashPosition<V> {
        let hash = self.hash_key(X::key(&value));
        let after = self.find_node(hash, X::key(&value));

        self.try_grow_for(1).or_handle();
        let node = self.create_node(hash, value);
        // SAFETY: The node is unlinked and after (if any) has an equal key.
        unsafe { self.link(node, after) };
        self.position(Some(node))
    }

    /// Constructs a value in a new node with `f` and links it in unless an element with an equal
    /// key is already present, in which case the new value is dropped. If `f`, hashing or
    /// comparing panics, the HashTable is left unchanged.
    ///
    /// # Panics
    /// Panics if the HashTable needs to grow and the size of its bucket array would overflow.
    pub fn emplace_unique<F: FnOnce() -> V>(&mut self, f: F) -> (HashPosition<V>, bool) {
        let node = self.create_node_with(0, f);
        let guard = DestroyNode {
            alloc: self.allocator(),
            node,
        };
        // SAFETY: The node holds a value until the guard is dropped.
        let key = X::key(unsafe { &*value_ptr(node) });
        let hash = self.hash_key(key);
        if let Some(existing) = self.find_node(hash, key) {
            drop(guard);
            return (self.position(Some(existing)), false);
        }
        mem::forget(guard);

        // SAFETY: The node is unlinked and no element shares its key.
        unsafe { self.finish_emplace(node, hash, None) };
        (self.position(Some(node)), true)
    }

    /// Constructs a value in a new node with `f` and links it in directly after any elements with
    /// an equal key. If `f`, hashing or comparing panics, the HashTable is left unchanged.
    ///
    /// # Panics
    /// Panics if the HashTable needs to grow and the size of its bucket array would overflow.
    pub fn emplace_equal<F: FnOnce() -> V>(&mut self, f: F) -> HashPosition<V> {
        let node = self.create_node_with(0, f);
        let guard = DestroyNode {
            alloc: self.allocator(),
            node,
        };
        // SAFETY: The node holds a value until the guard is dropped.
        let key = X::key(unsafe { &*value_ptr(node) });
        let hash = self.hash_key(key);
        let after = self.find_node(hash, key);
        mem::forget(guard);

        // SAFETY: The node is unlinked and after (if any) has an equal key.
        unsafe { self.finish_emplace(node, hash, after) };
        self.position(Some(node))
    }

    /// Inserts every value from `iter` with [`insert_unique`](HashTable::insert_unique), growing
    /// once up front for as many values as the iterator reports.
    pub fn insert_unique_iter<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(self.len.saturating_add(iter.size_hint().0));
        for value in iter {
            self.insert_unique(value);
        }
    }

    /// Inserts every value from `iter` with [`insert_equal`](HashTable::insert_equal), growing
    /// once up front for as many values as the iterator reports.
    pub fn insert_equal_iter<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(self.len.saturating_add(iter.size_hint().0));
        for value in iter {
            self.insert_equal(value);
        }
    }

    /// Removes every element with a key equal to `key`, returning how many were removed.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        let bucket = self.bucket_of(hash);
        let mut erased = 0;
        // SAFETY: The bucket index is in bounds, and every linked node is allocated and holds a
        // value. Each node is unlinked before its value is dropped.
        unsafe {
            let mut link = self.buckets.as_mut_ptr().add(bucket);
            while let Some(node) = *link {
                if Self::node_matches(node, hash, key) {
                    *link = (*node.as_ptr()).next;
                    self.len -= 1;
                    erased += 1;
                    drop(self.take_node(node));
                } else {
                    link = &raw mut (*node.as_ptr()).next;
                }
            }
        }
        erased
    }

    /// Removes and returns the element at `pos`. Every other position remains valid, so the
    /// position following `pos` should be taken before calling this if iteration is to continue.
    ///
    /// # Safety
    /// `pos` must refer to an element of this table (not the end position).
    pub unsafe fn erase_at(&mut self, pos: HashPosition<V>) -> V {
        // SAFETY: The caller ensures that pos refers to a linked node of this table, so the chain
        // that its hash selects leads to it.
        unsafe {
            let node = pos.node.unwrap_unchecked();
            let mut link = self.buckets.as_mut_ptr().add(self.bucket_of((*node.as_ptr()).hash));
            while *link != Some(node) {
                link = &raw mut (*(*link).unwrap_unchecked().as_ptr()).next;
            }
            *link = (*node.as_ptr()).next;
            self.len -= 1;
            self.take_node(node)
        }
    }

    /// Removes every element in `[first, last)`, returning how many were removed.
    ///
    /// # Safety
    /// Both positions must belong to this table and `last` must be reachable from `first`.
    pub unsafe fn erase_between(
        &mut self,
        mut first: HashPosition<V>,
        last: HashPosition<V>,
    ) -> usize {
        let mut erased = 0;
        while first != last {
            let curr = first;
            // SAFETY: last is reachable, so curr refers to an element. Stepping happens before
            // erasing, while the node is still linked.
            unsafe {
                first.step();
                drop(self.erase_at(curr));
            }
            erased += 1;
        }
        erased
    }

    /// Retains only the elements for which `keep` returns true.
    pub fn retain<F: FnMut(&V) -> bool>(&mut self, mut keep: F) {
        for bucket in 0..self.buckets.len() {
            // SAFETY: The bucket index is in bounds, and every linked node is allocated and holds
            // a value.
            unsafe {
                let mut link = self.buckets.as_mut_ptr().add(bucket);
                while let Some(node) = *link {
                    if keep(&*value_ptr(node)) {
                        link = &raw mut (*node.as_ptr()).next;
                    } else {
                        *link = (*node.as_ptr()).next;
                        self.len -= 1;
                        drop(self.take_node(node));
                    }
                }
            }
        }
    }

    /// Drops every element, keeping the current bucket count.
    pub fn clear(&mut self) {
        for bucket in 0..self.buckets.len() {
            while let Some(node) = self.buckets[bucket] {
                // SAFETY: The node is linked, so it is allocated and holds a value. It's unlinked
                // before its value is dropped.
                unsafe {
                    self.buckets[bucket] = (*node.as_ptr()).next;
                    self.len -= 1;
                    drop(self.take_node(node));
                }
            }
        }
    }

    /// Grows the bucket array to at least `buckets` buckets, or more if the current elements
    /// require it. The bucket count never decreases.
    ///
    /// # Panics
    /// Panics if the size of the new bucket array would overflow.
    pub fn rehash(&mut self, buckets: usize) {
        self.try_rehash(buckets).or_handle()
    }

    /// Grows the bucket array to at least `buckets` buckets, or more if the current elements
    /// require it. If the new bucket array can't be allocated, the HashTable is left unchanged.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the new bucket array can't be allocated.
    pub fn try_rehash(&mut self, buckets: usize) -> Result<(), AllocError> {
        let old_count = self.buckets.len();
        let new_count = primes::next_prime(buckets.max(self.buckets_for(self.len)));
        if new_count <= old_count {
            return Ok(());
        }

        let mut new_buckets = Self::try_create_buckets(new_count, self.allocator().clone())?;
        for bucket in self.buckets.iter_mut() {
            while let Some(node) = *bucket {
                // SAFETY: Every linked node is allocated, and the new index is in bounds.
                unsafe {
                    *bucket = (*node.as_ptr()).next;
                    let index = bucket_index((*node.as_ptr()).hash, new_count);
                    (*node.as_ptr()).next = new_buckets[index];
                    new_buckets[index] = Some(node);
                }
            }
        }
        self.buckets = new_buckets;

        debug!("rehashed HashTable of {} elements from {old_count} to {new_count} buckets", self.len);
        Ok(())
    }

    /// Grows the bucket array so that `count` elements fit without exceeding the maximum load
    /// factor.
    ///
    /// # Panics
    /// Panics if the size of the new bucket array would overflow.
    pub fn reserve(&mut self, count: usize) {
        self.try_reserve(count).or_handle()
    }

    /// Grows the bucket array so that `count` elements fit without exceeding the maximum load
    /// factor.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the new bucket array can't be allocated.
    pub fn try_reserve(&mut self, count: usize) -> Result<(), AllocError> {
        self.try_rehash(self.buckets_for(count))
    }

    /// Returns the position of the first element, or the end position if the table is empty.
    pub fn begin(&self) -> HashPosition<V> {
        self.position(self.buckets.iter().find_map(|head| *head))
    }

    /// Returns the end position.
    pub fn end(&self) -> HashPosition<V> {
        self.position(None)
    }

    /// Returns an iterator over references to every element, in bucket order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            pos: self.begin(),
            len: self.len,
            _phantom: PhantomData,
        }
    }

    /// Returns an iterator over mutable references to every element, in bucket order. Changing a
    /// key in a way that alters its hash or equality is a logic error.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            pos: self.begin(),
            len: self.len,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn hash_key<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    fn bucket_of(&self, hash: u64) -> usize {
        bucket_index(hash, self.buckets.len())
    }

    /// The number of buckets needed to hold `count` elements at the maximum load factor.
    fn buckets_for(&self, count: usize) -> usize {
        (count as f64 / self.max_load_factor as f64).ceil() as usize
    }

    fn position(&self, node: Link<V>) -> HashPosition<V> {
        HashPosition::new(node, self.buckets.as_ptr(), self.buckets.len())
    }

    /// Grows the table if adding `additional` elements would exceed the maximum load factor.
    fn try_grow_for(&mut self, additional: usize) -> Result<(), AllocError> {
        let needed = self.len.checked_add(additional).ok_or(CapacityOverflow)?;
        if needed as f64 <= self.buckets.len() as f64 * self.max_load_factor as f64 {
            return Ok(());
        }
        self.try_rehash(self.buckets_for(needed))
    }

    fn try_create_buckets(count: usize, alloc: A) -> Result<Vector<Link<V>, A>, AllocError> {
        let mut buckets = Vector::try_with_cap_in(count, alloc)?;
        buckets.resize_with(count, || None);
        Ok(buckets)
    }

    /// # Safety
    /// The node must be linked and hold a value.
    unsafe fn node_matches<Q>(node: NonNull<HashNode<V>>, hash: u64, key: &Q) -> bool
    where
        X::Key: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        // SAFETY: Forwarded to the caller.
        unsafe {
            (*node.as_ptr()).hash == hash
                && <X::Key as Borrow<Q>>::borrow(X::key(&*value_ptr(node))) == key
        }
    }

    fn find_node<Q>(&self, hash: u64, key: &Q) -> Link<V>
    where
        X::Key: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut curr = self.buckets[self.bucket_of(hash)];
        while let Some(node) = curr {
            // SAFETY: Every linked node is allocated and holds a value.
            unsafe {
                if Self::node_matches(node, hash, key) {
                    return curr;
                }
                curr = (*node.as_ptr()).next;
            }
        }
        None
    }

    /// Links an unlinked node into the table, either directly after `after` or at the head of its
    /// bucket.
    ///
    /// # Safety
    /// The node's hash must be set, and `after` must be a linked node of this table with an equal
    /// key.
    unsafe fn link(&mut self, node: NonNull<HashNode<V>>, after: Link<V>) {
        // SAFETY: Forwarded to the caller.
        unsafe {
            match after {
                Some(prev) => {
                    (*node.as_ptr()).next = (*prev.as_ptr()).next;
                    (*prev.as_ptr()).next = Some(node);
                },
                None => {
                    let bucket = self.bucket_of((*node.as_ptr()).hash);
                    (*node.as_ptr()).next = self.buckets[bucket];
                    self.buckets[bucket] = Some(node);
                },
            }
        }
        self.len += 1;
    }

    /// Records the hash of an emplaced node, grows if required and links it. The node is released
    /// if growing fails.
    ///
    /// # Safety
    /// See [`link`](HashTable::link).
    unsafe fn finish_emplace(&mut self, node: NonNull<HashNode<V>>, hash: u64, after: Link<V>) {
        // SAFETY: The node is allocated and not yet shared.
        unsafe { (*node.as_ptr()).hash = hash };
        if let Err(error) = self.try_grow_for(1) {
            // SAFETY: The node is unlinked and holds a value.
            drop(unsafe { self.take_node(node) });
            error.handle();
        }
        // SAFETY: Forwarded to the caller.
        unsafe { self.link(node, after) };
    }

    fn create_node(&self, hash: u64, value: V) -> NonNull<HashNode<V>> {
        let node = self.allocator().allocate::<HashNode<V>>(1).or_handle();
        // SAFETY: The node was just allocated.
        unsafe {
            node.write(HashNode {
                next: None,
                hash,
                value,
            });
        }
        node
    }

    /// Allocates an unlinked node holding the value returned by `f`. If `f` panics, the node is
    /// released again.
    fn create_node_with<F: FnOnce() -> V>(&self, hash: u64, f: F) -> NonNull<HashNode<V>> {
        let node = self.allocator().allocate::<HashNode<V>>(1).or_handle();

        struct FreeNode<'a, V, A: Allocator> {
            alloc: &'a A,
            node: NonNull<HashNode<V>>,
        }

        impl<V, A: Allocator> Drop for FreeNode<'_, V, A> {
            fn drop(&mut self) {
                // SAFETY: The node was allocated from alloc and holds no value.
                unsafe { self.alloc.deallocate(self.node, 1) }
            }
        }

        let guard = FreeNode {
            alloc: self.allocator(),
            node,
        };
        // SAFETY: The value slot belongs to the freshly allocated node.
        unsafe { memory::construct_with(NonNull::new_unchecked(value_ptr(node)), f) };
        mem::forget(guard);

        // SAFETY: The node is allocated, and the fields are written without reading them.
        unsafe {
            (&raw mut (*node.as_ptr()).next).write(None);
            (&raw mut (*node.as_ptr()).hash).write(hash);
        }
        node
    }

    /// Moves the value out of an unlinked node and releases the node.
    ///
    /// # Safety
    /// The node must hold a value, be allocated by this table's allocator and no longer be linked.
    pub(crate) unsafe fn take_node(&self, node: NonNull<HashNode<V>>) -> V {
        // SAFETY: Forwarded to the caller.
        unsafe {
            let value = value_ptr(node).read();
            self.allocator().deallocate(node, 1);
            value
        }
    }

    /// Checks that every element sits in the bucket that its key hashes to and that the chains
    /// hold exactly len nodes.
    #[cfg(test)]
    pub(crate) fn verify_buckets(&self) {
        let mut count = 0;
        for (index, head) in self.buckets.iter().enumerate() {
            let mut curr = *head;
            while let Some(node) = curr {
                // SAFETY: Every linked node is allocated and holds a value.
                unsafe {
                    let hash = self.hash_key(X::key(&*value_ptr(node)));
                    assert_eq!((*node.as_ptr()).hash, hash, "The cached hash should be current.");
                    assert_eq!(self.bucket_of(hash), index, "Nodes should be in their own bucket.");
                    curr = (*node.as_ptr()).next;
                }
                count += 1;
            }
        }
        assert_eq!(count, self.len, "The chains should hold len elements.");
    }
}

/// Destroys and releases a node that hasn't been linked yet, if user code panics before it can be.
struct DestroyNode<'a, V, A: Allocator> {
    alloc: &'a A,
    node: NonNull<HashNode<V>>,
}

impl<V, A: Allocator> Drop for DestroyNode<'_, V, A> {
    fn drop(&mut self) {
        // SAFETY: The node was allocated from alloc, holds a value and isn't linked.
        unsafe {
            let value = value_ptr(self.node).read();
            self.alloc.deallocate(self.node, 1);
            drop(value);
        }
    }
}

/// Finishes clearing a table if one of its elements panics while being dropped.
struct DropGuard<'a, V, X: ExtractKey<V>, B: BuildHasher, A: Allocator>(
    &'a mut HashTable<V, X, B, A>,
);

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> Drop for DropGuard<'_, V, X, B, A> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

impl<V, X: ExtractKey<V>, B: BuildHasher, A: Allocator> Drop for HashTable<V, X, B, A> {
    fn drop(&mut self) {
        let guard = DropGuard(self);
        guard.0.clear();
    }
}

impl<V, X: ExtractKey<V>, B: BuildHasher + Default> Default for HashTable<V, X, B> {
    fn default() -> Self {
        HashTable::with_hasher(B::default())
    }
}

impl<V, X, B, A> Clone for HashTable<V, X, B, A>
where
    V: Clone,
    X: ExtractKey<V>,
    B: BuildHasher + Clone,
    A: Allocator,
{
    /// Clones every chain node by node, keeping the bucket count and the order within each
    /// bucket. If cloning an element panics, everything cloned so far is released.
    fn clone(&self) -> Self {
        let mut table = HashTable {
            buckets: Self::try_create_buckets(self.buckets.len(), self.allocator().clone())
                .or_handle(),
            len: 0,
            max_load_factor: self.max_load_factor,
            hasher: self.hasher.clone(),
            _phantom: PhantomData,
        };

        for (index, head) in self.buckets.iter().enumerate() {
            let mut source = *head;
            // SAFETY: The index is in bounds of the new bucket array, which has the same length.
            let mut tail = unsafe { table.buckets.as_mut_ptr().add(index) };
            while let Some(node) = source {
                // SAFETY: Source nodes are linked, so they are allocated and hold values. The copy
                // is appended to the chain of the same bucket before len is updated.
                unsafe {
                    let value = &*value_ptr(node);
                    let copy = table.create_node_with((*node.as_ptr()).hash, || value.clone());
                    *tail = Some(copy);
                    tail = &raw mut (*copy.as_ptr()).next;
                    source = (*node.as_ptr()).next;
                }
                table.len += 1;
            }
        }
        table
    }
}

// SAFETY: The table owns its nodes exclusively, so sending it sends the values along with it.
unsafe impl<V, X, B, A> Send for HashTable<V, X, B, A>
where
    V: Send,
    X: ExtractKey<V>,
    B: BuildHasher + Send,
    A: Allocator + Send,
{
}

// SAFETY: Shared access to the table only gives shared access to its values.
unsafe impl<V, X, B, A> Sync for HashTable<V, X, B, A>
where
    V: Sync,
    X: ExtractKey<V>,
    B: BuildHasher + Sync,
    A: Allocator + Sync,
{
}

impl<V: Debug, X: ExtractKey<V>, B: BuildHasher, A: Allocator> Debug for HashTable<V, X, B, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("contents", &DebugIter::new(self.iter()))
            .field("len", &self.len)
            .field("bucket_count", &self.bucket_count())
            .finish()
    }
}
