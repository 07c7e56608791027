use std::mem::offset_of;
use std::ptr::NonNull;

/// An owning link from a bucket or a node to the next node in the same chain.
pub(crate) type Link<V> = Option<NonNull<HashNode<V>>>;

/// A single entry of a [`HashTable`](super::HashTable). The hash of the value's key is computed
/// once on insertion and kept, so that rehashing never has to call back into user code.
pub(crate) struct HashNode<V> {
    pub(crate) next: Link<V>,
    pub(crate) hash: u64,
    pub(crate) value: V,
}

/// Maps a hash to one of `bucket_count` buckets.
pub(crate) const fn bucket_index(hash: u64, bucket_count: usize) -> usize {
    (hash % bucket_count as u64) as usize
}

/// Returns a pointer to the value held by `node`, without reading anything.
pub(crate) const fn value_ptr<V>(node: NonNull<HashNode<V>>) -> *mut V {
    node.as_ptr().cast::<u8>().wrapping_add(offset_of!(HashNode<V>, value)).cast()
}
