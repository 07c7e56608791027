use std::hash::Hash;

/// Selects the part of a stored value that a [`HashTable`](super::HashTable) hashes and compares.
///
/// Extractors are zero-sized markers; the table never holds an instance of one.
pub trait ExtractKey<V> {
    type Key: Hash + Eq + ?Sized;

    fn key(value: &V) -> &Self::Key;
}

/// Uses the whole value as its own key, as a set does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity;

impl<V: Hash + Eq> ExtractKey<V> for Identity {
    type Key = V;

    fn key(value: &V) -> &V {
        value
    }
}

/// Uses the first field of a pair as the key, as a map does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct First;

impl<K: Hash + Eq, W> ExtractKey<(K, W)> for First {
    type Key = K;

    fn key(value: &(K, W)) -> &K {
        &value.0
    }
}
