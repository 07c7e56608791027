#![cfg(test)]

use std::collections::HashMap;

use rand::Rng;

use super::*;
use crate::collections::hash::{First, Identity, max_prime};
use crate::iter::RawCursor;
use crate::memory::Global;
use crate::util::alloc::{CountedDrop, CountingAllocator, Fragile};
use crate::util::hash::{BadHasherBuilder, ManualHash};
use crate::util::panic::assert_panics;

type IdentityTable<T> = HashTable<T, Identity, BadHasherBuilder>;
type PairTable<K, W, A = Global> = HashTable<(K, W), First, BadHasherBuilder, A>;

fn counted_table(alloc: &CountingAllocator) -> PairTable<u64, CountedDrop, CountingAllocator> {
    HashTable::with_hasher_in(BadHasherBuilder, alloc.clone())
}

#[test]
fn test_insert_unique_rejects_duplicates() {
    let mut table: HashTable<i32, Identity> = HashTable::new();
    for value in [1, 2, 3] {
        assert!(table.insert_unique(value).1);
    }

    let (pos, inserted) = table.insert_unique(2);
    assert!(!inserted);
    // SAFETY: The position refers to the existing element.
    assert_eq!(unsafe { pos.get() }, &2);
    assert_eq!(table.len(), 3);
    assert!(table.contains(&1));
    assert!(!table.contains(&4));
    table.verify_buckets();
}

#[test]
fn test_bucket_count_grows_with_len() {
    let mut table: HashTable<u64, Identity> = HashTable::new();
    assert_eq!(table.bucket_count(), 101);
    assert_eq!(table.max_load_factor(), 1.0);

    for key in 0..200 {
        table.insert_unique(key);
    }
    assert_eq!(table.len(), 200);
    assert!(table.len() <= table.bucket_count());
    assert_eq!(table.bucket_count(), 263);
    assert!(table.load_factor() <= table.max_load_factor());
    table.verify_buckets();
}

#[test]
fn test_load_factor_trigger() {
    let mut table: HashTable<u64, Identity> = HashTable::new();
    table.set_max_load_factor(0.5).unwrap();

    let mut rehashes = 0;
    for key in 0..1000 {
        let before = table.bucket_count();
        table.insert_equal(key % 700);
        if table.bucket_count() != before {
            rehashes += 1;
            table.verify_buckets();
        }
        assert!(table.len() as f32 <= table.bucket_count() as f32 * table.max_load_factor());
    }
    assert!(rehashes >= 3);
    assert_eq!(table.count(&5), 2);
    assert_eq!(table.count(&699), 1);
}

#[test]
fn test_invalid_load_factor() {
    let mut table: HashTable<u64, Identity> = HashTable::new();
    for invalid in [0.0, -1.0, f32::NAN] {
        let error = table.set_max_load_factor(invalid).unwrap_err();
        assert!(error.value == invalid || error.value.is_nan());
    }
    assert_eq!(table.max_load_factor(), 1.0);
}

#[test]
fn test_tiny_load_factor_is_rejected() {
    let mut table: HashTable<u64, Identity> = HashTable::new();
    table.insert_unique(1);

    for tiny in [1e-20, f32::MIN_POSITIVE] {
        assert_eq!(
            table.set_max_load_factor(tiny),
            Err(InvalidLoadFactor {
                value: tiny
            })
        );
        assert_eq!(table.max_load_factor(), 1.0);
        assert_eq!(table.bucket_count(), 101);
    }

    table.insert_unique(2);
    assert_eq!(table.len(), 2);
    table.verify_buckets();

    let mut empty: HashTable<u64, Identity> = HashTable::new();
    assert!(empty.set_max_load_factor(1e-20).is_err());
    empty.insert_unique(3);
    assert_eq!(empty.find(&3), Some(&3));
}

#[test]
fn test_failed_growth_keeps_load_factor() {
    let alloc = CountingAllocator::new();
    let mut table = counted_table(&alloc);
    for key in 0..50 {
        table.insert_unique((key, CountedDrop::new(0)));
    }

    alloc.fail_after(0);
    assert!(table.set_max_load_factor(0.1).is_err());
    assert_eq!(table.max_load_factor(), 1.0);
    assert_eq!(table.bucket_count(), 101);
    assert_eq!(table.len(), 50);
    table.verify_buckets();
}

#[test]
fn test_lowering_load_factor_rehashes() {
    let mut table: HashTable<u64, Identity> = HashTable::new();
    table.insert_unique_iter(0..100);
    assert_eq!(table.bucket_count(), 101);

    table.set_max_load_factor(0.25).unwrap();
    assert!(table.bucket_count() >= 400);
    table.verify_buckets();
}

#[test]
fn test_colliding_keys_share_a_bucket() {
    let mut table: IdentityTable<u64> = HashTable::with_hasher(BadHasherBuilder);
    for key in [0_u64, 101, 202, 303, 7] {
        table.insert_unique(key);
    }

    assert_eq!(table.bucket(&202), 0);
    assert_eq!(table.bucket_size(0), 4);
    assert_eq!(table.bucket_size(7), 1);
    assert_eq!(table.bucket_size(1), 0);
    assert!([0_u64, 101, 202, 303].iter().all(|key| table.find(key) == Some(key)));

    assert_eq!(table.erase(&101), 1);
    assert_eq!(table.erase(&101), 0);
    assert_eq!(table.bucket_size(0), 3);
    assert_eq!(table.find(&101), None);
    table.verify_buckets();

    assert_panics!({ table.bucket_size(table.bucket_count()) });
}

#[test]
fn test_manual_hash_collisions() {
    let mut table: HashTable<ManualHash<&str>, Identity, BadHasherBuilder> =
        HashTable::with_hasher(BadHasherBuilder);
    table.insert_unique(ManualHash::new(5, "a"));
    table.insert_unique(ManualHash::new(5, "b"));
    assert!(!table.insert_unique(ManualHash::new(5, "a")).1);

    assert_eq!(table.len(), 2);
    assert_eq!(table.bucket_size(5), 2);
    assert_eq!(table.erase(&ManualHash::new(5, "a")), 1);
    assert_eq!(table.iter().next().cloned().map(ManualHash::value), Some("b"));
}

#[test]
fn test_insert_equal_keeps_keys_adjacent() {
    let mut table: PairTable<u64, &str> = HashTable::with_hasher(BadHasherBuilder);
    table.insert_equal((1, "a"));
    table.insert_equal((102, "x"));
    table.insert_equal((1, "b"));
    table.insert_equal((203, "y"));
    table.insert_equal((1, "c"));

    assert_eq!(table.count(&1), 3);
    assert_eq!(table.bucket_size(1), 5);

    let (mut first, last) = table.equal_range_equal(&1);
    let mut group = Vec::new();
    while first != last {
        // SAFETY: Every position before last refers to an element.
        unsafe {
            group.push(first.get().1);
            first.step();
        }
    }
    group.sort();
    assert_eq!(group, ["a", "b", "c"]);

    assert_eq!(table.erase(&1), 3);
    assert_eq!(table.len(), 2);
    assert_eq!(table.count(&1), 0);
    table.verify_buckets();
}

#[test]
fn test_equal_range_unique() {
    let mut table: PairTable<u64, &str> = HashTable::with_hasher(BadHasherBuilder);
    table.insert_unique((4, "four"));
    table.insert_unique((9, "nine"));

    let (first, last) = table.equal_range_unique(&4);
    // SAFETY: Both positions belong to the table.
    assert_eq!(unsafe { first.distance_to(&last) }, 1);
    // SAFETY: The first position refers to an element.
    assert_eq!(unsafe { first.get() }, &(4, "four"));

    let (first, last) = table.equal_range_unique(&5);
    assert!(first.is_end() && last.is_end());
    let (first, last) = table.equal_range_equal(&5);
    assert_eq!(first, last);
}

#[test]
fn test_find_mut() {
    let mut table: PairTable<u64, i32> = HashTable::with_hasher(BadHasherBuilder);
    table.insert_unique((1, 10));
    if let Some(entry) = table.find_mut(&1) {
        entry.1 += 5;
    }
    assert_eq!(table.find(&1), Some(&(1, 15)));
    assert_eq!(table.find_mut(&2), None);
}

#[test]
fn test_emplace() {
    let alloc = CountingAllocator::new();
    let mut table = counted_table(&alloc);
    let drops = CountedDrop::new(0);

    let (_, inserted) = table.emplace_unique(|| (3, drops.clone()));
    assert!(inserted);
    let (pos, inserted) = table.emplace_unique(|| (3, drops.clone()));
    assert!(!inserted);
    // SAFETY: The position refers to the existing element.
    assert_eq!(unsafe { pos.get() }.0, 3);
    assert_eq!(*drops.borrow(), 1, "The rejected value should be dropped.");
    assert_eq!(alloc.live(), 2, "Only the buckets and one node should be live.");

    table.emplace_equal(|| (3, drops.clone()));
    assert_eq!(table.count(&3), 2);
    assert_eq!(alloc.live(), 3);
}

#[test]
fn test_emplace_panic_leaves_table_unchanged() {
    let alloc = CountingAllocator::new();
    let mut table = counted_table(&alloc);
    table.insert_unique((1, CountedDrop::new(0)));
    let live = alloc.live();

    assert_panics!({ table.emplace_unique(|| panic!("no value")) });
    assert_panics!({ table.emplace_equal(|| panic!("no value")) });
    assert_eq!(table.len(), 1);
    assert_eq!(alloc.live(), live);
    table.verify_buckets();
}

#[test]
fn test_positions() {
    let mut table: IdentityTable<u64> = HashTable::with_hasher(BadHasherBuilder);
    table.insert_unique_iter([5, 106, 3, 50, 207]);

    let begin = table.begin();
    let end = table.end();
    // SAFETY: Both positions belong to the table.
    assert_eq!(unsafe { begin.distance_to(&end) }, 5);
    // SAFETY: The first non-empty bucket is 3.
    assert_eq!(unsafe { begin.get() }, &3);

    let pos = table.find_position(&106);
    // SAFETY: The position refers to an element of the table.
    assert_eq!(unsafe { table.erase_at(pos) }, 106);
    assert!(table.find_position(&106).is_end());
    assert_eq!(table.len(), 4);

    // SAFETY: The whole table is a valid range.
    let erased = unsafe { table.erase_between(table.begin(), table.end()) };
    assert_eq!(erased, 4);
    assert!(table.is_empty());
    assert!(table.begin().is_end());
}

#[test]
fn test_retain_and_clear() {
    let mut table: HashTable<u64, Identity> = HashTable::new();
    table.insert_unique_iter(0..50);
    table.retain(|value| value % 5 == 0);
    assert_eq!(table.len(), 10);
    assert!(table.iter().all(|value| value % 5 == 0));
    table.verify_buckets();

    let buckets = table.bucket_count();
    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.bucket_count(), buckets);
    assert_eq!(table.iter().next(), None);
}

#[test]
fn test_rehash_relinks_nodes() {
    let alloc = CountingAllocator::new();
    let mut table = counted_table(&alloc);
    let drops = CountedDrop::new(0);
    for key in 0..50 {
        table.insert_unique((key, drops.clone()));
    }
    assert_eq!(alloc.allocations(), 51);
    let node = table.find(&42).map(|entry| entry as *const _);

    table.rehash(1000);
    assert_eq!(table.bucket_count(), 1361);
    assert_eq!(alloc.allocations(), 52, "Only the bucket array should be reallocated.");
    assert_eq!(alloc.deallocations(), 1);
    assert_eq!(table.find(&42).map(|entry| entry as *const _), node);
    assert_eq!(*drops.borrow(), 0);
    table.verify_buckets();

    table.rehash(10);
    assert_eq!(table.bucket_count(), 1361, "Bucket counts should never shrink.");
    table.reserve(2000);
    assert!(table.bucket_count() >= 2000);
}

#[test]
fn test_rehash_failure_leaves_table_unchanged() {
    let alloc = CountingAllocator::new();
    let mut table = counted_table(&alloc);
    table.insert_unique((1, CountedDrop::new(0)));

    alloc.fail_after(0);
    assert!(table.try_rehash(5000).unwrap_err().is_out_of_memory());
    assert!(table.try_reserve(usize::MAX).is_err());
    assert_eq!(table.bucket_count(), 101);
    assert_eq!(table.len(), 1);
    table.verify_buckets();
}

#[test]
fn test_bucket_limits() {
    let table: HashTable<u64, Identity> = HashTable::with_buckets(102);
    assert_eq!(table.bucket_count(), 173);
    assert!(table.max_bucket_count() <= max_prime());
    assert!(table.max_bucket_count() >= table.bucket_count());
    assert!(table.max_size() > 0);
}

#[test]
fn test_iteration() {
    let mut table: IdentityTable<u64> = HashTable::with_hasher(BadHasherBuilder);
    table.insert_unique_iter([3, 1, 2]);
    assert_eq!(table.iter().len(), 3);
    assert!(table.iter().eq(&[1, 2, 3]));

    let mut pairs: PairTable<u64, u64> = HashTable::with_hasher(BadHasherBuilder);
    pairs.insert_unique_iter((0..10).map(|key| (key, 0)));
    for entry in &mut pairs {
        entry.1 = entry.0 * 2;
    }
    assert!(pairs.iter().all(|(key, value)| *value == key * 2));

    let mut owned: Vec<_> = pairs.into_iter().collect();
    owned.sort();
    assert_eq!(owned.len(), 10);
    assert_eq!(owned[9], (9, 18));
}

#[test]
fn test_partial_into_iter_drops_the_rest() {
    let alloc = CountingAllocator::new();
    let mut table = counted_table(&alloc);
    let drops = CountedDrop::new(0);
    for key in 0..20 {
        table.insert_unique((key, drops.clone()));
    }

    let mut iter = table.into_iter();
    assert_eq!(iter.next().map(|entry| entry.0), Some(0));
    assert_eq!(iter.len(), 19);
    drop(iter);
    assert_eq!(*drops.borrow(), 20);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_clone_and_debug() {
    let mut table: IdentityTable<u64> = HashTable::with_hasher(BadHasherBuilder);
    table.insert_unique_iter([2, 1, 3]);

    let clone = table.clone();
    assert_eq!(clone.bucket_count(), table.bucket_count());
    assert!(clone.iter().eq(table.iter()));
    clone.verify_buckets();

    assert_eq!(
        format!("{:?}", table),
        "HashTable { contents: [1, 2, 3], len: 3, bucket_count: 101 }"
    );
}

#[test]
fn test_clone_panic_releases_copies() {
    let alloc = CountingAllocator::new();
    let mut table: PairTable<u64, Fragile, CountingAllocator> =
        HashTable::with_hasher_in(BadHasherBuilder, alloc.clone());
    table.insert_unique((1, Fragile::new(1)));
    table.insert_unique((2, Fragile::new(2)));
    table.insert_unique((3, Fragile::poisoned(3)));
    let live = alloc.live();

    assert_panics!({ table.clone() });
    assert_eq!(alloc.live(), live);
    assert_eq!(table.len(), 3);
}

#[test]
fn test_drop_releases_everything() {
    let alloc = CountingAllocator::new();
    let drops = CountedDrop::new(0);
    let mut table = counted_table(&alloc);
    for key in 0..300 {
        table.insert_equal((key % 150, drops.clone()));
    }
    assert_eq!(table.erase(&7), 2);
    assert_eq!(*drops.borrow(), 2);

    drop(table);
    assert_eq!(*drops.borrow(), 300);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_matches_std_model() {
    let mut rng = rand::thread_rng();
    let mut table: HashTable<u16, Identity> = HashTable::new();
    let mut model: HashMap<u16, usize> = HashMap::new();

    for _ in 0..2000 {
        let key = rng.gen_range(0..300);
        match rng.gen_range(0..4) {
            0 | 1 => {
                table.insert_equal(key);
                *model.entry(key).or_default() += 1;
            },
            2 => {
                let inserted = table.insert_unique(key).1;
                assert_eq!(inserted, !model.contains_key(&key));
                model.entry(key).or_insert(1);
            },
            _ => {
                let erased = table.erase(&key);
                assert_eq!(erased, model.remove(&key).unwrap_or(0));
            },
        }
        assert_eq!(table.count(&key), model.get(&key).copied().unwrap_or(0));
    }

    assert_eq!(table.len(), model.values().sum::<usize>());
    table.verify_buckets();
}
