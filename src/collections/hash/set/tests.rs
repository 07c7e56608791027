#![cfg(test)]

use super::*;
use crate::collections::contiguous::Vector;
use crate::collections::traits::Set;
use crate::util::hash::{BadHasherBuilder, ManualHash};

fn small_set<const N: usize>(items: [u32; N]) -> UnorderedSet<u32, BadHasherBuilder> {
    let mut set = UnorderedSet::with_hasher(BadHasherBuilder);
    set.extend(items);
    set
}

fn sorted<'a>(iter: impl Iterator<Item = &'a u32>) -> Vector<u32> {
    let mut items: Vector<u32> = iter.copied().collect();
    items.sort();
    items
}

#[test]
fn test_insert_reports_duplicates() {
    let mut set: UnorderedSet<i32> = UnorderedSet::new();
    assert!(set.insert(1));
    assert!(set.insert(2));
    assert!(set.insert(3));
    assert!(!set.insert(2));
    assert_eq!(set.len(), 3);
    assert!(set.contains(&2));
    assert_eq!(set.get(&3), Some(&3));
}

#[test]
fn test_hash_collisions() {
    let mut set = UnorderedSet::with_hasher(BadHasherBuilder);
    set.insert(ManualHash::new(0, "zero"));
    set.insert(ManualHash::new(0, "one"));
    set.insert(ManualHash::new(2, "two"));
    set.insert(ManualHash::new(0, "three"));
    set.insert(ManualHash::new(2, "four"));
    set.insert(ManualHash::new(1, "five"));

    assert_eq!(set.remove(&ManualHash::new(0, "zero")).map(ManualHash::value), Some("zero"));
    assert_eq!(set.remove(&ManualHash::new(2, "two")).map(ManualHash::value), Some("two"));
    assert_eq!(set.remove(&ManualHash::new(2, "two")), None);

    assert_eq!(
        *set.into_iter().map(|i| i.value()).collect::<Vector<_>>(),
        ["three", "one", "five", "four"],
        "Colliding items should stay in their chains, newest first, when others are removed."
    );
}

#[test]
fn test_replace_and_retain() {
    let mut set: UnorderedSet<ManualHash<u8>, BadHasherBuilder> = UnorderedSet::default();
    assert_eq!(set.replace(ManualHash::new(1, 10)), None);
    assert!(set.replace(ManualHash::new(1, 10)).is_some());
    assert_eq!(set.len(), 1);

    let mut set = small_set([1, 2, 3, 4, 5, 6]);
    set.retain(|item| item % 2 == 0);
    assert_eq!(*sorted(set.iter()), [2, 4, 6]);
    set.clear();
    assert!(set.is_empty());
}

#[test]
fn test_set_operations() {
    let a = small_set([1, 2, 3, 4]);
    let b = small_set([3, 4, 5]);

    assert_eq!(*sorted(a.difference(&b)), [1, 2]);
    assert_eq!(*sorted(a.intersection(&b)), [3, 4]);
    assert_eq!(*sorted(a.union(&b)), [1, 2, 3, 4, 5]);
    assert_eq!(*sorted(a.symmetric_difference(&b)), [1, 2, 5]);

    assert!(small_set([3, 4]).is_subset(&a));
    assert!(a.is_superset(&small_set([1, 4])));
    assert!(!a.is_subset(&b));
    assert!(a.is_disjoint(&small_set([9, 10])));

    let mut owned: Vector<u32> = a.clone().into_difference(b.clone()).collect();
    owned.sort();
    assert_eq!(*owned, [1, 2]);
    let mut owned: Vector<u32> = a.into_intersection(b).collect();
    owned.sort();
    assert_eq!(*owned, [3, 4]);
}

#[test]
fn test_operators() {
    let a = small_set([1, 2, 3]);
    let b = small_set([2, 3, 4]);

    assert_eq!(&a | &b, small_set([1, 2, 3, 4]));
    assert_eq!(&a & &b, small_set([2, 3]));
    assert_eq!(&a ^ &b, small_set([1, 4]));
    assert_eq!(&a - &b, small_set([1]));

    let mut c = a.clone();
    c |= b.clone();
    assert_eq!(c, small_set([1, 2, 3, 4]));
    c &= small_set([2, 4, 8]);
    assert_eq!(c, small_set([2, 4]));
    c ^= small_set([4, 5]);
    assert_eq!(c, small_set([2, 5]));
    c -= small_set([5]);
    assert_eq!(c, small_set([2]));
}

#[test]
fn test_growth_and_load_factor() {
    let mut set: UnorderedSet<u32> = (0..500).collect();
    assert_eq!(set.len(), 500);
    assert!(set.len() as f32 <= set.bucket_count() as f32 * set.max_load_factor());
    assert!(set.load_factor() <= 1.0);

    assert!(set.set_max_load_factor(-1.0).is_err());
    set.set_max_load_factor(0.5).unwrap();
    assert!(set.bucket_count() >= 1000);

    let reserved: UnorderedSet<u32> = UnorderedSet::with_cap(300);
    assert!(reserved.bucket_count() >= 300);
    let mut rehashed = reserved.clone();
    rehashed.rehash(2000);
    assert!(rehashed.bucket_count() >= 2000);
}

#[test]
fn test_format() {
    let set = small_set([3, 1, 2]);
    assert_eq!(format!("{}", set), "#{1, 2, 3}");
    assert_eq!(
        format!("{:?}", set),
        "UnorderedSet { contents: #{1, 2, 3}, len: 3, bucket_count: 101, hasher: BadHasherBuilder }"
    );
}
