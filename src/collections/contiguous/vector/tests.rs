#![cfg(test)]

use rand::Rng;

use super::*;
use crate::util::alloc::{CountedDrop, CountingAllocator, Fragile, ZeroSizedType};
use crate::util::error::IndexOutOfBounds;
use crate::util::panic::assert_panics;

fn fragile_vector(values: &[i32], cap: usize) -> Vector<Fragile> {
    let mut vec = Vector::with_cap(cap);
    for value in values {
        vec.push(Fragile::new(*value));
    }
    vec
}

fn values(vec: &Vector<Fragile>) -> Vec<i32> {
    vec.iter().map(|f| f.value).collect()
}

#[test]
fn test_push_from_empty() {
    let mut vec = Vector::new();
    for i in 1..=5 {
        vec.push(i);
    }
    assert_eq!(vec.len(), 5);
    assert_eq!(&*vec, &[1, 2, 3, 4, 5]);
    assert!(vec.cap() >= 5);
}

#[test]
fn test_growth_policy() {
    let mut vec = Vector::new();
    let mut caps = Vec::new();
    for i in 0..9_u32 {
        vec.push(i);
        caps.push(vec.cap());
    }
    assert_eq!(caps, [1, 2, 4, 4, 8, 8, 8, 8, 16], "Capacity should double when full.");

    let mut vec: Vector<u32> = Vector::from([1, 2, 3]);
    vec.insert_n(1, 10, &0);
    assert_eq!(vec.cap(), 13, "A large insert should grow to exactly fit when that beats doubling.");
}

#[test]
fn test_reserve_keeps_storage() {
    let mut vec: Vector<u64> = Vector::new();
    vec.reserve(101);
    assert!(vec.cap() >= 101);

    let ptr = vec.as_ptr();
    for i in 0..100 {
        vec.push(i);
    }
    vec.insert(50, 7);
    vec.remove(50);
    assert_eq!(vec.as_ptr(), ptr, "No reallocation should happen within the reserved capacity.");

    vec.reserve_exact(50);
    assert_eq!(vec.cap(), 150);
    vec.reserve_exact(10);
    assert_eq!(vec.cap(), 150, "Reserving within capacity shouldn't reallocate.");
    vec.truncate(10);
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 10);
    assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn test_insert_and_remove() {
    let mut vec: Vector<_> = (0..5).collect();
    vec.insert(0, 10);
    vec.insert(6, 11);
    vec.insert(3, 12);
    assert_eq!(&*vec, &[10, 0, 1, 12, 2, 3, 4, 11]);

    assert_eq!(vec.remove(3), 12);
    assert_eq!(vec.swap_remove(0), 10);
    assert_eq!(&*vec, &[11, 0, 1, 2, 3, 4]);
    assert_eq!(vec.replace(1, 20), 0);
    assert_eq!(vec.pop(), Some(4));
    assert_eq!(&*vec, &[11, 20, 1, 2, 3]);

    assert_panics!({ vec.insert(6, 0) });
    assert_panics!({ vec.remove(5) });
    assert_eq!(vec.len(), 5, "Failed bounds checks shouldn't change anything.");
}

#[test]
fn test_bulk_insertion() {
    let mut vec: Vector<String> = Vector::new();
    vec.insert_slice(0, &[String::from("a"), String::from("e")]);
    vec.insert_n(1, 3, &String::from("x"));
    vec.insert_iter(2, ["b", "c"].map(String::from));
    assert_eq!(&*vec, &["a", "x", "b", "c", "x", "x", "e"]);

    let emplaced = vec.emplace(0, || String::from("start"));
    emplaced.push('!');
    vec.emplace_back(|| String::from("end"));
    assert_eq!(vec.first().map(String::as_str), Some("start!"));
    assert_eq!(vec.last().map(String::as_str), Some("end"));

    let mut other: Vector<String> = Vector::from([String::from("y"), String::from("z")]);
    vec.append(&mut other);
    assert!(other.is_empty());
    assert_eq!(vec.len(), 11);
    assert_eq!(&vec[9..], &["y", "z"]);

    let mut bytes: Vector<u8> = Vector::from([1, 5]);
    bytes.insert_pod(1, &[2, 3, 4]);
    assert_eq!(&*bytes, &[1, 2, 3, 4, 5]);
}

#[test]
fn test_pod_bulk_copies() {
    let mut vec: Vector<u32> = Vector::with_cap(8);
    let ptr = vec.as_ptr();

    vec.extend_from_pod(&[1, 2, 3]);
    vec.extend_from_pod(&[]);
    vec.extend_from_pod(&[4]);
    assert_eq!(&*vec, &[1, 2, 3, 4]);

    vec.assign_pod(&[9, 8]);
    assert_eq!(&*vec, &[9, 8]);
    assert_eq!(vec.as_ptr(), ptr, "A small enough assignment should reuse the allocation.");

    let long: Vector<u32> = (0..100).collect();
    vec.assign_pod(&long);
    assert_eq!(vec, long);
    assert!(vec.cap() >= 100);
}

#[test]
fn test_reallocating_insert_rolls_back() {
    let mut vec = fragile_vector(&[1, 2, 3, 4], 4);
    let ptr = vec.as_ptr();

    assert_panics!({
        vec.insert_slice(0, &[Fragile::new(9), Fragile::poisoned(3)]);
    });
    assert_eq!(values(&vec), [1, 2, 3, 4], "Contents should be unchanged.");
    assert_eq!(vec.cap(), 4, "Capacity should be unchanged.");
    assert_eq!(vec.as_ptr(), ptr, "The original storage should still be in use.");

    assert_panics!({
        vec.insert_n(2, 3, &Fragile::poisoned(0));
    });
    assert_eq!(values(&vec), [1, 2, 3, 4]);
    assert_eq!(vec.cap(), 4);
}

#[test]
fn test_in_place_insert_rolls_back() {
    let mut vec = fragile_vector(&[1, 2, 3, 4], 10);

    assert_panics!({
        vec.insert_slice(1, &[Fragile::new(7), Fragile::new(8), Fragile::poisoned(9)]);
    });
    assert_eq!(values(&vec), [1, 2, 3, 4], "The tail should be shifted back.");
    assert_eq!(vec.cap(), 10);

    vec.insert_slice(1, &[Fragile::new(7), Fragile::new(8)]);
    assert_eq!(values(&vec), [1, 7, 8, 2, 3, 4]);
}

#[test]
fn test_rollback_drops_partial_clones() {
    let counter = CountedDrop::new(0);
    let mut vec: Vector<CountedDrop> = Vector::with_cap(2);
    vec.push(counter.clone());

    let mut calls = 0;
    assert_panics!({
        vec.resize_with(6, || {
            calls += 1;
            if calls == 4 {
                panic!("fourth value failed");
            }
            counter.clone()
        });
    });
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.cap(), 2);
    assert_eq!(*counter.borrow(), 3, "The three completed values should be dropped.");

    drop(vec);
    assert_eq!(*counter.borrow(), 4);
}

#[test]
fn test_erase_range() {
    let counter = CountedDrop::new(0);
    let mut vec = Vector::from_elem(&counter, 10);
    assert_eq!(*counter.borrow(), 0);

    vec.erase_range(2..5);
    assert_eq!(vec.len(), 7);
    assert_eq!(*counter.borrow(), 3);

    vec.erase_range(..=1);
    vec.erase_range(3..3);
    assert_eq!(vec.len(), 5);
    assert_eq!(*counter.borrow(), 5);

    vec.clear();
    assert_eq!(*counter.borrow(), 10);
    assert!(vec.cap() >= 10);

    let mut ints: Vector<_> = (0..6).collect();
    ints.erase_range(1..4);
    assert_eq!(&*ints, &[0, 4, 5]);
    assert_panics!({ ints.erase_range(2..4) });
    assert_panics!({ ints.erase_range(3..2) });
}

#[test]
fn test_erase_with_panicking_drop() {
    struct Bomb(bool, CountedDrop);

    impl Drop for Bomb {
        fn drop(&mut self) {
            if self.0 {
                panic!("boom");
            }
        }
    }

    let counter = CountedDrop::new(0);
    let mut vec = Vector::new();
    for i in 0..6 {
        vec.push(Bomb(i == 2, counter.clone()));
    }

    assert_panics!({ vec.erase_range(1..4) });
    assert_eq!(vec.len(), 3, "The gap should still be closed.");
    assert_eq!(*counter.borrow(), 3, "Every erased value should still be dropped.");
    assert!(vec.iter().all(|bomb| !bomb.0));
}

#[test]
fn test_resize_and_assign() {
    let mut vec: Vector<String> = Vector::new();
    vec.resize(3, String::from("a"));
    assert_eq!(&*vec, &["a", "a", "a"]);
    vec.resize(1, String::new());
    assert_eq!(&*vec, &["a"]);

    vec.reserve_exact(9);
    let ptr = vec.as_ptr();
    vec.assign(4, &String::from("b"));
    assert_eq!(&*vec, &["b", "b", "b", "b"]);
    assert_eq!(vec.as_ptr(), ptr, "Assigning within capacity shouldn't reallocate.");

    vec.assign_slice(&[String::from("c"), String::from("d")]);
    assert_eq!(&*vec, &["c", "d"]);

    vec.assign(20, &String::from("e"));
    assert_eq!(vec.len(), 20);
    assert!(vec.iter().all(|s| s == "e"));
}

#[test]
fn test_assign_rolls_back_when_reallocating() {
    let mut vec = fragile_vector(&[1, 2], 2);
    assert_panics!({ vec.assign(5, &Fragile::poisoned(3)) });
    assert_eq!(values(&vec), [1, 2]);

    let replacement = [Fragile::new(5), Fragile::new(6), Fragile::poisoned(7)];
    assert_panics!({ vec.assign_slice(&replacement) });
    assert_eq!(values(&vec), [1, 2]);
}

#[test]
fn test_checked_access() {
    let mut vec = Vector::from([1, 2, 3]);
    assert_eq!(vec.at(2), Ok(&3));
    assert_eq!(
        vec.at(3),
        Err(IndexOutOfBounds {
            index: 3,
            len: 3
        })
    );
    *vec.at_mut(0).expect("in bounds") = 10;
    assert_eq!(vec[0], 10);
    assert!(vec.at_mut(5).is_err());
}

#[test]
fn test_clone_rolls_back() {
    let vec = fragile_vector(&[1, 2, 3], 3);
    let cloned = vec.clone();
    assert_eq!(values(&cloned), [1, 2, 3]);
    assert_eq!(cloned.cap(), 3);

    let mut poisoned = fragile_vector(&[1, 2], 3);
    poisoned.push(Fragile::poisoned(3));
    assert_panics!({
        let _ = poisoned.clone();
    });
}

#[test]
fn test_into_iter() {
    let counter = CountedDrop::new(0);
    let vec = Vector::from_elem(&counter, 5);

    let mut iter = vec.into_iter();
    assert_eq!(iter.len(), 5);
    drop(iter.next());
    drop(iter.next_back());
    assert_eq!(iter.as_slice().len(), 3);
    assert_eq!(*counter.borrow(), 2);

    drop(iter);
    assert_eq!(*counter.borrow(), 5, "Dropping the iterator should drop the remaining values.");

    let vec: Vector<_> = (0..4).collect();
    assert_eq!(vec.into_iter().rev().collect::<Vec<_>>(), [3, 2, 1, 0]);
}

#[test]
fn test_allocator_usage() {
    let alloc = CountingAllocator::new();
    {
        let mut vec = Vector::new_in(alloc.clone());
        for i in 0..100_u32 {
            vec.push(i);
        }
        assert_eq!(alloc.live(), 1, "Only the current buffer should be live.");
        assert_eq!(alloc.allocations(), 8);

        alloc.fail_after(0);
        assert!(vec.try_reserve(1000).is_err_and(|e| e.is_out_of_memory()));
        assert_eq!(vec.cap(), 128, "A failed reservation shouldn't change anything.");
        assert!(vec.try_reserve(usize::MAX).is_err_and(|e| e.is_capacity_overflow()));
    }
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_zst_support() {
    let mut vec = Vector::new();
    for _ in 0..1000 {
        vec.push(ZeroSizedType);
    }
    assert_eq!(vec.len(), 1000);
    assert_eq!(vec.cap(), usize::MAX);
    vec.insert_n(10, 5, &ZeroSizedType);
    vec.erase_range(..500);
    assert_eq!(vec.len(), 505);
    assert_eq!(vec.into_iter().count(), 505);

    let counter = CountedDrop::new(0);
    let units: Vector<CountedDrop> = Vector::from_elem(&counter, 3);
    drop(units);
    assert_eq!(*counter.borrow(), 3);
}

#[test]
fn test_comparisons_and_formatting() {
    let a = Vector::from([1, 2, 3]);
    let b = Vector::from([1, 2, 4]);
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(a, Vector::from(&[1, 2, 3][..]));
    assert_eq!(format!("{a}"), "[1, 2, 3]");
    assert_eq!(format!("{a:?}"), "Vector { contents: [1, 2, 3], len: 3, cap: 3 }");
}

#[test]
fn test_matches_std_model() {
    let mut rng = rand::thread_rng();
    let mut vec = Vector::new();
    let mut model = Vec::new();

    for step in 0..2000 {
        match rng.gen_range(0..6) {
            0 | 1 => {
                vec.push(step);
                model.push(step);
            },
            2 => {
                let index = rng.gen_range(0..=model.len());
                vec.insert(index, step);
                model.insert(index, step);
            },
            3 => assert_eq!(vec.pop(), model.pop()),
            4 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                assert_eq!(vec.remove(index), model.remove(index));
            },
            _ => {
                let start = rng.gen_range(0..=model.len());
                let end = rng.gen_range(start..=model.len().min(start + 3));
                vec.erase_range(start..end);
                model.drain(start..end);
            },
        }
        assert_eq!(&*vec, &*model);
        assert!(vec.cap() >= vec.len());
    }
}
