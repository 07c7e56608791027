#![cfg(test)]

use std::collections::VecDeque;
use std::hash::{BuildHasher, RandomState};

use rand::Rng;

use super::*;
use crate::iter::{BidirectionalCursor, RandomAccessCursor, RawCursor};
use crate::util::alloc::{CountedDrop, CountingAllocator, Fragile};
use crate::util::error::IndexOutOfBounds;
use crate::util::panic::assert_panics;

/// The number of u64s in a single buffer.
const U64_BUFFER: usize = 64;

fn fragile_deque(count: i32) -> Deque<Fragile> {
    (0..count).map(Fragile::new).collect()
}

fn values(deque: &Deque<Fragile>) -> Vec<i32> {
    deque.iter().map(|f| f.value).collect()
}

#[test]
fn test_push_both_ends() {
    let mut deque = Deque::from([1, 2, 3]);
    deque.push_front(0);
    deque.push_back(4);
    assert_eq!(deque.len(), 5);
    assert!(deque.iter().eq(&[0, 1, 2, 3, 4]));
    assert_eq!(deque.front(), Some(&0));
    assert_eq!(deque.back(), Some(&4));
}

#[test]
fn test_buffer_size() {
    assert_eq!(Buffer::<u8>::SIZE, 512);
    assert_eq!(Buffer::<u64>::SIZE, U64_BUFFER);
    assert_eq!(Buffer::<[u8; 300]>::SIZE, 1);
    assert_eq!(Buffer::<[u8; 4096]>::SIZE, 1);
}

#[test]
fn test_empty_deque_allocates_nothing() {
    let alloc = CountingAllocator::new();
    let deque: Deque<u64, _> = Deque::new_in(alloc.clone());
    assert!(deque.is_empty());
    assert_eq!(deque.len(), 0);
    assert_eq!(deque.cap(), 0);
    assert_eq!(deque.iter().next(), None);
    drop(deque);
    assert_eq!(alloc.allocations(), 0);
}

#[test]
fn test_cursor_arithmetic() {
    let deque: Deque<u64> = (0..200).collect();
    let begin = deque.begin();
    let end = deque.end();

    // SAFETY: Every position used is within the Deque.
    unsafe {
        assert_eq!(end.diff(&begin), 200);
        assert_eq!(begin.diff(&end), -200);
        assert_eq!(begin.distance_to(&end), 200);

        let mut cursor = begin;
        cursor.jump(130);
        assert_eq!(*cursor.ptr(), 130);
        assert_eq!(cursor.diff(&begin), 130);

        cursor.jump(-65);
        assert_eq!(*cursor.ptr(), 65);

        // Within a single buffer.
        let near = begin.offset(3);
        assert_eq!(near.diff(&begin), 3);
        assert_eq!(*near.ptr(), 3);

        let mut back = end;
        back.step_back();
        assert_eq!(*back.ptr(), 199);
    }
}

#[test]
fn test_growth_across_many_buffers() {
    let mut deque = Deque::new();
    for i in 0..10_000_u64 {
        if i % 2 == 0 {
            deque.push_back(i);
        } else {
            deque.push_front(i);
        }
    }
    assert_eq!(deque.len(), 10_000);

    let mut model = VecDeque::new();
    for i in 0..10_000_u64 {
        if i % 2 == 0 {
            model.push_back(i);
        } else {
            model.push_front(i);
        }
    }
    assert!(deque.iter().eq(model.iter()));
    assert_eq!(deque[5_000], model[5_000]);
}

#[test]
fn test_map_recenters_instead_of_growing() {
    let mut deque: Deque<u64> = Deque::new();
    for i in 0..(U64_BUFFER * 10) as u64 {
        deque.push_back(i);
    }
    deque.erase_range(..U64_BUFFER * 9);
    deque.shrink_to_fit();
    let map_size = deque.map_size;

    for round in 0..100 {
        for i in 0..U64_BUFFER as u64 {
            deque.push_back(round * 1000 + i);
        }
        for _ in 0..U64_BUFFER {
            deque.pop_front();
        }
        deque.shrink_to_fit();
    }

    assert_eq!(deque.map_size, map_size, "A small window sliding through the map shouldn't grow it.");
    assert_eq!(deque.len(), U64_BUFFER);
    assert!(deque.iter().copied().eq((0..U64_BUFFER as u64).map(|i| 99_000 + i)));
}

#[test]
fn test_popped_buffers_are_reused() {
    let alloc = CountingAllocator::new();
    let mut deque = Deque::new_in(alloc.clone());
    for i in 0..(U64_BUFFER * 10) as u64 {
        deque.push_back(i);
    }
    let allocations = alloc.allocations();

    while deque.pop_back().is_some() {}
    assert!(deque.cap() >= U64_BUFFER * 10, "Popping should keep buffers as spares.");

    for i in 0..(U64_BUFFER * 10) as u64 {
        deque.push_back(i);
    }
    assert_eq!(alloc.allocations(), allocations, "Pushing should reuse the spare buffers.");

    deque.clear();
    deque.shrink_to_fit();
    assert_eq!(alloc.live(), 0, "Shrinking an empty Deque should release everything.");
    assert_eq!(deque.cap(), 0);

    deque.push_front(1);
    assert_eq!(deque.front(), Some(&1));
}

#[test]
fn test_reserve() {
    let alloc = CountingAllocator::new();
    let mut deque = Deque::new_in(alloc.clone());
    deque.reserve_back(500);
    deque.reserve_front(300);
    let allocations = alloc.allocations();

    for i in 0..500_u64 {
        deque.push_back(i);
    }
    for i in 0..300_u64 {
        deque.push_front(i);
    }
    assert_eq!(alloc.allocations(), allocations, "Reserved room shouldn't need more buffers.");
    assert_eq!(deque.len(), 800);
}

#[test]
fn test_try_reserve_reports_failure() {
    let alloc = CountingAllocator::new();
    let mut deque: Deque<u64, _> = Deque::new_in(alloc.clone());
    alloc.fail_after(0);
    assert!(deque.try_reserve_back(10).is_err_and(|e| e.is_out_of_memory()));
    assert!(deque.is_empty());
    assert_eq!(alloc.live(), 0);

    let mut deque: Deque<u64, _> = Deque::new_in(CountingAllocator::new());
    assert!(deque.try_reserve_front(usize::MAX).is_err_and(|e| e.is_capacity_overflow()));
}

#[test]
fn test_insert_and_remove() {
    let mut deque: Deque<i32> = (0..10).collect();
    deque.insert(2, 100);
    deque.insert(9, 200);
    deque.insert(0, -1);
    deque.insert(deque.len(), 300);
    assert!(deque.iter().eq(&[-1, 0, 1, 100, 2, 3, 4, 5, 6, 7, 200, 8, 9, 300]));

    assert_eq!(deque.remove(3), 100);
    assert_eq!(deque.remove(9), 200);
    assert_eq!(deque.remove(0), -1);
    assert_eq!(deque.remove(deque.len() - 1), 300);
    assert!(deque.iter().eq(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]));

    assert_panics!({ deque.insert(11, 0) });
    assert_panics!({ deque.remove(10) });
}

#[test]
fn test_bulk_insertion() {
    let mut deque: Deque<u64> = (0..300).collect();
    deque.insert_n(10, 200, &7);
    deque.insert_slice(450, &[1, 2, 3]);
    deque.insert_iter(0, [9, 9]);
    assert_eq!(deque.len(), 505);

    let mut model: VecDeque<u64> = (0..300).collect();
    for _ in 0..200 {
        model.insert(10, 7);
    }
    for (offset, value) in [1, 2, 3].into_iter().enumerate() {
        model.insert(450 + offset, value);
    }
    model.push_front(9);
    model.push_front(9);
    assert!(deque.iter().eq(model.iter()));
}

#[test]
fn test_insert_rolls_back_at_front() {
    let mut deque = fragile_deque(10);
    let extra = [Fragile::new(100), Fragile::new(101), Fragile::poisoned(102)];
    assert_panics!({ deque.insert_slice(2, &extra) });
    assert_eq!(values(&deque), (0..10).collect::<Vec<_>>());

    deque.push_front(Fragile::new(-1));
    assert_eq!(deque.front().map(|f| f.value), Some(-1));
}

#[test]
fn test_insert_rolls_back_at_back() {
    let mut deque = fragile_deque(200);
    assert_panics!({ deque.insert_n(150, 100, &Fragile::poisoned(7)) });
    assert_eq!(values(&deque), (0..200).collect::<Vec<_>>());

    let mut calls = 0;
    assert_panics!({
        deque.resize_with(300, || {
            calls += 1;
            if calls == 50 {
                panic!("no more values");
            }
            Fragile::new(1000)
        })
    });
    assert_eq!(deque.len(), 200);
    deque.push_back(Fragile::new(200));
    assert_eq!(values(&deque), (0..=200).collect::<Vec<_>>());
}

#[test]
fn test_rollback_drops_partial_clones() {
    let counter = CountedDrop::new(0);

    struct Limited(CountedDrop, bool);

    impl Clone for Limited {
        fn clone(&self) -> Self {
            if self.1 {
                panic!("Limited refused to be cloned");
            }
            Limited(self.0.clone(), false)
        }
    }

    let mut limited: Deque<Limited> = Deque::new();
    limited.push_back(Limited(counter.clone(), false));
    let source = [
        Limited(counter.clone(), false),
        Limited(counter.clone(), false),
        Limited(counter.clone(), true),
    ];
    assert_panics!({ limited.insert_slice(1, &source) });
    assert_eq!(*counter.borrow(), 2, "The two completed clones should be dropped.");
    assert_eq!(limited.len(), 1);
}

#[test]
fn test_erase_range() {
    let mut deque: Deque<u64> = (0..500).collect();
    deque.erase_range(10..60);
    deque.erase_range(400..420);
    let model: Vec<u64> = (0..10).chain(60..450).chain(470..500).collect();
    assert!(deque.iter().eq(model.iter()));

    deque.truncate(5);
    assert!(deque.iter().eq(&[0, 1, 2, 3, 4]));
    deque.clear();
    assert!(deque.is_empty());

    assert_panics!({ deque.erase_range(0..1) });
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
    let mut deque = Deque::new();
    for i in 0..8 {
        deque.push_back(Bomb(i == 5, counter.clone()));
    }

    assert_panics!({ deque.erase_range(4..7) });
    assert_eq!(deque.len(), 5, "The gap should still be closed.");
    assert_eq!(*counter.borrow(), 3, "Every erased value should still be dropped.");
    assert!(deque.iter().all(|bomb| !bomb.0));
}

#[test]
fn test_checked_access() {
    let mut deque = Deque::from([1, 2, 3]);
    assert_eq!(deque.at(1), Ok(&2));
    assert_eq!(deque.at(3), Err(IndexOutOfBounds { index: 3, len: 3 }));
    *deque.at_mut(0).unwrap() = 10;
    deque[2] = 30;
    assert!(deque.iter().eq(&[10, 2, 30]));
    assert_eq!(deque.get(3), None);

    deque.swap(0, 2);
    assert!(deque.iter().eq(&[30, 2, 10]));
    assert!(deque.contains(&2));
    assert_panics!({ deque.swap(0, 3) });
    assert_panics!({
        let _ = deque[3];
    });
}

#[test]
fn test_iteration() {
    let mut deque: Deque<u64> = (0..150).collect();
    for value in deque.iter_mut() {
        *value *= 2;
    }
    assert!(deque.iter().rev().copied().eq((0..150).rev().map(|i| i * 2)));

    let mut iter = deque.iter();
    assert_eq!(iter.len(), 150);
    iter.next();
    iter.next_back();
    assert_eq!(iter.len(), 148);

    let mut owned = deque.into_iter();
    assert_eq!(owned.next(), Some(0));
    assert_eq!(owned.next_back(), Some(298));
    assert_eq!(owned.len(), 148);
}

#[test]
fn test_clone_and_compare() {
    let deque: Deque<String> = (0..300).map(|i| i.to_string()).collect();
    let clone = deque.clone();
    assert_eq!(deque, clone);

    let state = RandomState::new();
    assert_eq!(state.hash_one(&deque), state.hash_one(&clone));

    let mut other = clone.clone();
    other.pop_back();
    assert_ne!(deque, other);

    let fragile = Deque::from([Fragile::new(1), Fragile::poisoned(2)]);
    assert_panics!({ fragile.clone() });

    let small = Deque::from([1, 2]);
    assert!(format!("{small:?}").starts_with("Deque { contents: [1, 2], len: 2, cap: "));
}

#[test]
fn test_storage_is_released() {
    let alloc = CountingAllocator::new();
    let counter = CountedDrop::new(0);
    let mut deque = Deque::new_in(alloc.clone());
    for _ in 0..1000 {
        deque.push_back(counter.clone());
    }
    deque.insert_n(500, 10, &counter);
    deque.erase_range(100..200);
    drop(deque);

    assert_eq!(alloc.live(), 0);
    assert_eq!(*counter.borrow(), 1010);
}

#[test]
fn test_matches_std_model() {
    let mut rng = rand::thread_rng();
    let mut deque = Deque::new();
    let mut model = VecDeque::new();

    for step in 0..3000_u64 {
        match rng.gen_range(0..8) {
            0 | 1 => {
                deque.push_back(step);
                model.push_back(step);
            },
            2 | 3 => {
                deque.push_front(step);
                model.push_front(step);
            },
            4 => {
                let index = rng.gen_range(0..=model.len());
                deque.insert(index, step);
                model.insert(index, step);
            },
            5 => {
                if rng.gen_bool(0.5) {
                    assert_eq!(deque.pop_front(), model.pop_front());
                } else {
                    assert_eq!(deque.pop_back(), model.pop_back());
                }
            },
            6 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                assert_eq!(Some(deque.remove(index)), model.remove(index));
            },
            _ => {
                let start = rng.gen_range(0..=model.len());
                let end = rng.gen_range(start..=model.len().min(start + 70));
                deque.erase_range(start..end);
                model.drain(start..end);
            },
        }
        assert_eq!(deque.len(), model.len());
        assert!(deque.iter().eq(model.iter()));
        assert!(deque.cap() >= deque.len());
    }
}
