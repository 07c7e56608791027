#![cfg(test)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::util::alloc::{CountedDrop, CountingAllocator, ZeroSizedType};
use crate::util::panic::assert_panics;

/// Counts its drops in a shared cell and panics when cloned while poisoned.
#[derive(Debug)]
struct Tracked {
    drops: Rc<Cell<usize>>,
    poisoned: bool,
}

impl Tracked {
    fn new(drops: &Rc<Cell<usize>>, poisoned: bool) -> Tracked {
        Tracked {
            drops: drops.clone(),
            poisoned,
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if self.poisoned {
            panic!("refusing to clone");
        }
        Tracked::new(&self.drops, false)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_global_allocation() {
    let ptr = Global.allocate::<u64>(16).expect("allocation should succeed");
    for i in 0..16 {
        // SAFETY: The allocation has room for 16 u64 values.
        unsafe { construct(ptr.add(i), i as u64) };
    }
    // SAFETY: The first 16 values were just constructed.
    assert_eq!(unsafe { ptr.add(15).read() }, 15);
    // SAFETY: ptr came from this allocator with the same count.
    unsafe { Global.deallocate(ptr, 16) };

    assert_eq!(
        Global.allocate::<u64>(0),
        Ok(std::ptr::NonNull::dangling()),
        "Empty requests shouldn't reach the heap."
    );
    assert_eq!(
        Global.allocate::<ZeroSizedType>(usize::MAX),
        Ok(std::ptr::NonNull::dangling()),
        "Zero sized types shouldn't reach the heap."
    );
}

#[test]
fn test_allocation_overflow() {
    assert!(Global.allocate::<u64>(usize::MAX).is_err_and(|e| e.is_capacity_overflow()));
    assert!(array_layout::<u32>(max_count::<u32>()).is_ok());
    assert!(array_layout::<u32>(max_count::<u32>() + 1).is_err());
    assert_eq!(max_count::<ZeroSizedType>(), usize::MAX);
    assert_eq!(Global.max_size::<u16>(), isize::MAX as usize / 2);
}

#[test]
fn test_counting_allocator_failure() {
    let alloc = CountingAllocator::new();
    alloc.fail_after(1);

    let ptr = alloc.allocate::<u8>(4).expect("first allocation is within budget");
    assert!(alloc.allocate::<u8>(4).is_err_and(|e| e.is_out_of_memory()));
    assert_eq!(alloc.live(), 1);

    // SAFETY: ptr was allocated above with the same count.
    unsafe { alloc.deallocate(ptr, 4) };
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_construct_with_panic() {
    let drops = CountedDrop::new(0);
    let ptr = Global.allocate::<CountedDrop>(1).expect("allocation should succeed");

    assert_panics!({
        // SAFETY: ptr has room for one value.
        unsafe { Global.construct_with(ptr, || -> CountedDrop { panic!("no value") }) }
    });
    assert_eq!(*drops.borrow(), 0);

    // SAFETY: ptr has room for one value and then holds a live one.
    unsafe {
        Global.construct(ptr, drops.clone());
        Global.destroy(ptr);
        Global.deallocate(ptr, 1);
    }
    assert_eq!(*drops.borrow(), 1, "Destroy should drop exactly once.");
}

#[test]
fn test_destroy_range() {
    let drops = CountedDrop::new(0);
    let ptr = Global.allocate::<CountedDrop>(5).expect("allocation should succeed");

    // SAFETY: The storage has room for five values, all constructed before being destroyed.
    unsafe {
        uninitialized_fill_n(ptr, 5, &drops);
        destroy_range(ptr, 3);
        destroy_between(ptr.add(3), ptr.add(5));
        Global.deallocate(ptr, 5);
    }
    assert_eq!(*drops.borrow(), 5);
}

#[test]
fn test_copy_rolls_back() {
    let drops = Rc::new(Cell::new(0));
    let src = [
        Tracked::new(&drops, false),
        Tracked::new(&drops, false),
        Tracked::new(&drops, true),
        Tracked::new(&drops, false),
    ];
    let dest = Global.allocate::<Tracked>(src.len()).expect("allocation should succeed");

    assert_panics!({
        // SAFETY: dest has room for every value in src.
        unsafe { uninitialized_copy(src.iter(), dest) };
    });
    assert_eq!(drops.get(), 2, "Both completed clones should be destroyed.");

    // SAFETY: dest holds no live values after the rollback.
    unsafe { Global.deallocate(dest, src.len()) };
    drop(src);
    assert_eq!(drops.get(), 6);
}

#[test]
fn test_copy_commits() {
    let src = [String::from("a"), String::from("b"), String::from("c")];
    let dest = Global.allocate::<String>(3).expect("allocation should succeed");

    // SAFETY: dest has room for all three values, which are read and dropped before deallocating.
    unsafe {
        let end = uninitialized_copy(src.iter(), dest);
        assert_eq!(end, dest.add(3));
        assert_eq!(std::slice::from_raw_parts(dest.as_ptr(), 3), &src);
        destroy_range(dest, 3);
        Global.deallocate(dest, 3);
    }
}

#[test]
fn test_fill_with_rolls_back() {
    let drops = CountedDrop::new(0);
    let dest = Global.allocate::<CountedDrop>(8).expect("allocation should succeed");

    let mut calls = 0;
    assert_panics!({
        // SAFETY: dest has room for eight values.
        unsafe {
            uninitialized_fill_with(dest, 8, || {
                calls += 1;
                if calls == 5 {
                    panic!("fifth value failed");
                }
                drops.clone()
            })
        };
    });
    assert_eq!(*drops.borrow(), 4);

    // SAFETY: dest holds no live values after the rollback.
    unsafe { Global.deallocate(dest, 8) };
}

#[test]
fn test_fill_range() {
    let dest = Global.allocate::<Vec<u8>>(4).expect("allocation should succeed");
    let value = vec![1, 2, 3];

    // SAFETY: dest has room for four values, which are dropped before deallocating.
    unsafe {
        uninitialized_fill(dest, dest.add(4), &value);
        for i in 0..4 {
            assert_eq!(*dest.add(i).as_ref(), value);
        }
        destroy_range(dest, 4);
        Global.deallocate(dest, 4);
    }
}

#[test]
fn test_zst_rollback_counts() {
    thread_local! {
        static GHOST_DROPS: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Debug)]
    struct Ghost;

    impl Drop for Ghost {
        fn drop(&mut self) {
            GHOST_DROPS.with(|drops| drops.set(drops.get() + 1));
        }
    }

    let dest = Global.allocate::<Ghost>(10).expect("zero sized allocation");

    let mut calls = 0;
    assert_panics!({
        // SAFETY: Zero sized values need no storage.
        unsafe {
            uninitialized_fill_with(dest, 10, || {
                calls += 1;
                if calls == 7 {
                    panic!("seventh value failed");
                }
                Ghost
            })
        };
    });
    assert_eq!(
        GHOST_DROPS.with(Cell::get),
        6,
        "Every zero sized value should be destroyed, even though they share an address."
    );

    let units = Global.allocate::<ZeroSizedType>(3).expect("zero sized allocation");
    // SAFETY: Zero sized values need no storage.
    let end = unsafe { uninitialized_fill_n(units, 3, &ZeroSizedType) };
    assert_eq!(end, units);
}

#[test]
fn test_pod_fast_paths() {
    let bytes = Global.allocate::<u8>(32).expect("allocation should succeed");
    let words = Global.allocate::<u32>(8).expect("allocation should succeed");

    // SAFETY: Both allocations have room for the values written and only read what is written.
    unsafe {
        uninitialized_fill_pod(bytes, 32, 0xAB_u8);
        assert!(std::slice::from_raw_parts(bytes.as_ptr(), 32).iter().all(|b| *b == 0xAB));

        let end = uninitialized_fill_pod(words, 4, 7_u32);
        uninitialized_copy_pod(&[1_u32, 2, 3, 4], end);
        assert_eq!(
            std::slice::from_raw_parts(words.as_ptr(), 8),
            &[7, 7, 7, 7, 1, 2, 3, 4]
        );

        Global.deallocate(bytes, 32);
        Global.deallocate(words, 8);
    }
}

#[test]
fn test_move_leaves_source_uninit() {
    let drops = CountedDrop::new(0);
    let src = Global.allocate::<CountedDrop>(3).expect("allocation should succeed");
    let dest = Global.allocate::<CountedDrop>(3).expect("allocation should succeed");

    // SAFETY: src is filled before being moved, after which only dest holds live values.
    unsafe {
        uninitialized_fill_n(src, 3, &drops);
        uninitialized_move(src, 3, dest);
        Global.deallocate(src, 3);
        assert_eq!(*drops.borrow(), 0, "Moving shouldn't drop anything.");
        destroy_range(dest, 3);
        Global.deallocate(dest, 3);
    }
    assert_eq!(*drops.borrow(), 3);
}

#[test]
fn test_raw_buf_relocate() {
    let alloc = CountingAllocator::new();
    let mut buf = RawBuf::<String, _>::try_with_cap_in(2, alloc.clone()).expect("within budget");

    // SAFETY: The buffer has room for two values, which are moved and then dropped.
    unsafe {
        construct(buf.slot(0), String::from("first"));
        construct(buf.slot(1), String::from("second"));
        buf.try_relocate(2, 8).expect("within budget");
        assert_eq!(buf.cap(), 8);
        assert_eq!(buf.slot(1).as_ref(), "second");
        destroy_range(buf.slot(0), 2);
    }
    assert_eq!(alloc.allocations(), 2);
    assert_eq!(alloc.live(), 1, "The old buffer should be released.");

    alloc.fail_after(0);
    // SAFETY: The buffer holds no live values.
    let result = unsafe { buf.try_relocate(0, 16) };
    assert!(result.is_err());
    assert_eq!(buf.cap(), 8, "A failed relocation should change nothing.");

    drop(buf);
    assert_eq!(alloc.live(), 0);
}
