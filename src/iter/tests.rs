#![cfg(test)]

use std::ptr::NonNull;

use super::*;

/// A cursor that visits every second slot of an array, to exercise the non-contiguous paths.
#[derive(Debug)]
struct Stride<T>(NonNull<T>);

impl<T> Clone for Stride<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Stride<T> {}

impl<T> PartialEq for Stride<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

// SAFETY: Stepping skips a slot, so CONTIGUOUS is left false. Only the bidirectional tier is
// implemented.
unsafe impl<T> RawCursor for Stride<T> {
    type Item = T;

    const CATEGORY: Category = Category::Bidirectional;

    fn ptr(&self) -> *mut T {
        self.0.as_ptr()
    }

    unsafe fn step(&mut self) {
        // SAFETY: Forwarded to the caller.
        self.0 = unsafe { self.0.add(2) };
    }
}

// SAFETY: See above.
unsafe impl<T> BidirectionalCursor for Stride<T> {
    unsafe fn step_back(&mut self) {
        // SAFETY: Forwarded to the caller.
        self.0 = unsafe { self.0.sub(2) };
    }
}

fn base<T>(slice: &mut [T]) -> NonNull<T> {
    NonNull::from(slice).cast()
}

#[test]
fn test_categories() {
    assert_eq!(category_of::<NonNull<u8>>(), Category::RandomAccess);
    assert_eq!(category_of::<Stride<u8>>(), Category::Bidirectional);
    assert!(Category::Input < Category::Forward);
    assert!(Category::Bidirectional < Category::RandomAccess);
}

#[test]
fn test_distance_and_advance() {
    let mut values = [0_u32; 10];
    let first = base(&mut values);

    // SAFETY: All positions are within values.
    unsafe {
        let last = next(first, 10);
        assert_eq!(distance(first, last), 10);
        assert_eq!(prev(last, 4).ptr(), first.add(6).as_ptr());
        assert_eq!(last.diff(&first), 10);
        assert_eq!(first.diff(&last), -10);

        let mut jumped = first;
        jumped.jump(7);
        jumped.jump(-3);
        assert_eq!(jumped, first.add(4));

        let stride = Stride(first);
        let stride_last = next(stride, 5);
        assert_eq!(distance(stride, stride_last), 5, "Loops should count steps, not slots.");
        assert_eq!(prev(stride_last, 1), Stride(first.add(8)));
    }

    let units = NonNull::<()>::dangling();
    // SAFETY: Zero sized positions never move.
    assert_eq!(unsafe { units.diff(&next(units, 3)) }, 0);
}

#[test]
fn test_relocate_overlapping() {
    let mut values = [1, 2, 3, 4, 5, 0, 0];
    let first = base(&mut values);

    // SAFETY: Integers can be moved bitwise in either direction and all positions are in bounds.
    unsafe {
        let end = relocate_backward(first, first.add(5), first.add(7));
        assert_eq!(end, first.add(2));
    }
    assert_eq!(&values[2..], &[1, 2, 3, 4, 5]);

    let first = base(&mut values);
    // SAFETY: As above.
    unsafe {
        let end = relocate(first.add(2), first.add(7), first);
        assert_eq!(end, first.add(5));
    }
    assert_eq!(&values[..5], &[1, 2, 3, 4, 5]);
}

#[test]
fn test_strided_relocate() {
    let mut values = [10, 0, 20, 0, 30, 0];
    let mut dest = [0; 3];
    let src = Stride(base(&mut values));

    // SAFETY: The strided range covers exactly three integers and dest has room for them.
    unsafe {
        let end = relocate(src, next(src, 3), base(&mut dest));
        assert_eq!(end.ptr(), dest.as_mut_ptr().add(3));
    }
    assert_eq!(dest, [10, 20, 30]);

    let mut back = [1, 2, 3];
    let mut spread = [0; 6];
    let dest = Stride(base(&mut spread));
    // SAFETY: As above, in reverse.
    unsafe {
        let source = base(&mut back);
        relocate_backward(source, source.add(3), next(dest, 3));
    }
    assert_eq!(spread, [1, 0, 2, 0, 3, 0]);
}

#[test]
fn test_copy_and_fill() {
    let src = [String::from("a"), String::from("b"), String::from("c")];
    let mut dest = vec![String::new(); 4];
    let src_first = NonNull::from(&src[0]);

    // SAFETY: Both ranges hold live strings and don't overlap.
    unsafe {
        let dest_first = base(&mut dest);
        let end = copy(src_first, src_first.add(3), dest_first);
        assert_eq!(end, dest_first.add(3));
    }
    assert_eq!(dest, ["a", "b", "c", ""]);

    // SAFETY: As above.
    unsafe {
        let dest_last = base(&mut dest).add(4);
        copy_backward(src_first, src_first.add(2), dest_last);
    }
    assert_eq!(dest, ["a", "b", "a", "b"]);

    let value = String::from("z");
    // SAFETY: All positions hold live strings.
    unsafe {
        let first = base(&mut dest);
        fill(first.add(1), first.add(3), &value);
        assert_eq!(fill_n(first.add(3), 1, &value), first.add(4));
    }
    assert_eq!(dest, ["a", "z", "z", "z"]);
}

#[test]
fn test_copy_pod() {
    let src = [1.5_f64, 2.5, 3.5];
    let mut dest = [0.0; 3];
    let first = NonNull::from(&src[0]);

    // SAFETY: Both ranges are in bounds and distinct.
    unsafe { copy_pod(first, first.add(3), base(&mut dest)) };
    assert_eq!(dest, src);
}
