use std::ptr;

use super::{BidirectionalCursor, RawCursor};
use crate::traits::Pod;

/// Returns the number of positions in `[first, last)`. Constant time for random access cursors,
/// linear otherwise.
///
/// # Safety
/// `last` must be reachable from `first`.
pub unsafe fn distance<C: RawCursor>(first: C, last: C) -> usize {
    // SAFETY: Forwarded to the caller.
    unsafe { first.distance_to(&last) }
}

/// Returns `cursor` moved forward by `count` positions. Constant time for random access cursors.
///
/// # Safety
/// See [`RawCursor::advance_by`].
pub unsafe fn next<C: RawCursor>(mut cursor: C, count: usize) -> C {
    // SAFETY: Forwarded to the caller.
    unsafe { cursor.advance_by(count) };
    cursor
}

/// Returns `cursor` moved backward by `count` positions. Constant time for random access cursors.
///
/// # Safety
/// See [`BidirectionalCursor::retreat_by`].
pub unsafe fn prev<C: BidirectionalCursor>(mut cursor: C, count: usize) -> C {
    // SAFETY: Forwarded to the caller.
    unsafe { cursor.retreat_by(count) };
    cursor
}

/// Moves the values in `[first, last)` into the slots starting at `dest`, front to back, and
/// returns the position after the last slot written. The source slots are left logically
/// uninitialized.
///
/// Moving is a bitwise copy and can't panic. Contiguous cursors are moved with a single
/// [`ptr::copy`].
///
/// # Safety
/// - `[first, last)` must hold live values.
/// - The destination must have room for `distance(first, last)` values. If the ranges overlap,
///   `dest` must come before `first`.
/// - Any live values in the destination are overwritten without being dropped.
pub unsafe fn relocate<S, D>(first: S, last: S, mut dest: D) -> D
where
    S: RawCursor,
    D: RawCursor<Item = S::Item>,
{
    if S::CONTIGUOUS && D::CONTIGUOUS {
        // SAFETY: Both ranges are contiguous, so a memmove is equivalent to the loop below.
        unsafe {
            let count = first.distance_to(&last);
            ptr::copy(first.ptr(), dest.ptr(), count);
            dest.advance_by(count);
        }
        return dest;
    }

    let mut src = first;
    while src != last {
        // SAFETY: src refers to a live value and dest to a slot with room for it. Reading front to
        // back is sound for overlapping ranges where dest precedes src.
        unsafe {
            dest.ptr().write(src.ptr().read());
            src.step();
            dest.step();
        }
    }
    dest
}

/// Moves the values in `[first, last)` into the slots ending at `dest_last`, back to front, and
/// returns the position of the first slot written.
///
/// # Safety
/// As with [`relocate`], except that overlapping ranges require `dest_last` to come after `last`.
pub unsafe fn relocate_backward<S, D>(first: S, last: S, mut dest_last: D) -> D
where
    S: BidirectionalCursor,
    D: BidirectionalCursor<Item = S::Item>,
{
    if S::CONTIGUOUS && D::CONTIGUOUS {
        // SAFETY: Both ranges are contiguous, so a memmove is equivalent to the loop below.
        unsafe {
            let count = first.distance_to(&last);
            dest_last.retreat_by(count);
            ptr::copy(first.ptr(), dest_last.ptr(), count);
        }
        return dest_last;
    }

    let mut src = last;
    while src != first {
        // SAFETY: src steps back over live values and dest_last steps back over slots with room.
        unsafe {
            src.step_back();
            dest_last.step_back();
            dest_last.ptr().write(src.ptr().read());
        }
    }
    dest_last
}

/// Assigns a clone of each value in `[first, last)` over the live values starting at `dest`,
/// returning the position after the last one assigned.
///
/// # Panics
/// If [`Clone::clone_from`] panics, the assignments made so far remain, but every value is still
/// live.
///
/// # Safety
/// Both ranges must hold live values and must not overlap.
pub unsafe fn copy<S, D>(first: S, last: S, mut dest: D) -> D
where
    S: RawCursor,
    D: RawCursor<Item = S::Item>,
    S::Item: Clone,
{
    let mut src = first;
    while src != last {
        // SAFETY: Both positions refer to distinct live values.
        unsafe {
            (*dest.ptr()).clone_from(&*src.ptr());
            src.step();
            dest.step();
        }
    }
    dest
}

/// Assigns a clone of each value in `[first, last)` over the live values ending at `dest_last`,
/// back to front, returning the position of the first one assigned.
///
/// # Panics
/// See [`copy`].
///
/// # Safety
/// Both ranges must hold live values and must not overlap.
pub unsafe fn copy_backward<S, D>(first: S, last: S, mut dest_last: D) -> D
where
    S: BidirectionalCursor,
    D: BidirectionalCursor<Item = S::Item>,
    S::Item: Clone,
{
    let mut src = last;
    while src != first {
        // SAFETY: Both positions refer to distinct live values.
        unsafe {
            src.step_back();
            dest_last.step_back();
            (*dest_last.ptr()).clone_from(&*src.ptr());
        }
    }
    dest_last
}

/// Copies the plain-old-data in `[first, last)` over the slots starting at `dest`. Contiguous
/// cursors are copied with a single [`ptr::copy`].
///
/// # Safety
/// The destination must have room for the values. Overlap is only allowed if `dest` precedes
/// `first`.
pub unsafe fn copy_pod<S, D>(first: S, last: S, dest: D) -> D
where
    S: RawCursor,
    D: RawCursor<Item = S::Item>,
    S::Item: Pod,
{
    // SAFETY: Pod values are copied bitwise, so relocating them leaves the source intact.
    unsafe { relocate(first, last, dest) }
}

/// Assigns a clone of `value` over every live value in `[first, last)`.
///
/// # Safety
/// The range must hold live values.
pub unsafe fn fill<C>(first: C, last: C, value: &C::Item)
where
    C: RawCursor,
    C::Item: Clone,
{
    let mut curr = first;
    while curr != last {
        // SAFETY: curr refers to a live value.
        unsafe {
            (*curr.ptr()).clone_from(value);
            curr.step();
        }
    }
}

/// Assigns a clone of `value` over `count` live values starting at `first`, returning the position
/// after the last one assigned.
///
/// # Safety
/// The `count` positions from `first` must hold live values.
pub unsafe fn fill_n<C>(mut first: C, count: usize, value: &C::Item) -> C
where
    C: RawCursor,
    C::Item: Clone,
{
    for _ in 0..count {
        // SAFETY: first refers to a live value.
        unsafe {
            (*first.ptr()).clone_from(value);
            first.step();
        }
    }
    first
}
