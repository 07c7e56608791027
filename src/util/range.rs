use std::ops::{Bound, Range, RangeBounds};

use super::error::IndexOutOfBounds;
use super::result::ResultExtension;

/// Resolves any range of indices against a collection with `len` elements.
///
/// # Panics
/// Panics if the range ends past `len` or starts after it ends.
pub(crate) fn resolve_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(start) => *start,
        Bound::Excluded(start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(end) => end.saturating_add(1),
        Bound::Excluded(end) => *end,
        Bound::Unbounded => len,
    };

    if end > len {
        Err(IndexOutOfBounds {
            index: end,
            len,
        }).throw()
    }
    if start > end {
        Err(IndexOutOfBounds {
            index: start,
            len: end,
        }).throw()
    }

    start..end
}
