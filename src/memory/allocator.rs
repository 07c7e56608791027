use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::construct;
use crate::util::error::{AllocError, CapacityOverflow, OutOfMemory};

/// A source of raw, uninitialized storage.
///
/// Every method is generic over the element type, so a single allocator value can provide storage
/// for whatever a collection needs internally (nodes, bucket arrays, buffer maps) as well as for
/// the elements themselves. This takes the place of rebinding an allocator to another type.
///
/// Allocators own no data. Collections store their own copy and clone it when they need another.
/// Collections that move nodes between instances (such as splicing two linked lists) assume that
/// values of the same allocator type can release each other's storage.
pub trait Allocator: Clone {
    /// Requests storage for `count` contiguous values of `T`. The storage is never initialized.
    ///
    /// Requests with a size of zero bytes succeed with a dangling pointer.
    ///
    /// # Errors
    /// Returns a [`CapacityOverflow`] if the size in bytes would exceed [`isize::MAX`], or an
    /// [`OutOfMemory`] if the platform can't provide the storage.
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError>;

    /// Releases storage previously returned by [`allocate`](Allocator::allocate). Zero sized
    /// requests are a no-op.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate::<T>(count)` on this allocator (or a clone of it)
    /// and not released since. Any values constructed in the storage must already be destroyed.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize);

    /// Constructs `value` in place at `ptr`.
    ///
    /// # Safety
    /// See [`construct::construct`].
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: Forwarded to the caller.
        unsafe { construct::construct(ptr, value) }
    }

    /// Constructs the value produced by `f` in place at `ptr`. If `f` panics, nothing is
    /// constructed.
    ///
    /// # Safety
    /// See [`construct::construct_with`].
    unsafe fn construct_with<T, F: FnOnce() -> T>(&self, ptr: NonNull<T>, f: F) {
        // SAFETY: Forwarded to the caller.
        unsafe { construct::construct_with(ptr, f) }
    }

    /// Destroys the value at `ptr` in place.
    ///
    /// # Safety
    /// See [`construct::destroy`].
    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        // SAFETY: Forwarded to the caller.
        unsafe { construct::destroy(ptr) }
    }

    /// The largest number of `T` that could ever be requested at once.
    fn max_size<T>(&self) -> usize {
        max_count::<T>()
    }
}

/// The default allocator, backed by the global heap in [`std::alloc`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

impl Allocator for Global {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(count)?;

        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: Zero-sized layouts have been guarded against.
        let raw_ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(raw_ptr.cast()).ok_or(AllocError::OutOfMemory(OutOfMemory { layout }))
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // The layout was valid when allocated, so it can't fail now.
        let Ok(layout) = array_layout::<T>(count) else { return };

        if layout.size() != 0 {
            // SAFETY: ptr was allocated in the global allocator with this same layout, as required
            // by the caller. Zero-sized layouts aren't allocated and are guarded against.
            unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
        }
    }
}

/// The largest number of `T` that fits in an allocation, bounded by [`isize::MAX`] bytes.
pub const fn max_count<T>() -> usize {
    match size_of::<T>() {
        0 => usize::MAX,
        size => isize::MAX as usize / size,
    }
}

/// A helper to create a [`Layout`] for `count` values of `T`.
///
/// # Errors
/// Returns a [`CapacityOverflow`] if the size in bytes would exceed [`isize::MAX`].
pub fn array_layout<T>(count: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow(CapacityOverflow))
}
