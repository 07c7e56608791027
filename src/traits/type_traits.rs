use std::marker::PhantomData;
use std::mem;

/// Capability queries for an element type `T`, all resolved at compile time.
///
/// Because each query is an associated constant, branches such as
/// `if TypeTraits::<T>::HAS_TRIVIAL_DESTRUCTOR { return; }` are removed entirely for types that
/// don't need them.
///
/// # Examples
/// ```
/// # use raw_collections::traits::TypeTraits;
/// assert!(TypeTraits::<u32>::HAS_TRIVIAL_DESTRUCTOR);
/// assert!(!TypeTraits::<String>::HAS_TRIVIAL_DESTRUCTOR);
/// assert!(TypeTraits::<()>::IS_ZERO_SIZED);
/// ```
pub struct TypeTraits<T>(PhantomData<T>);

impl<T> TypeTraits<T> {
    /// Destroying a `T` does nothing, so destroy calls can be skipped.
    pub const HAS_TRIVIAL_DESTRUCTOR: bool = !mem::needs_drop::<T>();

    /// Values of `T` occupy no memory, so no storage needs to be allocated for them.
    pub const IS_ZERO_SIZED: bool = size_of::<T>() == 0;
}

/// Plain-old-data: a type whose copy, assignment and destruction are all equivalent to copying its
/// bytes (or doing nothing).
///
/// This enables the bulk memory fast paths of the uninitialized algorithms, such as
/// [`uninitialized_copy_pod`](crate::memory::uninitialized_copy_pod).
///
/// # Safety
/// Implementors must be [`Copy`], have no drop glue and be valid for every bit pattern that could
/// be produced by copying an existing value.
pub unsafe trait Pod: Copy + 'static {}

macro_rules! impl_pod {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: Primitive scalars are copied bitwise and have no drop glue.
            unsafe impl Pod for $ty {}
        )*
    };
}

impl_pod!(
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64, bool, char, (),
);

// SAFETY: Raw pointers are plain addresses.
unsafe impl<T: 'static + ?Sized> Pod for *const T {}
// SAFETY: Raw pointers are plain addresses.
unsafe impl<T: 'static + ?Sized> Pod for *mut T {}
// SAFETY: An array of plain-old-data is plain-old-data.
unsafe impl<T: Pod, const N: usize> Pod for [T; N] {}
// SAFETY: A tuple of plain-old-data is plain-old-data.
unsafe impl<A: Pod, B: Pod> Pod for (A, B) {}
// SAFETY: A tuple of plain-old-data is plain-old-data.
unsafe impl<A: Pod, B: Pod, C: Pod> Pod for (A, B, C) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::alloc::{CountedDrop, ZeroSizedType};

    fn is_pod<T: Pod>() -> bool {
        true
    }

    #[test]
    fn test_destructor_classification() {
        assert!(TypeTraits::<u8>::HAS_TRIVIAL_DESTRUCTOR);
        assert!(TypeTraits::<(u32, f64)>::HAS_TRIVIAL_DESTRUCTOR);
        assert!(TypeTraits::<ZeroSizedType>::HAS_TRIVIAL_DESTRUCTOR);
        assert!(!TypeTraits::<CountedDrop>::HAS_TRIVIAL_DESTRUCTOR);
        assert!(!TypeTraits::<Option<String>>::HAS_TRIVIAL_DESTRUCTOR);
    }

    #[test]
    fn test_size_classification() {
        assert!(TypeTraits::<ZeroSizedType>::IS_ZERO_SIZED);
        assert!(!TypeTraits::<u8>::IS_ZERO_SIZED);
        assert!(is_pod::<[(u8, char); 4]>());
        assert!(is_pod::<*const str>());
    }
}
