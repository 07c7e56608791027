use std::error::Error;

use super::error::AllocError;

pub(crate) trait ResultExtension<T, E: Error> {
    /// A method similar to [`Result::unwrap`], except that it applies only to types which implement
    /// [`Error`] and panics with the message of the error itself.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{}", error),
        }
    }
}

pub(crate) trait AllocResultExtension<T> {
    /// Unwraps the result of an allocation. Capacity overflows panic like [`throw`] would, while
    /// running out of memory is reported through [`handle_alloc_error`].
    ///
    /// # Panics
    /// Panics if the requested capacity overflowed.
    ///
    /// [`throw`]: ResultExtension::throw
    /// [`handle_alloc_error`]: std::alloc::handle_alloc_error
    fn or_handle(self) -> T;
}

impl<T> AllocResultExtension<T> for Result<T, AllocError> {
    fn or_handle(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => error.handle(),
        }
    }
}
