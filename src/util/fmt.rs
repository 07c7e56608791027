use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};

pub struct DebugRaw(pub String);

impl Debug for DebugRaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Formats the items of an iterator as a list, for use as a field in [`Formatter::debug_struct`].
/// The iterator is consumed by the first call to [`Debug::fmt`].
pub struct DebugIter<I>(pub Cell<Option<I>>);

impl<I> DebugIter<I> {
    pub const fn new(iter: I) -> DebugIter<I> {
        DebugIter(Cell::new(Some(iter)))
    }
}

impl<I> Debug for DebugIter<I>
where
    I: Iterator,
    I::Item: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.take() {
            Some(iter) => f.debug_list().entries(iter).finish(),
            None => f.debug_list().finish(),
        }
    }
}
