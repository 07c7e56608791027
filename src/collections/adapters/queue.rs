use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

use crate::collections::deque::Deque;
use crate::collections::traits::FrontSequence;

/// A first-in, first-out queue, backed by any [`FrontSequence`]. Defaults to a [`Deque`].
///
/// # Examples
/// ```
/// # use raw_collections::collections::adapters::Queue;
/// let mut queue: Queue<i32> = Queue::new();
/// queue.push(1);
/// queue.push(2);
/// assert_eq!(queue.pop(), Some(1));
/// assert_eq!(queue.front(), Some(&2));
/// ```
pub struct Queue<T, S: FrontSequence<T> = Deque<T>> {
    pub(crate) seq: S,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T, S: FrontSequence<T> + Default> Queue<T, S> {
    /// Creates an empty Queue over a default constructed sequence.
    pub fn new() -> Queue<T, S> {
        Queue::from_sequence(S::default())
    }
}

impl<T, S: FrontSequence<T>> Queue<T, S> {
    /// Creates a Queue over an existing sequence. Its front is the next element to be popped.
    pub const fn from_sequence(seq: S) -> Queue<T, S> {
        Queue {
            seq,
            _phantom: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Returns a reference to the oldest element, which will be popped next.
    pub fn front(&self) -> Option<&T> {
        self.seq.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.seq.front_mut()
    }

    /// Returns a reference to the most recently pushed element.
    pub fn back(&self) -> Option<&T> {
        self.seq.back()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.seq.back_mut()
    }

    pub fn push(&mut self, value: T) {
        self.seq.push_back(value)
    }

    /// Removes and returns the oldest element, if there is one.
    pub fn pop(&mut self) -> Option<T> {
        self.seq.pop_front()
    }

    /// Returns a reference to the underlying sequence.
    pub const fn as_sequence(&self) -> &S {
        &self.seq
    }

    /// Consumes the Queue, returning the underlying sequence.
    pub fn into_sequence(self) -> S {
        self.seq
    }
}

impl<T, S: FrontSequence<T> + Default> Default for Queue<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: FrontSequence<T>> From<S> for Queue<T, S> {
    fn from(value: S) -> Self {
        Queue::from_sequence(value)
    }
}

impl<T, S: FrontSequence<T>> Extend<T> for Queue<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, S: FrontSequence<T> + Default> FromIterator<T> for Queue<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl<T, S: FrontSequence<T> + Clone> Clone for Queue<T, S> {
    fn clone(&self) -> Self {
        Queue::from_sequence(self.seq.clone())
    }
}

impl<T, S: FrontSequence<T> + PartialEq> PartialEq for Queue<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T, S: FrontSequence<T> + Eq> Eq for Queue<T, S> {}

impl<T, S: FrontSequence<T> + Debug> Debug for Queue<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Queue").field(&self.seq).finish()
    }
}
