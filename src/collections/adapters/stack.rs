use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

use crate::collections::deque::Deque;
use crate::collections::traits::BackSequence;

/// A last-in, first-out stack, backed by any [`BackSequence`]. Defaults to a [`Deque`].
///
/// # Examples
/// ```
/// # use raw_collections::collections::adapters::Stack;
/// let mut stack: Stack<i32> = Stack::new();
/// stack.push(1);
/// stack.push(2);
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.top(), Some(&1));
/// ```
pub struct Stack<T, S: BackSequence<T> = Deque<T>> {
    pub(crate) seq: S,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T, S: BackSequence<T> + Default> Stack<T, S> {
    /// Creates an empty Stack over a default constructed sequence.
    pub fn new() -> Stack<T, S> {
        Stack::from_sequence(S::default())
    }
}

impl<T, S: BackSequence<T>> Stack<T, S> {
    /// Creates a Stack over an existing sequence, whose back becomes the top.
    pub const fn from_sequence(seq: S) -> Stack<T, S> {
        Stack {
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

    /// Returns a reference to the most recently pushed element, if there is one.
    pub fn top(&self) -> Option<&T> {
        self.seq.back()
    }

    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.seq.back_mut()
    }

    pub fn push(&mut self, value: T) {
        self.seq.push_back(value)
    }

    /// Removes and returns the most recently pushed element, if there is one.
    pub fn pop(&mut self) -> Option<T> {
        self.seq.pop_back()
    }

    /// Returns a reference to the underlying sequence.
    pub const fn as_sequence(&self) -> &S {
        &self.seq
    }

    /// Consumes the Stack, returning the underlying sequence.
    pub fn into_sequence(self) -> S {
        self.seq
    }
}

impl<T, S: BackSequence<T> + Default> Default for Stack<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: BackSequence<T>> From<S> for Stack<T, S> {
    fn from(value: S) -> Self {
        Stack::from_sequence(value)
    }
}

impl<T, S: BackSequence<T>> Extend<T> for Stack<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, S: BackSequence<T> + Default> FromIterator<T> for Stack<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Stack::new();
        stack.extend(iter);
        stack
    }
}

impl<T, S: BackSequence<T> + Clone> Clone for Stack<T, S> {
    fn clone(&self) -> Self {
        Stack::from_sequence(self.seq.clone())
    }
}

impl<T, S: BackSequence<T> + PartialEq> PartialEq for Stack<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T, S: BackSequence<T> + Eq> Eq for Stack<T, S> {}

impl<T, S: BackSequence<T> + Debug> Debug for Stack<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stack").field(&self.seq).finish()
    }
}
