use crate::collections::contiguous::Vector;
use crate::collections::deque::Deque;
use crate::collections::linked::LinkedList;
use crate::memory::Allocator;

/// A sequence that can grow and shrink at its back in (amortized) constant time. Enough to back a
/// [`Stack`](crate::collections::adapters::Stack).
pub trait BackSequence<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn back(&self) -> Option<&T>;

    fn back_mut(&mut self) -> Option<&mut T>;

    fn push_back(&mut self, value: T);

    fn pop_back(&mut self) -> Option<T>;
}

/// A sequence that can also be read and shrunk at its front in constant time. Enough to back a
/// [`Queue`](crate::collections::adapters::Queue).
pub trait FrontSequence<T>: BackSequence<T> {
    fn front(&self) -> Option<&T>;

    fn front_mut(&mut self) -> Option<&mut T>;

    fn pop_front(&mut self) -> Option<T>;
}

impl<T, A: Allocator> BackSequence<T> for Vector<T, A> {
    fn len(&self) -> usize {
        Vector::len(self)
    }

    fn back(&self) -> Option<&T> {
        self.last()
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        self.last_mut()
    }

    fn push_back(&mut self, value: T) {
        self.push(value)
    }

    fn pop_back(&mut self) -> Option<T> {
        self.pop()
    }
}

impl<T, A: Allocator> BackSequence<T> for Deque<T, A> {
    fn len(&self) -> usize {
        Deque::len(self)
    }

    fn back(&self) -> Option<&T> {
        Deque::back(self)
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        Deque::back_mut(self)
    }

    fn push_back(&mut self, value: T) {
        Deque::push_back(self, value)
    }

    fn pop_back(&mut self) -> Option<T> {
        Deque::pop_back(self)
    }
}

impl<T, A: Allocator> FrontSequence<T> for Deque<T, A> {
    fn front(&self) -> Option<&T> {
        Deque::front(self)
    }

    fn front_mut(&mut self) -> Option<&mut T> {
        Deque::front_mut(self)
    }

    fn pop_front(&mut self) -> Option<T> {
        Deque::pop_front(self)
    }
}

impl<T, A: Allocator> BackSequence<T> for LinkedList<T, A> {
    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn back(&self) -> Option<&T> {
        LinkedList::back(self)
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        LinkedList::back_mut(self)
    }

    fn push_back(&mut self, value: T) {
        LinkedList::push_back(self, value)
    }

    fn pop_back(&mut self) -> Option<T> {
        LinkedList::pop_back(self)
    }
}

impl<T, A: Allocator> FrontSequence<T> for LinkedList<T, A> {
    fn front(&self) -> Option<&T> {
        LinkedList::front(self)
    }

    fn front_mut(&mut self) -> Option<&mut T> {
        LinkedList::front_mut(self)
    }

    fn pop_front(&mut self) -> Option<T> {
        LinkedList::pop_front(self)
    }
}
