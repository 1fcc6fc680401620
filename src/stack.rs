use crate::error::{CollectionError, Result};
use crate::sequence::GrowableSequence;

/// LIFO stack over a [`GrowableSequence`].
///
/// The backing sequence doubles when full. Iteration runs top to bottom.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: GrowableSequence<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self {
            items: GrowableSequence::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: GrowableSequence::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes the top value, failing with `EmptyCollection` on an empty stack.
    pub fn pop(&mut self) -> Result<T> {
        self.try_pop().ok_or(CollectionError::empty("Stack"))
    }

    pub fn try_pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Result<&T> {
        self.try_peek().ok_or(CollectionError::empty("Stack"))
    }

    pub fn try_peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates from the top of the stack to the bottom.
    pub fn iter(&self) -> std::iter::Rev<std::slice::Iter<'_, T>> {
        self.items.iter().rev()
    }
}

impl<T: PartialEq> Stack<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }
}

impl<T: Clone> Stack<T> {
    /// Snapshot in pop order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = std::iter::Rev<std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
