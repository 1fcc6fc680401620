use crate::error::{CollectionError, Result};
use log::trace;
use std::ops::{Index, IndexMut};

/// Capacity of a fresh sequence, and the first capacity of one created empty.
pub(crate) const DEFAULT_CAPACITY: usize = 4;

/// A growable, index-addressed sequence.
///
/// Appends are amortized O(1): when the logical capacity is exhausted it doubles
/// (starting from 4). Positional accessors are bounds-checked and report
/// [`CollectionError::IndexOutOfRange`] instead of panicking; the `Index` impls
/// panic like a slice does.
///
/// This is the backing store of [`Stack`](crate::Stack), the
/// [`PriorityQueue`](crate::PriorityQueue) heap and the hash map bucket array.
#[derive(Debug, Clone)]
pub struct GrowableSequence<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> GrowableSequence<T> {
    /// Creates an empty sequence with the default capacity of 4.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty sequence able to hold `capacity` items before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Logical capacity; always a doubling of the starting capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a value at the end.
    pub fn push(&mut self, value: T) {
        if self.items.len() >= self.capacity {
            self.grow();
        }
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or_else(|| CollectionError::out_of_range(index, len))
    }

    pub fn try_get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or_else(|| CollectionError::out_of_range(index, len))
    }

    /// Overwrites the value at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Removes the value at `index`, shifting the tail one slot left.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(CollectionError::out_of_range(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    /// Removes and returns the last value.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Swaps two positions.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }

    /// Drops every value; capacity is retained.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the first value matching `predicate`.
    pub fn find<F>(&self, mut predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn grow(&mut self) {
        let new_capacity = if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.capacity * 2
        };
        self.items.reserve_exact(new_capacity - self.items.len());
        trace!(
            "growable sequence capacity {} -> {}",
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
    }
}

impl<T: PartialEq> GrowableSequence<T> {
    /// Position of the first value equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }

    /// Removes the first value equal to `value`. Returns whether one was found.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> GrowableSequence<T> {
    /// Collects every value matching `predicate` into a new sequence.
    pub fn filter<F>(&self, mut predicate: F) -> GrowableSequence<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T> Default for GrowableSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for GrowableSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for GrowableSequence<T> {}

impl<T> Index<usize> for GrowableSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for GrowableSequence<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for GrowableSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Self::new();
        sequence.extend(iter);
        sequence
    }
}

impl<T> Extend<T> for GrowableSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> IntoIterator for GrowableSequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowableSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let seq = GrowableSequence::<u8>::new();
        assert_eq!(seq.len(), 0);
        assert!(seq.is_empty());
        assert_eq!(seq.capacity(), 4);
    }

    #[test]
    fn test_capacity_doubles() {
        let mut seq = GrowableSequence::new();
        for i in 0..4 {
            seq.push(i);
        }
        assert_eq!(seq.capacity(), 4);
        seq.push(4);
        assert_eq!(seq.capacity(), 8);
        seq.extend(5..9);
        assert_eq!(seq.capacity(), 16);
        assert_eq!(seq.to_vec(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_grows_to_default() {
        let mut seq = GrowableSequence::with_capacity(0);
        assert_eq!(seq.capacity(), 0);
        seq.push('a');
        assert_eq!(seq.capacity(), 4);
    }

    #[test]
    fn test_bounds_checked_access() {
        let mut seq: GrowableSequence<_> = vec!["a", "b", "c"].into_iter().collect();
        assert_eq!(seq.get(1), Ok(&"b"));
        assert_eq!(seq.get(3), Err(CollectionError::out_of_range(3, 3)));
        assert_eq!(seq.try_get(5), None);
        assert_eq!(seq.set(0, "z"), Ok("a"));
        assert_eq!(seq[0], "z");
        assert!(seq.set(3, "q").is_err());
    }

    #[test]
    fn test_remove_at_shifts_tail() {
        let mut seq: GrowableSequence<_> = (1..=5).collect();
        assert_eq!(seq.remove_at(1), Ok(2));
        assert_eq!(seq.to_vec(), vec![1, 3, 4, 5]);
        assert!(seq.remove_at(4).is_err());
    }

    #[test]
    fn test_index_of_and_remove() {
        let mut seq: GrowableSequence<_> = vec![10, 20, 30, 20].into_iter().collect();
        assert_eq!(seq.index_of(&20), Some(1));
        assert_eq!(seq.index_of(&99), None);
        assert!(seq.contains(&30));
        assert!(seq.remove(&20));
        assert_eq!(seq.to_vec(), vec![10, 30, 20]);
        assert!(!seq.remove(&99));
    }

    #[test]
    fn test_find_and_filter() {
        let seq: GrowableSequence<_> = (1..=10).collect();
        assert_eq!(seq.find(|v| *v > 7), Some(&8));
        let evens = seq.filter(|v| v % 2 == 0);
        assert_eq!(evens.to_vec(), vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut seq: GrowableSequence<_> = (0..20).collect();
        let cap = seq.capacity();
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.capacity(), cap);
        assert_eq!(seq.iter().count(), 0);
    }
}
