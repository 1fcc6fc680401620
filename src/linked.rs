use crate::error::{CollectionError, Result};
use slotmap::{DefaultKey, SlotMap};

/// A node in the doubly-linked chain.
///
/// Links are generational slotmap keys rather than pointers, so a stale link can
/// never alias a reused slot.
#[derive(Debug, Clone)]
pub(crate) struct LinkNode<T> {
    pub value: T,
    pub prev: Option<DefaultKey>,
    pub next: Option<DefaultKey>,
}

impl<T> LinkNode<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }
}

/// A doubly-linked sequence with O(1) insertion and removal at either end.
///
/// Removal by value is a linear equality scan. Positional access walks from
/// whichever end is closer to the requested index.
///
/// Used as the collision chain of [`HashMap`](crate::HashMap) buckets.
#[derive(Debug, Clone)]
pub struct DoublyLinkedSequence<T> {
    nodes: SlotMap<DefaultKey, LinkNode<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> DoublyLinkedSequence<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::new(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a value at the tail.
    pub fn push(&mut self, value: T) {
        let key = self.nodes.insert(LinkNode::new(value));
        self.nodes[key].prev = self.tail;

        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
    }

    /// Prepends a value at the head.
    pub fn push_front(&mut self, value: T) {
        let key = self.nodes.insert(LinkNode::new(value));
        self.nodes[key].next = self.head;

        match self.head {
            Some(head) => self.nodes[head].prev = Some(key),
            None => self.tail = Some(key),
        }
        self.head = Some(key);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.unlink(head)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.unlink(tail)
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|key| &self.nodes[key].value)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|key| &self.nodes[key].value)
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let key = self.key_at(index)?;
        Ok(&self.nodes[key].value)
    }

    /// Overwrites the value at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let key = self.key_at(index)?;
        Ok(std::mem::replace(&mut self.nodes[key].value, value))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let key = self.key_at(index)?;
        self.unlink(key)
            .ok_or_else(|| CollectionError::out_of_range(index, self.len()))
    }

    /// Returns the first value matching `predicate`, scanning from the head.
    pub fn find<F>(&self, mut predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|value| predicate(value))
    }

    pub fn find_mut<F>(&mut self, mut predicate: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        let key = self.find_key(|value| predicate(value))?;
        Some(&mut self.nodes[key].value)
    }

    /// Unlinks and returns the first value matching `predicate`.
    pub fn remove_first<F>(&mut self, predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let key = self.find_key(predicate)?;
        self.unlink(key)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates front to back.
    pub fn iter(&self) -> LinkedIter<'_, T> {
        LinkedIter {
            nodes: &self.nodes,
            current: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Resolves a position to its node key, walking from the nearer end.
    fn key_at(&self, index: usize) -> Result<DefaultKey> {
        let len = self.len();
        if index >= len {
            return Err(CollectionError::out_of_range(index, len));
        }

        let key = if index < len / 2 {
            let mut key = self.head;
            for _ in 0..index {
                key = key.and_then(|k| self.nodes[k].next);
            }
            key
        } else {
            let mut key = self.tail;
            for _ in index..len - 1 {
                key = key.and_then(|k| self.nodes[k].prev);
            }
            key
        };

        key.ok_or_else(|| CollectionError::out_of_range(index, len))
    }

    fn find_key<F>(&self, mut predicate: F) -> Option<DefaultKey>
    where
        F: FnMut(&T) -> bool,
    {
        let mut current = self.head;
        while let Some(key) = current {
            let node = &self.nodes[key];
            if predicate(&node.value) {
                return Some(key);
            }
            current = node.next;
        }
        None
    }

    /// Detaches a node from the chain and frees its slot.
    fn unlink(&mut self, key: DefaultKey) -> Option<T> {
        let node = self.nodes.remove(key)?;

        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }

        Some(node.value)
    }
}

impl<T: PartialEq> DoublyLinkedSequence<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }

    /// Removes the first value equal to `value`. Returns whether one was found.
    pub fn remove(&mut self, value: &T) -> bool {
        self.remove_first(|v| v == value).is_some()
    }
}

impl<T: Clone> DoublyLinkedSequence<T> {
    /// Collects every value matching `predicate` into a new sequence.
    pub fn filter<F>(&self, mut predicate: F) -> DoublyLinkedSequence<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().filter(|v| predicate(v)).cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for DoublyLinkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for DoublyLinkedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.push(value);
        }
        list
    }
}

/// Front-to-back iterator over a [`DoublyLinkedSequence`].
pub struct LinkedIter<'a, T> {
    nodes: &'a SlotMap<DefaultKey, LinkNode<T>>,
    current: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, T> Iterator for LinkedIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current?;
        let node = &self.nodes[key];
        self.current = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for LinkedIter<'a, T> {}

impl<'a, T> IntoIterator for &'a DoublyLinkedSequence<T> {
    type Item = &'a T;
    type IntoIter = LinkedIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let list = DoublyLinkedSequence::<char>::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
    }

    #[test]
    fn test_push_both_ends() {
        let mut list = DoublyLinkedSequence::new();
        list.push(2);
        list.push(3);
        list.push_front(1);
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
    }

    #[test]
    fn test_pop_both_ends() {
        let mut list: DoublyLinkedSequence<_> = (1..=4).collect();
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), Some(4));
        assert_eq!(list.to_vec(), vec![2, 3]);
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_indexed_access_from_both_ends() {
        let mut list: DoublyLinkedSequence<_> = (0..9).collect();
        for i in 0..9 {
            assert_eq!(list.get(i), Ok(&i));
        }
        assert_eq!(list.get(9), Err(CollectionError::out_of_range(9, 9)));
        assert_eq!(list.set(7, 70), Ok(7));
        assert_eq!(list.get(7), Ok(&70));
    }

    #[test]
    fn test_remove_at() {
        let mut list: DoublyLinkedSequence<_> = vec!['a', 'b', 'c', 'd'].into_iter().collect();
        assert_eq!(list.remove_at(0), Ok('a'));
        assert_eq!(list.remove_at(2), Ok('d'));
        assert_eq!(list.to_vec(), vec!['b', 'c']);
        assert!(list.remove_at(2).is_err());
    }

    #[test]
    fn test_remove_by_value() {
        let mut list: DoublyLinkedSequence<_> = vec![5, 6, 7, 6].into_iter().collect();
        assert!(list.remove(&6));
        assert_eq!(list.to_vec(), vec![5, 7, 6]);
        assert!(!list.remove(&42));
        assert!(list.contains(&6));
        assert!(list.remove(&6));
        assert!(!list.contains(&6));
        assert_eq!(list.back(), Some(&7));
    }

    #[test]
    fn test_find_and_remove_first() {
        let mut list: DoublyLinkedSequence<_> = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(list.find(|(k, _)| *k == "b"), Some(&("b", 2)));
        if let Some(entry) = list.find_mut(|(k, _)| *k == "a") {
            entry.1 = 10;
        }
        assert_eq!(list.remove_first(|(k, _)| *k == "a"), Some(("a", 10)));
        assert_eq!(list.remove_first(|(k, _)| *k == "a"), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_filter_and_clear() {
        let mut list: DoublyLinkedSequence<_> = (1..=6).collect();
        assert_eq!(list.filter(|v| v % 3 == 0).to_vec(), vec![3, 6]);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        list.push(1);
        assert_eq!(list.to_vec(), vec![1]);
    }
}
