use crate::error::{CollectionError, Result};
use crate::sequence::DEFAULT_CAPACITY;
use log::debug;

/// FIFO queue over a circular buffer.
///
/// `head` is the slot of the front item and `tail` the slot the next enqueue
/// writes to, both taken modulo the buffer length. When the buffer is full it
/// doubles and the live items are linearized to start at slot 0.
#[derive(Debug, Clone)]
pub struct Queue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn enqueue(&mut self, value: T) {
        if self.len >= self.slots.len() {
            self.resize();
        }
        self.slots[self.tail] = Some(value);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
    }

    /// Removes the front item, failing with `EmptyCollection` on an empty queue.
    pub fn dequeue(&mut self) -> Result<T> {
        self.try_dequeue().ok_or(CollectionError::empty("Queue"))
    }

    pub fn try_dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        value
    }

    pub fn peek(&self) -> Result<&T> {
        self.try_peek().ok_or(CollectionError::empty("Queue"))
    }

    pub fn try_peek(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Drops every item; the buffer length is retained.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Iterates front to back.
    pub fn iter(&self) -> QueueIter<'_, T> {
        QueueIter {
            queue: self,
            offset: 0,
        }
    }

    fn resize(&mut self) {
        let new_capacity = if self.slots.is_empty() {
            DEFAULT_CAPACITY
        } else {
            self.slots.len() * 2
        };
        let mut slots = empty_slots(new_capacity);

        for (i, slot) in slots.iter_mut().enumerate().take(self.len) {
            let index = (self.head + i) % self.slots.len();
            *slot = self.slots[index].take();
        }

        debug!(
            "queue resized {} -> {} with {} items",
            self.slots.len(),
            new_capacity,
            self.len
        );

        self.slots = slots;
        self.head = 0;
        self.tail = self.len;
    }
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<T>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

impl<T: PartialEq> Queue<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl<T: Clone> Queue<T> {
    /// Snapshot in dequeue order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.enqueue(value);
        }
    }
}

/// Front-to-back iterator over a [`Queue`].
pub struct QueueIter<'a, T> {
    queue: &'a Queue<T>,
    offset: usize,
}

impl<'a, T> Iterator for QueueIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.queue.len {
            return None;
        }
        let index = (self.queue.head + self.offset) % self.queue.slots.len();
        self.offset += 1;
        self.queue.slots[index].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len - self.offset;
        (remaining, Some(remaining))
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = QueueIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let queue = Queue::<char>::new();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::new();
        queue.extend(vec![1, 2, 3]);
        assert_eq!(queue.peek(), Ok(&1));
        assert_eq!(queue.dequeue(), Ok(1));
        assert_eq!(queue.dequeue(), Ok(2));
        queue.enqueue(4);
        assert_eq!(queue.to_vec(), vec![3, 4]);
    }

    #[test]
    fn test_empty_errors() {
        let mut queue = Queue::<u8>::new();
        assert_eq!(queue.dequeue(), Err(CollectionError::empty("Queue")));
        assert_eq!(queue.peek(), Err(CollectionError::empty("Queue")));
        assert_eq!(queue.try_dequeue(), None);
        assert_eq!(queue.try_peek(), None);
    }

    #[test]
    fn test_wraparound_then_resize_linearizes() {
        let mut queue = Queue::with_capacity(4);
        queue.extend(0..4);
        assert_eq!(queue.dequeue(), Ok(0));
        assert_eq!(queue.dequeue(), Ok(1));
        // tail wraps to the front of the buffer
        queue.extend(4..6);
        assert_eq!(queue.capacity(), 4);
        assert_eq!(queue.to_vec(), vec![2, 3, 4, 5]);

        queue.enqueue(6);
        assert_eq!(queue.capacity(), 8);
        assert_eq!(queue.to_vec(), vec![2, 3, 4, 5, 6]);

        let drained: Vec<_> = std::iter::from_fn(|| queue.try_dequeue()).collect();
        assert_eq!(drained, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut queue = Queue::with_capacity(0);
        queue.enqueue("a");
        assert_eq!(queue.capacity(), 4);
        assert_eq!(queue.dequeue(), Ok("a"));
    }

    #[test]
    fn test_contains_and_clear() {
        let mut queue = Queue::new();
        queue.extend(vec!["x", "y"]);
        assert!(queue.contains(&"y"));
        assert!(!queue.contains(&"z"));
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.contains(&"y"));
        queue.enqueue("z");
        assert_eq!(queue.to_vec(), vec!["z"]);
    }
}
