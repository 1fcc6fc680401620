use crate::error::{CollectionError, Result};
use crate::sequence::GrowableSequence;

/// An item paired with the priority it was enqueued at.
#[derive(Debug, Clone)]
struct HeapSlot<T, P> {
    item: T,
    priority: P,
}

/// Min-priority queue over a binary heap stored in a [`GrowableSequence`].
///
/// The slot at index `i` has children at `2i + 1` and `2i + 2`, and no child has
/// a smaller priority than its parent. Lower priority values come out first.
/// Items with equal priority come out in no particular order.
///
/// ```
/// use civic_collections::PriorityQueue;
///
/// let mut triage = PriorityQueue::new();
/// triage.enqueue("streetlight out", 3);
/// triage.enqueue("gas leak", 1);
/// triage.enqueue("pothole", 2);
/// assert_eq!(triage.dequeue(), Ok("gas leak"));
/// assert_eq!(triage.peek_priority(), Ok(&2));
/// ```
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, P = i64> {
    slots: GrowableSequence<HeapSlot<T, P>>,
}

impl<T, P: Ord> PriorityQueue<T, P> {
    pub fn new() -> Self {
        Self {
            slots: GrowableSequence::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends the item, then sifts it up past every parent with a strictly
    /// greater priority.
    pub fn enqueue(&mut self, item: T, priority: P) {
        self.slots.push(HeapSlot { item, priority });
        self.sift_up(self.slots.len() - 1);
    }

    /// Removes the minimum-priority item, failing with `EmptyCollection` when empty.
    pub fn dequeue(&mut self) -> Result<T> {
        self.try_dequeue()
            .map(|(item, _)| item)
            .ok_or(CollectionError::empty("PriorityQueue"))
    }

    /// Removes the minimum-priority item together with its priority.
    pub fn try_dequeue(&mut self) -> Option<(T, P)> {
        let last = self.slots.len().checked_sub(1)?;
        self.slots.swap(0, last);
        let root = self.slots.pop()?;
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some((root.item, root.priority))
    }

    pub fn peek(&self) -> Result<&T> {
        self.try_peek()
            .map(|(item, _)| item)
            .ok_or(CollectionError::empty("PriorityQueue"))
    }

    pub fn peek_priority(&self) -> Result<&P> {
        self.try_peek()
            .map(|(_, priority)| priority)
            .ok_or(CollectionError::empty("PriorityQueue"))
    }

    pub fn try_peek(&self) -> Option<(&T, &P)> {
        self.slots.try_get(0).map(|s| (&s.item, &s.priority))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Iterates in heap layout order, which is not priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &P)> + '_ {
        self.slots.iter().map(|s| (&s.item, &s.priority))
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[parent].priority <= self.slots[index].priority {
                break;
            }
            self.slots.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.slots[left].priority < self.slots[smallest].priority {
                smallest = left;
            }
            if right < len && self.slots[right].priority < self.slots[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.slots.swap(index, smallest);
            index = smallest;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_heap(&self) -> bool {
        (1..self.slots.len()).all(|i| self.slots[(i - 1) / 2].priority <= self.slots[i].priority)
    }
}

impl<T, P: Ord> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> Extend<(T, P)> for PriorityQueue<T, P> {
    fn extend<I: IntoIterator<Item = (T, P)>>(&mut self, iter: I) {
        for (item, priority) in iter {
            self.enqueue(item, priority);
        }
    }
}

impl<T, P: Ord> FromIterator<(T, P)> for PriorityQueue<T, P> {
    fn from_iter<I: IntoIterator<Item = (T, P)>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
