use slotmap::{DefaultKey, SlotMap};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Which child link of a parent a descent followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A binary search tree node stored in the arena.
///
/// `height` is 1 for a leaf; only the self-balancing map keeps it current.
#[derive(Debug, Clone)]
pub(crate) struct TreeNode<K, V> {
    pub key: K,
    pub value: V,
    pub left: Option<DefaultKey>,
    pub right: Option<DefaultKey>,
    pub height: u32,
}

impl<K, V> TreeNode<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }
}

/// Ancestors visited by a descent, innermost last, with the side taken out of each.
pub(crate) type Path = Vec<(DefaultKey, Side)>;

/// Result of placing a key in the tree.
pub(crate) enum Placement<V> {
    /// The key existed; its old value is returned.
    Replaced(V),
    /// A new leaf was created below the recorded ancestors.
    Inserted { leaf: DefaultKey, path: Path },
}

/// Arena-backed binary search tree shared by both ordered maps.
///
/// Nodes live in a [`SlotMap`] and link to each other through generational keys.
/// Every walk (descent, removal, traversal) is iterative with an explicit path or
/// stack, so depth is bounded by memory rather than by the call stack.
#[derive(Debug, Clone)]
pub(crate) struct Tree<K, V> {
    pub nodes: SlotMap<DefaultKey, TreeNode<K, V>>,
    pub root: Option<DefaultKey>,
}

impl<K, V> Tree<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::new(),
            root: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn child(&self, key: DefaultKey, side: Side) -> Option<DefaultKey> {
        match side {
            Side::Left => self.nodes[key].left,
            Side::Right => self.nodes[key].right,
        }
    }

    /// Points `parent`'s `side` link (or the root when there is no parent) at `child`.
    pub(crate) fn attach(&mut self, parent: Option<(DefaultKey, Side)>, child: Option<DefaultKey>) {
        match parent {
            None => self.root = child,
            Some((key, Side::Left)) => self.nodes[key].left = child,
            Some((key, Side::Right)) => self.nodes[key].right = child,
        }
    }

    /// Stored height of a subtree; 0 for an absent one.
    pub(crate) fn height_of(&self, key: Option<DefaultKey>) -> u32 {
        key.map_or(0, |k| self.nodes[k].height)
    }

    /// Height measured by walking every level.
    pub(crate) fn measured_height(&self) -> u32 {
        let mut height = 0;
        let mut stack: Vec<(DefaultKey, u32)> = self.root.map(|k| (k, 1)).into_iter().collect();
        while let Some((key, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[key];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    pub(crate) fn first(&self) -> Option<&TreeNode<K, V>> {
        let mut current = self.root?;
        while let Some(left) = self.nodes[current].left {
            current = left;
        }
        Some(&self.nodes[current])
    }

    pub(crate) fn last(&self) -> Option<&TreeNode<K, V>> {
        let mut current = self.root?;
        while let Some(right) = self.nodes[current].right {
            current = right;
        }
        Some(&self.nodes[current])
    }

    pub(crate) fn iter(&self) -> InOrderIter<'_, K, V> {
        let mut iter = InOrderIter {
            nodes: &self.nodes,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }
}

impl<K: Ord, V> Tree<K, V> {
    pub(crate) fn find_key<Q>(&self, key: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(k) = current {
            let node = &self.nodes[k];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(k),
            };
        }
        None
    }

    /// Descends to where `key` belongs: replaces the value of an equal key or
    /// hangs a new leaf off the last ancestor.
    pub(crate) fn place(&mut self, key: K, value: V) -> Placement<V> {
        let mut path = Path::new();
        let mut current = self.root;

        while let Some(k) = current {
            let side = match key.cmp(&self.nodes[k].key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    let old = std::mem::replace(&mut self.nodes[k].value, value);
                    return Placement::Replaced(old);
                }
            };
            path.push((k, side));
            current = self.child(k, side);
        }

        let leaf = self.nodes.insert(TreeNode::new(key, value));
        self.attach(path.last().copied(), Some(leaf));
        Placement::Inserted { leaf, path }
    }

    /// Unlinks the node holding `key` and returns its value together with the
    /// ancestors whose subtrees shrank, innermost last.
    ///
    /// A node with two children takes over its in-order successor's entry and the
    /// successor's slot is freed instead.
    pub(crate) fn unlink<Q>(&mut self, key: &Q) -> Option<(V, Path)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Path::new();
        let mut current = self.root;
        let target = loop {
            let k = current?;
            let side = match key.cmp(self.nodes[k].key.borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => break k,
            };
            path.push((k, side));
            current = self.child(k, side);
        };

        let (left, right) = (self.nodes[target].left, self.nodes[target].right);
        let value = match (left, right) {
            (Some(_), Some(right)) => {
                path.push((target, Side::Right));
                let mut successor = right;
                while let Some(next) = self.nodes[successor].left {
                    path.push((successor, Side::Left));
                    successor = next;
                }

                let successor_right = self.nodes[successor].right;
                self.attach(path.last().copied(), successor_right);
                let successor = self.nodes.remove(successor)?;

                let node = &mut self.nodes[target];
                node.key = successor.key;
                std::mem::replace(&mut node.value, successor.value)
            }
            (child, None) | (None, child) => {
                self.attach(path.last().copied(), child);
                self.nodes.remove(target)?.value
            }
        };

        Some((value, path))
    }

    /// In-order walk over keys within `[from, to]`.
    ///
    /// Both bounds are resolved to nodes up front, so neither needs to outlive
    /// the iterator.
    pub(crate) fn range<'a>(&'a self, from: &K, to: &K) -> RangeIter<'a, K, V> {
        let mut stack = Vec::new();
        let mut current = self.root;
        while let Some(k) = current {
            if self.nodes[k].key < *from {
                current = self.nodes[k].right;
            } else {
                stack.push(k);
                current = self.nodes[k].left;
            }
        }

        let mut last = None;
        let mut current = self.root;
        while let Some(k) = current {
            if self.nodes[k].key > *to {
                current = self.nodes[k].left;
            } else {
                last = Some(k);
                current = self.nodes[k].right;
            }
        }

        let starts_past_end = stack
            .last()
            .map_or(true, |&first| self.nodes[first].key > *to);
        RangeIter {
            inner: InOrderIter {
                nodes: &self.nodes,
                stack,
            },
            last: if starts_past_end { None } else { last },
        }
    }
}

/// Ascending-key iterator over an ordered map.
///
/// Holds the left spine of the unvisited part of the tree on an explicit stack.
pub struct InOrderIter<'a, K, V> {
    nodes: &'a SlotMap<DefaultKey, TreeNode<K, V>>,
    stack: Vec<DefaultKey>,
}

impl<'a, K, V> InOrderIter<'a, K, V> {
    fn push_left_spine(&mut self, mut current: Option<DefaultKey>) {
        while let Some(key) = current {
            self.stack.push(key);
            current = self.nodes[key].left;
        }
    }
}

impl<'a, K, V> InOrderIter<'a, K, V> {
    fn next_node(&mut self) -> Option<DefaultKey> {
        let key = self.stack.pop()?;
        self.push_left_spine(self.nodes[key].right);
        Some(key)
    }
}

impl<'a, K, V> Iterator for InOrderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.next_node()?];
        Some((&node.key, &node.value))
    }
}

/// In-order walk that ends after the node holding the range's upper bound.
pub(crate) struct RangeIter<'a, K, V> {
    inner: InOrderIter<'a, K, V>,
    last: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for RangeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let last = self.last?;
        let key = self.inner.next_node()?;
        if key == last {
            self.last = None;
        }
        let node = &self.inner.nodes[key];
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[i32]) -> Tree<i32, i32> {
        let mut tree = Tree::new();
        for &k in keys {
            tree.place(k, k * 10);
        }
        tree
    }

    fn keys(tree: &Tree<i32, i32>) -> Vec<i32> {
        tree.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_place_orders_keys() {
        let tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(keys(&tree), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.measured_height(), 3);
    }

    #[test]
    fn test_place_replaces_equal_key() {
        let mut tree = tree_of(&[2, 1, 3]);
        assert!(matches!(tree.place(1, 99), Placement::Replaced(10)));
        assert_eq!(tree.len(), 3);
        let found = tree.find_key(&1).map(|k| tree.nodes[k].value);
        assert_eq!(found, Some(99));
    }

    #[test]
    fn test_place_records_path() {
        let mut tree = tree_of(&[10, 5]);
        match tree.place(7, 70) {
            Placement::Inserted { path, .. } => {
                assert_eq!(path.len(), 2);
                assert_eq!(path[0].1, Side::Left);
                assert_eq!(path[1].1, Side::Right);
            }
            Placement::Replaced(_) => panic!("7 was not present"),
        }
    }

    #[test]
    fn test_unlink_each_shape() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80, 65]);

        // leaf
        assert_eq!(tree.unlink(&20).map(|(v, _)| v), Some(200));
        // one child
        assert_eq!(tree.unlink(&60).map(|(v, _)| v), Some(600));
        // two children, successor lives deeper
        assert_eq!(tree.unlink(&50).map(|(v, _)| v), Some(500));
        assert_eq!(keys(&tree), vec![30, 40, 65, 70, 80]);
        assert!(tree.unlink(&50).is_none());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_first_last_and_range() {
        let tree = tree_of(&[8, 3, 10, 1, 6, 14, 4, 7, 13]);
        assert_eq!(tree.first().map(|n| n.key), Some(1));
        assert_eq!(tree.last().map(|n| n.key), Some(14));
        let in_range: Vec<i32> = tree.range(&4, &10).map(|(k, _)| *k).collect();
        assert_eq!(in_range, vec![4, 6, 7, 8, 10]);
        assert_eq!(tree.range(&15, &20).count(), 0);
        let (from, to) = (5, 5);
        assert_eq!(tree.range(&from, &to).count(), 0);
        assert_eq!(tree.range(&10, &4).count(), 0);
        assert_eq!(tree.range(&0, &1).map(|(k, _)| *k).collect::<Vec<_>>(), vec![1]);
        assert_eq!(tree.range(&14, &99).map(|(k, _)| *k).collect::<Vec<_>>(), vec![14]);
    }

    #[test]
    fn test_range_bounds_can_be_dropped_early() {
        let tree = tree_of(&[8, 3, 10, 1, 6, 14, 4, 7, 13]);
        let in_range = {
            let (from, to) = (2, 9);
            tree.range(&from, &to)
        };
        let keys: Vec<i32> = in_range.map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 4, 6, 7, 8]);
        assert_eq!(Tree::<i32, i32>::new().range(&0, &10).count(), 0);
    }

    #[test]
    fn test_deep_degenerate_tree() {
        let keys: Vec<i32> = (0..5_000).collect();
        let tree = tree_of(&keys);
        assert_eq!(tree.measured_height(), 5_000);
        assert_eq!(tree.iter().count(), 5_000);
    }
}
