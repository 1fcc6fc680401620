use crate::error::{CollectionError, Result};
use crate::sequence::GrowableSequence;
use crate::tree::{InOrderIter, Path, Placement, Tree};
use log::trace;
use slotmap::DefaultKey;
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// Rotations
// ============================================================================

impl<K, V> Tree<K, V> {
    fn update_height(&mut self, key: DefaultKey) {
        let node = &self.nodes[key];
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.nodes[key].height = height;
    }

    /// height(left) - height(right)
    fn balance_factor(&self, key: DefaultKey) -> i64 {
        let node = &self.nodes[key];
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    /// Lifts the left child over `top`. Returns the new subtree root.
    fn rotate_right(&mut self, top: DefaultKey) -> DefaultKey {
        let Some(pivot) = self.nodes[top].left else {
            return top;
        };
        let inner = self.nodes[pivot].right;

        self.nodes[pivot].right = Some(top);
        self.nodes[top].left = inner;

        self.update_height(top);
        self.update_height(pivot);
        pivot
    }

    /// Lifts the right child over `top`. Returns the new subtree root.
    fn rotate_left(&mut self, top: DefaultKey) -> DefaultKey {
        let Some(pivot) = self.nodes[top].right else {
            return top;
        };
        let inner = self.nodes[pivot].left;

        self.nodes[pivot].left = Some(top);
        self.nodes[top].right = inner;

        self.update_height(top);
        self.update_height(pivot);
        pivot
    }

    /// Zig-zag on the left: straighten the left child, then rotate right.
    fn rotate_left_right(&mut self, top: DefaultKey) -> DefaultKey {
        if let Some(left) = self.nodes[top].left {
            let straightened = self.rotate_left(left);
            self.nodes[top].left = Some(straightened);
        }
        self.rotate_right(top)
    }

    /// Zig-zag on the right: straighten the right child, then rotate left.
    fn rotate_right_left(&mut self, top: DefaultKey) -> DefaultKey {
        if let Some(right) = self.nodes[top].right {
            let straightened = self.rotate_right(right);
            self.nodes[top].right = Some(straightened);
        }
        self.rotate_left(top)
    }

    /// Recomputes heights from the innermost ancestor outwards, letting `fix`
    /// replace any subtree root and relinking the replacement into its parent.
    fn retrace<F>(&mut self, path: &Path, mut fix: F)
    where
        F: FnMut(&mut Self, DefaultKey) -> DefaultKey,
    {
        for i in (0..path.len()).rev() {
            let (node, _) = path[i];
            self.update_height(node);

            let subtree = fix(self, node);
            if subtree != node {
                let parent = i.checked_sub(1).map(|p| path[p]);
                self.attach(parent, Some(subtree));
            }
        }
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Corrects `node` after `leaf` was inserted beneath it.
    ///
    /// The inserted key is compared against the heavy child's key to tell the
    /// straight-line cases from the zig-zag ones.
    fn rebalance_after_insert(&mut self, node: DefaultKey, leaf: DefaultKey) -> DefaultKey {
        let balance = self.balance_factor(node);

        if balance > 1 {
            let Some(left) = self.nodes[node].left else {
                return node;
            };
            if self.nodes[leaf].key < self.nodes[left].key {
                trace!("avl insert: left-left, rotate right");
                self.rotate_right(node)
            } else {
                trace!("avl insert: left-right, double rotation");
                self.rotate_left_right(node)
            }
        } else if balance < -1 {
            let Some(right) = self.nodes[node].right else {
                return node;
            };
            if self.nodes[leaf].key > self.nodes[right].key {
                trace!("avl insert: right-right, rotate left");
                self.rotate_left(node)
            } else {
                trace!("avl insert: right-left, double rotation");
                self.rotate_right_left(node)
            }
        } else {
            node
        }
    }

    /// Corrects `node` after a removal beneath it, choosing the case from the
    /// heavy child's own balance.
    fn rebalance_after_remove(&mut self, node: DefaultKey) -> DefaultKey {
        let balance = self.balance_factor(node);

        if balance > 1 {
            let Some(left) = self.nodes[node].left else {
                return node;
            };
            if self.balance_factor(left) >= 0 {
                trace!("avl remove: left-left, rotate right");
                self.rotate_right(node)
            } else {
                trace!("avl remove: left-right, double rotation");
                self.rotate_left_right(node)
            }
        } else if balance < -1 {
            let Some(right) = self.nodes[node].right else {
                return node;
            };
            if self.balance_factor(right) <= 0 {
                trace!("avl remove: right-right, rotate left");
                self.rotate_left(node)
            } else {
                trace!("avl remove: right-left, double rotation");
                self.rotate_right_left(node)
            }
        } else {
            node
        }
    }
}

// ============================================================================
// Map
// ============================================================================

/// Ordered map over an AVL tree.
///
/// Same contract as [`OrderedMap`](crate::OrderedMap), but after every insert
/// and removal each ancestor's height is recomputed and any node whose balance
/// factor leaves {-1, 0, 1} is repaired with a single or double rotation, keeping
/// depth O(log n) for every insertion order.
///
/// ```
/// use civic_collections::SelfBalancingOrderedMap;
///
/// let mut by_date = SelfBalancingOrderedMap::new();
/// for day in 1..=1000 {
///     by_date.insert(day, format!("event {day}"));
/// }
/// assert!(by_date.height() <= 11);
/// assert_eq!(by_date.find(&500).map(String::as_str), Some("event 500"));
/// ```
#[derive(Clone)]
pub struct SelfBalancingOrderedMap<K, V> {
    tree: Tree<K, V>,
}

impl<K: Ord, V> SelfBalancingOrderedMap<K, V> {
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Inserts or updates, rebalancing the path back to the root.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.place(key, value) {
            Placement::Replaced(old) => Some(old),
            Placement::Inserted { leaf, path } => {
                self.tree
                    .retrace(&path, |tree, node| tree.rebalance_after_insert(node, leaf));
                None
            }
        }
    }

    /// Non-mutating lookup; `None` means the key is not stored.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree
            .find_key(key)
            .map(|k| &self.tree.nodes[k].value)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let k = self.tree.find_key(key)?;
        Some(&mut self.tree.nodes[k].value)
    }

    /// Direct keyed access, failing with `KeyNotFound` when absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        self.find(key)
            .ok_or_else(|| CollectionError::key_not_found(key))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find_key(key).is_some()
    }

    /// Removes a key, rebalancing the path back to the root.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (value, path) = self.tree.unlink(key)?;
        self.tree
            .retrace(&path, |tree, node| tree.rebalance_after_remove(node));
        Some(value)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> InOrderIter<'_, K, V> {
        self.tree.iter()
    }

    /// Snapshot of every entry in ascending key order.
    pub fn in_order(&self) -> GrowableSequence<(&K, &V)> {
        self.iter().collect()
    }

    /// Entries whose keys fall in `[from, to]`, ascending.
    pub fn range<'a>(&'a self, from: &K, to: &K) -> impl Iterator<Item = (&'a K, &'a V)> + 'a {
        self.tree.range(from, to)
    }

    pub fn min(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|n| (&n.key, &n.value))
    }

    pub fn max(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|n| (&n.key, &n.value))
    }

    /// Height of the root; 0 when empty.
    pub fn height(&self) -> u32 {
        self.tree.height_of(self.tree.root)
    }

    /// Checks stored heights and balance factors at every node.
    #[cfg(test)]
    pub(crate) fn is_balanced(&self) -> bool {
        self.tree.nodes.keys().all(|k| {
            let node = &self.tree.nodes[k];
            let expected = 1 + self
                .tree
                .height_of(node.left)
                .max(self.tree.height_of(node.right));
            node.height == expected && self.tree.balance_factor(k).abs() <= 1
        })
    }
}

impl<K: Ord + Clone, V> SelfBalancingOrderedMap<K, V> {
    pub fn keys(&self) -> GrowableSequence<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }
}

impl<K: Ord, V: Clone> SelfBalancingOrderedMap<K, V> {
    pub fn values(&self) -> GrowableSequence<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K: Ord, V> Default for SelfBalancingOrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for SelfBalancingOrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for SelfBalancingOrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SelfBalancingOrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a SelfBalancingOrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrderIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
