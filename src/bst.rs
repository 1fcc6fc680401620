use crate::error::{CollectionError, Result};
use crate::sequence::GrowableSequence;
use crate::tree::{InOrderIter, Placement, Tree};
use std::borrow::Borrow;
use std::fmt;

/// Ordered map over a plain (unbalanced) binary search tree.
///
/// Lookups and inserts cost O(depth). No rebalancing is done, so a strictly
/// increasing insertion order degrades the tree into a list with O(n) depth.
/// Descent is iterative, so such input is slow but never overflows the stack.
/// Use [`SelfBalancingOrderedMap`](crate::SelfBalancingOrderedMap) when
/// insertion order is not under your control.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    tree: Tree<K, V>,
}

impl<K: Ord, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Inserts or updates. An equal key keeps its node and gets the new value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.place(key, value) {
            Placement::Replaced(old) => Some(old),
            Placement::Inserted { .. } => None,
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

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.unlink(key).map(|(value, _)| value)
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

    /// Number of levels; 0 when empty.
    pub fn height(&self) -> u32 {
        self.tree.measured_height()
    }
}

impl<K: Ord + Clone, V> OrderedMap<K, V> {
    pub fn keys(&self) -> GrowableSequence<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }
}

impl<K: Ord, V: Clone> OrderedMap<K, V> {
    pub fn values(&self) -> GrowableSequence<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K: Ord, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrderIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let map = OrderedMap::<u32, &str>::new();
        assert!(map.is_empty());
        assert_eq!(map.height(), 0);
        assert_eq!(map.min(), None);
    }

    #[test]
    fn test_insert_and_find() {
        let mut map = OrderedMap::new();
        assert_eq!(map.insert("SR-0042", "burst pipe"), None);
        assert_eq!(map.insert("SR-0007", "graffiti"), None);
        assert_eq!(map.find("SR-0042"), Some(&"burst pipe"));
        assert_eq!(map.find("SR-9999"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_equal_key_replaces_without_growing() {
        let mut map = OrderedMap::new();
        map.insert(5, "old");
        assert_eq!(map.insert(5, "new"), Some("old"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&5), Ok(&"new"));
    }

    #[test]
    fn test_get_missing_key() {
        let map: OrderedMap<i32, ()> = OrderedMap::new();
        assert_eq!(
            map.get(&3),
            Err(CollectionError::KeyNotFound {
                key: "3".to_string()
            })
        );
    }

    #[test]
    fn test_in_order_is_ascending() {
        let map: OrderedMap<_, _> = [9, 2, 7, 4, 1, 8].iter().map(|&k| (k, k * 2)).collect();
        assert_eq!(map.keys().to_vec(), vec![1, 2, 4, 7, 8, 9]);
        assert_eq!(map.values().to_vec(), vec![2, 4, 8, 14, 16, 18]);
        let pairs: Vec<(i32, i32)> = map.in_order().iter().map(|(k, v)| (**k, **v)).collect();
        assert_eq!(pairs[0], (1, 2));
        assert_eq!(map.min(), Some((&1, &2)));
        assert_eq!(map.max(), Some((&9, &18)));
    }

    #[test]
    fn test_range_with_temporary_bounds() {
        let map: OrderedMap<String, u32> = ["ash", "birch", "cedar", "elm", "oak"]
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i as u32))
            .collect();
        let trees = map.range(&"b".to_string(), &"e".to_string());
        assert_eq!(trees.map(|(_, v)| *v).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_ascending_input_degenerates() {
        let map: OrderedMap<_, _> = (0..64).map(|k| (k, ())).collect();
        assert_eq!(map.height(), 64);
    }

    #[test]
    fn test_remove_until_empty() {
        let mut map: OrderedMap<_, _> = [5, 3, 8, 1, 4, 7, 9].iter().map(|&k| (k, k)).collect();
        assert_eq!(map.remove(&3), Some(3));
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.keys().to_vec(), vec![1, 4, 5, 7, 8, 9]);
        for k in [5, 1, 9, 4, 8, 7] {
            assert_eq!(map.remove(&k), Some(k));
        }
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_find_mut_and_clear() {
        let mut map = OrderedMap::new();
        map.insert('b', 1);
        if let Some(v) = map.find_mut(&'b') {
            *v += 1;
        }
        assert_eq!(map.find(&'b'), Some(&2));
        map.clear();
        assert!(map.is_empty());
        assert!(!map.contains_key(&'b'));
    }
}
