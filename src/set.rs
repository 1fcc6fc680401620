use crate::config::HashMapConfig;
use crate::error::Result;
use crate::hash_map::HashMap;
use crate::sequence::GrowableSequence;
use ahash::RandomState;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// Unordered set of unique keys, stored as keys of a [`HashMap`] whose values
/// are the `()` sentinel.
///
/// Set algebra (`union`, `intersection`, `difference`) is pure: operands are left
/// untouched and a fresh set is returned in O(len(self) + len(other)).
#[derive(Clone)]
pub struct Set<K, S = RandomState> {
    map: HashMap<K, (), S>,
}

impl<K: Hash + Eq> Set<K, RandomState> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_config(config: HashMapConfig) -> Result<Self> {
        Ok(Self {
            map: HashMap::with_config(config)?,
        })
    }
}

impl<K: Hash + Eq, S: BuildHasher> Set<K, S> {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Adds a key. Returns true when it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        self.map.insert(key, ());
        true
    }

    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates members in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.iter().map(|(k, _)| k)
    }

    /// True when every member of `self` is also in `other`.
    pub fn is_subset_of<S2: BuildHasher>(&self, other: &Set<K, S2>) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k))
    }

    /// Configuration of the backing map; results of set algebra inherit it.
    pub fn config(&self) -> HashMapConfig {
        self.map.config()
    }

    pub fn is_superset_of<S2: BuildHasher>(&self, other: &Set<K, S2>) -> bool {
        other.is_subset_of(self)
    }
}

impl<K: Hash + Eq + Clone, S: BuildHasher + Clone> Set<K, S> {
    pub fn union(&self, other: &Set<K, S>) -> Set<K, S> {
        let mut result = self.empty_like();
        for key in self.iter().chain(other.iter()) {
            result.insert(key.clone());
        }
        result
    }

    pub fn intersection(&self, other: &Set<K, S>) -> Set<K, S> {
        let mut result = self.empty_like();
        for key in self.iter().filter(|k| other.contains(*k)) {
            result.insert(key.clone());
        }
        result
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &Set<K, S>) -> Set<K, S> {
        let mut result = self.empty_like();
        for key in self.iter().filter(|k| !other.contains(*k)) {
            result.insert(key.clone());
        }
        result
    }

    /// Snapshot of the members, in iteration order.
    pub fn to_sequence(&self) -> GrowableSequence<K> {
        self.map.keys()
    }

    fn empty_like(&self) -> Set<K, S> {
        Set {
            map: self.map.empty_like(),
        }
    }
}

impl<K: Hash + Eq, S: BuildHasher> PartialEq for Set<K, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }
}

impl<K: Hash + Eq, S: BuildHasher> Eq for Set<K, S> {}

impl<K: Hash + Eq, S: BuildHasher + Default> Default for Set<K, S> {
    fn default() -> Self {
        Self {
            map: HashMap::default(),
        }
    }
}

impl<K: Hash + Eq + fmt::Debug, S: BuildHasher> fmt::Debug for Set<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, S: BuildHasher> Extend<K> for Set<K, S> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Hash + Eq> FromIterator<K> for Set<K, RandomState> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(items: &[&'static str]) -> Set<&'static str> {
        items.iter().copied().collect()
    }

    fn sorted(set: &Set<&'static str>) -> Vec<&'static str> {
        let mut items = set.to_sequence().to_vec();
        items.sort();
        items
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut set = Set::new();
        assert!(set.insert("roads"));
        assert!(!set.insert("roads"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("roads"));
    }

    #[test]
    fn test_remove() {
        let mut set = set_of(&["water", "power"]);
        assert!(set.remove("water"));
        assert!(!set.remove("water"));
        assert_eq!(sorted(&set), vec!["power"]);
    }

    #[test]
    fn test_algebra_leaves_operands_untouched() {
        let a = set_of(&["a", "b", "c"]);
        let b = set_of(&["b", "c", "d"]);

        assert_eq!(sorted(&a.union(&b)), vec!["a", "b", "c", "d"]);
        assert_eq!(sorted(&a.intersection(&b)), vec!["b", "c"]);
        assert_eq!(sorted(&a.difference(&b)), vec!["a"]);
        assert_eq!(sorted(&b.difference(&a)), vec!["d"]);

        assert_eq!(sorted(&a), vec!["a", "b", "c"]);
        assert_eq!(sorted(&b), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_subset_and_superset() {
        let small = set_of(&["x"]);
        let big = set_of(&["x", "y"]);
        let empty = Set::new();
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
        assert!(big.is_superset_of(&small));
        assert!(empty.is_subset_of(&small));
        assert!(small.is_subset_of(&small));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = set_of(&["1", "2", "3"]);
        let b = set_of(&["3", "2", "1"]);
        assert_eq!(a, b);
        assert_ne!(a, set_of(&["1", "2"]));
    }

    #[test]
    fn test_with_config() {
        let rejected = Set::<u32>::with_config(HashMapConfig::default().with_load_factor(1.5));
        assert!(matches!(
            rejected,
            Err(crate::error::CollectionError::InvalidArgument { .. })
        ));
        let zero_capacity = HashMapConfig::default().with_initial_capacity(0);
        assert!(Set::<u32>::with_config(zero_capacity).is_err());

        let config = HashMapConfig::default()
            .with_initial_capacity(4)
            .with_load_factor(0.5);
        let mut a = Set::with_config(config).unwrap();
        let mut b = Set::with_config(config).unwrap();
        a.extend(0..6);
        b.extend(3..9);
        assert_eq!(a.config(), config);

        for result in [a.union(&b), a.intersection(&b), a.difference(&b)] {
            assert_eq!(result.config(), config);
        }
        assert_eq!(a.union(&b).len(), 9);
        assert_eq!(a.intersection(&b).len(), 3);
        assert_eq!(a.difference(&b).len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut set: Set<_> = (0..50).collect();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
