use crate::config::HashMapConfig;
use crate::error::{CollectionError, Result};
use crate::linked::DoublyLinkedSequence;
use crate::sequence::GrowableSequence;
use ahash::RandomState;
use log::debug;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// A stored key/value pair.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

/// Collision chain for one hash slot.
type Bucket<K, V> = DoublyLinkedSequence<Entry<K, V>>;

/// Unordered map using separate chaining.
///
/// Each key hashes to bucket `hash(key) % capacity`; a bucket is a
/// [`DoublyLinkedSequence`] of entries scanned by key equality. Before a new key
/// is stored, the map doubles its bucket array if `len / capacity` has reached
/// the configured load factor, rehashing every entry.
///
/// Iteration order is bucket order then chain order, which is unspecified and
/// changes across regrowth.
///
/// ```
/// use civic_collections::HashMap;
///
/// let mut tickets = HashMap::new();
/// tickets.insert("REF-1", "pothole");
/// tickets.insert("REF-2", "streetlight");
/// assert_eq!(tickets.try_get("REF-1"), Some(&"pothole"));
/// assert!(tickets.remove("REF-2"));
/// assert_eq!(tickets.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = RandomState> {
    buckets: GrowableSequence<Bucket<K, V>>,
    len: usize,
    load_factor: f64,
    initial_capacity: usize,
    hash_builder: S,
}

impl<K: Hash + Eq, V> HashMap<K, V, RandomState> {
    /// Creates an empty map with 16 buckets and a 0.75 load factor.
    pub fn new() -> Self {
        Self::build(HashMapConfig::default(), RandomState::new())
    }

    /// Creates an empty map with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let config = HashMapConfig::default().with_initial_capacity(capacity.max(1));
        Self::build(config, RandomState::new())
    }

    pub fn with_config(config: HashMapConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashMap<K, V, S> {
    /// Creates an empty map with the default configuration and a caller-supplied hasher.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::build(HashMapConfig::default(), hash_builder)
    }

    pub fn with_config_and_hasher(config: HashMapConfig, hash_builder: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hash_builder))
    }

    fn build(config: HashMapConfig, hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(config.initial_capacity),
            len: 0,
            load_factor: config.load_factor,
            initial_capacity: config.initial_capacity,
            hash_builder,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// The configuration this map was built with. Capacity is the starting
    /// bucket count, not the current one.
    pub fn config(&self) -> HashMapConfig {
        HashMapConfig {
            initial_capacity: self.initial_capacity,
            load_factor: self.load_factor,
        }
    }

    /// Inserts or updates. Returns the previous value when the key was present.
    ///
    /// Updating an existing key never changes `len` and never triggers regrowth.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        if let Some(entry) = self.buckets[index].find_mut(|e| e.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.len as f64 / self.buckets.len() as f64 >= self.load_factor {
            self.grow();
        }

        let index = self.bucket_index(&key);
        self.buckets[index].push(Entry { key, value });
        self.len += 1;
        None
    }

    /// Direct keyed access, failing with `KeyNotFound` when absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.try_get(key)
            .ok_or_else(|| CollectionError::key_not_found(key))
    }

    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index]
            .find(|e| e.key.borrow() == key)
            .map(|e| &e.value)
    }

    pub fn try_get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index]
            .find_mut(|e| e.key.borrow() == key)
            .map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).is_some()
    }

    /// Removes a key. Returns whether it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes a key and hands back its value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let entry = self.buckets[index].remove_first(|e| e.key.borrow() == key)?;
        self.len -= 1;
        Some(entry.value)
    }

    /// Drops every entry, keeping the current bucket count.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Iterates entries in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|e| (&e.key, &e.value)))
    }

    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hash_builder.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Doubles the bucket array and rehashes every entry into it.
    fn grow(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity * 2;
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));

        for mut bucket in old {
            while let Some(entry) = bucket.pop_front() {
                let index = self.bucket_index(&entry.key);
                self.buckets[index].push(entry);
            }
        }

        debug!(
            "hash map grew {} -> {} buckets at {} entries",
            old_capacity, new_capacity, self.len
        );
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> HashMap<K, V, S> {
    /// An empty map with the same configuration and hasher as `self`.
    pub(crate) fn empty_like(&self) -> Self {
        Self::build(self.config(), self.hash_builder.clone())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> HashMap<K, V, S> {
    /// Snapshot of every key, in iteration order.
    pub fn keys(&self) -> GrowableSequence<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> HashMap<K, V, S> {
    /// Snapshot of every value, in iteration order.
    pub fn values(&self) -> GrowableSequence<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

fn empty_buckets<K, V>(capacity: usize) -> GrowableSequence<Bucket<K, V>> {
    let mut buckets = GrowableSequence::with_capacity(capacity);
    for _ in 0..capacity {
        buckets.push(DoublyLinkedSequence::new());
    }
    buckets
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::build(HashMapConfig::default(), S::default())
    }
}

impl<K: Hash + Eq + fmt::Debug, V: fmt::Debug, S: BuildHasher> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for HashMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for HashMap<K, V, RandomState> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
