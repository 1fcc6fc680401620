use crate::error::{CollectionError, Result};

/// Bucket count used when no capacity is requested.
pub const DEFAULT_HASH_CAPACITY: usize = 16;

/// Occupancy ratio at which the hash map doubles its bucket array.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Tuning for [`HashMap`](crate::HashMap) and [`Set`](crate::Set).
///
/// ```
/// use civic_collections::{HashMap, HashMapConfig};
///
/// let config = HashMapConfig::default()
///     .with_initial_capacity(64)
///     .with_load_factor(0.5);
/// let map: HashMap<u32, &str> = HashMap::with_config(config).unwrap();
/// assert_eq!(map.capacity(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashMapConfig {
    /// Number of buckets allocated up front
    pub initial_capacity: usize,
    /// Regrowth threshold as entries / buckets
    pub load_factor: f64,
}

impl HashMapConfig {
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Rejects configurations the map could never satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(CollectionError::invalid_argument(
                "initial capacity must be at least 1",
            ));
        }
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(CollectionError::invalid_argument(format!(
                "load factor must be in (0, 1], got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

impl Default for HashMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_HASH_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}
