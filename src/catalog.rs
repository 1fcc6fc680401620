use crate::avl::SelfBalancingOrderedMap;
use crate::error::Result;
use crate::hash_map::HashMap;
use crate::priority_queue::PriorityQueue;
use crate::sequence::GrowableSequence;
use crate::set::Set;
use log::{debug, warn};
use std::fmt;
use std::hash::Hash;

/// A record that can be indexed by a [`Catalog`].
///
/// Lower `priority` values are more urgent.
pub trait CatalogRecord {
    type Id: Hash + Eq + Clone + fmt::Debug;
    type Date: Ord + Clone;
    type Category: Hash + Eq + Clone;

    fn id(&self) -> &Self::Id;
    fn date(&self) -> &Self::Date;
    fn category(&self) -> &Self::Category;
    fn priority(&self) -> i64;
}

/// Owns a set of records and keeps one index per query shape in step with it.
///
/// Every accepted [`insert`](Catalog::insert) lands in all of:
///
/// - the id → record store
/// - a date → ids ordered map (ties keep insertion order)
/// - a category → ids map plus the set of known categories
/// - a priority queue of ids keyed by urgency
///
/// A record whose id is already present is rejected before any index is
/// touched.
///
/// ```
/// use civic_collections::{Catalog, CatalogRecord};
///
/// struct Ticket { id: u32, day: u32, kind: &'static str, severity: i64 }
///
/// impl CatalogRecord for Ticket {
///     type Id = u32;
///     type Date = u32;
///     type Category = &'static str;
///     fn id(&self) -> &u32 { &self.id }
///     fn date(&self) -> &u32 { &self.day }
///     fn category(&self) -> &&'static str { &self.kind }
///     fn priority(&self) -> i64 { self.severity }
/// }
///
/// let mut catalog = Catalog::new();
/// catalog.insert(Ticket { id: 1, day: 3, kind: "roads", severity: 2 });
/// catalog.insert(Ticket { id: 2, day: 1, kind: "water", severity: 1 });
/// assert!(!catalog.insert(Ticket { id: 2, day: 9, kind: "parks", severity: 0 }));
///
/// let days: Vec<u32> = catalog.in_date_order().iter().map(|t| t.day).collect();
/// assert_eq!(days, vec![1, 3]);
/// assert_eq!(catalog.most_urgent().map(|t| t.id), Some(2));
/// ```
pub struct Catalog<R: CatalogRecord> {
    records: HashMap<R::Id, R>,
    by_date: SelfBalancingOrderedMap<R::Date, GrowableSequence<R::Id>>,
    by_category: HashMap<R::Category, GrowableSequence<R::Id>>,
    categories: Set<R::Category>,
    urgency: PriorityQueue<R::Id, i64>,
}

impl<R: CatalogRecord> Catalog<R> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            by_date: SelfBalancingOrderedMap::new(),
            by_category: HashMap::new(),
            categories: Set::new(),
            urgency: PriorityQueue::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stores `record` and indexes it. Returns false if its id is taken.
    pub fn insert(&mut self, record: R) -> bool {
        let id = record.id().clone();
        if self.records.contains_key(&id) {
            warn!("rejecting record with duplicate id {:?}", id);
            return false;
        }

        let date = record.date().clone();
        match self.by_date.find_mut(&date) {
            Some(ids) => ids.push(id.clone()),
            None => {
                self.by_date.insert(date, GrowableSequence::from_iter([id.clone()]));
            }
        }

        let category = record.category().clone();
        match self.by_category.try_get_mut(&category) {
            Some(ids) => ids.push(id.clone()),
            None => {
                self.by_category
                    .insert(category.clone(), GrowableSequence::from_iter([id.clone()]));
            }
        }
        self.categories.insert(category);

        self.urgency.enqueue(id.clone(), record.priority());
        self.records.insert(id, record);
        true
    }

    /// Looks a record up by id, failing with `KeyNotFound` when absent.
    pub fn get(&self, id: &R::Id) -> Result<&R> {
        self.records.get(id)
    }

    pub fn try_get(&self, id: &R::Id) -> Option<&R> {
        self.records.try_get(id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.records.contains_key(id)
    }

    /// All records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.records.iter().map(|(_, record)| record)
    }

    /// Records filed under `category`, oldest insert first.
    pub fn by_category(&self, category: &R::Category) -> GrowableSequence<&R> {
        self.by_category
            .try_get(category)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.records.try_get(id))
            .collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &R::Category> + '_ {
        self.categories.iter()
    }

    pub fn has_category(&self, category: &R::Category) -> bool {
        self.categories.contains(category)
    }

    /// Every record by ascending date.
    pub fn in_date_order(&self) -> GrowableSequence<&R> {
        self.by_date
            .iter()
            .flat_map(|(_, ids)| ids.iter())
            .filter_map(|id| self.records.try_get(id))
            .collect()
    }

    /// Records dated within `[from, to]`, ascending.
    pub fn between(&self, from: &R::Date, to: &R::Date) -> GrowableSequence<&R> {
        self.by_date
            .range(from, to)
            .flat_map(|(_, ids)| ids.iter())
            .filter_map(|id| self.records.try_get(id))
            .collect()
    }

    /// The record with the lowest priority value, without removing it.
    pub fn most_urgent(&self) -> Option<&R> {
        self.urgency
            .try_peek()
            .and_then(|(id, _)| self.records.try_get(id))
    }

    /// Takes the most urgent record out of the catalog and every index.
    pub fn pop_most_urgent(&mut self) -> Option<R> {
        let (id, priority) = self.urgency.try_dequeue()?;
        let record = self.records.take(&id)?;

        let date_emptied = match self.by_date.find_mut(record.date()) {
            Some(ids) => {
                ids.remove(&id);
                ids.is_empty()
            }
            None => false,
        };
        if date_emptied {
            self.by_date.remove(record.date());
        }

        let category_emptied = match self.by_category.try_get_mut(record.category()) {
            Some(ids) => {
                ids.remove(&id);
                ids.is_empty()
            }
            None => false,
        };
        if category_emptied {
            self.by_category.remove(record.category());
            self.categories.remove(record.category());
        }

        debug!("dispatched record {:?} at priority {}", id, priority);
        Some(record)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.by_date.clear();
        self.by_category.clear();
        self.categories.clear();
        self.urgency.clear();
    }
}

impl<R: CatalogRecord> Default for Catalog<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CatalogRecord> Extend<R> for Catalog<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<R: CatalogRecord + fmt::Debug> fmt::Debug for Catalog<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;

    #[derive(Debug, Clone, PartialEq)]
    struct Request {
        id: &'static str,
        filed: u32,
        department: &'static str,
        severity: i64,
    }

    impl CatalogRecord for Request {
        type Id = &'static str;
        type Date = u32;
        type Category = &'static str;

        fn id(&self) -> &Self::Id {
            &self.id
        }

        fn date(&self) -> &Self::Date {
            &self.filed
        }

        fn category(&self) -> &Self::Category {
            &self.department
        }

        fn priority(&self) -> i64 {
            self.severity
        }
    }

    fn request(id: &'static str, filed: u32, department: &'static str, severity: i64) -> Request {
        Request {
            id,
            filed,
            department,
            severity,
        }
    }

    fn sample() -> Catalog<Request> {
        let mut catalog = Catalog::new();
        catalog.extend([
            request("SR-1", 20240105, "roads", 3),
            request("SR-2", 20240102, "water", 1),
            request("SR-3", 20240110, "roads", 2),
            request("SR-4", 20240102, "parks", 5),
            request("SR-5", 20240107, "water", 4),
        ]);
        catalog
    }

    fn ids(records: &GrowableSequence<&Request>) -> Vec<&'static str> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_new() {
        let catalog = Catalog::<Request>::new();
        assert!(catalog.is_empty());
        assert!(catalog.most_urgent().is_none());
        assert_eq!(catalog.categories().count(), 0);
    }

    #[test]
    fn test_insert_populates_every_index() {
        let catalog = sample();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(&"SR-3").map(|r| r.filed), Ok(20240110));
        assert_eq!(ids(&catalog.by_category(&"roads")), vec!["SR-1", "SR-3"]);
        assert_eq!(
            ids(&catalog.in_date_order()),
            vec!["SR-2", "SR-4", "SR-1", "SR-5", "SR-3"]
        );

        let mut categories: Vec<_> = catalog.categories().copied().collect();
        categories.sort();
        assert_eq!(categories, vec!["parks", "roads", "water"]);
        assert_eq!(catalog.most_urgent().map(|r| r.id), Some("SR-2"));
    }

    #[test]
    fn test_duplicate_id_rejected_without_side_effects() {
        let mut catalog = sample();
        assert!(!catalog.insert(request("SR-1", 20230101, "sanitation", -10)));
        assert_eq!(catalog.len(), 5);
        assert!(!catalog.has_category(&"sanitation"));
        assert_eq!(catalog.in_date_order().len(), 5);
        assert_eq!(catalog.most_urgent().map(|r| r.id), Some("SR-2"));
        assert_eq!(catalog.get(&"SR-1").map(|r| r.department), Ok("roads"));
    }

    #[test]
    fn test_missing_record() {
        let catalog = sample();
        assert_eq!(
            catalog.get(&"SR-404"),
            Err(CollectionError::KeyNotFound {
                key: "\"SR-404\"".to_string()
            })
        );
        assert!(catalog.try_get(&"SR-404").is_none());
        assert!(catalog.by_category(&"libraries").is_empty());
    }

    #[test]
    fn test_between_is_inclusive() {
        let catalog = sample();
        assert_eq!(
            ids(&catalog.between(&20240102, &20240107)),
            vec!["SR-2", "SR-4", "SR-1", "SR-5"]
        );
        assert_eq!(ids(&catalog.between(&20240108, &20240109)), Vec::<&str>::new());
    }

    #[test]
    fn test_pop_most_urgent_drains_every_index() {
        let mut catalog = sample();
        let order: Vec<_> = std::iter::from_fn(|| catalog.pop_most_urgent())
            .map(|r| r.id)
            .collect();
        assert_eq!(order, vec!["SR-2", "SR-3", "SR-1", "SR-5", "SR-4"]);
        assert!(catalog.is_empty());
        assert!(catalog.in_date_order().is_empty());
        assert_eq!(catalog.categories().count(), 0);
    }

    #[test]
    fn test_pop_keeps_indices_consistent() {
        let mut catalog = sample();
        let first = catalog.pop_most_urgent();
        assert_eq!(first.map(|r| r.id), Some("SR-2"));

        assert!(!catalog.contains(&"SR-2"));
        assert_eq!(ids(&catalog.by_category(&"water")), vec!["SR-5"]);
        assert_eq!(ids(&catalog.between(&20240102, &20240102)), vec!["SR-4"]);
        assert!(catalog.has_category(&"water"));

        // SR-4 was the only parks request
        while let Some(record) = catalog.pop_most_urgent() {
            if record.id == "SR-4" {
                break;
            }
        }
        assert!(!catalog.has_category(&"parks"));
    }

    #[test]
    fn test_reinsert_after_pop() {
        let mut catalog = sample();
        let popped = catalog.pop_most_urgent();
        assert!(popped.is_some_and(|r| catalog.insert(r)));
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.most_urgent().map(|r| r.id), Some("SR-2"));
    }

    #[test]
    fn test_clear() {
        let mut catalog = sample();
        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.pop_most_urgent().is_none());
        assert!(catalog.insert(request("SR-1", 1, "roads", 1)));
    }
}
