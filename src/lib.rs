//! # Civic Collections - Hand-Built Containers and Graph Algorithms
//!
//! The container layer behind a municipal service-request system: growable and
//! linked sequences, a stack and a circular queue, a chained hash map and the
//! set built on it, plain and AVL ordered maps, a binary min-heap, and a
//! weighted graph with breadth-first search and Prim's minimum spanning tree.
//!
//! Linked structures (the doubly linked sequence and both search trees) keep
//! their nodes in a [`slotmap`] arena and link through generational keys, so
//! there is no `unsafe` and no reference-counted cell in the crate.
//!
//! ## Example
//!
//! ```
//! use civic_collections::{HashMap, SelfBalancingOrderedMap, WeightedGraph};
//!
//! let mut crews = HashMap::new();
//! crews.insert("roads", 4);
//! crews.insert("water", 2);
//! assert_eq!(crews.get("roads"), Ok(&4));
//!
//! let backlog: SelfBalancingOrderedMap<_, _> = (1..=1023).map(|day| (day, ())).collect();
//! assert_eq!(backlog.height(), 10);
//!
//! let mut roads = WeightedGraph::new();
//! roads.add_edge("DEPOT", "A", 10);
//! roads.add_edge("A", "B", 5);
//! let route: u32 = roads.mst(&"DEPOT").iter().map(|e| e.weight).sum();
//! assert_eq!(route, 15);
//! ```
//!
//! ## Complexity
//!
//! - `GrowableSequence::push`, `Stack::push`, `Queue::enqueue`: O(1) amortized
//! - `HashMap` insert, lookup, remove: O(1) average, buckets grow at load factor 0.75
//! - `OrderedMap`: O(depth), which is O(n) for sorted input
//! - `SelfBalancingOrderedMap`: O(log n) worst case
//! - `PriorityQueue` enqueue and dequeue: O(log n)
//! - `WeightedGraph::mst`: O(E log E)

mod avl;
mod bst;
mod catalog;
mod config;
mod error;
mod graph;
mod hash_map;
mod linked;
mod priority_queue;
mod queue;
mod sequence;
mod set;
mod stack;
mod tree;


pub use avl::SelfBalancingOrderedMap;
pub use bst::OrderedMap;
pub use catalog::{Catalog, CatalogRecord};
pub use config::{HashMapConfig, DEFAULT_HASH_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::{CollectionError, Result};
pub use graph::{Adjacency, Edge, WeightedGraph};
pub use hash_map::HashMap;
pub use linked::{DoublyLinkedSequence, LinkedIter};
pub use priority_queue::PriorityQueue;
pub use queue::{Queue, QueueIter};
pub use sequence::GrowableSequence;
pub use set::Set;
pub use stack::Stack;
pub use tree::InOrderIter;
