use crate::hash_map::HashMap;
use crate::priority_queue::PriorityQueue;
use crate::queue::Queue;
use crate::sequence::GrowableSequence;
use crate::set::Set;
use log::debug;
use std::fmt;
use std::hash::Hash;

/// An undirected, weighted edge as reported by [`WeightedGraph::mst`].
///
/// `from` is the endpoint that was already in the tree when the edge was
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge<N, W> {
    pub from: N,
    pub to: N,
    pub weight: W,
}

/// Neighbors of one node in insertion order, each with its edge weight.
pub type Adjacency<N, W> = GrowableSequence<(N, W)>;

/// Undirected weighted graph stored as an adjacency list.
///
/// Every edge is recorded on both endpoints with the same weight. A pair of
/// nodes carries at most one edge: re-adding an existing pair keeps the first
/// weight.
///
/// ```
/// use civic_collections::WeightedGraph;
///
/// let mut roads = WeightedGraph::new();
/// roads.add_edge("DEPOT", "A", 10);
/// roads.add_edge("A", "B", 5);
/// roads.add_edge("DEPOT", "B", 25);
///
/// assert_eq!(roads.bfs(&"DEPOT").to_vec(), vec!["DEPOT", "A", "B"]);
/// let tree = roads.mst(&"DEPOT");
/// assert_eq!(tree.iter().map(|e| e.weight).sum::<u32>(), 15);
/// ```
#[derive(Clone)]
pub struct WeightedGraph<N, W = u32> {
    adjacency: HashMap<N, Adjacency<N, W>>,
    edge_count: usize,
}

impl<N: Hash + Eq + Clone, W: Copy + Ord> WeightedGraph<N, W> {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
            edge_count: 0,
        }
    }

    /// Registers a node. Returns false if it was already present.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, GrowableSequence::new());
        true
    }

    /// Connects `a` and `b` in both directions, creating either node if needed.
    ///
    /// Returns false, leaving the existing weight in place, if the pair is
    /// already adjacent. Self-loops are never recorded.
    pub fn add_edge(&mut self, a: N, b: N, weight: W) -> bool {
        if a == b {
            debug!("ignoring self-loop edge");
            self.add_node(a);
            return false;
        }

        self.add_node(a.clone());
        self.add_node(b.clone());

        let already_adjacent = self
            .adjacency
            .try_get(&a)
            .is_some_and(|neighbors| neighbors.iter().any(|(n, _)| *n == b));
        if already_adjacent {
            return false;
        }

        if let Some(neighbors) = self.adjacency.try_get_mut(&a) {
            neighbors.push((b.clone(), weight));
        }
        if let Some(neighbors) = self.adjacency.try_get_mut(&b) {
            neighbors.push((a, weight));
        }
        self.edge_count += 1;
        true
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterates nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.adjacency.iter().map(|(node, _)| node)
    }

    pub fn neighbors(&self, node: &N) -> Option<&Adjacency<N, W>> {
        self.adjacency.try_get(node)
    }

    /// Read-only view of the whole adjacency list.
    pub fn adjacency(&self) -> &HashMap<N, Adjacency<N, W>> {
        &self.adjacency
    }

    /// Breadth-first order from `start`.
    ///
    /// Neighbors are visited in the order their edges were added, so the result
    /// is deterministic for a given insertion history. Nodes unreachable from
    /// `start` are left out; an unknown `start` yields an empty sequence.
    pub fn bfs(&self, start: &N) -> GrowableSequence<N> {
        let mut order = GrowableSequence::new();
        if !self.adjacency.contains_key(start) {
            return order;
        }

        let mut visited = Set::new();
        let mut queue = Queue::new();
        visited.insert(start.clone());
        queue.enqueue(start.clone());

        while let Some(node) = queue.try_dequeue() {
            if let Some(neighbors) = self.adjacency.try_get(&node) {
                for (neighbor, _) in neighbors {
                    if visited.insert(neighbor.clone()) {
                        queue.enqueue(neighbor.clone());
                    }
                }
            }
            order.push(node);
        }

        order
    }

    /// Minimum spanning tree grown from `start` with Prim's algorithm.
    ///
    /// Candidate edges wait in a min-priority queue keyed by weight; the cheapest
    /// one that reaches an unvisited node is accepted and that node's edges join
    /// the frontier. Stops at `node_count - 1` edges or when the frontier runs
    /// dry, so a graph disconnected from `start` yields the spanning tree of
    /// `start`'s component only. Ties between equal weights break arbitrarily.
    pub fn mst(&self, start: &N) -> GrowableSequence<Edge<N, W>> {
        let mut tree = GrowableSequence::new();
        let Some(start_edges) = self.adjacency.try_get(start) else {
            return tree;
        };

        let wanted = self.adjacency.len().saturating_sub(1);
        let mut visited = Set::new();
        let mut frontier = PriorityQueue::new();

        visited.insert(start.clone());
        for (neighbor, weight) in start_edges {
            frontier.enqueue(
                Edge {
                    from: start.clone(),
                    to: neighbor.clone(),
                    weight: *weight,
                },
                *weight,
            );
        }

        while tree.len() < wanted {
            let Some((edge, _)) = frontier.try_dequeue() else {
                break;
            };

            let reached = match (visited.contains(&edge.from), visited.contains(&edge.to)) {
                (true, false) => edge.to.clone(),
                (false, true) => edge.from.clone(),
                _ => continue,
            };

            visited.insert(reached.clone());
            if let Some(neighbors) = self.adjacency.try_get(&reached) {
                for (neighbor, weight) in neighbors {
                    if !visited.contains(neighbor) {
                        frontier.enqueue(
                            Edge {
                                from: reached.clone(),
                                to: neighbor.clone(),
                                weight: *weight,
                            },
                            *weight,
                        );
                    }
                }
            }
            tree.push(edge);
        }

        debug!(
            "mst accepted {} of {} edges across {} nodes",
            tree.len(),
            wanted,
            self.adjacency.len()
        );
        tree
    }
}

impl<N: Hash + Eq + Clone, W: Copy + Ord> Default for WeightedGraph<N, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Hash + Eq + fmt::Debug, W: fmt::Debug> fmt::Debug for WeightedGraph<N, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedGraph")
            .field("adjacency", &self.adjacency)
            .field("edge_count", &self.edge_count)
            .finish()
    }
}
