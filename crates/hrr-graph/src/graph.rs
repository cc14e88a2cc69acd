//! Dependency graph over arbitrary node identifiers
//!
//! Nodes are interned into an [`IndexSet`] so discovery order is preserved
//! and edges live in a `petgraph` [`DiGraphMap`] keyed by node index.

use crate::cycles::detect_cycles;
use indexmap::IndexSet;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::VecDeque;
use std::hash::Hash;

/// Directed graph where an edge `a -> b` means "b must come after a"
#[derive(Debug, Clone)]
pub struct DependencyGraph<N> {
    nodes: IndexSet<N>,
    edges: DiGraphMap<usize, ()>,
}

impl<N: Clone + Eq + Hash> DependencyGraph<N> {
    /// Create empty graph
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: IndexSet::new(),
            edges: DiGraphMap::new(),
        }
    }

    /// Add a node, returning its discovery index
    pub fn add_node(&mut self, node: N) -> usize {
        let (index, _) = self.nodes.insert_full(node);
        self.edges.add_node(index);
        index
    }

    /// Add an edge, returning false if it already existed
    pub fn add_edge(&mut self, from: N, to: N) -> bool {
        let a = self.add_node(from);
        let b = self.add_node(to);
        self.edges.add_edge(a, b, ()).is_none()
    }

    /// Node membership
    #[inline]
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Nodes in discovery order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Direct successors of `node`, in edge insertion order
    #[must_use]
    pub fn successors(&self, node: &N) -> Vec<N> {
        let Some(index) = self.nodes.get_index_of(node) else {
            return Vec::new();
        };
        self.edges
            .neighbors_directed(index, Direction::Outgoing)
            .filter_map(|i| self.nodes.get_index(i).cloned())
            .collect()
    }

    /// Cycles reachable from `roots`; see [`detect_cycles`]
    #[must_use]
    pub fn cycles_from<R>(&self, roots: R) -> Vec<Vec<N>>
    where
        R: IntoIterator<Item = N>,
    {
        detect_cycles(roots, |n| self.successors(n))
    }

    /// Kahn's algorithm
    ///
    /// Repeatedly removes zero in-degree nodes, seeding the queue in discovery
    /// order. Nodes still holding in-degree when the queue drains sit on or
    /// behind a cycle and are returned separately, in discovery order.
    #[must_use]
    pub fn topological_order(&self) -> TopologicalOrder<N> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for (_, to, _) in self.edges.all_edges() {
            in_degree[to] += 1;
        }

        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut placed = vec![false; self.nodes.len()];

        while let Some(index) = queue.pop_front() {
            placed[index] = true;
            ordered.push(self.nodes[index].clone());

            for next in self.edges.neighbors_directed(index, Direction::Outgoing) {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        let unordered = (0..self.nodes.len())
            .filter(|&i| !placed[i])
            .map(|i| self.nodes[i].clone())
            .collect();

        TopologicalOrder { ordered, unordered }
    }
}

impl<N: Clone + Eq + Hash> Default for DependencyGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`DependencyGraph::topological_order`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder<N> {
    /// Linearised nodes; every edge points forward
    pub ordered: Vec<N>,
    /// Nodes that could not be linearised (cycle members and their dependents)
    pub unordered: Vec<N>,
}

impl<N> TopologicalOrder<N> {
    /// Every node was linearised
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unordered.is_empty()
    }

    /// Ordered nodes followed by the unordered remainder
    #[must_use]
    pub fn into_sequence(self) -> Vec<N> {
        let mut all = self.ordered;
        all.extend(self.unordered);
        all
    }
}
