//! HRR Graph Utilities
//!
//! One depth-first cycle search and one Kahn ordering, shared by every
//! caller that needs them.
//!
//! - [`detect_cycles`]: DFS with a visiting stack over any edge-lookup closure
//! - [`DependencyGraph`]: interned `petgraph` graph with cycle search and
//!   topological ordering that tolerates cycles
//!
//! # Example
//!
//! ```rust
//! use hrr_graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_edge("A", "B");
//! graph.add_edge("B", "C");
//! assert_eq!(graph.topological_order().ordered, vec!["A", "B", "C"]);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod cycles;
mod graph;

pub use cycles::detect_cycles;
pub use graph::{DependencyGraph, TopologicalOrder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
