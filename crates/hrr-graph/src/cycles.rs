//! Cycle detection by depth-first search with a visiting stack
//!
//! Shared by rename-chain detection and reload-cascade analysis. A successor
//! that is still on the current path closes a cycle; a successor that was
//! fully explored earlier does not.

use std::collections::HashSet;
use std::hash::Hash;

/// Find cycles reachable from `roots`
///
/// Each cycle is reported as the path from the first occurrence of the
/// repeated node through the closing repeat, e.g. `[a, b, c, a]`. Disjoint
/// cycles are all reported, in discovery order.
///
/// # Arguments
/// * `roots` - start nodes, explored in order
/// * `successors` - edge lookup for a node
pub fn detect_cycles<N, R, F, S>(roots: R, mut successors: F) -> Vec<Vec<N>>
where
    N: Clone + Eq + Hash,
    R: IntoIterator<Item = N>,
    F: FnMut(&N) -> S,
    S: IntoIterator<Item = N>,
{
    let mut search = CycleSearch::new();
    for root in roots {
        if !search.visited.contains(&root) {
            search.visit(root, &mut successors);
        }
    }
    search.cycles
}

struct CycleSearch<N> {
    visited: HashSet<N>,
    visiting: HashSet<N>,
    path: Vec<N>,
    cycles: Vec<Vec<N>>,
}

impl<N: Clone + Eq + Hash> CycleSearch<N> {
    fn new() -> Self {
        Self {
            visited: HashSet::new(),
            visiting: HashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn visit<F, S>(&mut self, root: N, successors: &mut F)
    where
        F: FnMut(&N) -> S,
        S: IntoIterator<Item = N>,
    {
        let mut frames: Vec<(N, std::vec::IntoIter<N>)> = Vec::new();
        self.enter(root.clone());
        let first = collect_successors(&root, successors);
        frames.push((root, first));

        while let Some((_, pending)) = frames.last_mut() {
            match pending.next() {
                Some(succ) if self.visiting.contains(&succ) => self.record_cycle(succ),
                Some(succ) if !self.visited.contains(&succ) => {
                    self.enter(succ.clone());
                    let next = collect_successors(&succ, successors);
                    frames.push((succ, next));
                }
                Some(_) => {}
                None => {
                    if let Some((done, _)) = frames.pop() {
                        self.path.pop();
                        self.visiting.remove(&done);
                    }
                }
            }
        }
    }

    fn enter(&mut self, node: N) {
        self.visited.insert(node.clone());
        self.visiting.insert(node.clone());
        self.path.push(node);
    }

    fn record_cycle(&mut self, closing: N) {
        let Some(first) = self.path.iter().position(|n| *n == closing) else {
            return;
        };
        let mut cycle = self.path[first..].to_vec();
        cycle.push(closing);
        self.cycles.push(cycle);
    }
}

fn collect_successors<N, F, S>(node: &N, successors: &mut F) -> std::vec::IntoIter<N>
where
    F: FnMut(&N) -> S,
    S: IntoIterator<Item = N>,
{
    successors(node).into_iter().collect::<Vec<_>>().into_iter()
}
