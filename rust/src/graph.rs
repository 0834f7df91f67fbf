//! Graph adapter over the system's populations and projections.
//!
//! Wraps a petgraph DAG keyed by population index and provides the queries
//! the stride algorithm needs: ancestor/descendant sets, projection lookup by
//! endpoint pair, and the longest path restricted to unresolved projections.
//! Structural validation (acyclicity, single input) happens at construction
//! so the algorithm can assume a well-formed graph.

use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::models::System;
use crate::stride::StrideError;

/// Immutable DAG view of a [`System`], with projection indices attached to
/// the edges.
#[derive(Clone, Debug)]
pub struct SystemGraph {
    graph: DiGraphMap<usize, ()>,
    /// (origin index, termination index) for each projection.
    endpoints: Vec<(usize, usize)>,
    /// Endpoint pair to projection index.
    projection_index: FxHashMap<(usize, usize), usize>,
    /// Population names, for error reporting and logging.
    names: Vec<String>,
    input_index: usize,
    node_count: usize,
}

impl SystemGraph {
    /// Build and validate the graph for a system.
    ///
    /// Fails fast on unknown or duplicate projection endpoints, cycles, and
    /// violations of the single-input assumption (exactly one population with
    /// no incoming projections, and it must be the declared input).
    pub fn new(system: &System) -> Result<Self, StrideError> {
        let input_index = system
            .find_population_index(&system.input_name)
            .ok_or_else(|| StrideError::UnknownPopulation(system.input_name.clone()))?;

        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for i in 0..system.populations.len() {
            graph.add_node(i);
        }

        let mut endpoints = Vec::with_capacity(system.projections.len());
        let mut projection_index: FxHashMap<(usize, usize), usize> = FxHashMap::default();

        for (i, projection) in system.projections.iter().enumerate() {
            let pre = system
                .find_population_index(&projection.origin)
                .ok_or_else(|| StrideError::UnknownPopulation(projection.origin.clone()))?;
            let post = system
                .find_population_index(&projection.termination)
                .ok_or_else(|| StrideError::UnknownPopulation(projection.termination.clone()))?;

            if pre == post {
                return Err(StrideError::CircularDependency);
            }
            if projection_index.insert((pre, post), i).is_some() {
                return Err(StrideError::DuplicateProjection(
                    projection.origin.clone(),
                    projection.termination.clone(),
                ));
            }

            graph.add_edge(pre, post, ());
            endpoints.push((pre, post));
        }

        if is_cyclic_directed(&graph) {
            return Err(StrideError::CircularDependency);
        }

        // Single-input assumption: the declared input must be the only source
        let sources: Vec<usize> = graph
            .nodes()
            .filter(|&n| {
                graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        if sources.len() != 1 || sources[0] != input_index {
            let names = sources
                .iter()
                .map(|&i| system.populations[i].name.clone())
                .collect();
            return Err(StrideError::InputAssumptionViolated {
                declared: system.input_name.clone(),
                sources: names,
            });
        }

        Ok(Self {
            graph,
            endpoints,
            projection_index,
            names: system.populations.iter().map(|p| p.name.clone()).collect(),
            input_index,
            node_count: system.populations.len(),
        })
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// Name of a population, for error reporting and logging.
    pub fn population_name(&self, node: usize) -> &str {
        &self.names[node]
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn projection_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Endpoint pair (origin, termination) of a projection.
    pub fn endpoints(&self, projection: usize) -> (usize, usize) {
        self.endpoints[projection]
    }

    /// Projection index for an endpoint pair, if such a projection exists.
    pub fn find_projection(&self, pre: usize, post: usize) -> Option<usize> {
        self.projection_index.get(&(pre, post)).copied()
    }

    /// All populations with a directed path into `node`.
    pub fn ancestors(&self, node: usize) -> FxHashSet<usize> {
        self.reachable(node, Direction::Incoming)
    }

    /// All populations reachable from `node`.
    pub fn descendants(&self, node: usize) -> FxHashSet<usize> {
        self.reachable(node, Direction::Outgoing)
    }

    fn reachable(&self, node: usize, direction: Direction) -> FxHashSet<usize> {
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(node);

        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbors_directed(current, direction) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen.remove(&node);
        seen
    }

    /// Longest directed path (by edge count) using only projections whose
    /// stride is still unset, as a sequence of population indices.
    ///
    /// Returns an empty vector when every projection is resolved. An isolated
    /// unresolved projection yields a length-1 path, so the fill loop always
    /// makes progress while anything remains unset.
    pub fn longest_unresolved_path(&self, strides: &[Option<u32>]) -> Vec<usize> {
        let mut subgraph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for node in 0..self.node_count {
            subgraph.add_node(node);
        }
        for (i, &(pre, post)) in self.endpoints.iter().enumerate() {
            if strides[i].is_none() {
                subgraph.add_edge(pre, post, ());
            }
        }

        // Standard DAG longest path: DP over a topological order. The
        // subgraph of a validated DAG cannot be cyclic.
        let order = match petgraph::algo::toposort(&subgraph, None) {
            Ok(order) => order,
            Err(_) => return Vec::new(),
        };

        let mut dist: FxHashMap<usize, usize> = FxHashMap::default();
        let mut pred: FxHashMap<usize, usize> = FxHashMap::default();

        for &u in &order {
            let du = dist.get(&u).copied().unwrap_or(0);
            for v in subgraph.neighbors_directed(u, Direction::Outgoing) {
                if du + 1 > dist.get(&v).copied().unwrap_or(0) {
                    dist.insert(v, du + 1);
                    pred.insert(v, u);
                }
            }
        }

        // Deterministic end node: lowest index among the strict maxima
        let mut end = 0;
        let mut best = 0;
        for node in 0..self.node_count {
            let d = dist.get(&node).copied().unwrap_or(0);
            if d > best {
                best = d;
                end = node;
            }
        }
        if best == 0 {
            return Vec::new();
        }

        let mut path = vec![end];
        let mut current = end;
        while let Some(&previous) = pred.get(&current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Population, Projection};

    fn make_system(names: &[&str], edges: &[(&str, &str)], input: &str) -> System {
        System::new(
            names
                .iter()
                .map(|&name| Population {
                    name: name.to_string(),
                    n: 1000.0,
                })
                .collect(),
            edges
                .iter()
                .map(|&(origin, termination)| Projection {
                    origin: origin.to_string(),
                    termination: termination.to_string(),
                })
                .collect(),
            input.to_string(),
        )
    }

    #[test]
    fn test_chain_construction() {
        let system = make_system(&["A", "B", "C"], &[("A", "B"), ("B", "C")], "A");
        let graph = SystemGraph::new(&system).unwrap();
        assert_eq!(graph.input_index(), 0);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.projection_count(), 2);
        assert_eq!(graph.find_projection(0, 1), Some(0));
        assert_eq!(graph.find_projection(1, 0), None);
    }

    #[test]
    fn test_cycle_rejected() {
        let system = make_system(&["A", "B"], &[("A", "B"), ("B", "A")], "A");
        assert!(matches!(
            SystemGraph::new(&system),
            Err(StrideError::CircularDependency)
        ));
    }

    #[test]
    fn test_self_loop_rejected() {
        let system = make_system(&["A", "B"], &[("A", "B"), ("B", "B")], "A");
        assert!(matches!(
            SystemGraph::new(&system),
            Err(StrideError::CircularDependency)
        ));
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let system = make_system(&["A", "B"], &[("A", "X")], "A");
        assert!(matches!(
            SystemGraph::new(&system),
            Err(StrideError::UnknownPopulation(name)) if name == "X"
        ));
    }

    #[test]
    fn test_duplicate_projection_rejected() {
        let system = make_system(&["A", "B"], &[("A", "B"), ("A", "B")], "A");
        assert!(matches!(
            SystemGraph::new(&system),
            Err(StrideError::DuplicateProjection(_, _))
        ));
    }

    #[test]
    fn test_multiple_sources_rejected() {
        // Two populations with no incoming projections
        let system = make_system(&["A", "B", "C"], &[("A", "C"), ("B", "C")], "A");
        let err = SystemGraph::new(&system).unwrap_err();
        match err {
            StrideError::InputAssumptionViolated { sources, .. } => {
                assert_eq!(sources.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_declared_input_must_be_source() {
        let system = make_system(&["A", "B"], &[("A", "B")], "B");
        assert!(matches!(
            SystemGraph::new(&system),
            Err(StrideError::InputAssumptionViolated { .. })
        ));
    }

    #[test]
    fn test_ancestors_descendants_diamond() {
        // A -> B -> D, A -> C -> D
        let system = make_system(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
            "A",
        );
        let graph = SystemGraph::new(&system).unwrap();

        let ancestors_d = graph.ancestors(3);
        assert_eq!(ancestors_d, FxHashSet::from_iter([0, 1, 2]));
        let descendants_a = graph.descendants(0);
        assert_eq!(descendants_a, FxHashSet::from_iter([1, 2, 3]));
        assert!(graph.ancestors(0).is_empty());
        assert!(graph.descendants(3).is_empty());
    }

    #[test]
    fn test_longest_path_full_graph() {
        // A -> B -> C plus shortcut A -> C; longest is the 2-edge chain
        let system = make_system(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("A", "C")], "A");
        let graph = SystemGraph::new(&system).unwrap();
        let path = graph.longest_unresolved_path(&[None, None, None]);
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn test_longest_path_skips_resolved_edges() {
        let system = make_system(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("A", "C")], "A");
        let graph = SystemGraph::new(&system).unwrap();
        // With the chain resolved, only the shortcut remains
        let path = graph.longest_unresolved_path(&[Some(2), Some(1), None]);
        assert_eq!(path, vec![0, 2]);
    }

    #[test]
    fn test_isolated_unresolved_edge_still_returned() {
        // Remaining subgraph is the single edge B -> C, disconnected from A
        let system = make_system(&["A", "B", "C"], &[("A", "B"), ("B", "C")], "A");
        let graph = SystemGraph::new(&system).unwrap();
        let path = graph.longest_unresolved_path(&[Some(2), None]);
        assert_eq!(path, vec![1, 2]);
    }

    #[test]
    fn test_no_unresolved_edges_gives_empty_path() {
        let system = make_system(&["A", "B"], &[("A", "B")], "A");
        let graph = SystemGraph::new(&system).unwrap();
        assert!(graph.longest_unresolved_path(&[Some(1)]).is_empty());
    }
}
