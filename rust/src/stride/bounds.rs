//! Feasible-bound propagation for cumulative strides.

use crate::graph::SystemGraph;
use crate::stride::StridePattern;

/// Tighten every population's feasible cumulative range from the cumulatives
/// known elsewhere in the graph.
///
/// A cumulative can be no less than that of any ancestor and no greater than
/// that of any descendant (strides are >= 1, so scale never decreases
/// downstream). Recomputed in full from current knowledge after each path
/// resolution; cumulative knowledge only grows, so the bounds are monotone
/// across calls.
pub fn tighten_bounds(pattern: &mut StridePattern, graph: &SystemGraph) {
    for node in 0..graph.node_count() {
        let mut min = 1.0_f64;
        let mut max = pattern.max_cumulative_stride;

        for ancestor in graph.ancestors(node) {
            if let Some(cumulative) = pattern.cumulatives[ancestor] {
                min = min.max(cumulative);
            }
        }
        for descendant in graph.descendants(node) {
            if let Some(cumulative) = pattern.cumulatives[descendant] {
                max = max.min(cumulative);
            }
        }

        pattern.min_cumulatives[node] = min;
        pattern.max_cumulatives[node] = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Population, Projection, System};

    fn make_graph(names: &[&str], edges: &[(&str, &str)]) -> SystemGraph {
        let system = System::new(
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
            names[0].to_string(),
        );
        SystemGraph::new(&system).unwrap()
    }

    #[test]
    fn test_chain_bounds_from_known_endpoints() {
        // A -> B -> C with cumulatives known at A and C
        let graph = make_graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let mut pattern = StridePattern::new(&graph, 32.0);
        pattern.cumulatives[2] = Some(8.0);

        tighten_bounds(&mut pattern, &graph);

        // B is squeezed between A's 1 and C's 8
        assert_eq!(pattern.min_cumulatives[1], 1.0);
        assert_eq!(pattern.max_cumulatives[1], 8.0);
        // A is capped by both descendants' known cumulatives
        assert_eq!(pattern.max_cumulatives[0], 8.0);
        // C's floor comes from A's known cumulative
        assert_eq!(pattern.min_cumulatives[2], 1.0);
        assert_eq!(pattern.max_cumulatives[2], 32.0);
    }

    #[test]
    fn test_diamond_bounds() {
        // A -> B -> D, A -> C -> D; one arm resolved
        let graph = make_graph(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );
        let mut pattern = StridePattern::new(&graph, 32.0);
        pattern.cumulatives[1] = Some(2.0);
        pattern.cumulatives[3] = Some(4.0);

        tighten_bounds(&mut pattern, &graph);

        // The unresolved arm's C must land between A=1 and D=4
        assert_eq!(pattern.min_cumulatives[2], 1.0);
        assert_eq!(pattern.max_cumulatives[2], 4.0);
        // B's floor rises to its own ancestor A only; its cap is D
        assert_eq!(pattern.min_cumulatives[1], 1.0);
        assert_eq!(pattern.max_cumulatives[1], 4.0);
    }

    #[test]
    fn test_bounds_monotone_as_knowledge_grows() {
        let graph = make_graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let mut pattern = StridePattern::new(&graph, 32.0);

        tighten_bounds(&mut pattern, &graph);
        let max_b_before = pattern.max_cumulatives[1];

        pattern.cumulatives[2] = Some(8.0);
        tighten_bounds(&mut pattern, &graph);
        let max_b_after = pattern.max_cumulatives[1];

        assert!(max_b_after <= max_b_before);
        assert_eq!(max_b_after, 8.0);
    }
}
