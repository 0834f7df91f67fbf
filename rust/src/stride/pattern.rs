//! Candidate stride-pattern state.

use crate::graph::SystemGraph;

/// One candidate assignment of strides, with the bookkeeping the fill loop
/// needs: per-projection strides, per-population cumulative strides, hint
/// targets, and feasible cumulative bounds.
///
/// Fields move from unset to set and never revert; a rejected sampling
/// attempt only ever touches trial-local copies (see the path resolver).
#[derive(Clone, Debug)]
pub struct StridePattern {
    /// Maximum cumulative stride along any path through the system.
    pub max_cumulative_stride: f64,
    /// Stride per projection; `None` until resolved, then immutable.
    pub strides: Vec<Option<u32>>,
    /// Cumulative stride from the input per population, along resolved paths.
    pub cumulatives: Vec<Option<f64>>,
    /// Target cumulative per population, from the external hint provider.
    /// Biases sampling and scoring only; never a hard constraint.
    pub cumulative_hints: Vec<Option<f64>>,
    /// Lower feasible cumulative bound per population.
    pub min_cumulatives: Vec<f64>,
    /// Upper feasible cumulative bound per population.
    pub max_cumulatives: Vec<f64>,
}

impl StridePattern {
    /// Initialize an all-unset candidate. The input population's cumulative
    /// stride is fixed at 1.
    pub fn new(graph: &SystemGraph, max_cumulative_stride: f64) -> Self {
        let nodes = graph.node_count();
        let mut cumulatives = vec![None; nodes];
        cumulatives[graph.input_index()] = Some(1.0);

        Self {
            max_cumulative_stride,
            strides: vec![None; graph.projection_count()],
            cumulatives,
            cumulative_hints: vec![None; nodes],
            min_cumulatives: vec![1.0; nodes],
            max_cumulatives: vec![max_cumulative_stride; nodes],
        }
    }

    /// Install hint targets, indexed by population. Missing entries leave
    /// sampling unweighted and scoring disabled for that population.
    pub fn set_hints(&mut self, hints: &[Option<f64>]) {
        for (slot, hint) in self.cumulative_hints.iter_mut().zip(hints) {
            *slot = *hint;
        }
    }

    /// Whether every projection has a stride.
    pub fn is_resolved(&self) -> bool {
        self.strides.iter().all(|s| s.is_some())
    }

    /// Number of projections still without a stride.
    pub fn unresolved_count(&self) -> usize {
        self.strides.iter().filter(|s| s.is_none()).count()
    }

    /// Root-mean-square log-distance between realized cumulatives and hints,
    /// over populations that have both. Scale-symmetric: being 2x too large
    /// and 2x too small score equally.
    pub fn distance_from_hints(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for (cumulative, hint) in self.cumulatives.iter().zip(&self.cumulative_hints) {
            if let (Some(c), Some(h)) = (cumulative, hint) {
                let error = (c / h).ln().powi(2);
                total += error;
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            (total / count as f64).sqrt()
        }
    }
}
