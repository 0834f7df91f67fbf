//! Rust implementation of the calc stride-pattern search.
//!
//! Strides are integer downsampling factors with small optimal values, so
//! optimizing them as floats and rounding works poorly (quantization error,
//! inconsistency between converging paths, strides of zero). This module
//! instead searches random candidate stride patterns under product and bound
//! constraints and returns the candidate closest to externally derived
//! cumulative-scale hints.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::HashMap;

mod config;
pub mod graph;
pub mod logging;
mod models;
pub mod stride;

pub use config::SearchConfig;
pub use graph::SystemGraph;
pub use models::{Population, Projection, System};
pub use stride::{
    fill, resolve_path, search_stride_pattern, select_best, tighten_bounds, PathParams,
    SearchOutcome, StrideError, StridePattern,
};

/// The best stride pattern found by a search (PyO3 result type).
#[pyclass]
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Stride per projection, keyed by (origin, termination) names.
    #[pyo3(get)]
    pub strides: HashMap<(String, String), u32>,
    /// Cumulative stride from the input per population name.
    #[pyo3(get)]
    pub cumulatives: HashMap<String, f64>,
    /// RMS-log distance between cumulatives and hints (lower is better).
    #[pyo3(get)]
    pub distance: f64,
    /// Index of the winning trial.
    #[pyo3(get)]
    pub trial: usize,
}

impl SearchResult {
    fn from_outcome(system: &System, outcome: SearchOutcome) -> Self {
        let mut strides = HashMap::new();
        for (projection, stride) in system
            .projections
            .iter()
            .zip(&outcome.pattern.strides)
        {
            if let Some(stride) = stride {
                strides.insert(
                    (projection.origin.clone(), projection.termination.clone()),
                    *stride,
                );
            }
        }

        let mut cumulatives = HashMap::new();
        for (population, cumulative) in system
            .populations
            .iter()
            .zip(&outcome.pattern.cumulatives)
        {
            if let Some(cumulative) = cumulative {
                cumulatives.insert(population.name.clone(), *cumulative);
            }
        }

        Self {
            strides,
            cumulatives,
            distance: outcome.distance,
            trial: outcome.trial,
        }
    }
}

#[pymethods]
impl SearchResult {
    fn __repr__(&self) -> String {
        format!(
            "SearchResult(strides={}, cumulatives={}, distance={:.4}, trial={})",
            self.strides.len(),
            self.cumulatives.len(),
            self.distance,
            self.trial
        )
    }
}

/// Search for the stride pattern best matching the cumulative-scale hints.
///
/// Runs `config.best_of` independent randomized trials; each fills in all
/// strides along successive longest unresolved paths, keeping every path
/// product consistent and every cumulative within its feasible bounds. The
/// lowest-scoring resolved candidate wins.
///
/// # Arguments
/// * `populations` - The populations (nodes) of the system
/// * `projections` - Directed projections (edges) between populations
/// * `input_name` - Name of the single input population (cumulative fixed at 1)
/// * `hints` - Target cumulative scale per population name; entries may be
///   omitted, which disables hint weighting and scoring for that population
/// * `config` - Search configuration (defaults used when omitted)
///
/// # Returns
/// * SearchResult with per-projection strides and per-population cumulatives
///
/// # Raises
/// * ValueError on malformed graphs (cycles, multiple inputs, unknown or
///   duplicate endpoints) or when every trial fails
#[pyfunction]
#[pyo3(signature = (populations, projections, input_name, hints, config=None))]
fn run_stride_search(
    populations: Vec<Population>,
    projections: Vec<Projection>,
    input_name: String,
    hints: HashMap<String, f64>,
    config: Option<SearchConfig>,
) -> PyResult<SearchResult> {
    let system = System::new(populations, projections, input_name);
    let config = config.unwrap_or_default();
    let hints: FxHashMap<String, f64> = hints.into_iter().collect();

    match search_stride_pattern(&system, &hints, &config) {
        Ok(outcome) => Ok(SearchResult::from_outcome(&system, outcome)),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The calc.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Population>()?;
    m.add_class::<Projection>()?;
    m.add_class::<SearchResult>()?;

    // Config types
    m.add_class::<SearchConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(run_stride_search, m)?)?;

    Ok(())
}
