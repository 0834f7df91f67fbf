//! Configuration types for the stride search.

use pyo3::prelude::*;

/// Configuration for the stride-pattern candidate search.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Maximum cumulative stride along any path; normally the input image
    /// resolution, so no feature map drops below one-pixel resolution.
    #[pyo3(get, set)]
    pub max_cumulative_stride: f64,
    /// Number of independent candidates to generate; the best one is kept.
    #[pyo3(get, set)]
    pub best_of: usize,
    /// Minimum sampled stride value.
    #[pyo3(get, set)]
    pub min_stride: u32,
    /// Maximum sampling attempts per path before the trial fails.
    #[pyo3(get, set)]
    pub max_attempts: u32,
    /// Master random seed; None draws a fresh seed per search.
    #[pyo3(get, set)]
    pub seed: Option<u64>,
    /// Verbosity level: 0=silent, 1=trials, 2=paths, 3=sampling.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_cumulative_stride: 32.0,
            best_of: 50,
            min_stride: 1,
            max_attempts: 10_000,
            seed: None,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl SearchConfig {
    #[new]
    #[pyo3(signature = (
        max_cumulative_stride=None,
        best_of=None,
        min_stride=None,
        max_attempts=None,
        seed=None,
        verbosity=None
    ))]
    fn new(
        max_cumulative_stride: Option<f64>,
        best_of: Option<usize>,
        min_stride: Option<u32>,
        max_attempts: Option<u32>,
        seed: Option<u64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            max_cumulative_stride: max_cumulative_stride
                .unwrap_or(defaults.max_cumulative_stride),
            best_of: best_of.unwrap_or(defaults.best_of),
            min_stride: min_stride.unwrap_or(defaults.min_stride),
            max_attempts: max_attempts.unwrap_or(defaults.max_attempts),
            seed,
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SearchConfig(max_cumulative_stride={}, best_of={}, max_attempts={}, seed={:?})",
            self.max_cumulative_stride, self.best_of, self.max_attempts, self.seed
        )
    }
}
