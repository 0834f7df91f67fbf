//! Stride-pattern search for layered network architectures.
//!
//! Strides are integer downsampling factors on projections. Optimizing them
//! as floats and rounding causes quantization error, inconsistency between
//! converging paths, and zero strides, so instead we generate random
//! candidate stride patterns under product and bound constraints and keep the
//! best-scoring one:
//!
//! 1. Start with every stride unset.
//! 2. While at least one stride is unset: take the longest path consisting
//!    only of unset-stride projections, sample integer strides along it
//!    (rejecting samples that violate cumulative bounds or a required end
//!    cumulative), then tighten per-population bounds from the new
//!    cumulatives.
//! 3. Repeat for `best_of` independent candidates and keep the one closest
//!    to the externally supplied cumulative hints.

mod bounds;
mod fill;
mod pattern;
mod resolver;
mod search;

pub use bounds::tighten_bounds;
pub use fill::fill;
pub use pattern::StridePattern;
pub use resolver::{resolve_path, PathParams};
pub use search::{search_stride_pattern, select_best, SearchOutcome};

use thiserror::Error;

/// Errors from stride-pattern construction and search.
///
/// All variants except `AllTrialsFailed` are local to a single trial; the
/// candidate search discards the failed trial and continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrideError {
    /// A path's constraints could not be satisfied within the attempt budget.
    #[error("path resolution failed after {attempts} attempts (exact cumulative {exact_cumulative:?}, stride range {min_stride}..={max_stride})")]
    InfeasiblePath {
        attempts: u32,
        exact_cumulative: Option<f64>,
        min_stride: u32,
        max_stride: u32,
    },
    /// Both endpoint cumulatives were known but their ratio is not a whole
    /// number; the graph/hint configuration is inconsistent.
    #[error("derived stride {value} on projection {origin} -> {termination} is not an integer")]
    NonIntegerDerivedStride {
        origin: String,
        termination: String,
        value: f64,
    },
    /// No unresolved path was found although unset strides remain; the graph
    /// adapter broke its contract.
    #[error("no unresolved path found with {unresolved} strides still unset")]
    NoUnresolvedPath { unresolved: usize },
    /// A resolution path stepped between populations with no projection; the
    /// graph adapter broke its contract.
    #[error("no projection between {0} and {1}")]
    MissingProjection(String, String),
    /// The graph has a cycle (or a self-loop) and is not a DAG.
    #[error("circular dependency detected in projection graph")]
    CircularDependency,
    /// A projection endpoint or the declared input names no population.
    #[error("unknown population: {0}")]
    UnknownPopulation(String),
    /// Two projections share the same endpoint pair.
    #[error("duplicate projection: {0} -> {1}")]
    DuplicateProjection(String, String),
    /// The graph does not have exactly the declared input as its only source.
    #[error("single-input assumption violated: declared input {declared:?}, source populations {sources:?}")]
    InputAssumptionViolated {
        declared: String,
        sources: Vec<String>,
    },
    /// Every candidate trial failed; no pattern can be returned.
    #[error("all {0} stride-pattern trials failed")]
    AllTrialsFailed(usize),
}
