//! Constrained random stride assignment along a path.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::graph::SystemGraph;
use crate::log_sampling;
use crate::stride::{StrideError, StridePattern};

/// Absolute tolerance when a derived stride or a required end cumulative is
/// compared against a whole-number target. Cumulatives are products of small
/// integers, so anything beyond float noise means real inconsistency.
const INTEGER_TOLERANCE: f64 = 1e-6;

/// Constraints for resolving one path.
#[derive(Clone, Debug)]
pub struct PathParams {
    /// Required cumulative stride at the end of the path, for consistency
    /// with strides already set elsewhere in the network.
    pub exact_cumulative: Option<f64>,
    /// Minimum sampled stride value.
    pub min_stride: u32,
    /// Maximum sampled stride value.
    pub max_stride: u32,
    /// Sampling attempts before giving up on the path.
    pub max_attempts: u32,
    /// Verbosity level for attempt-level logging.
    pub verbosity: u8,
}

/// Set strides along `path` to integers in `[min_stride, max_stride]`.
///
/// Each attempt walks the path edge by edge on trial-local copies of the
/// stride and cumulative state, so a rejected attempt never corrupts the
/// committed pattern. An edge whose endpoint cumulatives are both already
/// committed gets its stride derived rather than sampled; other edges sample
/// a stride (hint-weighted when both endpoint hints exist) and the attempt is
/// rejected as soon as a cumulative leaves its feasible bounds. A completed
/// attempt is accepted when `exact_cumulative` is unset or met exactly, and
/// only then replaces the committed state. Strides set previously are never
/// changed.
pub fn resolve_path(
    pattern: &mut StridePattern,
    graph: &SystemGraph,
    path: &[usize],
    params: &PathParams,
    rng: &mut impl Rng,
) -> Result<(), StrideError> {
    for attempt in 0..params.max_attempts {
        // copies in case we have to revert
        let mut strides = pattern.strides.clone();
        let mut cumulatives = pattern.cumulatives.clone();
        let mut failed = false;

        for window in path.windows(2) {
            let (pre, post) = (window[0], window[1]);
            let projection = graph.find_projection(pre, post).ok_or_else(|| {
                StrideError::MissingProjection(
                    graph.population_name(pre).to_string(),
                    graph.population_name(post).to_string(),
                )
            })?;

            if let (Some(pre_c), Some(post_c)) =
                (pattern.cumulatives[pre], pattern.cumulatives[post])
            {
                // Both endpoints already pinned by earlier paths: the stride
                // is forced, not sampled. A fractional ratio is a real
                // inconsistency and retrying cannot fix it.
                let derived = post_c / pre_c;
                let rounded = derived.round();
                if (derived - rounded).abs() > INTEGER_TOLERANCE || rounded < 1.0 {
                    return Err(StrideError::NonIntegerDerivedStride {
                        origin: graph.population_name(pre).to_string(),
                        termination: graph.population_name(post).to_string(),
                        value: derived,
                    });
                }
                strides[projection] = Some(rounded as u32);
            } else {
                let Some(pre_c) = cumulatives[pre] else {
                    // Path started at a population with no known cumulative;
                    // nothing to extend from, reject the attempt.
                    failed = true;
                    break;
                };
                let stride = sample_stride(pattern, pre, post, params, rng);
                let cumulative = pre_c * stride as f64;
                strides[projection] = Some(stride);
                cumulatives[post] = Some(cumulative);

                if cumulative > pattern.max_cumulatives[post]
                    || cumulative < pattern.min_cumulatives[post]
                {
                    log_sampling!(
                        params.verbosity,
                        "attempt {}: {} cumulative {} outside [{}, {}]",
                        attempt,
                        graph.population_name(post),
                        cumulative,
                        pattern.min_cumulatives[post],
                        pattern.max_cumulatives[post]
                    );
                    failed = true;
                    break;
                }
            }
        }

        if !failed {
            let end = path[path.len() - 1];
            let accepted = match params.exact_cumulative {
                None => true,
                Some(target) => cumulatives[end]
                    .map_or(false, |c| (c - target).abs() <= INTEGER_TOLERANCE),
            };
            if accepted {
                pattern.strides = strides;
                pattern.cumulatives = cumulatives;
                return Ok(());
            }
        }
    }

    Err(StrideError::InfeasiblePath {
        attempts: params.max_attempts,
        exact_cumulative: params.exact_cumulative,
        min_stride: params.min_stride,
        max_stride: params.max_stride,
    })
}

/// Sample an integer stride in `[min_stride, max_stride]`.
///
/// When both endpoints carry cumulative hints, candidates are weighted by an
/// inverse-square-distance kernel around the hint-implied stride,
/// `1 / (0.1 + |stride - hint_stride|)^2`, softly biasing toward plausible
/// values without hard-constraining them. Otherwise the draw is uniform.
fn sample_stride(
    pattern: &StridePattern,
    pre: usize,
    post: usize,
    params: &PathParams,
    rng: &mut impl Rng,
) -> u32 {
    if let (Some(pre_hint), Some(post_hint)) =
        (pattern.cumulative_hints[pre], pattern.cumulative_hints[post])
    {
        let hint_stride = post_hint / pre_hint;
        let candidates: Vec<u32> = (params.min_stride..=params.max_stride).collect();
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&stride| 1.0 / (0.1 + (stride as f64 - hint_stride).abs()).powi(2))
            .collect();
        // Weights are strictly positive, so this only fails on an empty range
        if let Ok(distribution) = WeightedIndex::new(&weights) {
            return candidates[distribution.sample(rng)];
        }
    }

    rng.gen_range(params.min_stride..=params.max_stride)
}
