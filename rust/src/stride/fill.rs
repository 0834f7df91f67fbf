//! The fill loop: drives a candidate pattern from all-unset to resolved.

use rand::Rng;

use crate::config::SearchConfig;
use crate::graph::SystemGraph;
use crate::log_paths;
use crate::stride::{resolve_path, tighten_bounds, PathParams, StrideError, StridePattern};

/// Fill in every unset stride with candidate values.
///
/// Repeatedly extracts the longest path of unresolved projections, resolves
/// it, and tightens cumulative bounds. Resolving the longest chain first
/// maximizes constraint propagation per round. Each successful round sets at
/// least one stride, so the loop finishes within one round per projection;
/// exceeding that, or finding no path while strides remain unset, is a graph
/// contract violation.
pub fn fill(
    pattern: &mut StridePattern,
    graph: &SystemGraph,
    config: &SearchConfig,
    rng: &mut impl Rng,
) -> Result<(), StrideError> {
    let max_rounds = graph.projection_count();
    let mut rounds = 0usize;

    while !pattern.is_resolved() {
        rounds += 1;
        if rounds > max_rounds {
            return Err(StrideError::NoUnresolvedPath {
                unresolved: pattern.unresolved_count(),
            });
        }

        let path = graph.longest_unresolved_path(&pattern.strides);
        if path.len() < 2 {
            return Err(StrideError::NoUnresolvedPath {
                unresolved: pattern.unresolved_count(),
            });
        }

        let start_cumulative = pattern.cumulatives[path[0]];
        let end_cumulative = pattern.cumulatives[path[path.len() - 1]];
        let steps = path.len() - 1;

        // If the end of the path is already pinned, the path must hit that
        // exact cumulative; cap per-edge strides accordingly
        let target = match (start_cumulative, end_cumulative) {
            (_, None) => pattern.max_cumulative_stride,
            (Some(start), Some(end)) => end / start,
            (None, Some(end)) => end,
        };
        let max_stride = max_stride_for(target, steps).max(config.min_stride);

        log_paths!(
            config.verbosity,
            "round {}: path {:?} (steps {}, exact {:?}, max stride {})",
            rounds,
            path.iter()
                .map(|&n| graph.population_name(n))
                .collect::<Vec<_>>(),
            steps,
            end_cumulative,
            max_stride
        );

        let params = PathParams {
            exact_cumulative: end_cumulative,
            min_stride: config.min_stride,
            max_stride,
            max_attempts: config.max_attempts,
            verbosity: config.verbosity,
        };
        resolve_path(pattern, graph, &path, &params, rng)?;
        tighten_bounds(pattern, graph);
    }

    Ok(())
}

/// Per-edge cap on candidate strides: `floor(2 * target^(1/steps))`.
///
/// Keeps any single edge from absorbing the whole required downsampling,
/// biasing toward plausible stride magnitudes instead of one large jump.
fn max_stride_for(target: f64, steps: usize) -> u32 {
    // Nudge above float noise so e.g. 32^(1/5) can't floor 4 down to 3
    (2.0 * target.powf(1.0 / steps as f64) + 1e-9).floor() as u32
}
