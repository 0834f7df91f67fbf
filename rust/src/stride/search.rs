//! Best-of-N candidate search over stride patterns.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::SearchConfig;
use crate::graph::SystemGraph;
use crate::log_trials;
use crate::models::System;
use crate::stride::{fill, StrideError, StridePattern};

/// Multiplier for deriving per-trial seeds from the master seed.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// The winning candidate from a search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// The fully resolved pattern.
    pub pattern: StridePattern,
    /// Its RMS-log distance from the hints (lower is better).
    pub distance: f64,
    /// Index of the trial that produced it.
    pub trial: usize,
}

/// Generate `best_of` independent candidate patterns and keep the one
/// closest to the hints.
///
/// Trials are pure functions of (graph, hints, config, trial seed), so they
/// run on rayon workers with no shared mutable state; per-trial RNGs are
/// derived from the master seed plus the trial index, which keeps a fixed
/// seed reproducible regardless of scheduling. Failed trials are discarded;
/// the search fails only if every trial does.
pub fn search_stride_pattern(
    system: &System,
    hints: &FxHashMap<String, f64>,
    config: &SearchConfig,
) -> Result<SearchOutcome, StrideError> {
    let graph = SystemGraph::new(system)?;

    let mut hint_vec: Vec<Option<f64>> = vec![None; graph.node_count()];
    for (name, &target) in hints {
        let index = system
            .find_population_index(name)
            .ok_or_else(|| StrideError::UnknownPopulation(name.clone()))?;
        hint_vec[index] = Some(target);
    }

    let master_seed = config.seed.unwrap_or_else(rand::random);

    let results: Vec<Result<(StridePattern, f64), StrideError>> = (0..config.best_of)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(trial_seed(master_seed, trial));
            let mut pattern = StridePattern::new(&graph, config.max_cumulative_stride);
            pattern.set_hints(&hint_vec);
            fill(&mut pattern, &graph, config, &mut rng)?;
            let distance = pattern.distance_from_hints();
            Ok((pattern, distance))
        })
        .collect();

    select_best(results, config.verbosity)
}

/// Pick the lowest-distance candidate, first seen winning ties.
///
/// Failed trials are logged and excluded; an incomplete pattern is never
/// returned. Errs with `AllTrialsFailed` when nothing survives.
pub fn select_best(
    results: Vec<Result<(StridePattern, f64), StrideError>>,
    verbosity: u8,
) -> Result<SearchOutcome, StrideError> {
    let total = results.len();
    let mut best: Option<SearchOutcome> = None;

    for (trial, result) in results.into_iter().enumerate() {
        match result {
            Ok((pattern, distance)) => {
                log_trials!(verbosity, "trial {}: distance from hints {:.4}", trial, distance);
                if best.as_ref().map_or(true, |b| distance < b.distance) {
                    best = Some(SearchOutcome {
                        pattern,
                        distance,
                        trial,
                    });
                }
            }
            Err(error) => {
                log_trials!(verbosity, "trial {} failed: {}", trial, error);
            }
        }
    }

    best.ok_or(StrideError::AllTrialsFailed(total))
}

fn trial_seed(master_seed: u64, trial: usize) -> u64 {
    master_seed.wrapping_add((trial as u64).wrapping_mul(SEED_MIX))
}
