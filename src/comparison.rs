//! Monte-Carlo comparison of the least squares and Fourier estimators
//!
//! Every trial draws its physical parameters and step count from [ComparisonConfig] ranges,
//! runs [run_trial] and keeps the result. The ordered series of discrepancies is what an
//! external plotting layer shows.

use crate::config::ComparisonConfig;
use crate::error::TrialError;
use crate::noise::{Noise, NoiseRegistry};
use crate::parameters::PhysicalParameters;
use crate::trace::{trace_event, trace_span};
use crate::trial::{TrialResult, run_trial};

use itertools::{Itertools, MinMaxResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Results of all trials, in trial order
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Comparison {
    pub results: Vec<TrialResult>,
}

/// Summary statistics of the discrepancy series
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ComparisonSummary {
    pub trials: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Index of the trial with the largest discrepancy
    pub argmax: usize,
}

impl Comparison {
    /// [TrialResult::discrepancy] of every trial
    pub fn discrepancies(&self) -> Vec<f64> {
        self.results.iter().map(TrialResult::discrepancy).collect()
    }

    /// `None` for an empty comparison
    pub fn summary(&self) -> Option<ComparisonSummary> {
        let discrepancies = self.discrepancies();
        let (min, max) = match discrepancies.iter().copied().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let argmax = discrepancies
            .iter()
            .position_max_by(|a, b| a.total_cmp(b))?;
        let trials = discrepancies.len();
        Some(ComparisonSummary {
            trials,
            mean: discrepancies.iter().sum::<f64>() / trials as f64,
            min,
            max,
            argmax,
        })
    }
}

/// Generator of trial `index`, independent of execution order
///
/// The seed and the index fill separate words of the generator key, so every `(seed, index)`
/// pair has its own stream and adjacent seeds share no trials.
fn trial_rng(seed: u64, index: usize) -> StdRng {
    let mut key = <StdRng as SeedableRng>::Seed::default();
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8..16].copy_from_slice(&(index as u64).to_le_bytes());
    StdRng::from_seed(key)
}

fn comparison_trial(
    config: &ComparisonConfig,
    noise: &Noise,
    index: usize,
) -> Result<TrialResult, TrialError> {
    let mut rng = trial_rng(config.seed, index);
    let average = config.average.sample(&mut rng);
    let phase = config.phase.sample(&mut rng);
    let visibility = config.visibility.sample(&mut rng);
    let steps = config.steps.sample(&mut rng);
    let physical = PhysicalParameters::new(average, visibility, phase);
    run_trial(&physical, steps, noise, &mut rng)
}

/// Runs all trials of the comparison
///
/// A failing trial aborts the run with its error, no placeholder is put into the series. With
/// the `rayon` feature trials run in parallel, the results are the same as for the sequential
/// run.
pub fn run_comparison(
    config: &ComparisonConfig,
    registry: &NoiseRegistry,
) -> Result<Comparison, TrialError> {
    config.validate()?;
    let noise = registry.get(&config.noise)?;
    let _span = trace_span!("comparison", trials = config.trials, seed = config.seed).entered();

    #[cfg(feature = "rayon")]
    let results = (0..config.trials)
        .into_par_iter()
        .map(|index| comparison_trial(config, noise, index))
        .collect::<Result<Vec<_>, _>>()?;
    #[cfg(not(feature = "rayon"))]
    let results = (0..config.trials)
        .map(|index| comparison_trial(config, noise, index))
        .collect::<Result<Vec<_>, _>>()?;

    let comparison = Comparison { results };
    if let Some(summary) = comparison.summary() {
        trace_event!(
            "comparison",
            mean = summary.mean,
            max = summary.max,
            argmax = summary.argmax,
        );
    }
    Ok(comparison)
}
