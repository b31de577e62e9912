//! Configuration values with documented defaults
//!
//! Configurations are plain values: construct them once at the program boundary (CLI, JSON) and
//! pass them into [crate::run_configured_trial] or [crate::run_comparison].

use crate::error::ConfigError;
use crate::parameters::PhysicalParameters;
use crate::trace::trace_warn;

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::ops::{Range, RangeInclusive};

pub const DEFAULT_AVERAGE: f64 = 10000.0;
pub const DEFAULT_PHASE: f64 = 1.0;
pub const DEFAULT_VISIBILITY: f64 = 0.5;
pub const DEFAULT_STEPS: usize = 10;
pub const DEFAULT_NOISE: &str = "zero";
pub const DEFAULT_TRIALS: usize = 10000;

/// Parameters of a single trial
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct TrialConfig {
    /// Average number of photons in the phase stepping curve
    pub average: f64,
    /// Phase shift in radians
    pub phase: f64,
    /// Visibility of the system, expected to be between 0 and 1
    pub visibility: f64,
    /// Number of phase steps
    pub steps: usize,
    /// Name of the noise model added to the phase steps
    pub noise: String,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            average: DEFAULT_AVERAGE,
            phase: DEFAULT_PHASE,
            visibility: DEFAULT_VISIBILITY,
            steps: DEFAULT_STEPS,
            noise: DEFAULT_NOISE.to_owned(),
        }
    }
}

impl TrialConfig {
    /// Checks the step count
    ///
    /// Visibility and average are the caller's responsibility, values outside the physical range
    /// only produce a warning. The noise name is checked by the registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::NonPositiveSteps);
        }
        if !(0.0..=1.0).contains(&self.visibility) {
            trace_warn!(
                visibility = self.visibility,
                "visibility is outside of [0, 1]"
            );
        }
        Ok(())
    }

    pub fn physical(&self) -> PhysicalParameters {
        PhysicalParameters::new(self.average, self.visibility, self.phase)
    }
}

/// Half-open range `[min, max)` for a uniformly drawn parameter
///
/// `min == max` is allowed and always yields `min`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::EmptyRange { name })
        }
    }

    pub fn to_range(&self) -> Range<f64> {
        self.min..self.max
    }

    /// Uniform draw, the range must pass [ComparisonConfig::validate] first
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.random_range(self.to_range())
        }
    }
}

/// Inclusive range of phase step counts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepsRange {
    pub min: usize,
    pub max: usize,
}

impl StepsRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn to_range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    /// Uniform draw, the range must pass [ComparisonConfig::validate] first
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(self.to_range())
    }
}

/// Monte-Carlo comparison of the estimators over random trials
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Number of comparisons
    pub trials: usize,
    /// Average number of photons
    pub average: UniformRange,
    /// Phase shift in radians
    pub phase: UniformRange,
    pub visibility: UniformRange,
    /// Number of phase steps, both ends included
    pub steps: StepsRange,
    /// Name of the noise model added to the phase steps
    pub noise: String,
    /// Seed of the per-trial random generators
    pub seed: u64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            average: UniformRange::new(100.0, 100000.0),
            phase: UniformRange::new(-FRAC_PI_2, FRAC_PI_2),
            visibility: UniformRange::new(0.0, 1.0),
            steps: StepsRange::new(4, 24),
            noise: DEFAULT_NOISE.to_owned(),
            seed: 0,
        }
    }
}

impl ComparisonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        self.average.validate("average")?;
        self.phase.validate("phase")?;
        self.visibility.validate("visibility")?;
        if self.steps.min > self.steps.max {
            return Err(ConfigError::EmptyRange { name: "steps" });
        }
        if self.steps.min == 0 {
            return Err(ConfigError::NonPositiveSteps);
        }
        Ok(())
    }
}
