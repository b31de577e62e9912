use crate::config::TrialConfig;
use crate::error::TrialError;
use crate::fit::{FitterTrait, FourierFitter, LeastSquaresFitter};
use crate::noise::{NoiseRegistry, NoiseTrait};
use crate::parameters::{FitParameters, PhysicalParameters};
use crate::trace::{trace_event, trace_span};

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ground truth and both estimates of one trial
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrialResult {
    /// Reparametrized ground truth
    pub original: FitParameters,
    pub least_squares: FitParameters,
    pub fourier: FitParameters,
}

impl TrialResult {
    /// Sum of absolute differences between the least squares and Fourier estimates
    pub fn discrepancy(&self) -> f64 {
        self.least_squares.l1_distance(&self.fourier)
    }

    /// Euclidean distance between the least squares and Fourier estimates
    pub fn euclidean_discrepancy(&self) -> f64 {
        self.least_squares.euclidean_distance(&self.fourier)
    }
}

/// Synthesizes a curve, adds noise and fits it with both estimators
///
/// Both estimators see the same noisy curve. Errors are returned as is: there is nothing to
/// retry, the caller has to choose another step count.
pub fn run_trial<N, R>(
    physical: &PhysicalParameters,
    steps: usize,
    noise: &N,
    rng: &mut R,
) -> Result<TrialResult, TrialError>
where
    N: NoiseTrait,
    R: Rng,
{
    let _span = trace_span!(
        "trial",
        average = physical.average,
        visibility = physical.visibility,
        phase = physical.phase,
        steps = steps
    )
    .entered();

    let original = physical.to_fit();
    let curve = physical.synthesize(steps)?;
    let noisy_curve = curve.perturbed(&noise.perturbation(&curve, rng))?;

    let least_squares = LeastSquaresFitter.fit(&noisy_curve)?;
    let fourier = FourierFitter.fit(&noisy_curve)?;

    let result = TrialResult {
        original,
        least_squares,
        fourier,
    };
    trace_event!("trial", discrepancy = result.discrepancy());
    Ok(result)
}

/// Validates the configuration, resolves its noise model and runs [run_trial]
pub fn run_configured_trial<R: Rng>(
    config: &TrialConfig,
    registry: &NoiseRegistry,
    rng: &mut R,
) -> Result<TrialResult, TrialError> {
    config.validate()?;
    let noise = registry.get(&config.noise)?;
    run_trial(&config.physical(), config.steps, noise, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, FitError};
    use crate::noise::{ConstantNoise, DEFAULT_NOISE_REGISTRY, PoissonNoise, ZeroNoise};
    use crate::tests::*;

    #[test]
    fn default_config_zero_noise() {
        let config = TrialConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let result = run_configured_trial(&config, &DEFAULT_NOISE_REGISTRY, &mut rng).unwrap();
        assert_eq!(result.original, config.physical().to_fit());
        assert_fit_close(&result.least_squares, &result.original, 1e-9);
        assert_fit_close(&result.fourier, &result.original, 1e-9);
        assert!(result.discrepancy() < 1e-9 * config.average);
    }

    #[test]
    fn zero_noise_is_transparent() {
        let mut rng = StdRng::seed_from_u64(1);
        for steps in 3..30 {
            let physical = random_physical(&mut rng);
            let result = run_trial(&physical, steps, &ZeroNoise, &mut rng).unwrap();
            let curve = physical.synthesize(steps).unwrap();
            assert_eq!(
                result.least_squares,
                LeastSquaresFitter.fit(&curve).unwrap()
            );
            assert_eq!(result.fourier, FourierFitter.fit(&curve).unwrap());
        }
    }

    #[test]
    fn constant_noise_shifts_offsets() {
        const SHIFT: f64 = -31.5;
        let physical = PhysicalParameters::new(2000.0, 0.7, -0.4);
        let mut rng = StdRng::seed_from_u64(2);
        for steps in [3, 4, 10, 23] {
            let clean = run_trial(&physical, steps, &ZeroNoise, &mut rng).unwrap();
            let shifted =
                run_trial(&physical, steps, &ConstantNoise::new(SHIFT), &mut rng).unwrap();
            for (clean, shifted) in [
                (clean.least_squares, shifted.least_squares),
                (clean.fourier, shifted.fourier),
            ] {
                assert_relative_eq!(shifted.offset - clean.offset, SHIFT, epsilon = 1e-8);
                assert_relative_eq!(
                    shifted.in_phase_amplitude,
                    clean.in_phase_amplitude,
                    epsilon = 1e-8
                );
                assert_relative_eq!(
                    shifted.quadrature_amplitude,
                    clean.quadrature_amplitude,
                    epsilon = 1e-8
                );
            }
            assert_eq!(shifted.original, clean.original);
        }
    }

    #[test]
    fn estimators_agree_under_shot_noise() {
        let mut rng = StdRng::seed_from_u64(3);
        for steps in 3..25 {
            let physical = random_physical(&mut rng);
            let result = run_trial(&physical, steps, &PoissonNoise, &mut rng).unwrap();
            assert!(result.discrepancy() <= 1e-9 * physical.average);
            assert!(result.euclidean_discrepancy() <= result.discrepancy());
        }
    }

    #[test]
    fn zero_steps_fail_before_fitting() {
        let physical = PhysicalParameters::new(1.0, 0.5, 0.0);
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            run_trial(&physical, 0, &ZeroNoise, &mut rng),
            Err(TrialError::Config(ConfigError::NonPositiveSteps))
        );
    }

    #[test]
    fn degenerate_steps_propagate() {
        let physical = PhysicalParameters::new(1.0, 0.5, 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        for steps in 1..3 {
            assert_eq!(
                run_trial(&physical, steps, &ZeroNoise, &mut rng),
                Err(TrialError::Fit(FitError::Degenerate {
                    samples: steps,
                    rank: steps
                }))
            );
        }
    }

    #[test]
    fn unknown_noise_name() {
        let config = TrialConfig {
            noise: "brown".into(),
            ..TrialConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(
            run_configured_trial(&config, &DEFAULT_NOISE_REGISTRY, &mut rng),
            Err(TrialError::Config(ConfigError::UnknownNoise("brown".into())))
        );
    }

    #[test]
    fn seeded_trials_are_reproducible() {
        let config = TrialConfig {
            noise: "poisson".into(),
            ..TrialConfig::default()
        };
        let first =
            run_configured_trial(&config, &DEFAULT_NOISE_REGISTRY, &mut StdRng::seed_from_u64(7))
                .unwrap();
        let second =
            run_configured_trial(&config, &DEFAULT_NOISE_REGISTRY, &mut StdRng::seed_from_u64(7))
                .unwrap();
        assert_eq!(first, second);
        assert_ne!(first.least_squares, first.original);
    }
}
