use crate::error::{ConfigError, TrialError};
use crate::parameters::PhysicalParameters;

use ndarray::{Array1, ArrayView1, Zip};
use std::f64::consts::PI;

/// Phase stepping curve: `n` samples over one period
///
/// Sample `k` is taken at the phase step angle $\theta_k = 2\pi k / n$, see [phase_steps].
/// The length is fixed at construction and the samples are never mutated: noise injection
/// produces a new curve.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleCurve {
    sample: Array1<f64>,
}

impl SampleCurve {
    pub fn new(sample: Array1<f64>) -> Self {
        Self { sample }
    }

    /// All-zero curve of the given length
    pub fn zeros(len: usize) -> Self {
        Self::new(Array1::zeros(len))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sample.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.sample.view()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.sample.iter()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.sample.to_vec()
    }

    pub fn into_inner(self) -> Array1<f64> {
        self.sample
    }

    /// Phase step angles of this curve
    pub fn angles(&self) -> Array1<f64> {
        phase_steps(self.len()).map(|(theta, _, _)| theta).collect()
    }

    /// Elementwise sum with a perturbation of the same length
    pub fn perturbed(&self, perturbation: &SampleCurve) -> Result<Self, TrialError> {
        if perturbation.len() != self.len() {
            return Err(TrialError::PerturbationLength {
                expected: self.len(),
                actual: perturbation.len(),
            });
        }
        let sample = Zip::from(&self.sample)
            .and(&perturbation.sample)
            .map_collect(|&y, &dy| y + dy);
        Ok(Self::new(sample))
    }
}

impl From<Array1<f64>> for SampleCurve {
    fn from(sample: Array1<f64>) -> Self {
        Self::new(sample)
    }
}

impl From<Vec<f64>> for SampleCurve {
    fn from(v: Vec<f64>) -> Self {
        Self::new(v.into())
    }
}

impl From<&[f64]> for SampleCurve {
    fn from(s: &[f64]) -> Self {
        Self::new(Array1::from(s.to_vec()))
    }
}

impl<const N: usize> From<[f64; N]> for SampleCurve {
    fn from(a: [f64; N]) -> Self {
        Self::new(Array1::from(a.to_vec()))
    }
}

/// Iterator over $(\theta_k, \sin\theta_k, \cos\theta_k)$ for $\theta_k = 2\pi k / n$, $k = 0..n$
///
/// Every angle is evaluated directly from `k`, so there is no accumulated error for long
/// curves.
pub fn phase_steps(n: usize) -> impl ExactSizeIterator<Item = (f64, f64, f64)> {
    let period = 2.0 * PI / (n as f64);
    (0..n).map(move |k| {
        let theta = period * (k as f64);
        let (sin, cos) = theta.sin_cos();
        (theta, sin, cos)
    })
}

/// Noiseless phase stepping curve with `steps` samples over one period
///
/// Sample `k` is `average * (1 + visibility * cos(θ_k - phase))`.
pub fn synthesize(
    average: f64,
    visibility: f64,
    phase: f64,
    steps: usize,
) -> Result<SampleCurve, ConfigError> {
    PhysicalParameters::new(average, visibility, phase).synthesize(steps)
}

impl PhysicalParameters {
    /// See [synthesize]
    pub fn synthesize(&self, steps: usize) -> Result<SampleCurve, ConfigError> {
        if steps == 0 {
            return Err(ConfigError::NonPositiveSteps);
        }
        let sample = phase_steps(steps)
            .map(|(theta, _, _)| {
                self.average * (1.0 + self.visibility * f64::cos(theta - self.phase))
            })
            .collect::<Array1<_>>();
        Ok(sample.into())
    }
}
