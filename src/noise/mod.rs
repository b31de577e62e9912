//! Additive noise models applied to clean phase stepping curves

use crate::curve::SampleCurve;

use enum_dispatch::enum_dispatch;
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Poisson, StandardNormal};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod registry;
pub use registry::{DEFAULT_NOISE_REGISTRY, NoiseRegistry};

/// Noise model: maps a curve to a perturbation of the same length
///
/// The perturbation is added to the curve elementwise. Models keep no state, all randomness comes
/// from `rng`, so a seeded generator reproduces the perturbation.
#[enum_dispatch]
pub trait NoiseTrait: Debug + Clone + Send + Sync {
    fn perturbation<R: Rng + ?Sized>(&self, curve: &SampleCurve, rng: &mut R) -> SampleCurve;
}

/// All noise models are available as variants of this enum
#[enum_dispatch(NoiseTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum Noise {
    Zero(ZeroNoise),
    Constant(ConstantNoise),
    White(WhiteNoise),
    Gaussian(GaussianNoise),
    Poisson(PoissonNoise),
}

fn map_samples(curve: &SampleCurve, f: impl FnMut(f64) -> f64) -> SampleCurve {
    curve.iter().copied().map(f).collect::<Array1<_>>().into()
}

/// No noise at all
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ZeroNoise;

impl NoiseTrait for ZeroNoise {
    fn perturbation<R: Rng + ?Sized>(&self, curve: &SampleCurve, _rng: &mut R) -> SampleCurve {
        SampleCurve::zeros(curve.len())
    }
}

/// The same shift for every sample
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConstantNoise {
    pub value: f64,
}

impl ConstantNoise {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl NoiseTrait for ConstantNoise {
    fn perturbation<R: Rng + ?Sized>(&self, curve: &SampleCurve, _rng: &mut R) -> SampleCurve {
        Array1::from_elem(curve.len(), self.value).into()
    }
}

/// Normal noise of fixed standard deviation, independent of the signal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WhiteNoise {
    pub sigma: f64,
}

impl WhiteNoise {
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl NoiseTrait for WhiteNoise {
    fn perturbation<R: Rng + ?Sized>(&self, curve: &SampleCurve, rng: &mut R) -> SampleCurve {
        map_samples(curve, |_| {
            let z: f64 = StandardNormal.sample(rng);
            self.sigma * z
        })
    }
}

/// Normal approximation of photon shot noise, standard deviation is $\sqrt{y}$
///
/// Non-positive samples are left unperturbed.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GaussianNoise;

impl NoiseTrait for GaussianNoise {
    fn perturbation<R: Rng + ?Sized>(&self, curve: &SampleCurve, rng: &mut R) -> SampleCurve {
        map_samples(curve, |y| {
            if y > 0.0 {
                let z: f64 = StandardNormal.sample(rng);
                y.sqrt() * z
            } else {
                0.0
            }
        })
    }
}

/// Photon shot noise: every sample is replaced by a Poisson count with the sample as mean
///
/// Non-positive and non-finite samples are left unperturbed. Means too large for the Poisson
/// sampler fall back to the normal approximation.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PoissonNoise;

impl NoiseTrait for PoissonNoise {
    fn perturbation<R: Rng + ?Sized>(&self, curve: &SampleCurve, rng: &mut R) -> SampleCurve {
        map_samples(curve, |y| {
            if !(y.is_finite() && y > 0.0) {
                return 0.0;
            }
            match Poisson::new(y) {
                Ok(poisson) => {
                    let count: f64 = poisson.sample(rng);
                    count - y
                }
                Err(_) => {
                    let z: f64 = StandardNormal.sample(rng);
                    y.sqrt() * z
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    fn curve() -> SampleCurve {
        PhysicalParameters::new(1e4, 0.5, 1.0).synthesize(10).unwrap()
    }

    #[test]
    fn zero_noise_is_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        let noise: Noise = ZeroNoise.into();
        let perturbation = noise.perturbation(&curve(), &mut rng);
        assert_eq!(perturbation, SampleCurve::zeros(10));
    }

    #[test]
    fn constant_noise() {
        let mut rng = StdRng::seed_from_u64(0);
        let noise: Noise = ConstantNoise::new(-2.5).into();
        let perturbation = noise.perturbation(&curve(), &mut rng);
        assert_eq!(perturbation.to_vec(), vec![-2.5; 10]);
    }

    #[test]
    fn perturbation_has_curve_length() {
        let models: Vec<Noise> = vec![
            ZeroNoise.into(),
            ConstantNoise::new(1.0).into(),
            WhiteNoise::new(3.0).into(),
            GaussianNoise.into(),
            PoissonNoise.into(),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        for noise in models {
            for n in 1..20 {
                let curve = PhysicalParameters::new(100.0, 0.5, 0.0)
                    .synthesize(n)
                    .unwrap();
                assert_eq!(noise.perturbation(&curve, &mut rng).len(), n, "{noise:?}");
            }
        }
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        for noise in [
            Noise::from(WhiteNoise::default()),
            GaussianNoise.into(),
            PoissonNoise.into(),
        ] {
            let first = noise.perturbation(&curve(), &mut StdRng::seed_from_u64(5));
            let second = noise.perturbation(&curve(), &mut StdRng::seed_from_u64(5));
            assert_eq!(first, second);
            assert_ne!(first, SampleCurve::zeros(10));
        }
    }

    #[test]
    fn shot_noise_variance_follows_intensity() {
        const N: usize = 20_000;
        const LAMBDA: f64 = 400.0;
        let flat: SampleCurve = vec![LAMBDA; N].into();
        let mut rng = StdRng::seed_from_u64(6);
        for noise in [Noise::from(GaussianNoise), PoissonNoise.into()] {
            let perturbation = noise.perturbation(&flat, &mut rng).into_inner();
            let mean = perturbation.mean().unwrap();
            let variance = perturbation.var(1.0);
            assert_relative_eq!(mean, 0.0, epsilon = 1.0);
            assert_relative_eq!(variance, LAMBDA, max_relative = 0.05);
        }
    }

    #[test]
    fn shot_noise_skips_non_positive_samples() {
        let curve = SampleCurve::from([0.0, -3.0, f64::NAN]);
        let mut rng = StdRng::seed_from_u64(7);
        for noise in [Noise::from(GaussianNoise), PoissonNoise.into()] {
            assert_eq!(
                noise.perturbation(&curve, &mut rng),
                SampleCurve::zeros(3)
            );
        }
    }

    #[test]
    fn white_noise_scales_with_sigma() {
        const N: usize = 20_000;
        let flat = SampleCurve::zeros(N);
        let noise = WhiteNoise::new(2.0);
        let perturbation = noise
            .perturbation(&flat, &mut StdRng::seed_from_u64(8))
            .into_inner();
        assert_relative_eq!(perturbation.std(1.0), 2.0, max_relative = 0.05);
    }
}
