//! Estimators of the linear phase stepping model
//!
//! Both estimators recover $c, a, b$ of $y = c + a \cos\theta + b \sin\theta$ from a
//! [SampleCurve] sampled at $\theta_k = 2\pi k / n$.

use crate::curve::SampleCurve;
use crate::error::FitError;
use crate::parameters::FitParameters;

use enum_dispatch::enum_dispatch;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod fourier;
pub use fourier::{FourierFitter, fit_fourier};

mod least_squares;
pub use least_squares::{LeastSquaresFitter, fit_least_squares};

/// Estimator of [FitParameters]
#[enum_dispatch]
pub trait FitterTrait: Debug + Clone + Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Minimum curve length the estimator is defined for
    fn min_curve_length(&self) -> usize;

    fn fit(&self, curve: &SampleCurve) -> Result<FitParameters, FitError>;

    fn check_curve_length(&self, curve: &SampleCurve) -> Result<usize, FitError> {
        let length = curve.len();
        if length < self.min_curve_length() {
            Err(FitError::InsufficientSamples {
                actual: length,
                minimum: self.min_curve_length(),
            })
        } else {
            Ok(length)
        }
    }
}

/// All estimators are available as variants of this enum
#[enum_dispatch(FitterTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[non_exhaustive]
pub enum Fitter {
    LeastSquares(LeastSquaresFitter),
    Fourier(FourierFitter),
}

impl Fitter {
    /// Both estimators in the order they appear in [crate::TrialResult]
    pub fn all() -> [Self; 2] {
        [LeastSquaresFitter.into(), FourierFitter::new().into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn all_fitters_agree_on_clean_curves() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let physical = random_physical(&mut rng);
            let steps = rng.random_range(3..64);
            let curve = physical.synthesize(steps).unwrap();
            for fitter in Fitter::all() {
                let fit = fitter.fit(&curve).unwrap();
                assert_fit_close(&fit, &physical.to_fit(), 1e-9);
            }
        }
    }

    #[test]
    fn serialization_names() {
        let json = serde_json::to_string(&Fitter::all()).unwrap();
        assert_eq!(json, r#"[{"LeastSquares":null},{"Fourier":null}]"#);
        let restored: [Fitter; 2] = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, Fitter::all());
    }

    #[test]
    fn min_curve_length_is_checked() {
        for fitter in Fitter::all() {
            let minimum = fitter.min_curve_length();
            let short = SampleCurve::zeros(minimum - 1);
            assert!(fitter.fit(&short).is_err(), "{} accepted short curve", fitter.name());
        }
    }
}
