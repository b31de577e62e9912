use crate::curve::{SampleCurve, phase_steps};
use crate::error::FitError;
use crate::fit::FitterTrait;
use crate::parameters::FitParameters;
use crate::trace::{trace_event, trace_span};

use macro_const::macro_const;
use nalgebra::{DMatrix, DVector};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_const! {
    const DOC: &str = r"
Least squares fit of the phase stepping curve

Solves the overdetermined linear system
$$
y_k = c + a \cos\theta_k + b \sin\theta_k, \quad \theta_k = \frac{2\pi k}{n},
$$
in the sense of the minimum sum of squared residuals. The $n \times 3$ design matrix is
decomposed with SVD, so conditioning is not squared as it would be with the normal equations.
A design matrix of rank below three is reported as [FitError::Degenerate] instead of returning
a pseudo-solution.

- Minimum number of phase steps: **3**
";
}

/// Relative singular value threshold of the rank test, in units of machine epsilon per row
const RANK_TOLERANCE: f64 = 1.0;

#[doc = DOC!()]
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename = "LeastSquares")]
pub struct LeastSquaresFitter;

impl LeastSquaresFitter {
    pub fn new() -> Self {
        Self
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    /// Rows are $(1, \cos\theta_k, \sin\theta_k)$
    pub fn design_matrix(steps: usize) -> DMatrix<f64> {
        DMatrix::from_row_iterator(
            steps,
            3,
            phase_steps(steps).flat_map(|(_, sin, cos)| [1.0, cos, sin]),
        )
    }
}

impl FitterTrait for LeastSquaresFitter {
    fn name(&self) -> &'static str {
        "least_squares"
    }

    fn min_curve_length(&self) -> usize {
        3
    }

    fn fit(&self, curve: &SampleCurve) -> Result<FitParameters, FitError> {
        let n = curve.len();
        let _span = trace_span!("least_squares_fit", steps = n).entered();

        // Fewer rows than columns: the rows themselves are independent, so rank equals n
        if n < self.min_curve_length() {
            return Err(FitError::Degenerate {
                samples: n,
                rank: n,
            });
        }

        let design = Self::design_matrix(n);
        let y = DVector::from_iterator(n, curve.iter().copied());

        let svd = design.svd(true, true);
        let eps = RANK_TOLERANCE * f64::EPSILON * (n as f64) * svd.singular_values.max();
        let rank = svd.rank(eps);
        if rank < 3 {
            return Err(FitError::Degenerate { samples: n, rank });
        }
        // U and V are requested above, so solve cannot fail on missing factors
        let solution = svd
            .solve(&y, eps)
            .map_err(|_| FitError::Degenerate { samples: n, rank })?;

        let fit = FitParameters::new(solution[0], solution[1], solution[2]);
        trace_event!(
            "least_squares_fit",
            offset = fit.offset,
            in_phase_amplitude = fit.in_phase_amplitude,
            quadrature_amplitude = fit.quadrature_amplitude,
        );
        Ok(fit)
    }
}

/// Fits the curve with [LeastSquaresFitter]
pub fn fit_least_squares(curve: &SampleCurve) -> Result<FitParameters, FitError> {
    LeastSquaresFitter.fit(curve)
}
