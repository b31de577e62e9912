use crate::curve::SampleCurve;
use crate::error::FitError;
use crate::fit::FitterTrait;
use crate::parameters::FitParameters;
use crate::trace::{trace_event, trace_span};

use macro_const::macro_const;
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

macro_const! {
    const DOC: &str = r"
Fourier component analysis of the phase stepping curve

The real-input FFT $X_j = \sum_k y_k e^{-2\pi i jk/n}$ of a pure sinusoid plus offset sampled
over one period has all its energy in bins 0 and 1:
$$
c = \frac{\Re X_0}{n}, \quad a = \frac{\Re X_1}{n/2}, \quad b = -\frac{\Im X_1}{n/2}.
$$
The minus sign comes from the forward transform kernel and the $\cos(\theta - \phi)$ angle
convention. Energy leaking into higher bins, e.g. from noise, is ignored.

For two phase steps bin 1 is the Nyquist bin, the quadrature component cannot be recovered and
the in-phase amplitude is doubled.

- Minimum number of phase steps: **2**
";
}

thread_local! {
    static PLANNER: RefCell<RealFftPlanner<f64>> = RefCell::new(RealFftPlanner::new());
}

#[doc = DOC!()]
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename = "Fourier")]
pub struct FourierFitter;

impl FourierFitter {
    pub fn new() -> Self {
        Self
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    /// Non-negative frequency half of the spectrum, bins `0..=n/2`
    pub fn spectrum(curve: &SampleCurve) -> Result<Vec<Complex<f64>>, FitError> {
        let n = curve.len();
        let r2c: Arc<dyn RealToComplex<f64>> =
            PLANNER.with(|planner| planner.borrow_mut().plan_fft_forward(n));
        let mut input = curve.to_vec();
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output)
            .map_err(|err| FitError::Fft(err.to_string()))?;
        Ok(output)
    }
}

impl FitterTrait for FourierFitter {
    fn name(&self) -> &'static str {
        "fourier"
    }

    fn min_curve_length(&self) -> usize {
        2
    }

    fn fit(&self, curve: &SampleCurve) -> Result<FitParameters, FitError> {
        let n = self.check_curve_length(curve)?;
        let _span = trace_span!("fourier_fit", steps = n).entered();

        let spectrum = Self::spectrum(curve)?;
        let n = n as f64;
        let half_n = 0.5 * n;
        let fit = FitParameters::new(
            spectrum[0].re / n,
            spectrum[1].re / half_n,
            -spectrum[1].im / half_n,
        );
        trace_event!(
            "fourier_fit",
            offset = fit.offset,
            in_phase_amplitude = fit.in_phase_amplitude,
            quadrature_amplitude = fit.quadrature_amplitude,
        );
        Ok(fit)
    }
}

/// Fits the curve with [FourierFitter]
pub fn fit_fourier(curve: &SampleCurve) -> Result<FitParameters, FitError> {
    FourierFitter.fit(curve)
}
