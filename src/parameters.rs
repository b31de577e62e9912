use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Physical description of a phase stepping curve
///
/// The curve is
/// $$
/// y(\theta) = \mathrm{average} \left(1 + \mathrm{visibility} \cos(\theta - \mathrm{phase})\right).
/// $$
/// `visibility` is expected to be in $[0, 1]$ and `average` to be non-negative, neither is
/// enforced here.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PhysicalParameters {
    /// Mean intensity, e.g. average number of photons per step
    pub average: f64,
    /// Modulation contrast
    pub visibility: f64,
    /// Phase shift in radians
    pub phase: f64,
}

impl PhysicalParameters {
    pub fn new(average: f64, visibility: f64, phase: f64) -> Self {
        Self {
            average,
            visibility,
            phase,
        }
    }

    /// Linearized parameters of the same curve
    ///
    /// Uses $c (1 + v \cos(\theta - \phi)) = c + a \cos\theta + b \sin\theta$ with $a = vc\cos\phi$
    /// and $b = vc\sin\phi$.
    pub fn to_fit(&self) -> FitParameters {
        let amplitude = self.visibility * self.average;
        let (sin, cos) = self.phase.sin_cos();
        FitParameters {
            offset: self.average,
            in_phase_amplitude: amplitude * cos,
            quadrature_amplitude: amplitude * sin,
        }
    }
}

/// Converts physical parameters to the coefficients of the linear model
pub fn reparametrize(average: f64, visibility: f64, phase: f64) -> FitParameters {
    PhysicalParameters::new(average, visibility, phase).to_fit()
}

/// Coefficients $c, a, b$ of $y = c + a \cos\theta + b \sin\theta$
///
/// Both estimators return this triple, and the ground truth is converted into it, so all three
/// can be compared directly.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FitParameters {
    pub offset: f64,
    pub in_phase_amplitude: f64,
    pub quadrature_amplitude: f64,
}

impl FitParameters {
    pub fn new(offset: f64, in_phase_amplitude: f64, quadrature_amplitude: f64) -> Self {
        Self {
            offset,
            in_phase_amplitude,
            quadrature_amplitude,
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [
            self.offset,
            self.in_phase_amplitude,
            self.quadrature_amplitude,
        ]
    }

    /// Amplitude of the sinusoidal term, $\sqrt{a^2 + b^2}$
    pub fn amplitude(&self) -> f64 {
        f64::hypot(self.in_phase_amplitude, self.quadrature_amplitude)
    }

    /// Sum of absolute coefficient differences
    pub fn l1_distance(&self, other: &Self) -> f64 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(x, y)| (x - y).abs())
            .sum()
    }

    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Inverse of [PhysicalParameters::to_fit]
    ///
    /// Visibility is zero for a flat curve, it is not finite for a modulated curve with zero
    /// offset.
    pub fn to_physical(&self) -> PhysicalParameters {
        let amplitude = self.amplitude();
        let visibility = if amplitude == 0.0 {
            0.0
        } else {
            amplitude / self.offset
        };
        PhysicalParameters {
            average: self.offset,
            visibility,
            phase: f64::atan2(self.quadrature_amplitude, self.in_phase_amplitude),
        }
    }
}

impl From<PhysicalParameters> for FitParameters {
    fn from(physical: PhysicalParameters) -> Self {
        physical.to_fit()
    }
}

impl From<[f64; 3]> for FitParameters {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}
