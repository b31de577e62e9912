#![doc = include_str!("../README.md")]


mod trace;

mod comparison;
pub use comparison::{Comparison, ComparisonSummary, run_comparison};

pub mod config;
pub use config::{ComparisonConfig, StepsRange, TrialConfig, UniformRange};

mod curve;
pub use curve::{SampleCurve, phase_steps, synthesize};

mod error;
pub use error::{ConfigError, FitError, TrialError};

pub mod fit;
pub use fit::{
    Fitter, FitterTrait, FourierFitter, LeastSquaresFitter, fit_fourier, fit_least_squares,
};

pub mod noise;
pub use noise::{
    ConstantNoise, DEFAULT_NOISE_REGISTRY, GaussianNoise, Noise, NoiseRegistry, NoiseTrait,
    PoissonNoise, WhiteNoise, ZeroNoise,
};

mod parameters;
pub use parameters::{FitParameters, PhysicalParameters, reparametrize};

mod trial;
pub use trial::{TrialResult, run_configured_trial, run_trial};

pub use ndarray;
