/// Invalid trial or comparison configuration, detected before any curve is built
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("number of phase steps must be positive")]
    NonPositiveSteps,

    #[error("unknown noise model \"{0}\"")]
    UnknownNoise(String),

    #[error("number of trials must be positive")]
    NoTrials,

    #[error("range of {name} is empty or reversed")]
    EmptyRange { name: &'static str },
}

/// Error returned from [crate::FitterTrait] implementations
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum FitError {
    #[error(
        "design matrix of {samples} phase steps has rank {rank}, three independent columns are required"
    )]
    Degenerate { samples: usize, rank: usize },

    #[error("curve length {actual} is smaller than the minimum required length {minimum}")]
    InsufficientSamples { actual: usize, minimum: usize },

    #[error("Fourier transform failed: {0}")]
    Fft(String),
}

/// Error returned from a single trial, see [crate::run_trial]
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum TrialError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error("noise model returned {actual} values for a curve of {expected} samples")]
    PerturbationLength { expected: usize, actual: usize },
}
