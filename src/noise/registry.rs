use crate::error::ConfigError;
use crate::noise::{GaussianNoise, Noise, PoissonNoise, WhiteNoise, ZeroNoise};

use lazy_static::lazy_static;
use std::collections::BTreeMap;

lazy_static! {
    /// Registry with the default catalog, built once per process
    pub static ref DEFAULT_NOISE_REGISTRY: NoiseRegistry = NoiseRegistry::with_default_models();
}

/// Named catalog of noise models
///
/// Configurations refer to noise models by name, the registry resolves the name into a model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoiseRegistry {
    models: BTreeMap<String, Noise>,
}

impl NoiseRegistry {
    /// Registry without any model
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `zero`, `white`, `gaussian` and `poisson` models
    pub fn with_default_models() -> Self {
        let mut registry = Self::new();
        registry.register("zero", ZeroNoise);
        registry.register("white", WhiteNoise::default());
        registry.register("gaussian", GaussianNoise);
        registry.register("poisson", PoissonNoise);
        registry
    }

    /// Adds a model, returns the model previously registered under the same name
    pub fn register(&mut self, name: impl Into<String>, model: impl Into<Noise>) -> Option<Noise> {
        self.models.insert(name.into(), model.into())
    }

    pub fn get(&self, name: &str) -> Result<&Noise, ConfigError> {
        self.models
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNoise(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::ConstantNoise;

    #[test]
    fn default_catalog() {
        let names: Vec<_> = DEFAULT_NOISE_REGISTRY.names().collect();
        assert_eq!(names, ["gaussian", "poisson", "white", "zero"]);
        assert_eq!(
            DEFAULT_NOISE_REGISTRY.get("zero"),
            Ok(&Noise::from(ZeroNoise))
        );
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            DEFAULT_NOISE_REGISTRY.get("pink"),
            Err(ConfigError::UnknownNoise("pink".into()))
        );
    }

    #[test]
    fn register_replaces() {
        let mut registry = NoiseRegistry::new();
        assert!(!registry.contains("offset"));
        assert!(registry.register("offset", ConstantNoise::new(1.0)).is_none());
        let previous = registry.register("offset", ConstantNoise::new(2.0));
        assert_eq!(previous, Some(ConstantNoise::new(1.0).into()));
        assert_eq!(
            registry.get("offset"),
            Ok(&Noise::from(ConstantNoise::new(2.0)))
        );
    }
}
