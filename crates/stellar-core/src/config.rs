//! Engine configuration

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::components::Surface;
use crate::starfield::DEFAULT_STAR_COUNT;

/// Startup settings for a [`crate::engine::SimulationEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for reproducible runs; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Background star count
    pub star_count: usize,
    /// Initial surface width
    pub width: f32,
    /// Initial surface height
    pub height: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            star_count: DEFAULT_STAR_COUNT,
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl EngineConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn surface(&self) -> Surface {
        Surface::new(self.width, self.height)
    }

    /// Random source for the engine
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.star_count, 200);
        assert_eq!(config.surface(), Surface::new(1280.0, 720.0));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = EngineConfig::seeded(123).with_size(10.0, 10.0);
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
