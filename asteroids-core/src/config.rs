use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH, DEFAULT_SEED};
use crate::error::SimError;

/// Per-instance parameters. Gameplay tuning is fixed in [`crate::constants`];
/// only the arena extent and the random seed vary between simulations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    pub seed: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(SimError::InvalidArena {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_arenas() {
        let mut config = SimConfig::default();
        assert!(config.validate().is_ok());

        config.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidArena { .. })
        ));

        config.width = 800.0;
        config.height = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"seed": 42}"#).expect("partial config parses");
        assert_eq!(config.seed, 42);
        assert_eq!(config.width, DEFAULT_ARENA_WIDTH);
        assert_eq!(config.height, DEFAULT_ARENA_HEIGHT);
    }
}
