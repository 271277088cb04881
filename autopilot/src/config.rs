//! Arena overrides read from the environment.
//!
//! Unset, unparsable, or non-positive values fall back to the defaults, so a
//! stray variable never stops a run.

use arena_core::constants::{DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH, FIXED_FRAME_DT, MAX_FRAME_DT};
use arena_core::SimConfig;
use std::env;

pub const ENV_ARENA_WIDTH: &str = "ARENA_WIDTH";
pub const ENV_ARENA_HEIGHT: &str = "ARENA_HEIGHT";
pub const ENV_FRAME_DT: &str = "ARENA_FRAME_DT";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaSettings {
    pub width: f32,
    pub height: f32,
    pub frame_dt: f32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            frame_dt: FIXED_FRAME_DT,
        }
    }
}

impl ArenaSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from any key lookup. The frame step is capped at the
    /// simulation's own clamp.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            width: read_positive_f32(&lookup, ENV_ARENA_WIDTH, defaults.width),
            height: read_positive_f32(&lookup, ENV_ARENA_HEIGHT, defaults.height),
            frame_dt: read_positive_f32(&lookup, ENV_FRAME_DT, defaults.frame_dt)
                .min(MAX_FRAME_DT),
        }
    }

    /// CLI flags take precedence over the environment.
    pub fn with_overrides(
        mut self,
        width: Option<f32>,
        height: Option<f32>,
        frame_dt: Option<f32>,
    ) -> Self {
        if let Some(width) = width {
            self.width = width;
        }
        if let Some(height) = height {
            self.height = height;
        }
        if let Some(frame_dt) = frame_dt {
            self.frame_dt = frame_dt;
        }
        self
    }

    pub fn sim_config(&self, seed: u32) -> SimConfig {
        SimConfig {
            width: self.width,
            height: self.height,
            seed,
        }
    }
}

fn read_positive_f32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: f32) -> f32 {
    lookup(name)
        .and_then(|value| value.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(ArenaSettings::from_lookup(|_| None), ArenaSettings::default());
    }

    #[test]
    fn reads_valid_overrides() {
        let settings = ArenaSettings::from_lookup(lookup_from(&[
            (ENV_ARENA_WIDTH, "1024"),
            (ENV_ARENA_HEIGHT, " 768 "),
            (ENV_FRAME_DT, "0.02"),
        ]));
        assert_eq!(settings.width, 1024.0);
        assert_eq!(settings.height, 768.0);
        assert!((settings.frame_dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn bad_values_fall_back() {
        let settings = ArenaSettings::from_lookup(lookup_from(&[
            (ENV_ARENA_WIDTH, "wide"),
            (ENV_ARENA_HEIGHT, "-5"),
            (ENV_FRAME_DT, "NaN"),
        ]));
        assert_eq!(settings, ArenaSettings::default());
    }

    #[test]
    fn frame_dt_is_capped() {
        let settings = ArenaSettings::from_lookup(lookup_from(&[(ENV_FRAME_DT, "0.5")]));
        assert_eq!(settings.frame_dt, MAX_FRAME_DT);
    }

    #[test]
    fn cli_overrides_win() {
        let settings = ArenaSettings::default().with_overrides(Some(640.0), None, Some(0.025));
        assert_eq!(settings.width, 640.0);
        assert_eq!(settings.height, DEFAULT_ARENA_HEIGHT);
        assert_eq!(settings.frame_dt, 0.025);
        let config = settings.sim_config(9);
        assert_eq!(config.seed, 9);
        assert_eq!(config.width, 640.0);
    }
}
