use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::constants::WAVE_ASTEROID_CAP;
use crate::error::SimError;
use crate::input::{decode_input_byte, decode_input_byte_strict, Command};

mod collision;
mod game;

pub use game::Simulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Title,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub final_score: u32,
    pub final_lives: i32,
    pub final_wave: u32,
    pub final_rng_state: u32,
    pub frame_count: u32,
    pub mode: GameMode,
}

/// Asteroids in wave `wave`: 4, then +2 per wave through wave 4, then +1,
/// never more than [`WAVE_ASTEROID_CAP`].
pub fn wave_asteroid_count(wave: u32) -> usize {
    let wave = wave.max(1) as usize;
    let ramp = 4 + 2 * (wave.min(4) - 1);
    let tail = wave.saturating_sub(4);
    (ramp + tail).min(WAVE_ASTEROID_CAP)
}

fn check_dt(dt: f32) -> Result<(), SimError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidFrameDt { dt })
    }
}

/// Starts a game and feeds it one encoded input byte per frame.
pub fn replay(config: SimConfig, inputs: &[u8], dt: f32) -> Result<ReplayResult, SimError> {
    check_dt(dt)?;
    let mut sim = Simulation::new(config)?;
    sim.handle_command(Command::StartGame);

    for byte in inputs {
        sim.step(decode_input_byte(*byte), dt);
    }

    Ok(sim.result())
}

/// Like [`replay`], but rejects reserved input bits and stops at the first
/// frame whose state breaks an invariant.
pub fn replay_strict(config: SimConfig, inputs: &[u8], dt: f32) -> Result<ReplayResult, SimError> {
    check_dt(dt)?;
    let mut sim = Simulation::new(config)?;
    sim.handle_command(Command::StartGame);
    sim.validate_invariants()
        .map_err(|rule| SimError::RuleViolation {
            frame: sim.frame_count(),
            rule,
        })?;

    for (index, byte) in inputs.iter().enumerate() {
        let input = decode_input_byte_strict(index as u32 + 1, *byte)?;
        sim.step(input, dt);
        sim.validate_invariants()
            .map_err(|rule| SimError::RuleViolation {
                frame: sim.frame_count(),
                rule,
            })?;
    }

    Ok(sim.result())
}
